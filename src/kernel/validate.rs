//! Constraint validator. Every `build()` re-runs it over the full subtree.

use rustc_hash::FxHashMap;

use crate::core::error::{ValidationError, ValidationErrorKind, ValidationErrors};
use crate::models::action::{Action, OnClick};
use crate::models::card::{Card, CardHeader, CardSection, MAX_SECTIONS, MAX_WIDGETS_PER_SECTION};
use crate::models::response::{ActionResponse, DraftUpdate, NavigationOp, ResponseKind, UniversalResponse};
use crate::models::style::{Icon, IconSource};
use crate::models::widget::{
    Button, DecoratedTextControl, ImageComponent, SelectionInputType, Switch, TextButton, Widget,
};

/// A node the validator knows how to walk.
pub trait Validate {
    fn walk<'a>(&'a self, path: &str, w: &mut Walker<'a>);
}

pub fn validate<T: Validate + ?Sized>(node: &T, root: &str) -> Result<(), ValidationErrors> {
    let mut w = Walker::default();
    node.walk(root, &mut w);
    w.finish()
}

pub fn validate_card(card: &Card) -> Result<(), ValidationErrors> {
    validate(card, "card")
}

pub fn validate_section(section: &CardSection) -> Result<(), ValidationErrors> {
    validate(section, "section")
}

pub fn validate_response(response: &ActionResponse) -> Result<(), ValidationErrors> {
    validate(response, "actionResponse")
}

#[derive(Default)]
pub struct Walker<'a> {
    errors: Vec<ValidationError>,
    /// Submit actions declaring required widgets, checked against the card's
    /// field names once the whole card has been walked.
    submit_actions: Vec<(String, &'a Action)>,
}

impl<'a> Walker<'a> {
    fn push(&mut self, path: &str, field: &str, kind: ValidationErrorKind) {
        self.errors.push(ValidationError::new(path, field, kind));
    }

    fn relocate(&mut self, path: &str, e: ValidationError) {
        self.errors.push(ValidationError::new(path, e.field, e.kind));
    }

    fn required(&mut self, path: &str, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(path, field, ValidationErrorKind::Required);
        }
    }

    fn url(&mut self, path: &str, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(path, field, ValidationErrorKind::Required);
            return;
        }
        if let Err(e) = url::Url::parse(value) {
            self.push(
                path,
                field,
                ValidationErrorKind::InvalidUrl {
                    detail: e.to_string(),
                },
            );
        }
    }

    fn count(&mut self, path: &str, field: &str, actual: usize, limit: usize) {
        if actual == 0 {
            self.push(path, field, ValidationErrorKind::Required);
        } else if actual > limit {
            self.push(path, field, ValidationErrorKind::TooMany { limit, actual });
        }
    }

    fn action(&mut self, path: &str, action: &'a Action, submit: bool) {
        self.required(path, "targetName", &action.target_name);
        if !action.has_submit_requirements() {
            return;
        }
        if submit {
            self.submit_actions.push((path.to_string(), action));
        } else {
            self.push(
                path,
                "requiredWidgetFieldNames",
                ValidationErrorKind::NotAllowed {
                    detail: "required widgets only apply to submit actions".to_string(),
                },
            );
        }
    }

    fn on_click(&mut self, path: &str, click: Option<&'a OnClick>, in_menu: bool) {
        let Some(click) = click else {
            return;
        };
        let path = format!("{path}.onClick.{}", click.kind());
        match click {
            OnClick::OpenLink(link) => self.url(&path, "url", &link.url),
            OnClick::Action(a) | OnClick::OpenLinkAction(a) => self.action(&path, a, true),
            OnClick::AuthorizationAction(a) => {
                self.url(&path, "authorizationUrl", &a.authorization_url)
            }
            OnClick::ComposeAction(c) => self.action(&path, &c.action, true),
            OnClick::OverflowMenu(menu) => {
                if in_menu {
                    self.push(
                        &path,
                        "overflowMenu",
                        ValidationErrorKind::NotAllowed {
                            detail: "overflow menus cannot nest".to_string(),
                        },
                    );
                    return;
                }
                if menu.items.is_empty() {
                    self.push(&path, "items", ValidationErrorKind::Required);
                }
                for (i, item) in menu.items.iter().enumerate() {
                    let p = format!("{path}.items[{i}]");
                    self.required(&p, "text", &item.text);
                    if let Some(icon) = &item.start_icon {
                        self.icon(&p, "startIcon", icon);
                    }
                    self.on_click(&p, item.on_click.as_ref(), true);
                }
            }
        }
    }

    fn icon(&mut self, path: &str, field: &str, icon: &Icon) {
        match &icon.source {
            IconSource::IconUrl(u) => self.url(path, field, u),
            IconSource::MaterialIcon(name) => self.required(path, field, name),
            IconSource::KnownIcon(_) => {}
        }
    }

    fn header(&mut self, path: &str, header: &CardHeader) {
        self.required(path, "title", &header.title);
        if let Some(u) = &header.image_url {
            self.url(path, "imageUrl", u);
        }
    }

    fn text_button(&mut self, path: &str, b: &'a TextButton) {
        self.required(path, "text", &b.text);
        if let Some(c) = &b.background_color {
            if let Err(e) = c.check() {
                self.relocate(path, e);
            }
        }
        self.on_click(path, b.on_click.as_ref(), false);
    }

    fn button(&mut self, path: &str, button: &'a Button) {
        match button {
            Button::TextButton(b) => self.text_button(&format!("{path}.textButton"), b),
            Button::ImageButton(b) => {
                let p = format!("{path}.imageButton");
                self.required(&p, "altText", &b.alt_text);
                self.icon(&p, "icon", &b.icon);
                self.on_click(&p, b.on_click.as_ref(), false);
            }
        }
    }

    fn switch(&mut self, path: &str, s: &'a Switch) {
        self.required(path, "fieldName", &s.field_name);
        if let Some(a) = &s.on_change_action {
            self.action(&format!("{path}.onChangeAction"), a, false);
        }
    }

    fn image_component(&mut self, path: &str, image: &ImageComponent) {
        self.url(path, "imageUrl", &image.image_url);
        self.required(path, "altText", &image.alt_text);
        if let Some(Err(e)) = image.crop_style.map(|c| c.check()) {
            self.relocate(path, e);
        }
        if let Some(Err(e)) = image.border_style.map(|b| b.check()) {
            self.relocate(path, e);
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

impl Validate for Widget {
    fn walk<'a>(&'a self, path: &str, w: &mut Walker<'a>) {
        let path = format!("{path}.{}", self.kind());
        let path = path.as_str();
        match self {
            Widget::TextParagraph(t) => w.required(path, "text", &t.text),
            Widget::Image(img) => {
                w.url(path, "imageUrl", &img.image_url);
                w.required(path, "altText", &img.alt_text);
                if let Some(Err(e)) = img.crop_style.map(|c| c.check()) {
                    w.relocate(path, e);
                }
                if let Some(Err(e)) = img.border_style.map(|b| b.check()) {
                    w.relocate(path, e);
                }
                w.on_click(path, img.on_click.as_ref(), false);
            }
            Widget::DecoratedText(d) => {
                w.required(path, "text", &d.text);
                if let Some(icon) = &d.start_icon {
                    w.icon(path, "startIcon", icon);
                }
                match &d.control {
                    Some(DecoratedTextControl::Button(b)) => w.button(&format!("{path}.button"), b),
                    Some(DecoratedTextControl::SwitchControl(s)) => {
                        w.switch(&format!("{path}.switchControl"), s)
                    }
                    None => {}
                }
                w.on_click(path, d.on_click.as_ref(), false);
            }
            Widget::ButtonSet(set) => {
                if set.buttons.is_empty() {
                    w.push(path, "buttons", ValidationErrorKind::Required);
                }
                for (i, b) in set.buttons.iter().enumerate() {
                    w.button(&format!("{path}.buttons[{i}]"), b);
                }
            }
            Widget::TextInput(t) => {
                w.required(path, "fieldName", &t.field_name);
                if let Some(a) = &t.on_change_action {
                    w.action(&format!("{path}.onChangeAction"), a, false);
                }
                if let Some(a) = &t.suggestions_action {
                    w.action(&format!("{path}.suggestionsAction"), a, false);
                }
            }
            Widget::SelectionInput(s) => {
                w.required(path, "fieldName", &s.field_name);
                if s.items.is_empty() {
                    w.push(path, "items", ValidationErrorKind::Required);
                }
                let single = matches!(
                    s.selection_type,
                    SelectionInputType::RadioButton | SelectionInputType::Dropdown
                );
                let selected = s.items.iter().filter(|i| i.selected).count();
                if single && selected > 1 {
                    w.push(
                        path,
                        "items",
                        ValidationErrorKind::Conflict {
                            detail: format!("{selected} items selected in a single-choice input"),
                        },
                    );
                }
                if let Some(a) = &s.on_change_action {
                    w.action(&format!("{path}.onChangeAction"), a, false);
                }
            }
            Widget::DateTimePicker(d) => {
                w.required(path, "fieldName", &d.field_name);
                if !d.offset_in_range() {
                    w.push(
                        path,
                        "timezoneOffsetMinutes",
                        ValidationErrorKind::OutOfRange {
                            detail: "offset exceeds 14 hours".to_string(),
                        },
                    );
                }
                if let Some(a) = &d.on_change_action {
                    w.action(&format!("{path}.onChangeAction"), a, false);
                }
            }
            Widget::Switch(s) => w.switch(path, s),
            Widget::Grid(g) => {
                if g.items.is_empty() {
                    w.push(path, "items", ValidationErrorKind::Required);
                }
                if g.num_columns == 0 {
                    w.push(
                        path,
                        "numColumns",
                        ValidationErrorKind::OutOfRange {
                            detail: "must be at least 1".to_string(),
                        },
                    );
                }
                if let Some(Err(e)) = g.border_style.map(|b| b.check()) {
                    w.relocate(path, e);
                }
                for (i, item) in g.items.iter().enumerate() {
                    if let Some(img) = &item.image {
                        w.image_component(&format!("{path}.items[{i}].image"), img);
                    }
                }
                w.on_click(path, g.on_click.as_ref(), false);
            }
            Widget::ChipList(list) => {
                if list.chips.is_empty() {
                    w.push(path, "chips", ValidationErrorKind::Required);
                }
                for (i, chip) in list.chips.iter().enumerate() {
                    let p = format!("{path}.chips[{i}]");
                    w.required(&p, "label", &chip.label);
                    if let Some(icon) = &chip.icon {
                        w.icon(&p, "icon", icon);
                    }
                    w.on_click(&p, chip.on_click.as_ref(), false);
                }
            }
            Widget::Divider(_) => {}
        }
    }
}

impl Validate for CardSection {
    fn walk<'a>(&'a self, path: &str, w: &mut Walker<'a>) {
        w.count(path, "widgets", self.widgets.len(), MAX_WIDGETS_PER_SECTION);
        if !self.collapsible && self.num_uncollapsible_widgets > 0 {
            w.push(
                path,
                "numUncollapsibleWidgets",
                ValidationErrorKind::NotAllowed {
                    detail: "section is not collapsible".to_string(),
                },
            );
        }
        for (i, widget) in self.widgets.iter().enumerate() {
            widget.walk(&format!("{path}.widgets[{i}]"), w);
        }
    }
}

impl Validate for Card {
    fn walk<'a>(&'a self, path: &str, w: &mut Walker<'a>) {
        if let Some(header) = self.header() {
            w.header(&format!("{path}.header"), header);
        }
        if let Some(header) = self.peek_header() {
            w.header(&format!("{path}.peekCardHeader"), header);
        }
        if let Some(name) = self.name() {
            w.required(path, "name", name);
        }
        w.count(path, "sections", self.sections().len(), MAX_SECTIONS);
        for (i, section) in self.sections().iter().enumerate() {
            section.walk(&format!("{path}.sections[{i}]"), w);
        }
        for (i, action) in self.card_actions().iter().enumerate() {
            let p = format!("{path}.cardActions[{i}]");
            w.required(&p, "text", &action.text);
            w.on_click(&p, action.on_click.as_ref(), false);
        }
        if let Some(footer) = self.fixed_footer() {
            let p = format!("{path}.fixedFooter");
            w.text_button(&format!("{p}.primaryButton"), &footer.primary_button);
            if let Some(b) = &footer.secondary_button {
                w.text_button(&format!("{p}.secondaryButton"), b);
            }
        }

        // Field names form one submission namespace; only switches may share.
        let mut seen: FxHashMap<&str, bool> = FxHashMap::default();
        for (si, section) in self.sections().iter().enumerate() {
            for (wi, widget) in section.widgets().iter().enumerate() {
                let Some(name) = widget.field_name() else {
                    continue;
                };
                if name.is_empty() {
                    continue;
                }
                let is_switch = widget.as_switch().is_some();
                match seen.get(name) {
                    Some(&prev_switch) if prev_switch && is_switch => {}
                    Some(_) => w.push(
                        &format!("{path}.sections[{si}].widgets[{wi}].{}", widget.kind()),
                        "fieldName",
                        ValidationErrorKind::DuplicateFieldName,
                    ),
                    None => {
                        seen.insert(name, is_switch);
                    }
                }
            }
        }

        let submit_actions = std::mem::take(&mut w.submit_actions);
        for (p, action) in &submit_actions {
            for name in &action.required_widget_field_names {
                if !seen.contains_key(name.as_str()) {
                    w.push(
                        p,
                        "requiredWidgetFieldNames",
                        ValidationErrorKind::UnknownField { name: name.clone() },
                    );
                }
            }
        }
    }
}

impl Validate for ActionResponse {
    fn walk<'a>(&'a self, path: &str, w: &mut Walker<'a>) {
        let path = format!("{path}.{}", self.kind().label());
        let path = path.as_str();
        match self.kind() {
            ResponseKind::Navigation(nav) => {
                if nav.ops().is_empty() {
                    w.push(path, "navigations", ValidationErrorKind::Required);
                }
                for (i, op) in nav.ops().iter().enumerate() {
                    if let NavigationOp::PopToNamed(name) = op {
                        w.required(&format!("{path}.navigations[{i}]"), "popToNamedCard", name);
                    }
                }
            }
            ResponseKind::Notification(n) => w.required(path, "text", &n.text),
            ResponseKind::OpenLink(link) => w.url(path, "url", &link.url),
            ResponseKind::Compose(c) => w.required(path, "draft", &c.draft.0),
            ResponseKind::Suggestions(_) => {}
            ResponseKind::UpdateDraft(u) => {
                if u.updates.is_empty() {
                    w.push(path, "updates", ValidationErrorKind::Required);
                }
                for (i, update) in u.updates.iter().enumerate() {
                    if let DraftUpdate::InsertContent { content, .. } = update {
                        w.required(&format!("{path}.updates[{i}]"), "content", content);
                    }
                }
            }
            ResponseKind::Dialog(_) => {}
            ResponseKind::Universal(UniversalResponse::DisplayCards(cards)) => {
                if cards.is_empty() {
                    w.push(path, "displayCards", ValidationErrorKind::Required);
                }
            }
            ResponseKind::Universal(UniversalResponse::OpenLink(link)) => {
                w.url(path, "openLink", &link.url)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/validate.rs"]
mod tests;
