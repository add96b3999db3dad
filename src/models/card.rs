use serde::{Deserialize, Serialize};

use super::action::{is_false, Clickable, OnClick};
use super::style::ImageType;
use super::widget::{resolve_click, Resolved, TextButton, Trigger, Widget};
use crate::core::error::ValidationErrors;
use crate::kernel::validate;

pub const MAX_SECTIONS: usize = 100;
pub const MAX_WIDGETS_PER_SECTION: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayStyle {
    #[default]
    Replace,
    Peek,
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardHeader {
    pub(crate) title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) image_url: Option<String>,
    #[serde(default)]
    pub(crate) image_type: ImageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) image_alt_text: Option<String>,
}

impl CardHeader {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            image_url: None,
            image_type: ImageType::Square,
            image_alt_text: None,
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn image_type(mut self, image_type: ImageType) -> Self {
        self.image_type = image_type;
        self
    }

    pub fn image_alt_text(mut self, alt: impl Into<String>) -> Self {
        self.image_alt_text = Some(alt.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) header: Option<String>,
    #[serde(default)]
    pub(crate) widgets: Vec<Widget>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub(crate) collapsible: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub(crate) num_uncollapsible_widgets: usize,
}

fn is_zero(v: &usize) -> bool {
    *v == 0
}

impl CardSection {
    pub fn builder() -> CardSectionBuilder {
        CardSectionBuilder::default()
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn is_collapsible(&self) -> bool {
        self.collapsible
    }

    pub fn num_uncollapsible_widgets(&self) -> usize {
        self.num_uncollapsible_widgets
    }
}

#[derive(Debug, Default)]
pub struct CardSectionBuilder {
    section: CardSection,
}

impl Default for CardSection {
    fn default() -> Self {
        Self {
            header: None,
            widgets: Vec::new(),
            collapsible: false,
            num_uncollapsible_widgets: 0,
        }
    }
}

impl CardSectionBuilder {
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.section.header = Some(header.into());
        self
    }

    pub fn add_widget(mut self, widget: impl Into<Widget>) -> Self {
        self.section.widgets.push(widget.into());
        self
    }

    pub fn collapsible(mut self, collapsible: bool) -> Self {
        self.section.collapsible = collapsible;
        self
    }

    pub fn num_uncollapsible_widgets(mut self, n: usize) -> Self {
        self.section.num_uncollapsible_widgets = n;
        self
    }

    pub fn build(self) -> Result<CardSection, ValidationErrors> {
        validate::validate_section(&self.section)?;
        Ok(self.section)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedFooter {
    pub(crate) primary_button: TextButton,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) secondary_button: Option<TextButton>,
}

impl FixedFooter {
    pub fn new(primary: TextButton) -> Self {
        Self {
            primary_button: primary,
            secondary_button: None,
        }
    }

    pub fn secondary_button(mut self, button: TextButton) -> Self {
        self.secondary_button = Some(button);
        self
    }
}

/// Entry in the card's overflow menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAction {
    pub(crate) text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) on_click: Option<OnClick>,
}

impl CardAction {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            on_click: None,
        }
    }
}

impl Clickable for CardAction {
    fn click_slot(&mut self) -> &mut Option<OnClick> {
        &mut self.on_click
    }

    fn on_click(&self) -> Option<&OnClick> {
        self.on_click.as_ref()
    }
}

/// An immutable, validated screen. Only [`CardBuilder::build`] and the wire
/// decoder produce one, and both run the full validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "CardRepr")]
pub struct Card {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header: Option<CardHeader>,
    sections: Vec<CardSection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    card_actions: Vec<CardAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fixed_footer: Option<FixedFooter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    peek_card_header: Option<CardHeader>,
    #[serde(default)]
    display_style: DisplayStyle,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardRepr {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    header: Option<CardHeader>,
    #[serde(default)]
    sections: Vec<CardSection>,
    #[serde(default)]
    card_actions: Vec<CardAction>,
    #[serde(default)]
    fixed_footer: Option<FixedFooter>,
    #[serde(default)]
    peek_card_header: Option<CardHeader>,
    #[serde(default)]
    display_style: DisplayStyle,
}

impl TryFrom<CardRepr> for Card {
    type Error = ValidationErrors;

    fn try_from(r: CardRepr) -> Result<Self, Self::Error> {
        let card = Card {
            name: r.name,
            header: r.header,
            sections: r.sections,
            card_actions: r.card_actions,
            fixed_footer: r.fixed_footer,
            peek_card_header: r.peek_card_header,
            display_style: r.display_style,
        };
        validate::validate_card(&card)?;
        Ok(card)
    }
}

impl Card {
    pub fn builder() -> CardBuilder {
        CardBuilder::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn header(&self) -> Option<&CardHeader> {
        self.header.as_ref()
    }

    pub fn sections(&self) -> &[CardSection] {
        &self.sections
    }

    pub fn card_actions(&self) -> &[CardAction] {
        &self.card_actions
    }

    pub fn fixed_footer(&self) -> Option<&FixedFooter> {
        self.fixed_footer.as_ref()
    }

    pub fn peek_header(&self) -> Option<&CardHeader> {
        self.peek_card_header.as_ref()
    }

    pub fn display_style(&self) -> DisplayStyle {
        self.display_style
    }

    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.sections.iter().flat_map(|s| s.widgets.iter())
    }

    /// Distinct input field names, in first-appearance order.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.widgets().filter_map(Widget::field_name) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    pub fn resolve(&self, r: &ActionRef) -> Option<Resolved<'_>> {
        match r.area {
            Area::Section => self
                .sections
                .get(r.section)?
                .widgets
                .get(r.widget)?
                .resolve(r.trigger, r.item, r.menu_item),
            Area::FixedFooter => {
                if r.trigger != Trigger::Click {
                    return None;
                }
                let footer = self.fixed_footer.as_ref()?;
                let button = match r.widget {
                    0 => &footer.primary_button,
                    1 => footer.secondary_button.as_ref()?,
                    _ => return None,
                };
                if button.disabled {
                    return None;
                }
                resolve_click(button.on_click.as_ref()?, r.menu_item)
            }
            Area::CardAction => {
                if r.trigger != Trigger::Click {
                    return None;
                }
                let action = self.card_actions.get(r.widget)?;
                resolve_click(action.on_click.as_ref()?, r.menu_item)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct CardBuilder {
    name: Option<String>,
    header: Option<CardHeader>,
    sections: Vec<CardSection>,
    card_actions: Vec<CardAction>,
    fixed_footer: Option<FixedFooter>,
    peek_card_header: Option<CardHeader>,
    display_style: DisplayStyle,
}

impl CardBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn header(mut self, header: CardHeader) -> Self {
        self.header = Some(header);
        self
    }

    pub fn add_section(mut self, section: CardSection) -> Self {
        self.sections.push(section);
        self
    }

    pub fn add_card_action(mut self, action: CardAction) -> Self {
        self.card_actions.push(action);
        self
    }

    pub fn fixed_footer(mut self, footer: FixedFooter) -> Self {
        self.fixed_footer = Some(footer);
        self
    }

    pub fn peek_card_header(mut self, header: CardHeader) -> Self {
        self.peek_card_header = Some(header);
        self
    }

    pub fn display_style(mut self, style: DisplayStyle) -> Self {
        self.display_style = style;
        self
    }

    /// Runs the validator over the whole tree. Nothing is kept on failure.
    pub fn build(self) -> Result<Card, ValidationErrors> {
        let card = Card {
            name: self.name,
            header: self.header,
            sections: self.sections,
            card_actions: self.card_actions,
            fixed_footer: self.fixed_footer,
            peek_card_header: self.peek_card_header,
            display_style: self.display_style,
        };
        validate::validate_card(&card)?;
        Ok(card)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Surface {
    #[default]
    Stack,
    Dialog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Area {
    #[default]
    Section,
    FixedFooter,
    CardAction,
}

/// Structural address of a widget callback on the visible card. For the fixed
/// footer `widget` is 0 (primary) or 1 (secondary); for card actions it is the
/// menu index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRef {
    #[serde(default)]
    pub surface: Surface,
    #[serde(default)]
    pub area: Area,
    #[serde(default)]
    pub section: usize,
    #[serde(default)]
    pub widget: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_item: Option<usize>,
    #[serde(default)]
    pub trigger: Trigger,
}

impl ActionRef {
    pub fn widget(section: usize, widget: usize) -> Self {
        Self {
            section,
            widget,
            ..Self::default()
        }
    }

    pub fn footer(secondary: bool) -> Self {
        Self {
            area: Area::FixedFooter,
            widget: usize::from(secondary),
            ..Self::default()
        }
    }

    pub fn card_action(index: usize) -> Self {
        Self {
            area: Area::CardAction,
            widget: index,
            ..Self::default()
        }
    }

    pub fn item(mut self, item: usize) -> Self {
        self.item = Some(item);
        self
    }

    pub fn menu_item(mut self, menu_item: usize) -> Self {
        self.menu_item = Some(menu_item);
        self
    }

    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn on_dialog(mut self) -> Self {
        self.surface = Surface::Dialog;
        self
    }
}

impl std::fmt::Display for ActionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}/{:?}[{}][{}]", self.surface, self.area, self.section, self.widget)?;
        if let Some(item) = self.item {
            write!(f, "#{item}")?;
        }
        if let Some(menu_item) = self.menu_item {
            write!(f, ">{menu_item}")?;
        }
        write!(f, ":{:?}", self.trigger)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/card.rs"]
mod tests;
