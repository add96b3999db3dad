use serde::{Deserialize, Serialize};

use super::action::{is_false, Action, Clickable, OnClick};
use super::style::{BorderStyle, Color, HorizontalAlignment, Icon, ImageCropStyle};
use crate::core::error::ValidationError;

macro_rules! clickable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Clickable for $ty {
                fn click_slot(&mut self) -> &mut Option<OnClick> {
                    &mut self.on_click
                }

                fn on_click(&self) -> Option<&OnClick> {
                    self.on_click.as_ref()
                }
            }
        )*
    };
}

clickable!(Image, DecoratedText, TextButton, ImageButton, Grid, Chip);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextParagraph {
    pub(crate) text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) max_lines: Option<u32>,
}

impl TextParagraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            max_lines: None,
        }
    }

    pub fn max_lines(mut self, lines: u32) -> Result<Self, ValidationError> {
        if lines == 0 {
            return Err(ValidationError::out_of_range("maxLines", "must be at least 1"));
        }
        self.max_lines = Some(lines);
        Ok(self)
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub(crate) image_url: String,
    #[serde(default)]
    pub(crate) alt_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) crop_style: Option<ImageCropStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) border_style: Option<BorderStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) on_click: Option<OnClick>,
}

impl Image {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            alt_text: String::new(),
            crop_style: None,
            border_style: None,
            on_click: None,
        }
    }

    pub fn alt_text(mut self, alt: impl Into<String>) -> Self {
        self.alt_text = alt.into();
        self
    }

    pub fn crop_style(mut self, style: ImageCropStyle) -> Self {
        self.crop_style = Some(style);
        self
    }

    pub fn border_style(mut self, style: BorderStyle) -> Self {
        self.border_style = Some(style);
        self
    }

    pub fn url(&self) -> &str {
        &self.image_url
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextButtonStyle {
    #[default]
    Outlined,
    Filled,
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextButton {
    pub(crate) text: String,
    #[serde(default)]
    pub(crate) style: TextButtonStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) background_color: Option<Color>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub(crate) disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) on_click: Option<OnClick>,
}

impl TextButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextButtonStyle::Outlined,
            background_color: None,
            disabled: false,
            on_click: None,
        }
    }

    pub fn style(mut self, style: TextButtonStyle) -> Self {
        self.style = style;
        self
    }

    pub fn background_color(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageButton {
    pub(crate) icon: Icon,
    #[serde(default)]
    pub(crate) alt_text: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub(crate) disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) on_click: Option<OnClick>,
}

impl ImageButton {
    pub fn new(icon: Icon) -> Self {
        Self {
            icon,
            alt_text: String::new(),
            disabled: false,
            on_click: None,
        }
    }

    pub fn alt_text(mut self, alt: impl Into<String>) -> Self {
        self.alt_text = alt.into();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Button {
    TextButton(TextButton),
    ImageButton(ImageButton),
}

impl Button {
    pub fn on_click(&self) -> Option<&OnClick> {
        match self {
            Self::TextButton(b) => b.on_click.as_ref(),
            Self::ImageButton(b) => b.on_click.as_ref(),
        }
    }

    pub fn is_disabled(&self) -> bool {
        match self {
            Self::TextButton(b) => b.disabled,
            Self::ImageButton(b) => b.disabled,
        }
    }

    /// Click behavior a surface may trigger; none while disabled.
    pub(crate) fn live_click(&self) -> Option<&OnClick> {
        if self.is_disabled() {
            return None;
        }
        self.on_click()
    }
}

impl From<TextButton> for Button {
    fn from(b: TextButton) -> Self {
        Self::TextButton(b)
    }
}

impl From<ImageButton> for Button {
    fn from(b: ImageButton) -> Self {
        Self::ImageButton(b)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonSet {
    pub(crate) buttons: Vec<Button>,
}

impl ButtonSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_button(mut self, button: impl Into<Button>) -> Self {
        self.buttons.push(button.into());
        self
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwitchControlType {
    #[default]
    Switch,
    CheckBox,
    #[serde(other)]
    Unspecified,
}

/// On/off input. Several switches may share a `fieldName`; their selected
/// values are submitted together as one array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Switch {
    pub(crate) field_name: String,
    #[serde(default)]
    pub(crate) value: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub(crate) selected: bool,
    #[serde(default)]
    pub(crate) control_type: SwitchControlType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) on_change_action: Option<Action>,
}

impl Switch {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            value: String::new(),
            selected: false,
            control_type: SwitchControlType::Switch,
            on_change_action: None,
        }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn control_type(mut self, control_type: SwitchControlType) -> Self {
        self.control_type = control_type;
        self
    }

    pub fn on_change_action(mut self, action: Action) -> Self {
        self.on_change_action = Some(action);
        self
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DecoratedTextControl {
    Button(Button),
    SwitchControl(Switch),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoratedText {
    pub(crate) text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) top_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) bottom_label: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub(crate) wrap_text: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) start_icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) control: Option<DecoratedTextControl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) on_click: Option<OnClick>,
}

impl DecoratedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            top_label: None,
            bottom_label: None,
            wrap_text: false,
            start_icon: None,
            control: None,
            on_click: None,
        }
    }

    pub fn top_label(mut self, label: impl Into<String>) -> Self {
        self.top_label = Some(label.into());
        self
    }

    pub fn bottom_label(mut self, label: impl Into<String>) -> Self {
        self.bottom_label = Some(label.into());
        self
    }

    pub fn wrap_text(mut self, wrap: bool) -> Self {
        self.wrap_text = wrap;
        self
    }

    pub fn start_icon(mut self, icon: Icon) -> Self {
        self.start_icon = Some(icon);
        self
    }

    /// Button and switch share one control slot; the last one set is kept.
    pub fn button(mut self, button: impl Into<Button>) -> Self {
        self.control = Some(DecoratedTextControl::Button(button.into()));
        self
    }

    pub fn switch_control(mut self, switch: Switch) -> Self {
        self.control = Some(DecoratedTextControl::SwitchControl(switch));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInput {
    pub(crate) field_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) value: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub(crate) multiline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) on_change_action: Option<Action>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) suggestions_action: Option<Action>,
}

impl TextInput {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            title: None,
            hint: None,
            value: None,
            multiline: false,
            on_change_action: None,
            suggestions: Vec::new(),
            suggestions_action: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    pub fn on_change_action(mut self, action: Action) -> Self {
        self.on_change_action = Some(action);
        self
    }

    pub fn suggestion(mut self, text: impl Into<String>) -> Self {
        self.suggestions.push(text.into());
        self
    }

    pub fn suggestions_action(mut self, action: Action) -> Self {
        self.suggestions_action = Some(action);
        self
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn default_value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionInputType {
    #[default]
    CheckBox,
    RadioButton,
    Dropdown,
    Switch,
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionItem {
    pub text: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionInput {
    pub(crate) field_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
    #[serde(rename = "type", default)]
    pub(crate) selection_type: SelectionInputType,
    #[serde(default)]
    pub(crate) items: Vec<SelectionItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) on_change_action: Option<Action>,
}

impl SelectionInput {
    pub fn new(field_name: impl Into<String>, selection_type: SelectionInputType) -> Self {
        Self {
            field_name: field_name.into(),
            title: None,
            selection_type,
            items: Vec::new(),
            on_change_action: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn add_item(
        mut self,
        text: impl Into<String>,
        value: impl Into<String>,
        selected: bool,
    ) -> Self {
        self.items.push(SelectionItem {
            text: text.into(),
            value: value.into(),
            selected,
        });
        self
    }

    pub fn on_change_action(mut self, action: Action) -> Self {
        self.on_change_action = Some(action);
        self
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn items(&self) -> &[SelectionItem] {
        &self.items
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateTimePickerType {
    DateOnly,
    TimeOnly,
    #[default]
    DateAndTime,
    #[serde(other)]
    Unspecified,
}

const MAX_TZ_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimePicker {
    pub(crate) field_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
    #[serde(rename = "type", default)]
    pub(crate) picker_type: DateTimePickerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) value_ms_epoch: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) timezone_offset_minutes: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) on_change_action: Option<Action>,
}

impl DateTimePicker {
    pub fn new(field_name: impl Into<String>, picker_type: DateTimePickerType) -> Self {
        Self {
            field_name: field_name.into(),
            title: None,
            picker_type,
            value_ms_epoch: None,
            timezone_offset_minutes: None,
            on_change_action: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn value_ms_epoch(mut self, ms: i64) -> Self {
        self.value_ms_epoch = Some(ms);
        self
    }

    pub fn timezone_offset_minutes(mut self, minutes: i32) -> Result<Self, ValidationError> {
        if minutes.abs() > MAX_TZ_OFFSET_MINUTES {
            return Err(ValidationError::out_of_range(
                "timezoneOffsetMinutes",
                format!("{minutes} exceeds +/-{MAX_TZ_OFFSET_MINUTES}"),
            ));
        }
        self.timezone_offset_minutes = Some(minutes);
        Ok(self)
    }

    pub fn on_change_action(mut self, action: Action) -> Self {
        self.on_change_action = Some(action);
        self
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub(crate) fn offset_in_range(&self) -> bool {
        self.timezone_offset_minutes
            .map_or(true, |m| m.abs() <= MAX_TZ_OFFSET_MINUTES)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GridItemLayout {
    #[default]
    TextBelow,
    TextAbove,
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageComponent {
    pub image_url: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_style: Option<ImageCropStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_style: Option<BorderStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageComponent>,
    #[serde(default)]
    pub layout: GridItemLayout,
    #[serde(default)]
    pub horizontal_alignment: HorizontalAlignment,
}

impl GridItem {
    pub fn new() -> Self {
        Self {
            identifier: None,
            title: None,
            subtitle: None,
            image: None,
            layout: GridItemLayout::TextBelow,
            horizontal_alignment: HorizontalAlignment::Start,
        }
    }

    pub fn identifier(mut self, id: impl Into<String>) -> Self {
        self.identifier = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn image(mut self, image: ImageComponent) -> Self {
        self.image = Some(image);
        self
    }
}

impl Default for GridItem {
    fn default() -> Self {
        Self::new()
    }
}

fn one_column() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) items: Vec<GridItem>,
    #[serde(default = "one_column")]
    pub(crate) num_columns: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) border_style: Option<BorderStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) on_click: Option<OnClick>,
}

impl Grid {
    pub fn new() -> Self {
        Self {
            title: None,
            items: Vec::new(),
            num_columns: 1,
            border_style: None,
            on_click: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn add_item(mut self, item: GridItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn num_columns(mut self, columns: u32) -> Result<Self, ValidationError> {
        if columns == 0 {
            return Err(ValidationError::out_of_range("numColumns", "must be at least 1"));
        }
        self.num_columns = columns;
        Ok(self)
    }

    pub fn border_style(mut self, style: BorderStyle) -> Self {
        self.border_style = Some(style);
        self
    }

    pub fn items(&self) -> &[GridItem] {
        &self.items
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chip {
    pub(crate) label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) alt_text: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub(crate) disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) on_click: Option<OnClick>,
}

impl Chip {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            icon: None,
            alt_text: None,
            disabled: false,
            on_click: None,
        }
    }

    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn alt_text(mut self, alt: impl Into<String>) -> Self {
        self.alt_text = Some(alt.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChipListLayout {
    #[default]
    Wrapped,
    HorizontalScrollable,
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChipList {
    pub(crate) chips: Vec<Chip>,
    #[serde(default)]
    pub(crate) layout: ChipListLayout,
}

impl ChipList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_chip(mut self, chip: Chip) -> Self {
        self.chips.push(chip);
        self
    }

    pub fn layout(mut self, layout: ChipListLayout) -> Self {
        self.layout = layout;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Divider {}

/// A node of a card section, tagged on the wire by its camelCase kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Widget {
    TextParagraph(TextParagraph),
    Image(Image),
    DecoratedText(DecoratedText),
    #[serde(rename = "buttonList")]
    ButtonSet(ButtonSet),
    TextInput(TextInput),
    SelectionInput(SelectionInput),
    DateTimePicker(DateTimePicker),
    #[serde(rename = "switchControl")]
    Switch(Switch),
    Grid(Grid),
    ChipList(ChipList),
    Divider(Divider),
}

/// Which of a widget's callbacks a render surface event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trigger {
    #[default]
    Click,
    Change,
    Suggestions,
}

/// What an event on a widget resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Click(&'a OnClick),
    Callback(&'a Action),
}

pub(crate) fn resolve_click(click: &OnClick, menu_item: Option<usize>) -> Option<Resolved<'_>> {
    match (click, menu_item) {
        (OnClick::OverflowMenu(menu), Some(i)) => {
            let item = menu.items.get(i).filter(|item| !item.disabled)?;
            item.on_click.as_ref().map(Resolved::Click)
        }
        (_, Some(_)) => None,
        (click, None) => Some(Resolved::Click(click)),
    }
}

impl Widget {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TextParagraph(_) => "textParagraph",
            Self::Image(_) => "image",
            Self::DecoratedText(_) => "decoratedText",
            Self::ButtonSet(_) => "buttonList",
            Self::TextInput(_) => "textInput",
            Self::SelectionInput(_) => "selectionInput",
            Self::DateTimePicker(_) => "dateTimePicker",
            Self::Switch(_) => "switchControl",
            Self::Grid(_) => "grid",
            Self::ChipList(_) => "chipList",
            Self::Divider(_) => "divider",
        }
    }

    /// Form field this widget submits under, if it is an input.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::TextInput(w) => Some(&w.field_name),
            Self::SelectionInput(w) => Some(&w.field_name),
            Self::DateTimePicker(w) => Some(&w.field_name),
            Self::Switch(w) => Some(&w.field_name),
            Self::DecoratedText(DecoratedText {
                control: Some(DecoratedTextControl::SwitchControl(s)),
                ..
            }) => Some(&s.field_name),
            _ => None,
        }
    }

    /// Switches (standalone or inside decorated text) may share field names.
    pub(crate) fn as_switch(&self) -> Option<&Switch> {
        match self {
            Self::Switch(s) => Some(s),
            Self::DecoratedText(DecoratedText {
                control: Some(DecoratedTextControl::SwitchControl(s)),
                ..
            }) => Some(s),
            _ => None,
        }
    }

    /// `item` picks a button, chip or decorated-text control; `menu_item`
    /// picks an entry of the overflow menu opened by that click.
    pub fn resolve(
        &self,
        trigger: Trigger,
        item: Option<usize>,
        menu_item: Option<usize>,
    ) -> Option<Resolved<'_>> {
        match trigger {
            Trigger::Click => resolve_click(self.click_at(item)?, menu_item),
            Trigger::Change => self.change_action().map(Resolved::Callback),
            Trigger::Suggestions => match self {
                Self::TextInput(w) => w.suggestions_action.as_ref().map(Resolved::Callback),
                _ => None,
            },
        }
    }

    fn click_at(&self, item: Option<usize>) -> Option<&OnClick> {
        match (self, item) {
            (Self::Image(w), None) => w.on_click.as_ref(),
            (Self::Grid(w), _) => w.on_click.as_ref(),
            (Self::DecoratedText(w), None) => w.on_click.as_ref(),
            (Self::DecoratedText(w), Some(0)) => match &w.control {
                Some(DecoratedTextControl::Button(b)) => b.live_click(),
                _ => None,
            },
            (Self::ButtonSet(w), Some(i)) => w.buttons.get(i)?.live_click(),
            (Self::ChipList(w), Some(i)) => {
                let chip = w.chips.get(i).filter(|c| !c.disabled)?;
                chip.on_click.as_ref()
            }
            _ => None,
        }
    }

    fn change_action(&self) -> Option<&Action> {
        match self {
            Self::TextInput(w) => w.on_change_action.as_ref(),
            Self::SelectionInput(w) => w.on_change_action.as_ref(),
            Self::DateTimePicker(w) => w.on_change_action.as_ref(),
            _ => self.as_switch()?.on_change_action.as_ref(),
        }
    }
}

macro_rules! into_widget {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Widget {
                fn from(w: $variant) -> Self {
                    Self::$variant(w)
                }
            }
        )*
    };
}

into_widget!(
    TextParagraph,
    Image,
    DecoratedText,
    ButtonSet,
    TextInput,
    SelectionInput,
    DateTimePicker,
    Switch,
    Grid,
    ChipList,
    Divider,
);

#[cfg(test)]
#[path = "../../tests/unit/models/widget.rs"]
mod tests;
