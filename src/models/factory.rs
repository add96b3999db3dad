//! Stateless factory namespace. Every constructor hands back a fresh builder or
//! value; nothing is shared between calls.

use super::action::{Action, AuthorizationAction, OpenLink, OverflowMenu, OverflowMenuItem};
use super::card::{Card, CardAction, CardBuilder, CardHeader, CardSectionBuilder, FixedFooter};
use super::response::{
    ActionResponseBuilder, DialogResponse, Navigation, Notification, UpdateDraftResponse,
};
use super::style::{BorderStyle, BorderType, Icon, ImageCropStyle, ImageCropType, KnownIcon};
use super::widget::{
    ButtonSet, Chip, ChipList, DateTimePicker, DateTimePickerType, DecoratedText, Divider, Grid,
    GridItem, Image, ImageButton, SelectionInput, SelectionInputType, Switch, TextButton,
    TextInput, TextParagraph,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct CardService;

impl CardService {
    pub fn new_card_builder() -> CardBuilder {
        Card::builder()
    }

    pub fn new_card_section() -> CardSectionBuilder {
        CardSectionBuilder::default()
    }

    pub fn new_card_header(title: impl Into<String>) -> CardHeader {
        CardHeader::new(title)
    }

    pub fn new_card_action(text: impl Into<String>) -> CardAction {
        CardAction::new(text)
    }

    pub fn new_fixed_footer(primary: TextButton) -> FixedFooter {
        FixedFooter::new(primary)
    }

    pub fn new_text_paragraph(text: impl Into<String>) -> TextParagraph {
        TextParagraph::new(text)
    }

    pub fn new_image(url: impl Into<String>) -> Image {
        Image::new(url)
    }

    pub fn new_decorated_text(text: impl Into<String>) -> DecoratedText {
        DecoratedText::new(text)
    }

    pub fn new_text_button(text: impl Into<String>) -> TextButton {
        TextButton::new(text)
    }

    pub fn new_image_button(icon: Icon) -> ImageButton {
        ImageButton::new(icon)
    }

    pub fn new_button_set() -> ButtonSet {
        ButtonSet::new()
    }

    pub fn new_text_input(field_name: impl Into<String>) -> TextInput {
        TextInput::new(field_name)
    }

    pub fn new_selection_input(
        field_name: impl Into<String>,
        selection_type: SelectionInputType,
    ) -> SelectionInput {
        SelectionInput::new(field_name, selection_type)
    }

    pub fn new_date_time_picker(
        field_name: impl Into<String>,
        picker_type: DateTimePickerType,
    ) -> DateTimePicker {
        DateTimePicker::new(field_name, picker_type)
    }

    pub fn new_switch(field_name: impl Into<String>) -> Switch {
        Switch::new(field_name)
    }

    pub fn new_grid() -> Grid {
        Grid::new()
    }

    pub fn new_grid_item() -> GridItem {
        GridItem::new()
    }

    pub fn new_chip(label: impl Into<String>) -> Chip {
        Chip::new(label)
    }

    pub fn new_chip_list() -> ChipList {
        ChipList::new()
    }

    pub fn new_divider() -> Divider {
        Divider {}
    }

    pub fn new_icon_url(url: impl Into<String>) -> Icon {
        Icon::url(url)
    }

    pub fn new_known_icon(icon: KnownIcon) -> Icon {
        Icon::known(icon)
    }

    pub fn new_material_icon(name: impl Into<String>) -> Icon {
        Icon::material(name)
    }

    pub fn new_border_style(border_type: BorderType) -> BorderStyle {
        BorderStyle::new(border_type)
    }

    pub fn new_image_crop_style(crop_type: ImageCropType) -> ImageCropStyle {
        ImageCropStyle::new(crop_type)
    }

    pub fn new_action(target_name: impl Into<String>) -> Action {
        Action::target(target_name)
    }

    pub fn new_open_link(url: impl Into<String>) -> OpenLink {
        OpenLink::new(url)
    }

    pub fn new_authorization_action(url: impl Into<String>) -> AuthorizationAction {
        AuthorizationAction::new(url)
    }

    pub fn new_overflow_menu() -> OverflowMenu {
        OverflowMenu::new()
    }

    pub fn new_overflow_menu_item(text: impl Into<String>) -> OverflowMenuItem {
        OverflowMenuItem::new(text)
    }

    pub fn new_navigation() -> Navigation {
        Navigation::new()
    }

    pub fn new_notification(text: impl Into<String>) -> Notification {
        Notification::new(text)
    }

    pub fn new_action_response_builder() -> ActionResponseBuilder {
        ActionResponseBuilder::default()
    }

    pub fn new_update_draft_response() -> UpdateDraftResponse {
        UpdateDraftResponse::new()
    }

    pub fn new_dialog_response(card: Card) -> DialogResponse {
        DialogResponse::show(card)
    }
}
