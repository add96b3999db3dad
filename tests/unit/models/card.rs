use super::*;
use crate::core::error::ValidationErrorKind;
use crate::models::action::{Action, OpenLink, OverflowMenu, OverflowMenuItem};
use crate::models::widget::{
    ButtonSet, DecoratedText, Divider, Image, SelectionInput, SelectionInputType, Switch, TextInput,
    TextParagraph,
};
use serde_json::json;

fn paragraph(text: &str) -> CardSection {
    CardSection::builder()
        .add_widget(TextParagraph::new(text))
        .build()
        .unwrap()
}

fn kinds(errors: &ValidationErrors) -> Vec<&ValidationErrorKind> {
    errors.iter().map(|e| &e.kind).collect()
}

#[test]
fn builds_a_form_card_with_footer_and_header() {
    let card = Card::builder()
        .name("contact")
        .header(CardHeader::new("Contact").subtitle("Who should we call?"))
        .add_section(
            CardSection::builder()
                .header("Details")
                .add_widget(TextInput::new("name").title("Name"))
                .add_widget(
                    SelectionInput::new("channel", SelectionInputType::RadioButton)
                        .add_item("Phone", "phone", true)
                        .add_item("Email", "email", false),
                )
                .build()
                .unwrap(),
        )
        .fixed_footer(FixedFooter::new(
            TextButton::new("Save").on_click_action(
                Action::target("save")
                    .required_widget("name")
                    .persist_values(true),
            ),
        ))
        .build()
        .unwrap();

    assert_eq!(card.name(), Some("contact"));
    assert_eq!(card.header().map(CardHeader::title), Some("Contact"));
    assert_eq!(card.sections().len(), 1);
    assert_eq!(card.field_names(), vec!["name", "channel"]);
    assert_eq!(card.display_style(), DisplayStyle::Replace);
}

#[test]
fn card_without_sections_is_rejected() {
    let err = Card::builder().name("empty").build().unwrap_err();
    assert_eq!(err.len(), 1);
    let e = err.iter().next().unwrap();
    assert_eq!(e.path, "card");
    assert_eq!(e.field, "sections");
    assert_eq!(e.kind, ValidationErrorKind::Required);
}

#[test]
fn more_than_one_hundred_sections_is_too_many() {
    let mut builder = Card::builder();
    for i in 0..=MAX_SECTIONS {
        builder = builder.add_section(paragraph(&format!("s{i}")));
    }
    let err = builder.build().unwrap_err();
    assert_eq!(
        kinds(&err),
        vec![&ValidationErrorKind::TooMany {
            limit: 100,
            actual: 101
        }]
    );
}

#[test]
fn more_than_one_hundred_widgets_in_a_section_is_too_many() {
    let mut builder = CardSection::builder();
    for i in 0..=MAX_WIDGETS_PER_SECTION {
        builder = builder.add_widget(TextParagraph::new(format!("w{i}")));
    }
    let err = builder.build().unwrap_err();
    let e = err.iter().next().unwrap();
    assert_eq!(e.path, "section");
    assert_eq!(e.field, "widgets");
    assert_eq!(
        e.kind,
        ValidationErrorKind::TooMany {
            limit: 100,
            actual: 101
        }
    );

    let ok = (0..MAX_WIDGETS_PER_SECTION)
        .fold(CardSection::builder(), |b, i| {
            b.add_widget(TextParagraph::new(format!("w{i}")))
        })
        .build();
    assert!(ok.is_ok());
}

#[test]
fn duplicate_field_names_are_rejected_except_between_switches() {
    let section = CardSection::builder()
        .add_widget(TextInput::new("email"))
        .add_widget(TextInput::new("email"))
        .build()
        .unwrap();
    let err = Card::builder().add_section(section).build().unwrap_err();
    let e = err.iter().next().unwrap();
    assert_eq!(e.path, "card.sections[0].widgets[1].textInput");
    assert_eq!(e.kind, ValidationErrorKind::DuplicateFieldName);

    let shared = CardSection::builder()
        .add_widget(Switch::new("toppings").value("cheese"))
        .add_widget(DecoratedText::new("Olives").switch_control(Switch::new("toppings").value("olives")))
        .build()
        .unwrap();
    assert!(Card::builder().add_section(shared).build().is_ok());
}

#[test]
fn required_widget_must_exist_on_the_card() {
    let section = CardSection::builder()
        .add_widget(TextInput::new("name"))
        .add_widget(ButtonSet::new().add_button(
            TextButton::new("Send").on_click_action(Action::target("send").required_widget("phone")),
        ))
        .build()
        .unwrap();
    let err = Card::builder().add_section(section).build().unwrap_err();
    let e = err.iter().next().unwrap();
    assert_eq!(
        e.path,
        "card.sections[0].widgets[1].buttonList.buttons[0].textButton.onClick.action"
    );
    assert_eq!(
        e.kind,
        ValidationErrorKind::UnknownField {
            name: "phone".to_string()
        }
    );
}

#[test]
fn required_widgets_are_not_allowed_on_change_actions() {
    let err = CardSection::builder()
        .add_widget(
            TextInput::new("q").on_change_action(Action::target("search").all_widgets_required(true)),
        )
        .build()
        .unwrap_err();
    let e = err.iter().next().unwrap();
    assert_eq!(e.path, "section.widgets[0].textInput.onChangeAction");
    assert_eq!(e.field, "requiredWidgetFieldNames");
    assert!(matches!(e.kind, ValidationErrorKind::NotAllowed { .. }));
}

#[test]
fn empty_target_name_and_missing_alt_text_are_required() {
    let err = CardSection::builder()
        .add_widget(Image::new("https://example.com/a.png").on_click_action(Action::new()))
        .build()
        .unwrap_err();
    let fields: Vec<&str> = err.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["altText", "targetName"]);
}

#[test]
fn invalid_urls_are_reported() {
    let err = CardSection::builder()
        .add_widget(
            Image::new("not a url")
                .alt_text("broken")
                .open_link(OpenLink::new("https://example.com")),
        )
        .build()
        .unwrap_err();
    let e = err.iter().next().unwrap();
    assert_eq!(e.field, "imageUrl");
    assert!(matches!(e.kind, ValidationErrorKind::InvalidUrl { .. }));
}

#[test]
fn overflow_menus_cannot_nest() {
    let inner = OverflowMenu::new().add_item(OverflowMenuItem::new("Deep"));
    let outer = OverflowMenu::new().add_item(OverflowMenuItem::new("More").overflow_menu(inner));
    let err = Card::builder()
        .add_section(paragraph("body"))
        .add_card_action(CardAction::new("Options").overflow_menu(outer))
        .build()
        .unwrap_err();
    let e = err.iter().next().unwrap();
    assert_eq!(
        e.path,
        "card.cardActions[0].onClick.overflowMenu.items[0].onClick.overflowMenu"
    );
    assert!(matches!(e.kind, ValidationErrorKind::NotAllowed { .. }));
}

#[test]
fn single_choice_inputs_allow_one_selection() {
    let err = CardSection::builder()
        .add_widget(
            SelectionInput::new("size", SelectionInputType::Dropdown)
                .add_item("S", "s", true)
                .add_item("M", "m", true),
        )
        .build()
        .unwrap_err();
    assert!(matches!(
        err.iter().next().map(|e| &e.kind),
        Some(ValidationErrorKind::Conflict { .. })
    ));

    let multi = CardSection::builder()
        .add_widget(
            SelectionInput::new("tags", SelectionInputType::CheckBox)
                .add_item("A", "a", true)
                .add_item("B", "b", true),
        )
        .build();
    assert!(multi.is_ok());
}

#[test]
fn uncollapsible_count_needs_a_collapsible_section() {
    let err = CardSection::builder()
        .add_widget(Divider {})
        .num_uncollapsible_widgets(1)
        .build()
        .unwrap_err();
    assert_eq!(err.iter().next().unwrap().field, "numUncollapsibleWidgets");

    let ok = CardSection::builder()
        .add_widget(Divider {})
        .collapsible(true)
        .num_uncollapsible_widgets(1)
        .build();
    assert!(ok.is_ok());
}

#[test]
fn every_error_is_reported_not_just_the_first() {
    let err = Card::builder()
        .header(CardHeader::new(""))
        .add_section(paragraph("ok"))
        .add_card_action(CardAction::new(""))
        .build()
        .unwrap_err();
    let paths: Vec<String> = err.iter().map(|e| format!("{}.{}", e.path, e.field)).collect();
    assert_eq!(paths, vec!["card.header.title", "card.cardActions[0].text"]);
}

#[test]
fn decoding_runs_the_validator() {
    let valid = json!({
        "name": "home",
        "sections": [{"widgets": [{"textParagraph": {"text": "hi"}}]}]
    });
    let card: Card = serde_json::from_value(valid).unwrap();
    assert_eq!(card.name(), Some("home"));

    let invalid = json!({
        "sections": [{"widgets": [
            {"textInput": {"fieldName": "a"}},
            {"textInput": {"fieldName": "a"}}
        ]}]
    });
    let err = serde_json::from_value::<Card>(invalid).unwrap_err();
    assert!(err.to_string().contains("reuses a field name"));

    let no_sections = json!({"name": "bare"});
    assert!(serde_json::from_value::<Card>(no_sections).is_err());
}

#[test]
fn resolves_footer_and_card_action_clicks() {
    let card = Card::builder()
        .add_section(paragraph("body"))
        .add_card_action(CardAction::new("Help").open_link(OpenLink::new("https://example.com/help")))
        .fixed_footer(
            FixedFooter::new(TextButton::new("Save").on_click_action(Action::target("save")))
                .secondary_button(TextButton::new("Cancel").on_click_action(Action::target("cancel"))),
        )
        .build()
        .unwrap();

    assert!(matches!(
        card.resolve(&ActionRef::footer(false)),
        Some(Resolved::Click(OnClick::Action(a))) if a.name() == "save"
    ));
    assert!(matches!(
        card.resolve(&ActionRef::footer(true)),
        Some(Resolved::Click(OnClick::Action(a))) if a.name() == "cancel"
    ));
    assert!(matches!(
        card.resolve(&ActionRef::card_action(0)),
        Some(Resolved::Click(OnClick::OpenLink(_)))
    ));
    assert!(card.resolve(&ActionRef::card_action(1)).is_none());
    assert!(card
        .resolve(&ActionRef::footer(false).trigger(Trigger::Change))
        .is_none());
    assert!(card.resolve(&ActionRef::widget(0, 0)).is_none());
    assert!(card.resolve(&ActionRef::widget(3, 0)).is_none());
}

#[test]
fn peek_style_round_trips_through_json() {
    let card = Card::builder()
        .display_style(DisplayStyle::Peek)
        .peek_card_header(CardHeader::new("Peek"))
        .add_section(paragraph("body"))
        .build()
        .unwrap();
    let value = serde_json::to_value(&card).unwrap();
    assert_eq!(value["displayStyle"], "PEEK");
    assert_eq!(value["peekCardHeader"]["title"], "Peek");
    let back: Card = serde_json::from_value(value).unwrap();
    assert_eq!(back, card);
}

#[test]
fn action_ref_display_is_compact() {
    let r = ActionRef::widget(1, 2).item(0).menu_item(3).on_dialog();
    assert_eq!(r.to_string(), "Dialog/Section[1][2]#0>3:Click");
    assert_eq!(ActionRef::footer(true).to_string(), "Stack/FixedFooter[0][1]:Click");
}
