use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::style::Icon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadIndicator {
    Spinner,
    #[default]
    None,
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionMode {
    #[default]
    None,
    OpenDialog,
    #[serde(other)]
    Unspecified,
}

/// A reference to a remote callback plus the preconditions for sending it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(default)]
    pub(crate) target_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) parameters: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub(crate) required_widget_field_names: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub(crate) all_widgets_required: bool,
    #[serde(default)]
    pub(crate) load_indicator: LoadIndicator,
    #[serde(default)]
    pub(crate) interaction_mode: InteractionMode,
    #[serde(default, skip_serializing_if = "is_false")]
    pub(crate) persist_values: bool,
}

pub(crate) fn is_false(v: &bool) -> bool {
    !*v
}

impl Action {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(name: impl Into<String>) -> Self {
        Self::new().target_name(name)
    }

    pub fn target_name(mut self, name: impl Into<String>) -> Self {
        self.target_name = name.into();
        self
    }

    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn parameters<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.parameters = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn required_widget(mut self, field_name: impl Into<String>) -> Self {
        self.required_widget_field_names.insert(field_name.into());
        self
    }

    pub fn all_widgets_required(mut self, required: bool) -> Self {
        self.all_widgets_required = required;
        self
    }

    pub fn load_indicator(mut self, indicator: LoadIndicator) -> Self {
        self.load_indicator = indicator;
        self
    }

    pub fn interaction_mode(mut self, mode: InteractionMode) -> Self {
        self.interaction_mode = mode;
        self
    }

    pub fn persist_values(mut self, persist: bool) -> Self {
        self.persist_values = persist;
        self
    }

    pub fn name(&self) -> &str {
        &self.target_name
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    pub fn required_widgets(&self) -> &BTreeSet<String> {
        &self.required_widget_field_names
    }

    pub fn requires_all_widgets(&self) -> bool {
        self.all_widgets_required
    }

    pub fn indicator(&self) -> LoadIndicator {
        self.load_indicator
    }

    pub fn mode(&self) -> InteractionMode {
        self.interaction_mode
    }

    pub fn persists_values(&self) -> bool {
        self.persist_values
    }

    pub(crate) fn has_submit_requirements(&self) -> bool {
        self.all_widgets_required || !self.required_widget_field_names.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpenAs {
    #[default]
    FullSize,
    Overlay,
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnClose {
    #[default]
    Nothing,
    Reload,
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenLink {
    pub url: String,
    #[serde(default)]
    pub open_as: OpenAs,
    #[serde(default)]
    pub on_close: OnClose,
}

impl OpenLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            open_as: OpenAs::FullSize,
            on_close: OnClose::Nothing,
        }
    }

    pub fn open_as(mut self, open_as: OpenAs) -> Self {
        self.open_as = open_as;
        self
    }

    pub fn on_close(mut self, on_close: OnClose) -> Self {
        self.on_close = on_close;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationAction {
    pub authorization_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_display_name: Option<String>,
}

impl AuthorizationAction {
    pub fn new(authorization_url: impl Into<String>) -> Self {
        Self {
            authorization_url: authorization_url.into(),
            resource_display_name: None,
        }
    }

    pub fn resource_display_name(mut self, name: impl Into<String>) -> Self {
        self.resource_display_name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComposedEmailType {
    #[default]
    ReplyAsDraft,
    StandaloneDraft,
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeAction {
    pub action: Action,
    #[serde(default)]
    pub composed_email_type: ComposedEmailType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverflowMenuItem {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_click: Option<OnClick>,
}

impl OverflowMenuItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start_icon: None,
            disabled: false,
            on_click: None,
        }
    }

    pub fn start_icon(mut self, icon: Icon) -> Self {
        self.start_icon = Some(icon);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverflowMenu {
    pub items: Vec<OverflowMenuItem>,
}

impl OverflowMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(mut self, item: OverflowMenuItem) -> Self {
        self.items.push(item);
        self
    }
}

/// The single click slot of a clickable widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnClick {
    OpenLink(OpenLink),
    Action(Action),
    OpenLinkAction(Action),
    AuthorizationAction(AuthorizationAction),
    ComposeAction(ComposeAction),
    OverflowMenu(OverflowMenu),
}

impl OnClick {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OpenLink(_) => "openLink",
            Self::Action(_) => "action",
            Self::OpenLinkAction(_) => "openLinkAction",
            Self::AuthorizationAction(_) => "authorizationAction",
            Self::ComposeAction(_) => "composeAction",
            Self::OverflowMenu(_) => "overflowMenu",
        }
    }

    /// The callback this click sends, if it goes through the dispatcher.
    pub fn action(&self) -> Option<&Action> {
        match self {
            Self::Action(a) | Self::OpenLinkAction(a) => Some(a),
            Self::ComposeAction(c) => Some(&c.action),
            Self::OpenLink(_) | Self::AuthorizationAction(_) | Self::OverflowMenu(_) => None,
        }
    }
}

/// Builder-side access to a widget's click slot. Every setter overwrites the
/// slot, so the last click behavior set wins.
pub trait Clickable: Sized {
    fn click_slot(&mut self) -> &mut Option<OnClick>;

    fn on_click(&self) -> Option<&OnClick>;

    fn set_on_click(mut self, on_click: OnClick) -> Self {
        *self.click_slot() = Some(on_click);
        self
    }

    fn on_click_action(self, action: Action) -> Self {
        self.set_on_click(OnClick::Action(action))
    }

    fn open_link(self, link: OpenLink) -> Self {
        self.set_on_click(OnClick::OpenLink(link))
    }

    fn on_click_open_link_action(self, action: Action) -> Self {
        self.set_on_click(OnClick::OpenLinkAction(action))
    }

    fn authorization_action(self, action: AuthorizationAction) -> Self {
        self.set_on_click(OnClick::AuthorizationAction(action))
    }

    fn compose_action(self, action: Action, composed_email_type: ComposedEmailType) -> Self {
        self.set_on_click(OnClick::ComposeAction(ComposeAction {
            action,
            composed_email_type,
        }))
    }

    fn overflow_menu(self, menu: OverflowMenu) -> Self {
        self.set_on_click(OnClick::OverflowMenu(menu))
    }
}

impl Clickable for OverflowMenuItem {
    fn click_slot(&mut self) -> &mut Option<OnClick> {
        &mut self.on_click
    }

    fn on_click(&self) -> Option<&OnClick> {
        self.on_click.as_ref()
    }
}
