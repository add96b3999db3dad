use std::mem;

use serde::{Deserialize, Serialize};

use super::action::{is_false, ComposedEmailType, OpenLink};
use super::card::Card;
use crate::core::error::{ValidationError, ValidationErrorKind, ValidationErrors};
use crate::kernel::validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavigationOp {
    #[serde(rename = "pushCard")]
    Push(Card),
    #[serde(rename = "popCard")]
    Pop,
    PopToRoot,
    #[serde(rename = "popToNamedCard")]
    PopToNamed(String),
    #[serde(rename = "updateCard")]
    Update(Card),
}

impl NavigationOp {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Push(_) => "push",
            Self::Pop => "pop",
            Self::PopToRoot => "popToRoot",
            Self::PopToNamed(_) => "popToNamed",
            Self::Update(_) => "update",
        }
    }
}

/// Ordered batch of stack operations, applied all-or-nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Navigation {
    #[serde(rename = "navigations")]
    pub(crate) ops: Vec<NavigationOp>,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_card(mut self, card: Card) -> Self {
        self.ops.push(NavigationOp::Push(card));
        self
    }

    pub fn pop_card(mut self) -> Self {
        self.ops.push(NavigationOp::Pop);
        self
    }

    pub fn pop_to_root(mut self) -> Self {
        self.ops.push(NavigationOp::PopToRoot);
        self
    }

    pub fn pop_to_named_card(mut self, name: impl Into<String>) -> Self {
        self.ops.push(NavigationOp::PopToNamed(name.into()));
        self
    }

    pub fn update_card(mut self, card: Card) -> Self {
        self.ops.push(NavigationOp::Update(card));
        self
    }

    pub fn ops(&self) -> &[NavigationOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<NavigationOp> {
        self.ops
    }

    /// A lone push or update, the shape an `OPEN_DIALOG` action expects back.
    pub(crate) fn opens_single_card(&self) -> bool {
        matches!(
            self.ops.as_slice(),
            [NavigationOp::Push(_) | NavigationOp::Update(_)]
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub text: String,
}

impl Notification {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Opaque handle the external draft service resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftRef(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeResponse {
    pub draft: DraftRef,
    #[serde(default)]
    pub composed_email_type: ComposedEmailType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    #[default]
    Text,
    MutableHtml,
    ImmutableHtml,
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsertPosition {
    #[default]
    AtCursor,
    AtStart,
    Replace,
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftUpdate {
    #[serde(rename_all = "camelCase")]
    InsertContent {
        content: String,
        #[serde(default)]
        content_type: ContentType,
        #[serde(default)]
        position: InsertPosition,
    },
    Subject(String),
    ToRecipients(Vec<String>),
    CcRecipients(Vec<String>),
    BccRecipients(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDraftResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<DraftRef>,
    pub updates: Vec<DraftUpdate>,
}

impl UpdateDraftResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(mut self, draft: DraftRef) -> Self {
        self.draft = Some(draft);
        self
    }

    pub fn add_update(mut self, update: DraftUpdate) -> Self {
        self.updates.push(update);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    #[default]
    Ok,
    Cancelled,
    InvalidArgument,
    NotFound,
    PermissionDenied,
    Internal,
    #[serde(other)]
    Unspecified,
}

/// Modal content change. Without a card the top dialog is closed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(default)]
    pub status_code: StatusCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DialogResponse {
    pub fn show(card: Card) -> Self {
        Self {
            card: Some(card),
            ..Self::default()
        }
    }

    pub fn close(status_code: StatusCode) -> Self {
        Self {
            card: None,
            status_code,
            message: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UniversalResponse {
    DisplayCards(Vec<Card>),
    OpenLink(OpenLink),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseKind {
    Navigation(Navigation),
    Notification(Notification),
    OpenLink(OpenLink),
    Compose(ComposeResponse),
    Suggestions(SuggestionsResponse),
    UpdateDraft(UpdateDraftResponse),
    Dialog(DialogResponse),
    Universal(UniversalResponse),
}

impl ResponseKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Navigation(_) => "navigation",
            Self::Notification(_) => "notification",
            Self::OpenLink(_) => "openLink",
            Self::Compose(_) => "compose",
            Self::Suggestions(_) => "suggestions",
            Self::UpdateDraft(_) => "updateDraft",
            Self::Dialog(_) => "dialog",
            Self::Universal(_) => "universal",
        }
    }
}

/// What a callback returns: exactly one response variant, plus the orthogonal
/// `stateChanged` flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ActionResponseRepr", into = "ActionResponseRepr")]
pub struct ActionResponse {
    kind: ResponseKind,
    state_changed: bool,
}

impl ActionResponse {
    pub fn builder() -> ActionResponseBuilder {
        ActionResponseBuilder::default()
    }

    pub fn kind(&self) -> &ResponseKind {
        &self.kind
    }

    pub fn into_kind(self) -> ResponseKind {
        self.kind
    }

    pub fn state_changed(&self) -> bool {
        self.state_changed
    }

    pub fn navigation(nav: Navigation) -> Result<Self, ValidationErrors> {
        Self::builder().navigation(nav).build()
    }

    pub fn notification(text: impl Into<String>) -> Result<Self, ValidationErrors> {
        Self::builder().notification(Notification::new(text)).build()
    }
}

#[derive(Debug, Default)]
pub struct ActionResponseBuilder {
    kinds: Vec<ResponseKind>,
    state_changed: bool,
}

impl ActionResponseBuilder {
    fn set(mut self, kind: ResponseKind) -> Self {
        let d = mem::discriminant(&kind);
        self.kinds.retain(|k| mem::discriminant(k) != d);
        self.kinds.push(kind);
        self
    }

    pub fn navigation(self, nav: Navigation) -> Self {
        self.set(ResponseKind::Navigation(nav))
    }

    pub fn notification(self, notification: Notification) -> Self {
        self.set(ResponseKind::Notification(notification))
    }

    pub fn open_link(self, link: OpenLink) -> Self {
        self.set(ResponseKind::OpenLink(link))
    }

    pub fn compose(self, compose: ComposeResponse) -> Self {
        self.set(ResponseKind::Compose(compose))
    }

    pub fn suggestions(self, suggestions: SuggestionsResponse) -> Self {
        self.set(ResponseKind::Suggestions(suggestions))
    }

    pub fn update_draft(self, update: UpdateDraftResponse) -> Self {
        self.set(ResponseKind::UpdateDraft(update))
    }

    pub fn dialog(self, dialog: DialogResponse) -> Self {
        self.set(ResponseKind::Dialog(dialog))
    }

    pub fn universal(self, universal: UniversalResponse) -> Self {
        self.set(ResponseKind::Universal(universal))
    }

    pub fn state_changed(mut self, changed: bool) -> Self {
        self.state_changed = changed;
        self
    }

    /// Setting the same variant twice keeps the last value; two different
    /// variants are rejected.
    pub fn build(mut self) -> Result<ActionResponse, ValidationErrors> {
        if self.kinds.len() > 1 {
            let labels: Vec<&str> = self.kinds.iter().map(ResponseKind::label).collect();
            return Err(ValidationError::new(
                "actionResponse",
                "kind",
                ValidationErrorKind::Conflict {
                    detail: format!("only one of {} may be set", labels.join(", ")),
                },
            )
            .into());
        }
        let Some(kind) = self.kinds.pop() else {
            return Err(
                ValidationError::new("actionResponse", "kind", ValidationErrorKind::Required)
                    .into(),
            );
        };
        let response = ActionResponse {
            kind,
            state_changed: self.state_changed,
        };
        validate::validate_response(&response)?;
        Ok(response)
    }
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ActionResponseRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    navigation: Option<Navigation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notification: Option<Notification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    open_link: Option<OpenLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compose: Option<ComposeResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    suggestions: Option<SuggestionsResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    update_draft: Option<UpdateDraftResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dialog: Option<DialogResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    universal: Option<UniversalResponse>,
    #[serde(default, skip_serializing_if = "is_false")]
    state_changed: bool,
}

impl TryFrom<ActionResponseRepr> for ActionResponse {
    type Error = ValidationErrors;

    fn try_from(r: ActionResponseRepr) -> Result<Self, Self::Error> {
        let mut b = ActionResponse::builder().state_changed(r.state_changed);
        if let Some(v) = r.navigation {
            b = b.navigation(v);
        }
        if let Some(v) = r.notification {
            b = b.notification(v);
        }
        if let Some(v) = r.open_link {
            b = b.open_link(v);
        }
        if let Some(v) = r.compose {
            b = b.compose(v);
        }
        if let Some(v) = r.suggestions {
            b = b.suggestions(v);
        }
        if let Some(v) = r.update_draft {
            b = b.update_draft(v);
        }
        if let Some(v) = r.dialog {
            b = b.dialog(v);
        }
        if let Some(v) = r.universal {
            b = b.universal(v);
        }
        b.build()
    }
}

impl From<ActionResponse> for ActionResponseRepr {
    fn from(r: ActionResponse) -> Self {
        let mut repr = ActionResponseRepr {
            state_changed: r.state_changed,
            ..Self::default()
        };
        match r.kind {
            ResponseKind::Navigation(v) => repr.navigation = Some(v),
            ResponseKind::Notification(v) => repr.notification = Some(v),
            ResponseKind::OpenLink(v) => repr.open_link = Some(v),
            ResponseKind::Compose(v) => repr.compose = Some(v),
            ResponseKind::Suggestions(v) => repr.suggestions = Some(v),
            ResponseKind::UpdateDraft(v) => repr.update_draft = Some(v),
            ResponseKind::Dialog(v) => repr.dialog = Some(v),
            ResponseKind::Universal(v) => repr.universal = Some(v),
        }
        repr
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/response.rs"]
mod tests;
