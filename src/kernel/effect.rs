use std::sync::Arc;

use serde::Serialize;

use super::navigation::Presentation;
use crate::core::error::AuthorizationRequired;
use crate::models::action::{AuthorizationAction, OpenLink, OverflowMenu};
use crate::models::card::Card;
use crate::models::response::{ComposeResponse, StatusCode, UpdateDraftResponse};

/// Instruction for the render surface or the external draft service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceEffect {
    Render {
        card: Arc<Card>,
        presentation: Presentation,
    },
    ShowDialog(Arc<Card>),
    #[serde(rename_all = "camelCase")]
    CloseDialog {
        status_code: StatusCode,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    ShowNotification(String),
    OpenLink(OpenLink),
    ShowOverflowMenu(OverflowMenu),
    StartAuthorization(AuthorizationAction),
    AuthorizationPrompt(AuthorizationRequired),
    Compose(ComposeResponse),
    UpdateDraft(UpdateDraftResponse),
    #[serde(rename_all = "camelCase")]
    ShowSuggestions {
        #[serde(skip_serializing_if = "Option::is_none")]
        field_name: Option<String>,
        suggestions: Vec<String>,
    },
    /// Cached views of the originating entity are stale.
    InvalidateCache,
    /// The last card was popped; the host owns what happens next.
    Exit,
}
