use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::core::error::DispatchError;
use crate::models::action::Action;
use crate::models::card::ActionRef;
use crate::models::response::ActionResponse;

pub type DispatchFuture =
    Pin<Box<dyn Future<Output = Result<ActionResponse, DispatchError>> + Send + 'static>>;

/// What travels with an action: the form values of the originating card and
/// the click context.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub invoked_by: ActionRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(default)]
    pub form_inputs: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

/// Executes a named callback out of process. The engine treats it as a black
/// box and owns no transport.
pub trait Dispatcher: Send + Sync {
    fn invoke(&self, action: &Action, event: &EventPayload) -> DispatchFuture;
}
