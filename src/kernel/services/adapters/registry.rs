//! In-process dispatcher: target names mapped to plain closures.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::core::error::DispatchError;
use crate::kernel::services::ports::{DispatchFuture, Dispatcher, EventPayload};
use crate::models::action::Action;
use crate::models::response::ActionResponse;

type Handler =
    Arc<dyn Fn(&Action, &EventPayload) -> Result<ActionResponse, DispatchError> + Send + Sync>;

#[derive(Default, Clone)]
pub struct CallbackRegistry {
    handlers: FxHashMap<String, Handler>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `target`, replacing any earlier one.
    pub fn register<F>(&mut self, target: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&Action, &EventPayload) -> Result<ActionResponse, DispatchError>
            + Send
            + Sync
            + 'static,
    {
        self.handlers.insert(target.into(), Arc::new(handler));
        self
    }

    pub fn contains(&self, target: &str) -> bool {
        self.handlers.contains_key(target)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("CallbackRegistry")
            .field("targets", &names)
            .finish()
    }
}

impl Dispatcher for CallbackRegistry {
    fn invoke(&self, action: &Action, event: &EventPayload) -> DispatchFuture {
        let result = match self.handlers.get(action.name()) {
            Some(handler) => handler(action, event),
            None => Err(DispatchError::UnknownTarget(action.name().to_string())),
        };
        Box::pin(std::future::ready(result))
    }
}
