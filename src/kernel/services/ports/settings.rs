use serde::{Deserialize, Serialize};

/// What a `Pop` does when only the root card is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SingleCardPop {
    /// Keep the root card; the op is a no-op.
    #[default]
    Ignore,
    /// Fail the whole navigation batch with `PopOnRoot`.
    Error,
    /// Remove the root and close the session; the host decides what exiting means.
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default)]
    pub single_card_pop: SingleCardPop,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatch_timeout_ms: Option<u64>,
    #[serde(default = "default_dispatch_error_message")]
    pub dispatch_error_message: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_dispatch_error_message() -> String {
    "Something went wrong. Please try again.".to_string()
}

fn default_log_filter() -> String {
    "cardstack=info".to_string()
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            single_card_pop: SingleCardPop::default(),
            dispatch_timeout_ms: None,
            dispatch_error_message: default_dispatch_error_message(),
            log_filter: default_log_filter(),
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
