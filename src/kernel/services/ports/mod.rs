//! Service ports: traits + data contracts.

pub mod dispatcher;
pub mod settings;

pub use dispatcher::{DispatchFuture, Dispatcher, EventPayload};
pub use settings::{EngineSettings, SingleCardPop};
