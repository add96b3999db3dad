//! cardstack - card-based interactive UI protocol engine
//!
//! Module layout:
//! - core: error taxonomy
//! - models: widgets, actions, cards, responses and the `CardService` factory
//! - kernel: validator, form state, navigation stack, sessions and the action engine
//! - wire: canonical JSON documents

pub mod core;
pub mod kernel;
pub mod models;
pub mod wire;
