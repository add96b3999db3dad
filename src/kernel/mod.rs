//! Headless protocol core: validation, form state, navigation and dispatch.

pub mod effect;
pub mod engine;
pub mod form;
pub mod navigation;
pub mod services;
pub mod session;
pub mod validate;

pub use effect::SurfaceEffect;
pub use engine::{DispatchTicket, Engine, Interaction, InteractionEvent};
pub use form::{FieldValue, FormState};
pub use navigation::{EntryPoint, Frame, FrameId, NavOutcome, NavigationStack, Presentation};
pub use session::{Applied, Session, TicketId};
pub use validate::{validate, validate_card, validate_response, validate_section, Validate};
