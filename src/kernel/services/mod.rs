//! Services layer (ports + adapters).
//!
//! - `ports`: pure contracts/types the engine depends on.
//! - `adapters`: filesystem and in-process implementations.

pub mod adapters;
pub mod ports;
