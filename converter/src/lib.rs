//! Prime Exchange Converter
//!
//! Ties the FX engine to a corridor the user can edit, share and embed:
//! shareable query-string state, the compute session with periodic refresh,
//! rate alert validation and a terminal renderer.

pub mod alert;
pub mod commands;
pub mod config;
pub mod corridor;
pub mod render;
pub mod session;

pub use alert::{AlertError, AlertRequest};
pub use commands::{Command, CommandError};
pub use config::{ConfigError, ConverterConfig};
pub use corridor::{CorridorDefaults, CorridorState};
pub use session::{Converter, Snapshot, Trigger};
