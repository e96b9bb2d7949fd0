//! Domain layer: entities and dmrirc rendering
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod dmrirc;
pub mod entities;
pub mod error;

pub use dmrirc::Dmrirc;
pub use entities::*;
pub use error::DomainError;
