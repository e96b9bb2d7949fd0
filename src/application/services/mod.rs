//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, CommandRunner)
//! but are themselves concrete structs, not traits.

mod audit;
mod tracula;
mod validation;

pub use audit::{AuditService, LogKind, LOG_DIRNAME};
pub use tracula::{Stage, TraculaService, BEDPOSTX_DIRNAME, DMRIRC_FILENAME};
pub use validation::ValidationService;
