//! Car data-entry model and its validation engine.
//!
//! Pure logic: no I/O apart from reading the date through a [`clock::Clock`].

pub mod car;
pub mod clock;
pub mod error;
pub mod record_validator;
pub mod validation;

pub use car::{CarRecord, CarStatus};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::CoreError;
pub use record_validator::RecordValidator;
pub use validation::rules::{ValidationError, ValidationReport};
