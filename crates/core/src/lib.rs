//! `auditflow-core`: record and value primitives shared by the engine crates.
//!
//! This crate is **pure** (no IO, no logging): typed values, raw/typed records,
//! the injectable clock, and the configuration error model.

pub mod clock;
pub mod error;
pub mod record;
pub mod value;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, ConfigResult};
pub use record::{RawRecord, TypedRecord};
pub use value::FieldValue;
