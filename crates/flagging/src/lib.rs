//! `auditflow-flagging`
//!
//! **Responsibility:** post-validation threshold flagging.
//!
//! A flag is a marker on an *accepted* record (e.g. "amount exceeds policy"),
//! distinct from a validation rejection. Flagging never mutates the original
//! field values; it only attaches explanations.

pub mod flagger;
pub mod format;
pub mod rule;

pub use flagger::{FlaggedRecord, flag, flag_again, flag_all};
pub use format::NumberFormat;
pub use rule::{Comparison, ThresholdRule};
