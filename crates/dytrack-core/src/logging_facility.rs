//! Structured logging for tracker operations
//!
//! `init(profile)` installs a subscriber once per process. Each public
//! tracker op brackets its work with `log_op_start!` and `log_op_end!`
//! (or `log_op_error!`), keyed by the names in
//! [`schema`](crate::core_types::schema). `test_capture` records those
//! events in memory for assertions.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
