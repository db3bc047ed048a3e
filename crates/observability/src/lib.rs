//! Tracing and logging setup shared by the binaries.

/// Subscriber configuration (filters, output format).
pub mod subscriber;

pub use subscriber::{LOG_FORMAT_ENV, LogFormat};

/// Initialize process-wide logging with the format chosen by
/// `LANDACQ_LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    subscriber::init(LogFormat::from_env());
}
