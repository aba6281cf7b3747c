//! Logging helpers for the yadns binary
//!
//! The subscriber itself is assembled in `main`; this module owns the pieces
//! that can be exercised without installing a global subscriber.

use std::path::Path;

use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::ChronoLocal;

use crate::constants::{LOG_FILE_PREFIX, LOG_FILE_SUFFIX, LOG_MAX_FILES};

/// Log file appender in `dir`, rotated daily, keeping the newest few files
///
/// Files are named `yadns.<date>.log`. Older files beyond
/// [`LOG_MAX_FILES`] are removed on rotation.
pub fn log_file_appender(dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(LOG_MAX_FILES)
        .build(dir)
}

/// Short local time for interactive runs
pub fn console_timer() -> ChronoLocal {
    ChronoLocal::new("%H:%M:%S".to_string())
}

/// Full local timestamp for the log file
pub fn file_timer() -> ChronoLocal {
    ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string())
}

/// Replaces every occurrence of the token in `message` with a placeholder
///
/// ```
/// use yadns::logging::redact_secrets;
///
/// let redacted = redact_secrets("token abc123 rejected", "abc123");
/// assert_eq!(redacted, "token ***REDACTED*** rejected");
/// ```
#[must_use]
pub fn redact_secrets(message: &str, token: &str) -> String {
    if token.is_empty() {
        return message.to_string();
    }
    message.replace(token, "***REDACTED***")
}
