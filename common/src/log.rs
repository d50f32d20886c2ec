//! Logging macros.
//!
//! Every macro forwards to `tracing` under a fixed target so the terminal
//! formatter can pick the matching status glyph without parsing messages.

pub const TARGET_INFO: &str = "keyprobe::info";
pub const TARGET_SUCCESS: &str = "keyprobe::success";
pub const TARGET_WARN: &str = "keyprobe::warn";
pub const TARGET_ERROR: &str = "keyprobe::error";
pub const TARGET_DEBUG: &str = "keyprobe::debug";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "keyprobe::info", $($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "keyprobe::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!(target: "keyprobe::warn", $($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!(target: "keyprobe::error", $($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!(target: "keyprobe::debug", $($arg)*)
    };
}
