//! Timestamped console logging.
//!
//! Output goes to stderr so stdout stays free for telemetry tables and CSV.

/// Wall-clock stamp used by the log macros.
#[doc(hidden)]
pub fn timestamp() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        eprintln!("\x1b[32m[INFO] [{}]\x1b[0m {}", $crate::logger::timestamp(), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        eprintln!("\x1b[35m[WARN] [{}]\x1b[0m {}", $crate::logger::timestamp(), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        eprintln!("\x1b[31m[ERROR][{}]\x1b[0m {}", $crate::logger::timestamp(), format!($($arg)*))
    };
}

/// Per-tick trace, only printed when `LOG_HYPERPOD_TICKS` is set.
#[macro_export]
macro_rules! event {
    ($($arg:tt)*) => {
        if std::env::var("LOG_HYPERPOD_TICKS").is_ok() {
            eprintln!("\x1b[36m[EVENT][{}]\x1b[0m {}", $crate::logger::timestamp(), format!($($arg)*))
        }
    };
}
