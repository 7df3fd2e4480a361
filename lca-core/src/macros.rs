// Optional logging. Without the `log` feature the arguments are type-checked
// but nothing is emitted.

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {{ let _ = format_args!($($arg)*); }};
}

#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {{ let _ = format_args!($($arg)*); }};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {{ let _ = format_args!($($arg)*); }};
}
