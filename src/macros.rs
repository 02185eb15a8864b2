//! Small crate-wide convenience macros.

/// Write a formatted line to the browser console at the given level
/// (`log_1`, `warn_1`, `error_1`, ...).
///
/// Off wasm32 the macro only type-checks its arguments, so the scene and
/// lifecycle code can log freely while still running under plain
/// `cargo test`.
///
/// ```rust,ignore
/// console_log!(warn_1, "canvas #{} not found", id);
/// ```
#[macro_export]
macro_rules! console_log {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::console::$level(&format!($($arg)*).into());
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}
