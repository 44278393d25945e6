//! Logging shims.
//!
//! The crate logs through whichever backend feature is enabled: `defmt`, `log`
//! or `esp32-log` (raw `esp-println`). With none enabled the macros expand to
//! nothing but still consume their arguments, so call sites stay warning-free.
//!
//! Format strings must stay within the subset understood by both `defmt` and
//! `core::fmt` (`{}` and `{:?}`).
#![allow(unused_macros)]

macro_rules! log_event {
    ($level:ident, $esp_prefix:literal, $s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::$level!($s $(, $x)*);
        #[cfg(feature = "log")]
        ::log::$level!($s $(, $x)*);
        #[cfg(feature = "esp32-log")]
        ::esp_println::println!(concat!($esp_prefix, $s) $(, $x)*);
        #[cfg(not(any(feature = "defmt", feature = "log", feature = "esp32-log")))]
        {
            $( let _ = &$x; )*
        }
    }};
}

macro_rules! trace {
    ($($arg:tt)*) => { log_event!(trace, "TRACE ", $($arg)*) };
}

macro_rules! debug {
    ($($arg:tt)*) => { log_event!(debug, "DEBUG ", $($arg)*) };
}

macro_rules! info {
    ($($arg:tt)*) => { log_event!(info, "INFO ", $($arg)*) };
}

macro_rules! warn {
    ($($arg:tt)*) => { log_event!(warn, "WARN ", $($arg)*) };
}

macro_rules! error {
    ($($arg:tt)*) => { log_event!(error, "ERROR ", $($arg)*) };
}
