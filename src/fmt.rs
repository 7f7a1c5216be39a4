//! Crate-internal logging macros.
//!
//! The sink logs through whichever backend feature is enabled: `log` forwards
//! to the `log` facade, `esp32-log` prints through `esp-println`. With neither
//! enabled the macros compile to nothing but still borrow their arguments, so
//! call sites stay free of unused-variable warnings.

#![allow(unused_macros)]

macro_rules! sink_log {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "log")]
        ::log::$level!($s $(, $x)*);
        #[cfg(all(feature = "esp32-log", not(feature = "log")))]
        ::esp_println::println!($s $(, $x)*);
        #[cfg(not(any(feature = "log", feature = "esp32-log")))]
        let _ = ($(&$x),*);
    }};
}

macro_rules! trace {
    ($($arg:tt)+) => { sink_log!(trace, $($arg)+) };
}

macro_rules! debug {
    ($($arg:tt)+) => { sink_log!(debug, $($arg)+) };
}

macro_rules! info {
    ($($arg:tt)+) => { sink_log!(info, $($arg)+) };
}

macro_rules! warn {
    ($($arg:tt)+) => { sink_log!(warn, $($arg)+) };
}

macro_rules! error {
    ($($arg:tt)+) => { sink_log!(error, $($arg)+) };
}
