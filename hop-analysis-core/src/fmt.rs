#![macro_use]
#![allow(unused_macros)]

// arguments are still borrowed when the `log` feature is off
macro_rules! log_at {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "log")]
        ::log::log!(::log::Level::$level, $s $(, $x)*);

        #[cfg(not(feature = "log"))]
        {
            let _ = ($(&$x,)*);
        }
    }};
}

macro_rules! log_trace {
    ($($arg:tt)*) => {
        log_at!(Trace, $($arg)*)
    };
}

macro_rules! log_debug {
    ($($arg:tt)*) => {
        log_at!(Debug, $($arg)*)
    };
}

macro_rules! log_info {
    ($($arg:tt)*) => {
        log_at!(Info, $($arg)*)
    };
}

macro_rules! log_warn {
    ($($arg:tt)*) => {
        log_at!(Warn, $($arg)*)
    };
}

macro_rules! log_error {
    ($($arg:tt)*) => {
        log_at!(Error, $($arg)*)
    };
}
