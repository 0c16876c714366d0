//! Debug output.
//!
//! Messages go to the host debugger over semihosting, only in debug builds with the
//! `semihosting` feature enabled. Otherwise the macros compile to nothing.
//!
//! Semihosting halts the core while printing: keep these out of timing critical paths.

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "semihosting")]
        {
            if cfg!(debug_assertions) {
                let _ = cortex_m_semihosting::hprintln!($($arg)*);
            }
        }
        #[cfg(not(feature = "semihosting"))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}

macro_rules! warn {
    ($fmt:literal $($arg:tt)*) => {
        debug!(concat!("warning: ", $fmt) $($arg)*)
    };
}
