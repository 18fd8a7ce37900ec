//! Optional diagnostics
//!
//! Forwards to `log` on hosted builds and to `defmt` on the board. With
//! neither feature enabled the macros expand to nothing, so diagnostics
//! never cost flash on minimal builds and never reach the wire.

#[cfg(feature = "log")]
macro_rules! hub_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(all(not(feature = "log"), feature = "defmt"))]
macro_rules! hub_info {
    ($($arg:tt)*) => { defmt::info!($($arg)*) };
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! hub_info {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! hub_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(all(not(feature = "log"), feature = "defmt"))]
macro_rules! hub_debug {
    ($($arg:tt)*) => { defmt::debug!($($arg)*) };
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! hub_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! hub_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(all(not(feature = "log"), feature = "defmt"))]
macro_rules! hub_warn {
    ($($arg:tt)*) => { defmt::warn!($($arg)*) };
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! hub_warn {
    ($($arg:tt)*) => {};
}
