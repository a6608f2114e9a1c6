//! Platform abstraction layer for timestamps.
//!
//! Switches between the real monotonic clock and a fake clock that tests can advance by hand.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
mod real;

pub(crate) use abstractions::Platform;
pub(crate) use facade::PlatformFacade;
#[cfg(test)]
pub(crate) use fake::FakePlatform;
pub(crate) use real::RealPlatform;
