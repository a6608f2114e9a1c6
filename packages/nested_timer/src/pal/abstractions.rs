use std::fmt::Debug;
use std::time::Duration;

/// Provides timestamps for event measurement.
pub(crate) trait Platform: Debug + 'static {
    /// Time elapsed since an arbitrary fixed origin chosen by the platform.
    ///
    /// Successive calls never return a smaller value.
    fn now(&self) -> Duration;
}
