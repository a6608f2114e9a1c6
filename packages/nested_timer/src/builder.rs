use crate::pal::PlatformFacade;
use crate::{DEFAULT_NAME_WIDTH, Timer};

/// Configures and creates a [`Timer`].
///
/// # Examples
///
/// ```
/// use nested_timer::Timer;
///
/// let timer = Timer::builder()
///     .echo(false)
///     .name_width(24)
///     .build();
/// ```
#[derive(Debug)]
#[must_use]
pub struct TimerBuilder {
    echo: bool,
    name_width: usize,
    platform: Option<PlatformFacade>,
}

impl TimerBuilder {
    pub(crate) fn new() -> Self {
        Self {
            echo: true,
            name_width: DEFAULT_NAME_WIDTH,
            platform: None,
        }
    }

    /// Whether to print one line to stdout for every stopped event. Enabled by default.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Minimum width of the name column in event lines and reports.
    ///
    /// Longer names are printed in full. Defaults to 40.
    pub fn name_width(mut self, name_width: usize) -> Self {
        self.name_width = name_width;
        self
    }

    #[cfg(test)]
    pub(crate) fn platform(mut self, platform: PlatformFacade) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Creates the timer. Its statistics start out empty.
    #[must_use]
    pub fn build(self) -> Timer {
        Timer::new_inner(
            self.platform.unwrap_or_else(PlatformFacade::real),
            self.echo,
            self.name_width,
        )
    }
}
