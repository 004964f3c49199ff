//! Stage timing for the pipeline log

use std::time::{Duration, Instant};

/// Guard that logs how long a pipeline stage took when it goes out of scope
///
/// ```ignore
/// let _t = Timed::debug("triangulate");
/// // work
/// // logs "triangulate took 1.234ms" on drop
/// ```
pub(crate) struct Timed {
    stage: &'static str,
    start: Instant,
    level: log::Level,
}

impl Timed {
    /// Report at `info` level
    pub(crate) fn info(stage: &'static str) -> Self {
        Self::at(stage, log::Level::Info)
    }

    /// Report at `debug` level
    pub(crate) fn debug(stage: &'static str) -> Self {
        Self::at(stage, log::Level::Debug)
    }

    fn at(stage: &'static str, level: log::Level) -> Self {
        log::trace!("{} started", stage);
        Self {
            stage,
            start: Instant::now(),
            level,
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timed {
    fn drop(&mut self) {
        log::log!(self.level, "{} took {:.3?}", self.stage, self.elapsed());
    }
}
