use std::time::Instant;

use tracing::debug;

/// Unit a [`ScopeTimer`] reports its elapsed time in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Precision {
    #[default]
    Nanos,
    Micros,
    Millis,
    Secs,
}

/// Logs how long a scope took when it is dropped.
///
/// ```no_run
/// use shardwalk::{Precision, ScopeTimer};
///
/// let _timer = ScopeTimer::with_precision("list children", Precision::Micros);
/// // ... timed work ...
/// ```
pub struct ScopeTimer {
    tag: String,
    precision: Precision,
    started: Instant,
}

impl ScopeTimer {
    pub fn new(tag: impl Into<String>) -> Self {
        Self::with_precision(tag, Precision::default())
    }

    pub fn with_precision(tag: impl Into<String>, precision: Precision) -> Self {
        ScopeTimer {
            tag: tag.into(),
            precision,
            started: Instant::now(),
        }
    }
}

impl Drop for ScopeTimer {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        let (count, unit) = match self.precision {
            Precision::Nanos => (elapsed.as_nanos(), "ns"),
            Precision::Micros => (elapsed.as_micros(), "us"),
            Precision::Millis => (elapsed.as_millis(), "ms"),
            Precision::Secs => (u128::from(elapsed.as_secs()), "s"),
        };
        debug!(target: "shardwalk::timer", "[{}] cost {} {}", self.tag, count, unit);
    }
}
