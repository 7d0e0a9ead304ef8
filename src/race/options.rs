use core::time::Duration;
use tokio_util::sync::CancellationToken;

/// Settings for a single race.
///
/// By default a race has no timeout and cannot be killed: it runs until a
/// racer succeeds or every racer has been disqualified.
///
/// # Examples
///
/// ```rust
/// use futures_racer::{CancellationToken, Options};
/// use std::time::Duration;
///
/// let kill = CancellationToken::new();
/// let options = Options::new()
///     .with_timeout(Duration::from_secs(5))
///     .with_kill(kill.clone());
/// assert_eq!(options.timeout(), Some(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Options {
    timeout: Option<Duration>,
    kill: Option<CancellationToken>,
}

impl Options {
    /// Create options with no timeout and no kill signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// End the race with [`RaceError::Timeout`] if nobody has won after
    /// `after`. A zero duration disables the timeout.
    ///
    /// [`RaceError::Timeout`]: crate::RaceError::Timeout
    pub fn with_timeout(mut self, after: Duration) -> Self {
        self.timeout = (!after.is_zero()).then_some(after);
        self
    }

    /// End the race with [`RaceError::Killed`] once `kill` is cancelled.
    ///
    /// [`RaceError::Killed`]: crate::RaceError::Killed
    pub fn with_kill(mut self, kill: CancellationToken) -> Self {
        self.kill = Some(kill);
        self
    }

    /// The configured timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The configured kill signal, if any.
    pub fn kill(&self) -> Option<&CancellationToken> {
        self.kill.as_ref()
    }

    pub(crate) fn into_parts(self) -> (Option<Duration>, Option<CancellationToken>) {
        (self.timeout, self.kill)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_timeout_disables() {
        let options = Options::new().with_timeout(Duration::ZERO);
        assert_eq!(options.timeout(), None);
    }

    #[test]
    fn later_timeout_replaces_earlier() {
        let options = Options::new()
            .with_timeout(Duration::from_millis(5))
            .with_timeout(Duration::ZERO);
        assert_eq!(options.timeout(), None);
    }

    #[test]
    fn kill_is_shared_with_caller() {
        let kill = CancellationToken::new();
        let options = Options::new().with_kill(kill.clone());
        kill.cancel();
        assert!(options.kill().is_some_and(CancellationToken::is_cancelled));
    }
}
