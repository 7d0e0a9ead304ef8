use crate::racer::Racer;

use core::future::Future;

pub(crate) mod array;
pub(crate) mod error;
pub(crate) mod options;
pub(crate) mod vec;

pub use error::RaceError;
pub use options::Options;

/// Wait for the first racer to succeed.
///
/// Every racer runs on its own task. Racers that fail are disqualified and the
/// race continues with the rest. The race ends when:
///
/// - a racer succeeds, returning its value;
/// - the timeout elapses or the kill signal fires, returning
///   [`RaceError::Timeout`] or [`RaceError::Killed`];
/// - every racer has been disqualified, returning [`RaceError::Exhausted`].
///
/// Once it ends the race's [`CancellationToken`] is cancelled, telling the
/// racers that are still running to stop.
///
/// [`CancellationToken`]: crate::CancellationToken
pub trait Race {
    /// The value produced by the winning racer.
    type Output;

    /// The [`Future`] implementation returned by this method.
    type Future: Future<Output = Result<Self::Output, RaceError>>;

    /// Race with the given [`Options`].
    fn race_with(self, options: Options) -> Self::Future;

    /// Race without a timeout or kill signal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// use futures_racer::prelude::*;
    /// use futures_racer::from_fn;
    /// use std::time::Duration;
    ///
    /// let slow = from_fn(|_| async {
    ///     tokio::time::sleep(Duration::from_millis(50)).await;
    ///     Ok::<_, ()>("slow")
    /// });
    /// let failing = from_fn(|_| async { Err::<&str, _>(()) });
    /// let fast = from_fn(|_| async { Ok::<_, ()>("fast") });
    ///
    /// assert_eq!([slow, failing, fast].race().await, Ok("fast"));
    /// # }
    /// ```
    fn race(self) -> Self::Future
    where
        Self: Sized,
    {
        self.race_with(Options::default())
    }
}

/// Race `racers` with the given [`Options`].
///
/// See [`Race`] for how the race is decided.
///
/// # Examples
///
/// ```rust
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use futures_racer::{from_fn, race, Options, RaceError};
/// use std::time::Duration;
///
/// let stuck = from_fn(|token| async move {
///     token.cancelled().await;
///     Err::<(), _>("cancelled")
/// });
/// let options = Options::new().with_timeout(Duration::from_millis(10));
///
/// assert_eq!(race(options, [stuck]).await, Err(RaceError::Timeout));
/// # }
/// ```
pub fn race<I>(options: Options, racers: I) -> vec::Race<I::Item>
where
    I: IntoIterator,
    I::Item: Racer,
{
    vec::Race::new(racers.into_iter().collect(), options)
}
