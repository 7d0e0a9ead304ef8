//! Units of work that take part in a race.

use crate::outcome::{IntoOutcome, Outcome};

use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures_lite::future::Boxed;
use pin_project::pin_project;
use tokio_util::sync::CancellationToken;

pub(crate) mod signal;

/// A unit of work competing in a race.
///
/// A racer is started with the race's [`CancellationToken`] and runs on its
/// own task until it reports an [`Outcome`]. The token is cancelled once the
/// race is over; racers should watch it and stop early, but nothing forces
/// them to. A racer that ignores the token keeps running, detached, after the
/// race has resolved.
///
/// Any `FnOnce(CancellationToken) -> impl Future` whose output is a `Result`
/// or an `Outcome` is a racer.
pub trait Racer: Send + 'static {
    /// The value produced when the racer wins.
    type Value: Send + 'static;

    /// The error produced when the racer is disqualified.
    type Error: Send + 'static;

    /// The [`Future`] driving this racer.
    type Future: Future<Output = Outcome<Self::Value, Self::Error>> + Send + 'static;

    /// Start the racer.
    fn run(self, token: CancellationToken) -> Self::Future;

    /// Erase the type of this racer, so it can share a collection with other
    /// kinds of racers.
    fn boxed(self) -> BoxRacer<Self::Value, Self::Error>
    where
        Self: Sized,
    {
        BoxRacer::new(self)
    }
}

impl<F, Fut, O> Racer for F
where
    F: FnOnce(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = O> + Send + 'static,
    O: IntoOutcome,
    O::Value: Send + 'static,
    O::Error: Send + 'static,
{
    type Value = O::Value;
    type Error = O::Error;
    type Future = MapOutcome<Fut>;

    fn run(self, token: CancellationToken) -> Self::Future {
        MapOutcome::new(self(token))
    }
}

/// Create a boxed racer from a closure.
///
/// Unlike passing the closure directly, this lets the compiler infer the
/// closure's argument type, and makes racers built from different closures
/// the same type.
///
/// # Examples
///
/// ```rust
/// use futures_racer::from_fn;
///
/// let racers = vec![
///     from_fn(|_| async { Err::<u8, _>("disqualified") }),
///     from_fn(|token| async move {
///         token.cancelled().await;
///         Ok::<u8, &str>(2)
///     }),
/// ];
/// assert_eq!(racers.len(), 2);
/// ```
pub fn from_fn<F, Fut>(
    f: F,
) -> BoxRacer<<Fut::Output as IntoOutcome>::Value, <Fut::Output as IntoOutcome>::Error>
where
    F: FnOnce(CancellationToken) -> Fut + Send + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: IntoOutcome,
    <Fut::Output as IntoOutcome>::Value: Send + 'static,
    <Fut::Output as IntoOutcome>::Error: Send + 'static,
{
    BoxRacer::new(f)
}

/// A type-erased [`Racer`].
///
/// This `struct` is created by [`from_fn`] and [`Racer::boxed`].
pub struct BoxRacer<T, E> {
    start: Box<dyn FnOnce(CancellationToken) -> Boxed<Outcome<T, E>> + Send>,
}

impl<T, E> BoxRacer<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Box a racer.
    pub fn new<R>(racer: R) -> Self
    where
        R: Racer<Value = T, Error = E>,
    {
        Self {
            start: Box::new(move |token: CancellationToken| -> Boxed<Outcome<T, E>> {
                Box::pin(racer.run(token))
            }),
        }
    }
}

impl<T, E> fmt::Debug for BoxRacer<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxRacer").finish_non_exhaustive()
    }
}

impl<T, E> Racer for BoxRacer<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Value = T;
    type Error = E;
    type Future = Boxed<Outcome<T, E>>;

    fn run(self, token: CancellationToken) -> Self::Future {
        (self.start)(token)
    }
}

/// Future for a racer built from a closure.
///
/// Converts the closure's output into an [`Outcome`].
#[must_use = "futures do nothing unless you `.await` or poll them"]
#[pin_project]
pub struct MapOutcome<Fut> {
    #[pin]
    future: Fut,
}

impl<Fut> MapOutcome<Fut> {
    fn new(future: Fut) -> Self {
        Self { future }
    }
}

impl<Fut: fmt::Debug> fmt::Debug for MapOutcome<Fut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MapOutcome").field(&self.future).finish()
    }
}

impl<Fut> Future for MapOutcome<Fut>
where
    Fut: Future,
    Fut::Output: IntoOutcome,
{
    type Output = Outcome<<Fut::Output as IntoOutcome>::Value, <Fut::Output as IntoOutcome>::Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.project().future.poll(cx).map(IntoOutcome::into_outcome)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use futures_lite::future::block_on;

    #[test]
    fn closure_result_becomes_outcome() {
        block_on(async {
            let racer = |_token: CancellationToken| async { Ok::<_, ()>("hello") };
            let outcome = racer.run(CancellationToken::new()).await;
            assert_eq!(outcome, Outcome::Succeeded("hello"));
        })
    }

    #[test]
    fn closure_can_return_outcome() {
        block_on(async {
            let racer = from_fn(|_| async { Outcome::<(), ()>::Withdrawn });
            assert_eq!(racer.run(CancellationToken::new()).await, Outcome::Withdrawn);
        })
    }

    #[test]
    fn boxed_racer_sees_token() {
        block_on(async {
            let racer = from_fn(|token| async move {
                if token.is_cancelled() {
                    Outcome::Withdrawn
                } else {
                    Outcome::<(), ()>::Succeeded(())
                }
            });
            let token = CancellationToken::new();
            token.cancel();
            assert_eq!(racer.run(token).await, Outcome::Withdrawn);
        })
    }

    #[test]
    fn boxing_twice_keeps_behavior() {
        block_on(async {
            let racer = from_fn(|_| async { Err::<(), _>(7u8) }).boxed();
            let outcome = racer.run(CancellationToken::new()).await;
            assert_eq!(outcome, Outcome::Disqualified(7));
        })
    }
}
