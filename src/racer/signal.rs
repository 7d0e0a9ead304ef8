//! Synthetic racers that stop a race: the timeout and the kill switch.
//!
//! Both compete like any other racer. They always watch the race token, so
//! they stand down as soon as the race is decided and never outlive it.

use super::Racer;
use crate::outcome::{Halt, Outcome};

use core::future::Future;
use core::marker::PhantomData;
use core::pin::Pin;
use core::task::{ready, Context, Poll};
use core::time::Duration;
use pin_project::pin_project;
use tokio::time::Sleep;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

/// A racer that halts the race when `trigger` resolves.
pub(crate) struct Signal<F, T, E> {
    trigger: F,
    halt: Halt,
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<F, T, E> Signal<F, T, E> {
    fn new(trigger: F, halt: Halt) -> Self {
        Self {
            trigger,
            halt,
            _marker: PhantomData,
        }
    }
}

/// Halts the race with [`Halt::Timeout`] once `after` has elapsed.
///
/// The clock starts when this is called, not when the racer is first polled.
pub(crate) fn timeout<T, E>(after: Duration) -> Signal<Sleep, T, E> {
    Signal::new(tokio::time::sleep(after), Halt::Timeout)
}

/// Halts the race with [`Halt::Killed`] once `kill` is cancelled.
pub(crate) fn kill<T, E>(kill: CancellationToken) -> Signal<WaitForCancellationFutureOwned, T, E> {
    Signal::new(kill.cancelled_owned(), Halt::Killed)
}

impl<F, T, E> Racer for Signal<F, T, E>
where
    F: Future + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    type Value = T;
    type Error = E;
    type Future = Watch<F, T, E>;

    fn run(self, token: CancellationToken) -> Self::Future {
        Watch {
            finished: token.cancelled_owned(),
            trigger: self.trigger,
            halt: self.halt,
            _marker: PhantomData,
        }
    }
}

/// Future for a running [`Signal`].
#[pin_project]
pub(crate) struct Watch<F, T, E> {
    #[pin]
    finished: WaitForCancellationFutureOwned,
    #[pin]
    trigger: F,
    halt: Halt,
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<F, T, E> Future for Watch<F, T, E>
where
    F: Future,
{
    type Output = Outcome<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        // The race token wins ties.
        if this.finished.poll(cx).is_ready() {
            return Poll::Ready(Outcome::Withdrawn);
        }

        ready!(this.trigger.poll(cx));
        Poll::Ready(Outcome::Terminal(*this.halt))
    }
}
