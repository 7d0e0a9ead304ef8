use super::{Options, Race as RaceTrait, RaceError};
use crate::outcome::Outcome;
use crate::racer::{signal, Racer};

use core::fmt;
use core::future::Future;
use core::mem;
use core::pin::Pin;
use core::task::{ready, Context, Poll};
use futures_buffered::FuturesUnordered;
use futures_core::Stream;
use pin_project::pin_project;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

/// Wait for the first racer to succeed.
///
/// This `struct` is created by the [`race`] function and the methods on the
/// [`Race`] trait. See their documentation for more.
///
/// Nothing is spawned until the future is first polled, which must happen
/// inside a tokio runtime. Dropping the future ends the race just like
/// completing it does: the token is cancelled and the racers still running are
/// left to finish on their own.
///
/// [`race`]: fn@crate::race
/// [`Race`]: crate::Race
#[must_use = "futures do nothing unless you `.await` or poll them"]
#[pin_project]
pub struct Race<R: Racer> {
    state: State<R>,
    #[pin]
    live: FuturesUnordered<JoinHandle<Outcome<R::Value, R::Error>>>,
}

enum State<R> {
    Idle { racers: Vec<R>, options: Options },
    Running { _guard: DropGuard },
    Done,
}

impl<R: Racer> Race<R> {
    pub(crate) fn new(racers: Vec<R>, options: Options) -> Self {
        Self {
            state: State::Idle { racers, options },
            live: FuturesUnordered::new(),
        }
    }
}

impl<R: Racer> fmt::Debug for Race<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            State::Idle { .. } => "idle",
            State::Running { .. } => "running",
            State::Done => "done",
        };
        f.debug_struct("Race")
            .field("state", &state)
            .field("live", &self.live.len())
            .finish()
    }
}

impl<R: Racer> Future for Race<R> {
    type Output = Result<R::Value, RaceError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        if let State::Idle { .. } = this.state {
            let State::Idle { racers, options } = mem::replace(this.state, State::Done) else {
                unreachable!();
            };
            if racers.is_empty() {
                return Poll::Ready(Err(RaceError::NoRacers));
            }

            let (timeout, kill) = options.into_parts();
            // A kill asserted up front must beat racers that finish instantly.
            if kill.as_ref().is_some_and(CancellationToken::is_cancelled) {
                debug!(racers = racers.len(), "race: killed before start");
                return Poll::Ready(Err(RaceError::Killed));
            }

            let token = CancellationToken::new();
            debug!(
                racers = racers.len(),
                ?timeout,
                kill = kill.is_some(),
                "race: started"
            );

            for racer in racers {
                this.live.as_mut().push(tokio::spawn(racer.run(token.clone())));
            }
            if let Some(after) = timeout {
                let source = signal::timeout::<R::Value, R::Error>(after);
                this.live.as_mut().push(tokio::spawn(source.run(token.clone())));
            }
            if let Some(kill) = kill {
                let source = signal::kill::<R::Value, R::Error>(kill);
                this.live.as_mut().push(tokio::spawn(source.run(token.clone())));
            }

            *this.state = State::Running {
                _guard: token.drop_guard(),
            };
        }

        assert!(
            matches!(this.state, State::Running { .. }),
            "Futures must not be polled after completing"
        );

        let res = loop {
            match ready!(this.live.as_mut().poll_next(cx)) {
                Some(Ok(Outcome::Succeeded(value))) => break Ok(value),
                Some(Ok(Outcome::Terminal(halt))) => break Err(halt.into()),
                Some(Ok(Outcome::Disqualified(_) | Outcome::Withdrawn)) => continue,
                Some(Err(err)) => disqualify_failed_task(err),
                None => break Err(RaceError::Exhausted),
            }
        };

        match &res {
            Ok(_) => debug!(live = this.live.len(), "race: won"),
            Err(err) => debug!(
                live = this.live.len(),
                halted = err.is_halt(),
                error = %err,
                "race: lost"
            ),
        }

        // Cancels the token, then detaches whatever is still running.
        *this.state = State::Done;
        this.live.set(FuturesUnordered::new());
        Poll::Ready(res)
    }
}

fn disqualify_failed_task(err: JoinError) {
    if err.is_panic() {
        warn!(error = %err, "race: racer panicked");
    } else {
        debug!(error = %err, "race: racer task was cancelled");
    }
}

impl<R: Racer> RaceTrait for Vec<R> {
    type Output = R::Value;
    type Future = Race<R>;

    fn race_with(self, options: Options) -> Self::Future {
        Race::new(self, options)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::racer::{from_fn, BoxRacer};
    use futures_lite::future::block_on;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    #[test]
    fn empty_needs_no_runtime() {
        // Would panic on `tokio::spawn` if anything were started.
        let res = block_on(Vec::<BoxRacer<(), ()>>::new().race());
        assert_eq!(res, Err(RaceError::NoRacers));
    }

    #[tokio::test]
    async fn disqualified_are_skipped() {
        let res = vec![
            from_fn(|_| async { Err::<u8, _>("one") }),
            from_fn(|_| async { Err::<u8, _>("two") }),
            from_fn(|_| async {
                sleep(Duration::from_millis(1)).await;
                Ok::<_, &str>(3)
            }),
        ]
        .race()
        .await;
        assert_eq!(res, Ok(3));
    }

    #[tokio::test]
    async fn kill_set_before_start_beats_instant_winner() {
        let kill = CancellationToken::new();
        kill.cancel();
        let options = Options::new().with_kill(kill);
        let res = vec![from_fn(|_| async { Ok::<_, ()>(1u8) })]
            .race_with(options)
            .await;
        assert_eq!(res, Err(RaceError::Killed));
    }

    #[test]
    fn kill_set_before_start_spawns_nothing() {
        // Would panic on `tokio::spawn` if anything were started.
        let kill = CancellationToken::new();
        kill.cancel();
        let options = Options::new().with_kill(kill);
        let res = block_on(vec![from_fn(|_| async { Ok::<_, ()>(1u8) })].race_with(options));
        assert_eq!(res, Err(RaceError::Killed));
    }

    #[tokio::test]
    async fn withdrawn_is_not_a_win() {
        let res = vec![
            from_fn(|_| async { Outcome::<u8, ()>::Withdrawn }),
            from_fn(|_| async { Outcome::<u8, ()>::Withdrawn }),
        ]
        .race()
        .await;
        assert_eq!(res, Err(RaceError::Exhausted));
    }

    #[tokio::test]
    async fn racer_may_halt_the_race() {
        let res = vec![
            from_fn(|_| async { Outcome::<u8, ()>::Terminal(crate::Halt::Killed) }),
            from_fn(|_| async {
                sleep(Duration::from_millis(20)).await;
                Outcome::<u8, ()>::Succeeded(1)
            }),
        ]
        .race()
        .await;
        assert_eq!(res, Err(RaceError::Killed));
    }

    async fn explode() -> Result<&'static str, ()> {
        panic!("boom")
    }

    #[tokio::test]
    async fn panic_disqualifies() {
        let res = vec![
            from_fn(|_| explode()),
            from_fn(|_| async {
                sleep(Duration::from_millis(5)).await;
                Ok::<_, ()>("ok")
            }),
        ]
        .race()
        .await;
        assert_eq!(res, Ok("ok"));
    }

    #[tokio::test]
    async fn each_racer_runs_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let racers: Vec<_> = (0..8)
            .map(|_| {
                let runs = runs.clone();
                from_fn(move |_| async move {
                    runs.fetch_add(1, Ordering::SeqCst);
                    Err::<(), ()>(())
                })
            })
            .collect();
        assert_eq!(racers.race().await, Err(RaceError::Exhausted));
        assert_eq!(runs.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn dropping_the_race_cancels_the_token() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let racer = from_fn(move |token| async move {
            token.cancelled().await;
            let _ = tx.send(());
            Err::<(), ()>(())
        });

        let mut race = Box::pin(vec![racer].race());
        // Poll once to spawn the racer, then abandon the race.
        assert!(futures_lite::future::poll_once(race.as_mut()).await.is_none());
        drop(race);

        assert!(rx.await.is_ok());
    }
}
