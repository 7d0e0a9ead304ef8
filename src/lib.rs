//! Race concurrent tasks to the first success.
//!
//! A race runs a set of [`Racer`]s concurrently, each on its own tokio task,
//! and resolves with the value of the first one to succeed. Racers that fail
//! are *disqualified*: they drop out and the race keeps going with the rest.
//! A race can also be stopped outright by a timeout or an external kill
//! signal, configured through [`Options`].
//!
//! # Operations
//!
//! - [`race`]: race any iterator of racers with the given options.
//! - [`Race::race`] / [`Race::race_with`]: the same, as methods on vecs and
//!   arrays of racers.
//!
//! Each race resolves to exactly one `Result<T, RaceError>`:
//!
//! | Result                    | When                                       |
//! | ---                       | ---                                        |
//! | `Ok(value)`               | A racer succeeded                          |
//! | `Err(RaceError::Timeout)` | The timeout elapsed first                  |
//! | `Err(RaceError::Killed)`  | The kill signal fired first                |
//! | `Err(RaceError::Exhausted)` | Every racer was disqualified             |
//! | `Err(RaceError::NoRacers)` | There was nobody to race                  |
//!
//! # Examples
//!
//! ```rust
//! use futures_racer::prelude::*;
//! use futures_racer::{from_fn, Options, RaceError};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let slow = from_fn(|_| async {
//!     tokio::time::sleep(Duration::from_millis(20)).await;
//!     Ok::<_, std::io::Error>("slow")
//! });
//! let fast = from_fn(|_| async { Ok::<_, std::io::Error>("fast") });
//! assert_eq!(vec![slow, fast].race().await, Ok("fast"));
//!
//! let stuck = from_fn(|token| async move {
//!     token.cancelled().await;
//!     Err::<&str, _>("gave up")
//! });
//! let options = Options::new().with_timeout(Duration::from_millis(5));
//! assert_eq!(vec![stuck].race_with(options).await, Err(RaceError::Timeout));
//! # }
//! ```
//!
//! # Cancellation
//!
//! Every racer receives a [`CancellationToken`] which is cancelled as soon as
//! the race ends, whatever the reason. Cancellation is cooperative: the crate
//! never aborts a racer's task. A racer that does not watch its token keeps
//! running in the background after the race has resolved, until it finishes
//! on its own. Racers that hold on to expensive resources should select on
//! [`CancellationToken::cancelled`] at their await points.

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

mod outcome;
mod race;
mod racer;

/// The futures racer prelude.
pub mod prelude {
    pub use super::race::Race as _;
    pub use super::racer::Racer as _;
}

pub use outcome::{Halt, IntoOutcome, Outcome};
pub use race::{race, Options, Race, RaceError};
pub use racer::{from_fn, BoxRacer, MapOutcome, Racer};
pub use tokio_util::sync::CancellationToken;

/// Helper types for vectors and arrays of racers.
pub mod vec {
    pub use crate::race::vec::Race;
}
