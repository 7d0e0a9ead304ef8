use core::fmt;

/// The reason a single racer stopped running.
///
/// Every racer reports exactly one `Outcome` back to the race. Whether the
/// race keeps going depends only on which variant it is, never on the
/// contents of the error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    /// The racer produced a value. The first one observed wins the race.
    Succeeded(T),
    /// The racer failed, but the others should keep trying.
    Disqualified(E),
    /// The racer stood down without contributing anything, usually because it
    /// noticed the race was already over. Handled like a disqualification.
    Withdrawn,
    /// The whole race has to stop now.
    Terminal(Halt),
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(res: Result<T, E>) -> Self {
        match res {
            Ok(value) => Outcome::Succeeded(value),
            Err(err) => Outcome::Disqualified(err),
        }
    }
}

/// A fatal condition that ends a race for every racer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Halt {
    /// The configured timeout elapsed.
    Timeout,
    /// The external kill signal was asserted.
    Killed,
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::Timeout => f.write_str("timeout"),
            Halt::Killed => f.write_str("killed"),
        }
    }
}

/// Conversion into an [`Outcome`].
///
/// Implemented for `Outcome` itself and for `Result`, where `Ok` succeeds and
/// `Err` disqualifies.
pub trait IntoOutcome {
    /// The value produced on success.
    type Value;
    /// The error produced on disqualification.
    type Error;

    /// Convert `self` into an outcome.
    fn into_outcome(self) -> Outcome<Self::Value, Self::Error>;
}

impl<T, E> IntoOutcome for Outcome<T, E> {
    type Value = T;
    type Error = E;

    fn into_outcome(self) -> Outcome<T, E> {
        self
    }
}

impl<T, E> IntoOutcome for Result<T, E> {
    type Value = T;
    type Error = E;

    fn into_outcome(self) -> Outcome<T, E> {
        self.into()
    }
}
