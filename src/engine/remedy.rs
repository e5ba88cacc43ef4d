use tracing::{debug, warn};

use crate::{Error, Result};

type Attempt<'a, T> = Box<dyn FnOnce() -> Result<T> + 'a>;

/// Alternative lookups tried in order until one succeeds.
///
/// Useful when the same member is described differently across versions of a binary. Every
/// failure is kept; if no attempt succeeds they are returned together, in attempt order, as
/// [`Error::RemedyExhausted`].
///
/// # Examples
///
/// ```rust
/// use memberscope::engine::RemedyPlan;
/// use memberscope::Error;
///
/// let value = RemedyPlan::new()
///     .attempt(|| Err(Error::HostError("renamed".to_string())))
///     .attempt(|| Ok(42))
///     .run()?;
/// assert_eq!(value, 42);
/// # Ok::<(), Error>(())
/// ```
pub struct RemedyPlan<'a, T> {
    attempts: Vec<Attempt<'a, T>>,
}

impl<T> Default for RemedyPlan<'_, T> {
    fn default() -> Self {
        RemedyPlan {
            attempts: Vec::new(),
        }
    }
}

impl<'a, T> RemedyPlan<'a, T> {
    /// A plan without attempts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attempt.
    #[must_use]
    pub fn attempt(mut self, attempt: impl FnOnce() -> Result<T> + 'a) -> Self {
        self.attempts.push(Box::new(attempt));
        self
    }

    /// Number of attempts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    /// Returns `true` if no attempt was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    /// Runs the attempts in order and returns the first success.
    ///
    /// # Errors
    /// Returns [`Error::RemedyExhausted`] with every collected error if all attempts fail,
    /// or if there are none.
    pub fn run(self) -> Result<T> {
        let total = self.attempts.len();
        let mut errors = Vec::with_capacity(total);

        for (index, attempt) in self.attempts.into_iter().enumerate() {
            match attempt() {
                Ok(value) => {
                    debug!(attempt = index + 1, total, "remedy plan succeeded");
                    return Ok(value);
                }
                Err(err) => errors.push(err),
            }
        }

        warn!("remedy plan failed after {} attempts", errors.len());
        Err(Error::RemedyExhausted(errors))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn stops_at_first_success() {
        let calls = Cell::new(0);
        let result = RemedyPlan::new()
            .attempt(|| {
                calls.set(calls.get() + 1);
                Err(Error::HostError("first".to_string()))
            })
            .attempt(|| {
                calls.set(calls.get() + 1);
                Ok("second")
            })
            .attempt(|| {
                calls.set(calls.get() + 1);
                Ok("third")
            })
            .run();

        assert_eq!(result.unwrap(), "second");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn collects_every_failure_in_order() {
        let result: Result<()> = RemedyPlan::new()
            .attempt(|| Err(Error::HostError("a".to_string())))
            .attempt(|| Err(Error::InvalidRuleConfiguration("b".to_string())))
            .run();

        match result {
            Err(Error::RemedyExhausted(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(matches!(errors[0], Error::HostError(_)));
                assert!(matches!(errors[1], Error::InvalidRuleConfiguration(_)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_plan_is_exhausted() {
        let plan: RemedyPlan<'_, ()> = RemedyPlan::new();
        assert!(plan.is_empty());
        assert!(matches!(plan.run(), Err(Error::RemedyExhausted(errors)) if errors.is_empty()));
    }
}
