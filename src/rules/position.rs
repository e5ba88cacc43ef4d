use std::fmt;

/// A `(position, strict)` tie-break rule selecting one of several matching candidates.
///
/// Counting is zero-based. A negative position counts from the end, so `-1` names the last
/// match and `-2` the one before it. A non-strict rule ignores the position and selects the
/// last match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionRule {
    /// Zero-based position, negative to count from the end
    pub position: i32,
    /// Whether `position` is honoured
    pub strict: bool,
}

impl PositionRule {
    /// A strict rule at `position`.
    #[must_use]
    pub fn at(position: i32) -> Self {
        PositionRule {
            position,
            strict: true,
        }
    }

    /// The first match.
    #[must_use]
    pub fn first() -> Self {
        Self::at(0)
    }

    /// The last match.
    #[must_use]
    pub fn last() -> Self {
        Self::at(-1)
    }

    /// Returns `true` if the candidate with this running counter is selected.
    ///
    /// `counter` is the zero-based index of the candidate among everything the rule counts,
    /// `last` the index of the final counted candidate.
    #[must_use]
    pub fn holds(&self, counter: usize, last: usize) -> bool {
        if !self.strict {
            return counter == last;
        }
        match usize::try_from(self.position) {
            Ok(position) => counter == position,
            Err(_) => {
                let from_end = self.position.unsigned_abs() as usize;
                (last + 1).checked_sub(from_end) == Some(counter)
            }
        }
    }
}

impl fmt::Display for PositionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index: {}, strict: {}", self.position, self.strict)
    }
}
