//! Error types returned by the sort engine.
//!
//! A run either succeeds or aborts. The abort reasons are kept distinct so a
//! caller can tell a cancelled run from one whose comparator gave up.

use thiserror::Error;

/// Failure reported by a [`Comparator`](crate::traits::Comparator).
///
/// The engine never masks these: the first one aborts the whole sort.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("comparison failed: {message}")]
pub struct CompareError {
    message: String,
}

impl CompareError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable reason supplied by the comparator.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of an aborted sort.
///
/// After any of the run-time variants the slice is still a permutation of the
/// input, but its order is unspecified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// The cancellation token fired before every merge could commit.
    #[error("sort interrupted")]
    Interrupted,

    /// The comparator reported a failure.
    #[error(transparent)]
    Comparison(#[from] CompareError),

    /// The builder was given a configuration it cannot run with.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// rayon could not start the dedicated worker pool.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
}

impl SortError {
    /// True for [`SortError::Interrupted`].
    #[inline]
    pub fn is_interrupted(&self) -> bool {
        matches!(self, SortError::Interrupted)
    }

    /// Pick the outcome to report when both halves of a range failed.
    ///
    /// A comparison failure wins over an interruption.
    pub(crate) fn dominant(self, other: SortError) -> SortError {
        match (&self, &other) {
            (SortError::Interrupted, SortError::Comparison(_)) => other,
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(SortError::Interrupted.to_string(), "sort interrupted");
        let err = SortError::from(CompareError::new("NaN"));
        assert_eq!(err.to_string(), "comparison failed: NaN");
        assert_eq!(
            SortError::InvalidConfig("cutoff".into()).to_string(),
            "invalid configuration: cutoff"
        );
    }

    #[test]
    fn comparison_dominates_interruption() {
        let cmp = SortError::Comparison(CompareError::new("x"));
        assert_eq!(
            SortError::Interrupted.dominant(cmp.clone()),
            cmp.clone()
        );
        assert_eq!(cmp.clone().dominant(SortError::Interrupted), cmp);
        assert!(SortError::Interrupted
            .dominant(SortError::Interrupted)
            .is_interrupted());
    }
}
