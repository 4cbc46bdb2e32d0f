use crate::cancel::CancellationToken;
use crate::error::SortError;
use crate::traits::NaturalOrder;
use crate::SortEngine;

/// Step-by-step configuration for a [`SortEngine`].
///
/// ```
/// use parsort::{CancellationToken, SortEngineBuilder};
///
/// let token = CancellationToken::new();
/// let engine = SortEngineBuilder::new()
///     .sequential_cutoff(1024)
///     .cancellation(token.clone())
///     .build()
///     .unwrap();
/// let mut v: Vec<u64> = (0..10_000).rev().collect();
/// engine.sort(&mut v).unwrap();
/// assert!(v.windows(2).all(|w| w[0] <= w[1]));
/// ```
pub struct SortEngineBuilder<C = NaturalOrder> {
    comparator: C,
    cutoff: Option<usize>,
    threads: Option<usize>,
    token: Option<CancellationToken>,
}

impl Default for SortEngineBuilder<NaturalOrder> {
    fn default() -> Self {
        Self::new()
    }
}

impl SortEngineBuilder<NaturalOrder> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<C> SortEngineBuilder<C> {
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            comparator,
            cutoff: None,
            threads: None,
            token: None,
        }
    }

    /// Swap the comparator, keeping the rest of the configuration.
    pub fn comparator<D>(self, comparator: D) -> SortEngineBuilder<D> {
        SortEngineBuilder {
            comparator,
            cutoff: self.cutoff,
            threads: self.threads,
            token: self.token,
        }
    }

    /// Ranges at or below this length are sorted inline instead of forked.
    pub fn sequential_cutoff(mut self, cutoff: usize) -> Self {
        self.cutoff = Some(cutoff);
        self
    }

    /// Run on a dedicated pool with this many workers instead of rayon's
    /// global pool. Ignored without the `parallel` feature.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn build(self) -> Result<SortEngine<C>, SortError> {
        if self.cutoff == Some(0) {
            return Err(SortError::InvalidConfig(
                "sequential cutoff must be positive".to_string(),
            ));
        }
        if self.threads == Some(0) {
            return Err(SortError::InvalidConfig(
                "thread count must be positive".to_string(),
            ));
        }
        let token = self.token.unwrap_or_default();
        let engine = SortEngine::from_parts(self.comparator, self.cutoff, token);

        #[cfg(feature = "parallel")]
        if let Some(threads) = self.threads {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|idx| format!("parsort-{idx}"))
                .build()
                .map_err(|err| SortError::WorkerPool(err.to_string()))?;
            return Ok(engine.with_pool(pool));
        }

        Ok(engine)
    }
}
