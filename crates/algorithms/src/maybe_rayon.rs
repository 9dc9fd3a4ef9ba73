/// Parallel or sequential execution of batch queries.
///
/// With the `parallel` feature, `multiquery` spreads its rows over rayon's
/// thread pool. Without it, the same call sites run row by row.
#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    /// Sequential stand-in for `rayon::prelude::IntoParallelIterator`.
    ///
    /// `multiquery` iterates its points with `into_par_iter()`; here that
    /// is a plain `into_iter()`, so each point is queried in order on the
    /// calling thread and the collected rows keep their positions.
    pub trait IntoParallelIterator {
        type Iter;
        type Item;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Iter = I::IntoIter;
        type Item = I::Item;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(not(feature = "parallel"))]
pub use sequential::*;
