//! Nearest-neighbor candidate search
//!
//! Brute-force partial selection: every dataset location is scanned once
//! and insertion-sorted into a fixed-capacity buffer of the closest ones.
//! With at most [`MAX_CANDIDATES`] slots this is O(n·k) without allocating
//! or sorting the whole dataset.

use spatialdb_core::Dataset;

use super::constants::{MAX_CANDIDATES, UNUSED_DISTANCE};
use super::geometry::{squared_distance, Point3};

/// A dataset location and its squared distance to the query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub distance_sq: f64,
    pub index: usize,
}

impl Candidate {
    const UNUSED: Candidate = Candidate {
        distance_sq: UNUSED_DISTANCE,
        index: usize::MAX,
    };
}

/// Distance-ordered list of the closest dataset locations.
///
/// Backed by a fixed array; only the filled prefix is ever exposed, so
/// unused slots cannot leak into basis construction.
#[derive(Debug, Clone)]
pub struct CandidateList {
    entries: [Candidate; MAX_CANDIDATES],
    len: usize,
    capacity: usize,
}

impl CandidateList {
    /// Empty list keeping at most `capacity` (clamped to `MAX_CANDIDATES`) entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: [Candidate::UNUSED; MAX_CANDIDATES],
            len: 0,
            capacity: capacity.min(MAX_CANDIDATES),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Candidate] {
        &self.entries[..self.len]
    }

    /// Dataset location index of the `i`-th closest candidate
    #[inline]
    pub fn location(&self, i: usize) -> usize {
        self.as_slice()[i].index
    }

    /// Offer a location; keeps it if it beats the current worst entry.
    ///
    /// Equal distances keep the earlier offer first.
    pub fn offer(&mut self, distance_sq: f64, index: usize) {
        if self.capacity == 0 {
            return;
        }
        if self.len == self.capacity {
            if !(distance_sq < self.entries[self.len - 1].distance_sq) {
                return;
            }
        } else {
            self.len += 1;
        }

        let mut pos = self.len - 1;
        while pos > 0 && self.entries[pos - 1].distance_sq > distance_sq {
            self.entries[pos] = self.entries[pos - 1];
            pos -= 1;
        }
        self.entries[pos] = Candidate { distance_sq, index };
    }
}

/// Find up to `min(num_locations, MAX_CANDIDATES)` locations closest to `point`
pub fn find_nearest(dataset: &Dataset, point: &Point3) -> CandidateList {
    find_k_nearest(dataset, point, MAX_CANDIDATES)
}

/// Find up to `min(num_locations, k, MAX_CANDIDATES)` locations closest to `point`.
///
/// Results are in ascending squared distance.
pub fn find_k_nearest(dataset: &Dataset, point: &Point3, k: usize) -> CandidateList {
    let mut list = CandidateList::with_capacity(k.min(dataset.num_locations()));

    for i in 0..dataset.num_locations() {
        list.offer(squared_distance(dataset.coords_at(i), point), i);
    }

    list
}
