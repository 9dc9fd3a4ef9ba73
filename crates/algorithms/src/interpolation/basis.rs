//! Interpolation basis construction
//!
//! Builds the simplex used for linear interpolation: a single point, a
//! segment, a triangle or a tetrahedron, depending on the dataset topology.
//! Each step extends the previous basis by scanning the candidate list in
//! ascending distance and accepting the first location that is neither
//! degenerate nor requires extrapolation. Accepted vertices are never
//! revisited, so the result is the first valid simplex, not the best
//! conditioned one.

use spatialdb_core::{Dataset, Error, Result, Topology};
use tracing::trace;

use super::constants::Tolerances;
use super::geometry::{dot, signed_area, signed_volume, squared_distance, sub, Point3};
use super::nearest::CandidateList;

/// Weight of one basis vertex.
///
/// `candidate` indexes the candidate list, not the dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weight {
    pub weight: f64,
    pub candidate: usize,
}

/// Accepted interpolation basis, one variant per topology
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Basis {
    Point([Weight; 1]),
    Line([Weight; 2]),
    Area([Weight; 3]),
    Volume([Weight; 4]),
}

impl Basis {
    /// Build the basis required by `topology` around `point`.
    ///
    /// Fails with [`Error::InsufficientPoints`] when the candidate list is
    /// exhausted before a valid simplex is found.
    pub fn build(
        topology: Topology,
        dataset: &Dataset,
        candidates: &CandidateList,
        point: &Point3,
        tol: &Tolerances,
    ) -> Result<Self> {
        let solver = Solver {
            dataset,
            candidates,
            point,
            tol,
            topology,
        };

        let basis = match topology {
            Topology::Point => Basis::Point(solver.point()?),
            Topology::Line => Basis::Line(solver.line(solver.point()?)?),
            Topology::Area => Basis::Area(solver.area(solver.line(solver.point()?)?)?),
            Topology::Volume => Basis::Volume(
                solver.volume(solver.area(solver.line(solver.point()?)?)?)?,
            ),
        };

        trace!(?basis, "interpolation basis accepted");
        Ok(basis)
    }

    pub fn weights(&self) -> &[Weight] {
        match self {
            Basis::Point(w) => w,
            Basis::Line(w) => w,
            Basis::Area(w) => w,
            Basis::Volume(w) => w,
        }
    }
}

/// Shared inputs for the basis extension steps
struct Solver<'a> {
    dataset: &'a Dataset,
    candidates: &'a CandidateList,
    point: &'a Point3,
    tol: &'a Tolerances,
    topology: Topology,
}

impl Solver<'_> {
    #[inline]
    fn coords(&self, candidate: usize) -> &Point3 {
        self.dataset.coords_at(self.candidates.location(candidate))
    }

    #[inline]
    fn admissible(&self, weights: &[f64]) -> bool {
        weights.iter().all(|&w| w >= -self.tol.weight)
    }

    fn insufficient(&self) -> Error {
        Error::InsufficientPoints {
            topology: self.topology.name(),
            x: self.point[0],
            y: self.point[1],
            z: self.point[2],
        }
    }

    /// Candidates not yet part of the basis, closest first
    fn unused<'b>(&'b self, used: &'b [Weight]) -> impl Iterator<Item = usize> + 'b {
        (0..self.candidates.len()).filter(move |i| used.iter().all(|w| w.candidate != *i))
    }

    fn point(&self) -> Result<[Weight; 1]> {
        if self.candidates.is_empty() {
            return Err(self.insufficient());
        }
        Ok([Weight {
            weight: 1.0,
            candidate: 0,
        }])
    }

    /// Project the query point onto segment A-B
    fn line(&self, basis: [Weight; 1]) -> Result<[Weight; 2]> {
        let a = self.coords(basis[0].candidate);
        let q = self.point;

        for ib in self.unused(&basis) {
            let b = self.coords(ib);
            let ab = sub(b, a);
            let len_sq = dot(&ab, &ab);
            if len_sq <= 0.0 {
                continue;
            }

            let wa = dot(&sub(b, q), &ab) / len_sq;
            let wb = dot(&sub(q, a), &ab) / len_sq;

            if self.admissible(&[wa, wb]) {
                return Ok([
                    Weight {
                        weight: wa,
                        candidate: basis[0].candidate,
                    },
                    Weight {
                        weight: wb,
                        candidate: ib,
                    },
                ]);
            }
        }
        Err(self.insufficient())
    }

    /// Barycentric weights from sub-triangle areas of the projected point
    fn area(&self, basis: [Weight; 2]) -> Result<[Weight; 3]> {
        let a = self.coords(basis[0].candidate);
        let b = self.coords(basis[1].candidate);
        let min_area = self.tol.degeneracy * squared_distance(a, b);

        for ic in self.unused(&basis) {
            let c = self.coords(ic);
            let (area, normal) = signed_area(a, b, c);
            if area <= min_area {
                continue;
            }

            // Drop the out-of-plane component of the query point
            let offset = dot(&sub(self.point, a), &normal);
            let q = [
                self.point[0] - offset * normal[0],
                self.point[1] - offset * normal[1],
                self.point[2] - offset * normal[2],
            ];

            let (area_a, n_a) = signed_area(&q, b, c);
            let (area_b, n_b) = signed_area(a, &q, c);
            let (area_c, n_c) = signed_area(a, b, &q);
            let wa = area_a / area * dot(&n_a, &normal);
            let wb = area_b / area * dot(&n_b, &normal);
            let wc = area_c / area * dot(&n_c, &normal);

            if self.admissible(&[wa, wb, wc]) {
                return Ok([
                    Weight {
                        weight: wa,
                        ..basis[0]
                    },
                    Weight {
                        weight: wb,
                        ..basis[1]
                    },
                    Weight {
                        weight: wc,
                        candidate: ic,
                    },
                ]);
            }
        }
        Err(self.insufficient())
    }

    /// Barycentric weights from sub-tetrahedron volumes
    fn volume(&self, basis: [Weight; 3]) -> Result<[Weight; 4]> {
        let a = self.coords(basis[0].candidate);
        let b = self.coords(basis[1].candidate);
        let c = self.coords(basis[2].candidate);
        let min_volume = self.tol.degeneracy * squared_distance(a, b).powf(1.5);
        let q = self.point;

        for id in self.unused(&basis) {
            let d = self.coords(id);
            let volume = signed_volume(a, b, c, d);
            if volume.abs() <= min_volume {
                continue;
            }

            let wa = signed_volume(q, b, c, d) / volume;
            let wb = signed_volume(a, q, c, d) / volume;
            let wc = signed_volume(a, b, q, d) / volume;
            let wd = signed_volume(a, b, c, q) / volume;

            if self.admissible(&[wa, wb, wc, wd]) {
                return Ok([
                    Weight {
                        weight: wa,
                        ..basis[0]
                    },
                    Weight {
                        weight: wb,
                        ..basis[1]
                    },
                    Weight {
                        weight: wc,
                        ..basis[2]
                    },
                    Weight {
                        weight: wd,
                        candidate: id,
                    },
                ]);
            }
        }
        Err(self.insufficient())
    }
}
