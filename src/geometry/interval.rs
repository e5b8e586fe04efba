use super::{EPSILON, FloatType, Ray, WorldVector};

/// Region between two parallel planes `normal . p + d0 = 0` and `normal . p + d1 = 0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Slab {
    pub normal: WorldVector,
    pub d0: FloatType,
    pub d1: FloatType,
}

impl Slab {
    pub fn new(normal: WorldVector, d0: FloatType, d1: FloatType) -> Slab {
        Slab { normal, d0, d1 }
    }
}

/// Parametric range `[t0, t1]` along a ray, with surface normals at both ends.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interval {
    pub t0: FloatType,
    pub t1: FloatType,
    pub n0: WorldVector,
    pub n1: WorldVector,
}

/// Which end of an interval was selected as a hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Entry,
    Exit,
}

/// How a hit distance is compared against `EPSILON`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EpsilonTest {
    /// `t >= EPSILON`
    Inclusive,
    /// `t > EPSILON`
    Exclusive,
}

impl EpsilonTest {
    /// Infinite bounds come from rays parallel to a slab and are never hits.
    pub fn accepts(self, t: FloatType) -> bool {
        t.is_finite()
            && match self {
                EpsilonTest::Inclusive => t >= EPSILON,
                EpsilonTest::Exclusive => t > EPSILON,
            }
    }

    /// Picks the nearest acceptable root out of an ordered pair.
    /// Returns None if the pair is out of order (empty interval) or if neither root passes.
    pub fn nearest_root(self, t0: FloatType, t1: FloatType) -> Option<(FloatType, Endpoint)> {
        if t0 > t1 {
            None
        } else if self.accepts(t0) {
            Some((t0, Endpoint::Entry))
        } else if self.accepts(t1) {
            Some((t1, Endpoint::Exit))
        } else {
            None
        }
    }
}

impl Interval {
    pub fn new(t0: FloatType, t1: FloatType, n0: WorldVector, n1: WorldVector) -> Interval {
        Interval { t0, t1, n0, n1 }
    }

    /// The whole ray, identity element of `intersect`.
    pub fn everything() -> Interval {
        Interval {
            t0: FloatType::NEG_INFINITY,
            t1: FloatType::INFINITY,
            n0: WorldVector::zeros(),
            n1: WorldVector::zeros(),
        }
    }

    pub fn empty() -> Interval {
        Interval {
            t0: FloatType::INFINITY,
            t1: FloatType::NEG_INFINITY,
            n0: WorldVector::zeros(),
            n1: WorldVector::zeros(),
        }
    }

    /// Range of the ray that lies between the two planes of the slab.
    /// The entry normal points against the ray, the exit normal along it,
    /// regardless of which of the two planes is hit first.
    pub fn from_slab(ray: &Ray, slab: &Slab) -> Interval {
        let nd = slab.normal.dot(&ray.direction);
        let nq = slab.normal.dot(&ray.origin.coords);

        if nd != 0.0 {
            let ta = -(slab.d0 + nq) / nd;
            let tb = -(slab.d1 + nq) / nd;
            let entry_normal = if nd > 0.0 { -slab.normal } else { slab.normal };
            Interval::new(ta.min(tb), ta.max(tb), entry_normal, -entry_normal)
        } else {
            // Parallel to the planes, inside (both planes included) or never.
            let s0 = slab.d0 + nq;
            let s1 = slab.d1 + nq;
            if s0 * s1 <= 0.0 {
                Interval::everything()
            } else {
                Interval::empty()
            }
        }
    }

    /// Intersection of two intervals, each bound keeps the normal of the interval it came from.
    pub fn intersect(&self, other: &Interval) -> Interval {
        let mut ret = *self;
        if other.t0 > ret.t0 {
            ret.t0 = other.t0;
            ret.n0 = other.n0;
        }
        if other.t1 < ret.t1 {
            ret.t1 = other.t1;
            ret.n1 = other.n1;
        }
        ret
    }

    /// Nearest acceptable end of the interval together with its normal.
    pub fn nearest(&self, test: EpsilonTest) -> Option<(FloatType, WorldVector)> {
        test.nearest_root(self.t0, self.t1)
            .map(|(t, endpoint)| match endpoint {
                Endpoint::Entry => (t, self.n0),
                Endpoint::Exit => (t, self.n1),
            })
    }
}
