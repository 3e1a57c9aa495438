//! Open polyline used for continuous cut paths.

use std::cell::OnceCell;

use super::{Point, Segment};

/// Ordered, mutable point sequence with a lazily built segment cache.
///
/// Any mutation drops the cache; `segments()` rebuilds it on demand.
#[derive(Clone, Debug, Default)]
pub struct Polyline {
    points: Vec<Point>,
    segments: OnceCell<Vec<Segment>>,
}

/// Segment indices flagged by [`Polyline::check_distances`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistanceOffenders {
    /// Offending segments of `self`.
    pub offenders: Vec<usize>,
    /// Segments they came too close to (of `other`, or of `self` when no other is given).
    pub offended: Vec<usize>,
}

impl DistanceOffenders {
    pub fn is_empty(&self) -> bool {
        self.offenders.is_empty() && self.offended.is_empty()
    }
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            segments: OnceCell::new(),
        }
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Consecutive segments (cached until the next mutation).
    pub fn segments(&self) -> &[Segment] {
        self.segments.get_or_init(|| {
            self.points
                .windows(2)
                .map(|w| Segment::new(w[0], w[1]))
                .collect()
        })
    }

    /// Merge `new` into this polyline if the two share an end.
    ///
    /// Tries, in order: tail→head, head←tail, tail←tail, head→head. The merged
    /// path keeps one copy of the shared point. Returns `false` (unchanged) if
    /// no orientation matches. An empty polyline just adopts `new`.
    pub fn add_points(&mut self, new: &[Point]) -> bool {
        let (Some(&nfirst), Some(&nlast)) = (new.first(), new.last()) else {
            return false;
        };
        let (Some(first), Some(last)) = (self.first(), self.last()) else {
            self.points = new.to_vec();
            self.segments = OnceCell::new();
            return true;
        };
        if last == nfirst {
            self.points.extend_from_slice(&new[1..]);
        } else if first == nlast {
            self.points.reverse();
            self.points.extend(new[..new.len() - 1].iter().rev());
        } else if last == nlast {
            self.points.extend(new[..new.len() - 1].iter().rev());
        } else if first == nfirst {
            self.points.reverse();
            self.points.extend_from_slice(&new[1..]);
        } else {
            return false;
        }
        self.segments = OnceCell::new();
        true
    }

    /// Merge another polyline (see [`Polyline::add_points`]).
    pub fn append(&mut self, other: &Polyline) -> bool {
        self.add_points(&other.points)
    }

    /// Remove the first occurrence of `p`; returns whether a point was removed.
    pub fn remove_point(&mut self, p: Point) -> bool {
        match self.points.iter().position(|q| *q == p) {
            Some(idx) => {
                self.points.remove(idx);
                self.segments = OnceCell::new();
                true
            }
            None => false,
        }
    }

    /// Whether two non-touching segments of the path cross.
    pub fn self_intersects(&self) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        let segs = self.segments();
        segs.iter().enumerate().any(|(i, s1)| {
            segs[i + 1..]
                .iter()
                .any(|s2| !s1.shares_endpoint(s2) && s1.intersects(s2))
        })
    }

    /// Collect non-touching segment pairs closer than `min_distance`.
    ///
    /// With `other = None` the path is checked against itself.
    pub fn check_distances(&self, other: Option<&Polyline>, min_distance: f64) -> DistanceOffenders {
        let mut out = DistanceOffenders::default();
        let mut flag = |i: usize, j: usize| {
            if !out.offenders.contains(&i) {
                out.offenders.push(i);
            }
            if !out.offended.contains(&j) {
                out.offended.push(j);
            }
        };
        let segs = self.segments();
        match other {
            None => {
                for (i, s1) in segs.iter().enumerate() {
                    for (j, s2) in segs.iter().enumerate().skip(i + 1) {
                        if !s1.shares_endpoint(s2) && s1.dist_to_segment(s2) < min_distance {
                            flag(i, j);
                        }
                    }
                }
            }
            Some(o) => {
                for (i, s1) in segs.iter().enumerate() {
                    for (j, s2) in o.segments().iter().enumerate() {
                        if !s1.shares_endpoint(s2) && s1.dist_to_segment(s2) < min_distance {
                            flag(i, j);
                        }
                    }
                }
            }
        }
        out
    }
}

impl From<Vec<Point>> for Polyline {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[(f64, f64)]) -> Vec<Point> {
        v.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn merge_four_orientations() {
        let base = pts(&[(0.0, 0.0), (1.0, 0.0)]);

        let mut a = Polyline::new(base.clone());
        assert!(a.add_points(&pts(&[(1.0, 0.0), (2.0, 0.0)])));
        assert_eq!(a.points(), pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]).as_slice());

        let mut b = Polyline::new(base.clone());
        assert!(b.add_points(&pts(&[(-1.0, 0.0), (0.0, 0.0)])));
        assert_eq!(b.points(), pts(&[(1.0, 0.0), (0.0, 0.0), (-1.0, 0.0)]).as_slice());

        let mut c = Polyline::new(base.clone());
        assert!(c.add_points(&pts(&[(2.0, 0.0), (1.0, 0.0)])));
        assert_eq!(c.points(), pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]).as_slice());

        let mut d = Polyline::new(base.clone());
        assert!(d.add_points(&pts(&[(0.0, 0.0), (0.0, 1.0)])));
        assert_eq!(d.points(), pts(&[(1.0, 0.0), (0.0, 0.0), (0.0, 1.0)]).as_slice());

        let mut e = Polyline::new(base);
        assert!(!e.add_points(&pts(&[(5.0, 5.0), (6.0, 6.0)])));
        assert_eq!(e.len(), 2);
    }

    #[test]
    fn segment_cache_is_invalidated() {
        let mut p = Polyline::new(pts(&[(0.0, 0.0), (1.0, 0.0)]));
        assert_eq!(p.segments().len(), 1);
        p.add_points(&pts(&[(1.0, 0.0), (1.0, 1.0)]));
        assert_eq!(p.segments().len(), 2);
        assert!(p.remove_point(Point::new(1.0, 1.0)));
        assert_eq!(p.segments().len(), 1);
    }

    #[test]
    fn bow_tie_self_intersects() {
        let p = Polyline::new(pts(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]));
        assert!(p.self_intersects());
        let q = Polyline::new(pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]));
        assert!(!q.self_intersects());
    }

    #[test]
    fn distances_against_other() {
        let a = Polyline::new(pts(&[(0.0, 0.0), (10.0, 0.0)]));
        let b = Polyline::new(pts(&[(0.0, 0.5), (10.0, 0.5), (10.0, 5.0)]));
        let hits = a.check_distances(Some(&b), 1.0);
        assert_eq!(hits.offenders, vec![0]);
        // the vertical leg starts 0.5 above a's right end
        assert_eq!(hits.offended, vec![0, 1]);
        assert!(a.check_distances(Some(&b), 0.1).is_empty());
    }
}
