//! The footprint a component left behind during one draw pass.

use lyon::math::{Box2D, Point};

use crate::region::Region;

/// Everything a component covered, plus the parts of it that conduct.
///
/// `continuity_positive` holds shapes that electrically connect to whatever
/// they overlap (leads, copper); `continuity_negative` holds shapes that break
/// a connection (cuts, insulating gaps). Both lists keep drawing order.
#[derive(Debug, Clone, Default)]
pub struct ComponentArea {
    overall: Region,
    continuity_positive: Vec<Region>,
    continuity_negative: Vec<Region>,
}

impl ComponentArea {
    pub fn new(
        overall: Region,
        continuity_positive: Vec<Region>,
        continuity_negative: Vec<Region>,
    ) -> Self {
        Self {
            overall,
            continuity_positive,
            continuity_negative,
        }
    }

    pub fn overall(&self) -> &Region {
        &self.overall
    }

    pub fn continuity_positive(&self) -> &[Region] {
        &self.continuity_positive
    }

    pub fn continuity_negative(&self) -> &[Region] {
        &self.continuity_negative
    }

    pub fn is_empty(&self) -> bool {
        self.overall.is_empty()
    }

    pub fn bounds(&self) -> Option<Box2D> {
        self.overall.bounds()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.overall.contains(p)
    }

    /// Positive continuity regions under `p`, in drawing order.
    pub fn positive_at(&self, p: Point) -> impl Iterator<Item = &Region> + '_ {
        self.continuity_positive.iter().filter(move |r| r.contains(p))
    }

    /// Negative continuity regions under `p`, in drawing order.
    pub fn negative_at(&self, p: Point) -> impl Iterator<Item = &Region> + '_ {
        self.continuity_negative.iter().filter(move |r| r.contains(p))
    }

    /// Whether `p` conducts: inside some positive region and no negative one.
    pub fn conducts_at(&self, p: Point) -> bool {
        self.positive_at(p).next().is_some() && self.negative_at(p).next().is_none()
    }
}
