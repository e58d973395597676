pub mod corner;
mod paint;
pub mod plane;
mod stitch;

pub use corner::{BoundaryFinalized, Corner};
pub use plane::{Body, Plane, Tile};

use crate::geom::rect::Rect;

/// The two planes a channel decomposition works on: a read-only scan source
/// and the mutable plane that ends up holding the channels.
#[derive(Clone, Debug)]
pub struct ChannelPlanes {
    pub check: Plane<()>,
    pub result: Plane<BoundaryFinalized>,
}

impl ChannelPlanes {
    pub fn new(bounds: Rect) -> Self {
        Self {
            check: Plane::new(bounds),
            result: Plane::new(bounds),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.result.bounds()
    }

    pub fn reset(&mut self, bounds: Rect) {
        self.check.reset(bounds);
        self.result.reset(bounds);
    }

    pub fn paint(&mut self, area: Rect, body: Body) {
        self.check.paint(area, body);
        self.result.paint(area, body);
    }

    /// Union of the solid tiles of the result plane.
    pub fn solid_bbox(&self) -> Rect {
        self.result
            .ids()
            .map(|id| self.result.tile(id))
            .filter(|t| t.is_solid())
            .fold(Rect::default(), |acc, t| acc.union(&t.rect()))
    }
}
