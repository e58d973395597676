use super::coord::Coord;
use super::point::Point;

/// Axis-aligned rectangle. `min` is inclusive, `max` exclusive, so two
/// rectangles that share an edge do not overlap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub min: Point<Coord>,
    pub max: Point<Coord>,
}

impl Rect {
    pub fn new(min: Point<Coord>, max: Point<Coord>) -> Self {
        Self { min, max }
    }

    pub fn from_coords(x1: Coord, y1: Coord, x2: Coord, y2: Coord) -> Self {
        Self::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    pub fn left(&self) -> Coord {
        self.min.x
    }
    pub fn bottom(&self) -> Coord {
        self.min.y
    }
    pub fn right(&self) -> Coord {
        self.max.x
    }
    pub fn top(&self) -> Coord {
        self.max.y
    }

    pub fn width(&self) -> Coord {
        self.max.x - self.min.x
    }
    pub fn height(&self) -> Coord {
        self.max.y - self.min.y
    }
    pub fn area(&self) -> i128 {
        self.width() as i128 * self.height() as i128
    }

    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn contains(&self, p: Point<Coord>) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    pub fn clip(&self, other: &Rect) -> Rect {
        Rect::from_coords(
            self.min.x.max(other.min.x),
            self.min.y.max(other.min.y),
            self.max.x.min(other.max.x),
            self.max.y.min(other.max.y),
        )
    }

    /// Bounding box of both. An empty operand is ignored.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect::from_coords(
            self.min.x.min(other.min.x),
            self.min.y.min(other.min.y),
            self.max.x.max(other.max.x),
            self.max.y.max(other.max.y),
        )
    }

    pub fn expand(&self, d: Coord) -> Rect {
        Rect::from_coords(self.min.x - d, self.min.y - d, self.max.x + d, self.max.y + d)
    }

    pub fn translate(&self, dx: Coord, dy: Coord) -> Rect {
        Rect::from_coords(self.min.x + dx, self.min.y + dy, self.max.x + dx, self.max.y + dy)
    }
}

impl From<[Coord; 4]> for Rect {
    fn from(c: [Coord; 4]) -> Self {
        Rect::from_coords(c[0].min(c[2]), c[1].min(c[3]), c[0].max(c[2]), c[1].max(c[3]))
    }
}
