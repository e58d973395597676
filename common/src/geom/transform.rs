use super::coord::Coord;
use super::point::Point;
use super::rect::Rect;
use std::str::FromStr;

/// Placement orientation of a cell instance, as written in DEF.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    N,
    S,
    E,
    W,
    FN,
    FS,
    FE,
    FW,
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Orientation::N),
            "S" => Ok(Orientation::S),
            "E" => Ok(Orientation::E),
            "W" => Ok(Orientation::W),
            "FN" => Ok(Orientation::FN),
            "FS" => Ok(Orientation::FS),
            "FE" => Ok(Orientation::FE),
            "FW" => Ok(Orientation::FW),
            other => Err(format!("unknown orientation '{}'", other)),
        }
    }
}

impl Orientation {
    pub fn swaps_axes(self) -> bool {
        matches!(
            self,
            Orientation::E | Orientation::W | Orientation::FE | Orientation::FW
        )
    }
}

/// Affine Manhattan transform:
/// `x' = a*x + b*y + c`, `y' = d*x + e*y + f`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Transform {
    pub a: Coord,
    pub b: Coord,
    pub c: Coord,
    pub d: Coord,
    pub e: Coord,
    pub f: Coord,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1,
        b: 0,
        c: 0,
        d: 0,
        e: 1,
        f: 0,
    };

    pub fn translate(dx: Coord, dy: Coord) -> Self {
        Transform {
            c: dx,
            f: dy,
            ..Self::IDENTITY
        }
    }

    pub fn from_orientation(orient: Orientation) -> Self {
        let (a, b, d, e) = match orient {
            Orientation::N => (1, 0, 0, 1),
            Orientation::S => (-1, 0, 0, -1),
            Orientation::W => (0, -1, 1, 0),
            Orientation::E => (0, 1, -1, 0),
            Orientation::FN => (-1, 0, 0, 1),
            Orientation::FS => (1, 0, 0, -1),
            Orientation::FW => (0, -1, -1, 0),
            Orientation::FE => (0, 1, 1, 0),
        };
        Transform {
            a,
            b,
            c: 0,
            d,
            e,
            f: 0,
        }
    }

    /// DEF placement: the oriented cell's lower-left corner lands on `origin`.
    pub fn placement(orient: Orientation, bbox: Rect, origin: Point<Coord>) -> Self {
        let oriented = Self::from_orientation(orient);
        let moved = oriented.apply_rect(bbox);
        oriented.then(&Self::translate(
            origin.x - moved.min.x,
            origin.y - moved.min.y,
        ))
    }

    /// Transform that applies `self` first and `next` second.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            a: next.a * self.a + next.b * self.d,
            b: next.a * self.b + next.b * self.e,
            c: next.a * self.c + next.b * self.f + next.c,
            d: next.d * self.a + next.e * self.d,
            e: next.d * self.b + next.e * self.e,
            f: next.d * self.c + next.e * self.f + next.f,
        }
    }

    pub fn apply_point(&self, p: Point<Coord>) -> Point<Coord> {
        Point::new(
            self.a * p.x + self.b * p.y + self.c,
            self.d * p.x + self.e * p.y + self.f,
        )
    }

    pub fn apply_rect(&self, r: Rect) -> Rect {
        let p1 = self.apply_point(r.min);
        let p2 = self.apply_point(r.max);
        Rect::from_coords(p1.x.min(p2.x), p1.y.min(p2.y), p1.x.max(p2.x), p1.y.max(p2.y))
    }
}
