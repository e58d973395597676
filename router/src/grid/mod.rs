use chandec_common::geom::coord::{Axis, Coord};
use chandec_common::geom::point::Point;
use chandec_common::geom::rect::Rect;
use chandec_common::util::config::DecomposeConfig;

/// The routing grid: lines at `origin + k * spacing` on both axes. Channel
/// boundaries are kept half a pitch off the lines so tracks fall inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteGrid {
    pub origin: Point<Coord>,
    pub spacing: Coord,
}

impl RouteGrid {
    pub fn new(origin: Point<Coord>, spacing: Coord) -> Self {
        assert!(spacing > 0, "grid spacing must be positive, got {}", spacing);
        Self { origin, spacing }
    }

    pub fn from_config(config: &DecomposeConfig) -> Self {
        Self::new(
            Point::new(config.grid_origin_x, config.grid_origin_y),
            config.grid_spacing,
        )
    }

    #[inline]
    fn origin_on(&self, axis: Axis) -> Coord {
        match axis {
            Axis::X => self.origin.x,
            Axis::Y => self.origin.y,
        }
    }

    #[inline]
    fn half(&self) -> Coord {
        self.spacing / 2
    }

    /// Smallest grid line `>= v`.
    pub fn up(&self, v: Coord, axis: Axis) -> Coord {
        let o = self.origin_on(axis);
        let steps = (v - o).div_euclid(self.spacing);
        let line = o + steps * self.spacing;
        if line < v { line + self.spacing } else { line }
    }

    /// Largest grid line `<= v`.
    pub fn down(&self, v: Coord, axis: Axis) -> Coord {
        let o = self.origin_on(axis);
        o + (v - o).div_euclid(self.spacing) * self.spacing
    }

    /// Grows `area` so every edge sits half a pitch below a grid line.
    pub fn normalize(&self, area: Rect) -> Rect {
        let low = |edge: Coord, axis: Axis| {
            let tmp = self.up(edge, axis) - self.half();
            if tmp > edge { tmp - self.spacing } else { tmp }
        };
        let high = |edge: Coord, axis: Axis| {
            let tmp = self.up(edge, axis) - self.half();
            if tmp < edge { tmp + self.spacing } else { tmp }
        };
        Rect::from_coords(
            low(area.left(), Axis::X),
            low(area.bottom(), Axis::Y),
            high(area.right(), Axis::X),
            high(area.top(), Axis::Y),
        )
    }

    /// Inflates `r` by the separations and snaps it outward (`round_up`) or
    /// inward to the half-pitch positions.
    pub fn round_rect(&self, r: Rect, sep_up: Coord, sep_down: Coord, round_up: bool) -> Rect {
        let rest = self.spacing - self.half();
        let low = |edge: Coord, axis: Axis| {
            let line = self.down(edge - sep_down, axis);
            if round_up { line - self.half() } else { line + rest }
        };
        let high = |edge: Coord, axis: Axis| {
            let line = self.up(edge + sep_up, axis);
            if round_up { line + rest } else { line - self.half() }
        };
        Rect::from_coords(
            low(r.left(), Axis::X),
            low(r.bottom(), Axis::Y),
            high(r.right(), Axis::X),
            high(r.top(), Axis::Y),
        )
    }

    /// Grid lines strictly inside `r`, as `(columns, rows)`.
    pub fn tracks(&self, r: Rect) -> (u32, u32) {
        let count = |lo: Coord, hi: Coord, axis: Axis| {
            let first = self.up(lo + 1, axis);
            let last = self.down(hi - 1, axis);
            if last < first {
                0
            } else {
                ((last - first) / self.spacing + 1) as u32
            }
        };
        (
            count(r.left(), r.right(), Axis::X),
            count(r.bottom(), r.top(), Axis::Y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_and_down_handle_negatives() {
        let g = RouteGrid::new(Point::new(3, -2), 10);
        assert_eq!(g.up(3, Axis::X), 3);
        assert_eq!(g.up(4, Axis::X), 13);
        assert_eq!(g.down(2, Axis::X), -7);
        assert_eq!(g.up(-15, Axis::Y), -12);
        assert_eq!(g.down(-15, Axis::Y), -22);
        assert_eq!(g.down(-12, Axis::Y), -12);
    }

    #[test]
    fn normalize_puts_edges_half_a_pitch_off_the_grid() {
        let g = RouteGrid::new(Point::new(0, 0), 10);
        let n = g.normalize(Rect::from_coords(0, 0, 100, 100));
        assert_eq!(n, Rect::from_coords(-5, -5, 105, 105));

        let n = g.normalize(Rect::from_coords(-13, 7, 41, 44));
        assert_eq!(n, Rect::from_coords(-15, 5, 45, 45));
        for edge in [n.left(), n.bottom(), n.right(), n.top()] {
            assert_eq!((edge + 5).rem_euclid(10), 0);
        }
    }

    #[test]
    fn normalize_contains_the_request() {
        let g = RouteGrid::new(Point::new(2, 5), 8);
        for (x1, y1, x2, y2) in [(0, 0, 1, 1), (-30, -17, 12, 9), (6, 1, 7, 100)] {
            let r = Rect::from_coords(x1, y1, x2, y2);
            let n = g.normalize(r);
            assert!(n.contains_rect(&r), "{:?} -> {:?}", r, n);
            assert_eq!((n.left() - 2 + 4).rem_euclid(8), 0);
            assert_eq!((n.top() - 5 + 4).rem_euclid(8), 0);
        }
    }

    #[test]
    fn round_rect_inflates_and_snaps() {
        let g = RouteGrid::new(Point::new(0, 0), 10);
        let r = Rect::from_coords(42, 42, 52, 52);
        assert_eq!(g.round_rect(r, 2, 2, true), Rect::from_coords(35, 35, 65, 65));
        assert_eq!(g.round_rect(r, 0, 0, false), Rect::from_coords(45, 45, 55, 55));
    }

    #[test]
    fn odd_spacing_offsets_differ_by_one() {
        let g = RouteGrid::new(Point::new(0, 0), 7);
        let r = g.round_rect(Rect::from_coords(10, 10, 20, 20), 0, 0, true);
        // Lines at 7 and 21; half = 3, rest = 4.
        assert_eq!(r, Rect::from_coords(4, 4, 25, 25));
        assert_eq!((7 - r.left()) - (r.right() - 21), -1);

        let n = g.normalize(Rect::from_coords(0, 0, 14, 14));
        assert_eq!(n, Rect::from_coords(-3, -3, 18, 18));
    }

    #[test]
    fn tracks_counts_interior_lines() {
        let g = RouteGrid::new(Point::new(0, 0), 10);
        assert_eq!(g.tracks(Rect::from_coords(-5, -5, 105, 35)), (11, 4));
        assert_eq!(g.tracks(Rect::from_coords(0, 0, 10, 10)), (0, 0));
        assert_eq!(g.tracks(Rect::from_coords(1, 1, 9, 9)), (0, 0));
    }
}
