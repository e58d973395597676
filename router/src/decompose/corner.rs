use chandec_common::db::indices::TileId;
use chandec_common::geom::coord::Coord;
use chandec_common::geom::point::Point;
use chandec_common::geom::rect::Rect;
use chandec_common::tiles::{BoundaryFinalized, Corner, Plane};

/// A convex solid corner from which a new channel boundary may be projected.
///
/// `far` is the space tile across the corner's horizontal edge (above a
/// north corner, below a south one); `near` is the space tile beside the
/// solid on the corner's side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UsableCorner {
    pub point: Point<Coord>,
    pub kind: Corner,
    pub far: TileId,
    pub near: TileId,
}

/// Corners of `r` in scan order: SW, NW, NE, SE.
pub fn corner_points(r: Rect) -> [(Point<Coord>, Corner); 4] {
    [
        (Point::new(r.left(), r.bottom()), Corner::SW),
        (Point::new(r.left(), r.top()), Corner::NW),
        (Point::new(r.right(), r.top()), Corner::NE),
        (Point::new(r.right(), r.bottom()), Corner::SE),
    ]
}

fn probe_points(p: Point<Coord>, kind: Corner) -> (Point<Coord>, Point<Coord>) {
    match kind {
        Corner::NE => (p, Point::new(p.x, p.y - 1)),
        Corner::NW => (p, Point::new(p.x - 1, p.y - 1)),
        Corner::SE => (Point::new(p.x, p.y - 1), p),
        Corner::SW => (Point::new(p.x, p.y - 1), Point::new(p.x - 1, p.y)),
    }
}

/// Decides whether the `kind` corner of a solid region at `p` still needs a
/// boundary. Rejected are corners on the area boundary, corners with a
/// vertical boundary already leaving them, concave corners, and corners
/// whose horizontal edge has been finalized.
pub fn usable_corner(
    plane: &Plane<BoundaryFinalized>,
    area: Rect,
    p: Point<Coord>,
    kind: Corner,
) -> Option<UsableCorner> {
    if p.x <= area.left() || p.x >= area.right() || p.y <= area.bottom() || p.y >= area.top() {
        return None;
    }

    let (far_at, near_at) = probe_points(p, kind);
    let far = plane.find(far_at)?;
    let f = plane.tile(far);
    if f.is_solid() || f.left() == p.x || f.right() == p.x {
        return None;
    }

    let near = plane.find_from(far, near_at)?;
    let n = plane.tile(near);
    if n.is_solid() || n.client.is_marked(kind.mirror_x()) {
        return None;
    }

    Some(UsableCorner {
        point: p,
        kind,
        far,
        near,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompose::flags::init_flags;
    use chandec_common::tiles::Body;

    fn plane_with(solids: &[Rect]) -> (Plane<BoundaryFinalized>, Rect) {
        let area = Rect::from_coords(0, 0, 100, 100);
        let mut plane = Plane::new(area);
        for &r in solids {
            plane.paint(r, Body::Solid);
        }
        init_flags(&mut plane, area);
        (plane, area)
    }

    #[test]
    fn centered_block_has_four_usable_corners() {
        let block = Rect::from_coords(40, 40, 60, 60);
        let (plane, area) = plane_with(&[block]);
        for (p, kind) in corner_points(block) {
            let c = usable_corner(&plane, area, p, kind).unwrap();
            let far = plane.tile(c.far).rect();
            let near = plane.tile(c.near).rect();
            if kind.is_north() {
                assert_eq!(far, Rect::from_coords(0, 60, 100, 100));
            } else {
                assert_eq!(far, Rect::from_coords(0, 0, 100, 40));
            }
            if kind.is_east() {
                assert_eq!(near, Rect::from_coords(60, 40, 100, 60));
            } else {
                assert_eq!(near, Rect::from_coords(0, 40, 40, 60));
            }
        }
    }

    #[test]
    fn boundary_corners_are_rejected() {
        let block = Rect::from_coords(20, 40, 60, 100);
        let (plane, area) = plane_with(&[block]);
        assert!(usable_corner(&plane, area, Point::new(20, 100), Corner::NW).is_none());
        assert!(usable_corner(&plane, area, Point::new(60, 100), Corner::NE).is_none());
        assert!(usable_corner(&plane, area, Point::new(20, 40), Corner::SW).is_some());
    }

    #[test]
    fn vertical_edge_at_corner_rejects() {
        // Solid continues above the corner, so the space there starts at x = 50.
        let (plane, area) = plane_with(&[
            Rect::from_coords(30, 20, 50, 40),
            Rect::from_coords(20, 40, 50, 60),
        ]);
        assert!(usable_corner(&plane, area, Point::new(50, 40), Corner::NE).is_none());
    }

    #[test]
    fn finalized_edge_rejects() {
        let block = Rect::from_coords(40, 40, 60, 60);
        let (mut plane, area) = plane_with(&[block]);
        let near = plane.find(Point::new(60, 59)).unwrap();
        plane.client_mut(near).mark(Corner::NW);
        assert!(usable_corner(&plane, area, Point::new(60, 60), Corner::NE).is_none());
        assert!(usable_corner(&plane, area, Point::new(60, 40), Corner::SE).is_some());
    }
}
