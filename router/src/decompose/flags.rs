use chandec_common::geom::rect::Rect;
use chandec_common::tiles::{BoundaryFinalized, Plane};

/// Resets the boundary flags of every tile touching `area`. Solid tiles are
/// fully finalized; space tiles only keep the edges lying on the area's top
/// and bottom.
pub fn init_flags(plane: &mut Plane<BoundaryFinalized>, area: Rect) {
    for id in plane.tiles_in(area) {
        let tile = plane.tile(id);
        let flags = if tile.is_solid() {
            BoundaryFinalized::ALL
        } else {
            border_flags(tile.rect(), area)
        };
        *plane.client_mut(id) = flags;
    }
}

/// Flags a space tile must carry because its top or bottom is an area edge.
pub fn border_flags(r: Rect, area: Rect) -> BoundaryFinalized {
    let mut flags = BoundaryFinalized::NONE;
    mark_border(&mut flags, r, area);
    flags
}

pub fn mark_border(flags: &mut BoundaryFinalized, r: Rect, area: Rect) {
    if r.top() == area.top() {
        flags.mark_north();
    }
    if r.bottom() == area.bottom() {
        flags.mark_south();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chandec_common::geom::point::Point;
    use chandec_common::tiles::{Body, Corner};

    #[test]
    fn border_and_solid_tiles_are_marked() {
        let area = Rect::from_coords(0, 0, 100, 100);
        let mut plane: Plane<BoundaryFinalized> = Plane::new(area);
        plane.paint(Rect::from_coords(40, 40, 60, 60), Body::Solid);
        init_flags(&mut plane, area);

        for id in plane.ids() {
            let t = plane.tile(id);
            let f = t.client;
            if t.is_solid() {
                assert_eq!(f, BoundaryFinalized::ALL);
                continue;
            }
            assert_eq!(f.is_marked(Corner::NW), t.top() == 100);
            assert_eq!(f.is_marked(Corner::NE), t.top() == 100);
            assert_eq!(f.is_marked(Corner::SW), t.bottom() == 0);
            assert_eq!(f.is_marked(Corner::SE), t.bottom() == 0);
        }
    }

    #[test]
    fn stale_marks_are_cleared() {
        let area = Rect::from_coords(0, 0, 50, 50);
        let mut plane: Plane<BoundaryFinalized> = Plane::new(area);
        plane.paint(Rect::from_coords(10, 10, 20, 20), Body::Solid);
        let mid = plane.find(Point::new(0, 15)).unwrap();
        *plane.client_mut(mid) = BoundaryFinalized::ALL;

        init_flags(&mut plane, area);
        assert_eq!(*plane.client(mid), BoundaryFinalized::NONE);
    }
}
