use super::corner::UsableCorner;
use super::distance::{VerticalRun, horizontal_distance, vertical_run};
use super::flags::mark_border;
use chandec_common::db::indices::TileId;
use chandec_common::geom::coord::Coord;
use chandec_common::geom::point::Point;
use chandec_common::geom::rect::Rect;
use chandec_common::tiles::{BoundaryFinalized, Corner, Plane};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    Horizontal,
    Vertical,
}

impl Boundary {
    /// The shorter extension wins; ties go vertical.
    pub fn choose(horizontal: Coord, vertical: Coord) -> Self {
        if horizontal < vertical {
            Boundary::Horizontal
        } else {
            Boundary::Vertical
        }
    }
}

/// Projects a boundary from `c` and updates the plane to match: a horizontal
/// boundary only finalizes flags, a vertical one splits the run of space
/// tiles it crosses.
pub fn mark_channel(
    plane: &mut Plane<BoundaryFinalized>,
    area: Rect,
    c: &UsableCorner,
) -> Boundary {
    let h = horizontal_distance(plane, c);
    let run = vertical_run(plane, area, c);
    let choice = Boundary::choose(h, run.distance);
    log::trace!(
        "{:?} corner at ({}, {}): h={} v={} -> {:?}",
        c.kind,
        c.point.x,
        c.point.y,
        h,
        run.distance,
        choice
    );

    match choice {
        Boundary::Horizontal => mark_horizontal(plane, c),
        Boundary::Vertical => split_vertical(plane, area, c, run),
    }
    choice
}

fn mark_horizontal(plane: &mut Plane<BoundaryFinalized>, c: &UsableCorner) {
    let x = c.point.x;
    let (far_reach, near_reach) = {
        let far = plane.tile(c.far);
        let near = plane.tile(c.near);
        if c.kind.is_east() {
            (far.right() - x, near.right() - x)
        } else {
            (x - far.left(), x - near.left())
        }
    };

    plane.client_mut(c.near).mark(c.kind.mirror_x());
    if near_reach <= far_reach {
        plane.client_mut(c.near).mark(c.kind);
    }
    if far_reach <= near_reach {
        plane.client_mut(c.far).mark(c.kind.mirror_y());
    }
}

fn split_vertical(
    plane: &mut Plane<BoundaryFinalized>,
    area: Rect,
    c: &UsableCorner,
    run: VerticalRun,
) {
    let x = c.point.x;
    let last_y = if c.kind.is_north() {
        c.point.y + run.distance
    } else {
        c.point.y
    };

    let mut tile = run.bottom;
    let mut row_top;
    loop {
        let t = plane.tile(tile);
        assert!(t.is_space(), "channel split of solid tile {:?}", t.rect());
        row_top = t.top();

        let new = plane.split_x(tile, x);
        carry_split_flags(plane, area, tile, new);

        // Merges may retire either half, so the left one is found again.
        merge_below(plane, area, new);
        if let Some(left) = plane.find(Point::new(x - 1, row_top - 1)) {
            merge_below(plane, area, left);
        }

        if row_top >= last_y {
            break;
        }
        tile = match plane.find(Point::new(x, row_top)) {
            Some(next) => next,
            None => panic!("channel split at x={} left the plane at y={}", x, row_top),
        };
    }

    for px in [x, x - 1] {
        if let Some(id) = plane.find(Point::new(px, row_top - 1)) {
            merge_above(plane, area, id);
        }
    }
}

/// The right half keeps the old tile's east quadrants and the left half its
/// west ones; the new edge between them starts out unfinalized.
fn carry_split_flags(
    plane: &mut Plane<BoundaryFinalized>,
    area: Rect,
    old: TileId,
    new: TileId,
) {
    let before = *plane.client(old);

    let mut right = BoundaryFinalized::NONE;
    right.set(Corner::NE, before.is_marked(Corner::NE));
    right.set(Corner::SE, before.is_marked(Corner::SE));
    mark_border(&mut right, plane.tile(new).rect(), area);
    *plane.client_mut(new) = right;

    let mut left = before;
    left.clear(Corner::NE);
    left.clear(Corner::SE);
    mark_border(&mut left, plane.tile(old).rect(), area);
    *plane.client_mut(old) = left;
}

fn merge_below(plane: &mut Plane<BoundaryFinalized>, area: Rect, id: TileId) {
    if plane.tile(id).bottom() <= area.bottom() {
        return;
    }
    if let Some(down) = plane.bottom_left(id) {
        merge(plane, area, id, down);
    }
}

fn merge_above(plane: &mut Plane<BoundaryFinalized>, area: Rect, id: TileId) {
    if plane.tile(id).top() >= area.top() {
        return;
    }
    if let Some(up) = plane.top_right(id) {
        merge(plane, area, up, id);
    }
}

/// Joins `down` into `up` when both are space tiles with the same left and
/// right edges, then tries to widen the result into equally tall space
/// neighbors. `up` survives.
pub fn merge(plane: &mut Plane<BoundaryFinalized>, area: Rect, up: TileId, down: TileId) {
    let u = plane.tile(up);
    let d = plane.tile(down);
    if u.is_solid() || d.is_solid() {
        return;
    }
    if u.left() != d.left() || u.right() != d.right() {
        return;
    }
    assert!(
        d.bottom() >= area.bottom() && u.top() <= area.top(),
        "merge of {:?} and {:?} outside the routing area {:?}",
        u.rect(),
        d.rect(),
        area
    );

    let below = d.client;
    let flags = plane.client_mut(up);
    flags.set(Corner::SW, below.is_marked(Corner::SW));
    flags.set(Corner::SE, below.is_marked(Corner::SE));
    plane.join_y(up, down);

    let mut widened = false;
    for west in [true, false] {
        let side = if west {
            plane.left_bottom(up)
        } else {
            plane.right_top(up)
        };
        if let Some(side) = side
            && can_join_sideways(plane, area, up, side, west)
        {
            let outer = plane.tile(side).client;
            let (hi, lo) = if west {
                (Corner::NW, Corner::SW)
            } else {
                (Corner::NE, Corner::SE)
            };
            let flags = plane.client_mut(up);
            flags.set(hi, outer.is_marked(hi));
            flags.set(lo, outer.is_marked(lo));
            plane.join_x(up, side);
            widened = true;
        }
    }

    // A wider tile may now line up with the tiles above or below it.
    if widened {
        merge_below(plane, area, up);
        merge_above(plane, area, up);
    }
}

fn can_join_sideways(
    plane: &Plane<BoundaryFinalized>,
    area: Rect,
    id: TileId,
    side: TileId,
    west: bool,
) -> bool {
    let t = plane.tile(id);
    let s = plane.tile(side);
    if s.is_solid() || s.top() != t.top() || s.bottom() != t.bottom() {
        return false;
    }
    if (west && s.left() < area.left()) || (!west && s.right() > area.right()) {
        return false;
    }
    // An edge ending at a solid corner is the boundary projected from it.
    let x = if west { t.left() } else { t.right() };
    !solid_corner_at(plane, x, t.bottom(), false) && !solid_corner_at(plane, x, t.top(), true)
}

/// Whether a solid tile lying below (or above) the line `y` has a corner at
/// `(x, y)`.
fn solid_corner_at(plane: &Plane<BoundaryFinalized>, x: Coord, y: Coord, above: bool) -> bool {
    let probe_y = if above { y } else { y - 1 };
    [x - 1, x]
        .into_iter()
        .filter_map(|px| plane.find(Point::new(px, probe_y)))
        .any(|id| {
            let t = plane.tile(id);
            let touches = if above {
                t.bottom() == y
            } else {
                t.top() == y
            };
            t.is_solid() && touches && (t.left() == x || t.right() == x)
        })
}
