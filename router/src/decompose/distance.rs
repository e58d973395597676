use super::corner::UsableCorner;
use chandec_common::db::indices::TileId;
use chandec_common::geom::coord::Coord;
use chandec_common::geom::point::Point;
use chandec_common::geom::rect::Rect;
use chandec_common::tiles::{BoundaryFinalized, Corner, Plane};

/// Length of the horizontal boundary a corner could project: up to the
/// nearer of the far and near tiles' outer edges.
pub fn horizontal_distance(plane: &Plane<BoundaryFinalized>, c: &UsableCorner) -> Coord {
    let far = plane.tile(c.far);
    let near = plane.tile(c.near);
    let x = c.point.x;
    if c.kind.is_east() {
        far.right().min(near.right()) - x
    } else {
        x - far.left().max(near.left())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerticalRun {
    pub distance: Coord,
    /// Lowest space tile the boundary would cut.
    pub bottom: TileId,
}

/// How the next tile of a vertical walk sits against the current one.
///
/// ```text
///  __|_n_|__   |___c___|   __|_n__|   |__ c|__   |__n|__   __|_c__|
///  |   c   |     | n |     |   c|       | n  |     |c  |   |   n|
///  NestedAbove NestedBelow OverhangAbove OverhangBelow FlushAbove FlushBelow
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepCase {
    NestedAbove,
    NestedBelow,
    OverhangAbove,
    OverhangBelow,
    FlushAbove,
    FlushBelow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Current,
    Next,
}

impl StepCase {
    pub fn classify(current: Rect, next: Rect, up: bool) -> Self {
        match (
            current.left() < next.left(),
            current.right() > next.right(),
            up,
        ) {
            (true, true, true) => StepCase::NestedAbove,
            (true, true, false) => StepCase::NestedBelow,
            (true, false, true) => StepCase::OverhangAbove,
            (true, false, false) => StepCase::OverhangBelow,
            (false, _, true) => StepCase::FlushAbove,
            (false, _, false) => StepCase::FlushBelow,
        }
    }

    /// The quadrant whose finalized edge stops the walk.
    fn probe(self) -> (Side, Corner) {
        match self {
            StepCase::NestedAbove => (Side::Next, Corner::SW),
            StepCase::NestedBelow => (Side::Next, Corner::NW),
            StepCase::OverhangAbove => (Side::Current, Corner::NE),
            StepCase::OverhangBelow => (Side::Current, Corner::SE),
            StepCase::FlushAbove => (Side::Current, Corner::NW),
            StepCase::FlushBelow => (Side::Current, Corner::SW),
        }
    }
}

/// Walks space tiles from the far tile away from the corner until the
/// boundary would hit the area edge, a solid tile, an existing vertical
/// boundary at the corner's x, or a finalized horizontal edge.
pub fn vertical_run(
    plane: &Plane<BoundaryFinalized>,
    area: Rect,
    c: &UsableCorner,
) -> VerticalRun {
    let up = c.kind.is_north();
    let x = c.point.x;
    let mut current = c.far;

    loop {
        let cur = plane.tile(current);
        let probe_y = if up {
            if cur.top() >= area.top() {
                break;
            }
            cur.top()
        } else {
            if cur.bottom() <= area.bottom() {
                break;
            }
            cur.bottom() - 1
        };

        let Some(next) = plane.find_from(current, Point::new(x, probe_y)) else {
            break;
        };
        let nt = plane.tile(next);
        if nt.is_solid() || nt.left() == x || nt.right() == x {
            break;
        }

        let case = StepCase::classify(cur.rect(), nt.rect(), up);
        let (side, corner) = case.probe();
        let flags = match side {
            Side::Current => cur.client,
            Side::Next => nt.client,
        };
        if flags.is_marked(corner) {
            log::trace!("walk from {:?} stops at {:?} ({:?})", c.point, case, corner);
            break;
        }
        current = next;
    }

    let end = plane.tile(current);
    if up {
        VerticalRun {
            distance: end.top() - c.point.y,
            bottom: c.far,
        }
    } else {
        VerticalRun {
            distance: c.point.y - end.bottom(),
            bottom: current,
        }
    }
}
