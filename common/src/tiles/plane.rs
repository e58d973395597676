use crate::db::indices::TileId;
use crate::geom::coord::Coord;
use crate::geom::point::Point;
use crate::geom::rect::Rect;
use std::cmp::Reverse;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Body {
    #[default]
    Space,
    Solid,
}

#[derive(Clone, Debug)]
pub struct Tile<C> {
    pub(crate) rect: Rect,
    pub(crate) body: Body,
    pub client: C,
    // Corner stitches. `None` means the edge lies on the plane boundary.
    pub(crate) bl: Option<TileId>, // left neighbor touching the bottom edge
    pub(crate) lb: Option<TileId>, // bottom neighbor touching the left edge
    pub(crate) tr: Option<TileId>, // right neighbor touching the top edge
    pub(crate) rt: Option<TileId>, // top neighbor touching the right edge
}

impl<C: Default> Tile<C> {
    pub(crate) fn new(rect: Rect, body: Body) -> Self {
        Self {
            rect,
            body,
            client: C::default(),
            bl: None,
            lb: None,
            tr: None,
            rt: None,
        }
    }
}

impl<C> Tile<C> {
    pub fn rect(&self) -> Rect {
        self.rect
    }
    pub fn body(&self) -> Body {
        self.body
    }
    pub fn left(&self) -> Coord {
        self.rect.min.x
    }
    pub fn bottom(&self) -> Coord {
        self.rect.min.y
    }
    pub fn right(&self) -> Coord {
        self.rect.max.x
    }
    pub fn top(&self) -> Coord {
        self.rect.max.y
    }
    pub fn is_space(&self) -> bool {
        self.body == Body::Space
    }
    pub fn is_solid(&self) -> bool {
        self.body == Body::Solid
    }
}

/// A corner-stitched partition of `bounds` into space and solid rectangles.
///
/// Tiles live in an arena and refer to each other through [`TileId`]s, so a
/// split or join only rewrites the stitches of the tiles along the affected
/// edges. Ids of joined-away tiles are recycled by later splits.
#[derive(Clone, Debug)]
pub struct Plane<C> {
    pub(crate) bounds: Rect,
    pub(crate) tiles: Vec<Option<Tile<C>>>,
    pub(crate) free: Vec<TileId>,
    pub(crate) hint: TileId,
}

impl<C: Clone + Default> Plane<C> {
    pub fn new(bounds: Rect) -> Self {
        assert!(!bounds.is_empty(), "plane bounds {:?} have no area", bounds);
        let mut plane = Self {
            bounds,
            tiles: Vec::with_capacity(64),
            free: Vec::new(),
            hint: TileId::new(0),
        };
        plane.hint = plane.alloc(Tile::new(bounds, Body::Space));
        plane
    }

    /// Back to a single space tile covering the bounds.
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.free.clear();
        self.hint = self.alloc(Tile::new(self.bounds, Body::Space));
    }

    pub fn reset(&mut self, bounds: Rect) {
        assert!(!bounds.is_empty(), "plane bounds {:?} have no area", bounds);
        self.bounds = bounds;
        self.clear();
    }
}

impl<C> Plane<C> {
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub(crate) fn alloc(&mut self, tile: Tile<C>) -> TileId {
        match self.free.pop() {
            Some(id) => {
                self.tiles[id.index()] = Some(tile);
                id
            }
            None => {
                let id = TileId::new(self.tiles.len());
                self.tiles.push(Some(tile));
                id
            }
        }
    }

    pub(crate) fn retire(&mut self, id: TileId, successor: TileId) {
        self.tiles[id.index()] = None;
        self.free.push(id);
        if self.hint == id {
            self.hint = successor;
        }
    }

    pub fn is_live(&self, id: TileId) -> bool {
        matches!(self.tiles.get(id.index()), Some(Some(_)))
    }

    pub fn tile(&self, id: TileId) -> &Tile<C> {
        match self.tiles.get(id.index()) {
            Some(Some(tile)) => tile,
            _ => panic!("{:?} is not a live tile", id),
        }
    }

    pub(crate) fn tile_mut(&mut self, id: TileId) -> &mut Tile<C> {
        match self.tiles.get_mut(id.index()) {
            Some(Some(tile)) => tile,
            _ => panic!("{:?} is not a live tile", id),
        }
    }

    pub fn client(&self, id: TileId) -> &C {
        &self.tile(id).client
    }

    pub fn client_mut(&mut self, id: TileId) -> &mut C {
        &mut self.tile_mut(id).client
    }

    pub fn len(&self) -> usize {
        self.tiles.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_some())
            .map(|(i, _)| TileId::new(i))
    }

    /// BL: the left neighbor touching the bottom edge.
    pub fn left_bottom(&self, id: TileId) -> Option<TileId> {
        self.tile(id).bl
    }

    /// LB: the bottom neighbor touching the left edge.
    pub fn bottom_left(&self, id: TileId) -> Option<TileId> {
        self.tile(id).lb
    }

    /// RT: the top neighbor touching the right edge.
    pub fn top_right(&self, id: TileId) -> Option<TileId> {
        self.tile(id).rt
    }

    /// TR: the right neighbor touching the top edge.
    pub fn right_top(&self, id: TileId) -> Option<TileId> {
        self.tile(id).tr
    }

    pub fn find(&self, p: Point<Coord>) -> Option<TileId> {
        self.find_from(self.hint, p)
    }

    /// Point location by walking stitches from `start`. Returns `None` for
    /// points outside the plane bounds.
    pub fn find_from(&self, start: TileId, p: Point<Coord>) -> Option<TileId> {
        if !self.bounds.contains(p) {
            return None;
        }
        let mut tp = if self.is_live(start) { start } else { self.hint };

        if p.y < self.tile(tp).bottom() {
            while p.y < self.tile(tp).bottom() {
                tp = follow(self.tile(tp).lb);
            }
        } else {
            while p.y >= self.tile(tp).top() {
                tp = follow(self.tile(tp).rt);
            }
        }

        if p.x < self.tile(tp).left() {
            loop {
                while p.x < self.tile(tp).left() {
                    tp = follow(self.tile(tp).bl);
                }
                if p.y < self.tile(tp).top() {
                    break;
                }
                while p.y >= self.tile(tp).top() {
                    tp = follow(self.tile(tp).rt);
                }
                if p.x >= self.tile(tp).left() {
                    break;
                }
            }
        } else {
            while p.x >= self.tile(tp).right() {
                while p.x >= self.tile(tp).right() {
                    tp = follow(self.tile(tp).tr);
                }
                if p.y >= self.tile(tp).bottom() {
                    break;
                }
                while p.y < self.tile(tp).bottom() {
                    tp = follow(self.tile(tp).lb);
                }
            }
        }
        Some(tp)
    }

    /// Live tiles overlapping `area`, topmost first and left to right within
    /// a row.
    pub fn tiles_in(&self, area: Rect) -> Vec<TileId> {
        let mut ids: Vec<TileId> = self
            .ids()
            .filter(|&id| self.tile(id).rect.overlaps(&area))
            .collect();
        ids.sort_by_key(|&id| {
            let t = self.tile(id);
            (Reverse(t.top()), t.left())
        });
        ids
    }

    /// Checks that the tiles exactly cover the bounds and that every stitch
    /// points at the neighbor geometry says it should.
    pub fn validate(&self) -> Result<(), String> {
        let mut covered: i128 = 0;
        let mut errors = Vec::new();
        let locate = |p: Point<Coord>| -> Option<TileId> {
            if !self.bounds.contains(p) {
                return None;
            }
            self.ids().find(|&id| self.tile(id).rect.contains(p))
        };

        for id in self.ids() {
            let t = self.tile(id);
            if t.rect.is_empty() || !self.bounds.contains_rect(&t.rect) {
                errors.push(format!("{:?} has bad extent {:?}", id, t.rect));
                continue;
            }
            covered += t.rect.area();

            let expected = [
                ("bl", t.bl, Point::new(t.left() - 1, t.bottom())),
                ("lb", t.lb, Point::new(t.left(), t.bottom() - 1)),
                ("tr", t.tr, Point::new(t.right(), t.top() - 1)),
                ("rt", t.rt, Point::new(t.right() - 1, t.top())),
            ];
            for (name, actual, probe) in expected {
                let want = locate(probe);
                if actual != want {
                    errors.push(format!(
                        "{:?} {:?}: {} stitch is {:?}, expected {:?}",
                        id, t.rect, name, actual, want
                    ));
                }
            }
        }

        if covered != self.bounds.area() {
            errors.push(format!(
                "tiles cover {} of {} units",
                covered,
                self.bounds.area()
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("; "))
        }
    }
}

fn follow(link: Option<TileId>) -> TileId {
    match link {
        Some(id) => id,
        None => panic!("corner stitch walk left the plane"),
    }
}
