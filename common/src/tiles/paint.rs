use super::plane::{Body, Plane};
use crate::db::indices::TileId;
use crate::geom::coord::Coord;
use crate::geom::rect::Rect;

impl<C: Clone + Default> Plane<C> {
    /// Sets the body of everything inside `area` (clipped to the bounds) and
    /// restores maximal horizontal strips: no two horizontally adjacent tiles
    /// share a body, and vertically adjacent tiles of the same body and span
    /// are joined. Repainted tiles get a fresh client record.
    pub fn paint(&mut self, area: Rect, body: Body) {
        let area = area.clip(&self.bounds);
        if area.is_empty() {
            return;
        }

        let mut touched = Vec::new();
        for id in self.tiles_in(area) {
            if self.tile(id).body == body {
                touched.push(id);
                continue;
            }
            let mut t = id;
            if self.tile(t).top() > area.top() {
                touched.push(self.split_y(t, area.top()));
            }
            if self.tile(t).bottom() < area.bottom() {
                let upper = self.split_y(t, area.bottom());
                touched.push(t);
                t = upper;
            }
            if self.tile(t).left() < area.left() {
                let right = self.split_x(t, area.left());
                touched.push(t);
                t = right;
            }
            if self.tile(t).right() > area.right() {
                touched.push(self.split_x(t, area.right()));
            }
            let tile = self.tile_mut(t);
            tile.body = body;
            tile.client = C::default();
            touched.push(t);
        }

        self.restore_strips(touched);
    }

    fn restore_strips(&mut self, mut pending: Vec<TileId>) {
        let mut settled = Vec::with_capacity(pending.len());
        while let Some(id) = pending.pop() {
            if !self.is_live(id) {
                continue;
            }
            match self.same_body_side(id) {
                Some(other) => pending.extend(self.splice(id, other)),
                None => settled.push(id),
            }
        }

        while let Some(id) = settled.pop() {
            if !self.is_live(id) {
                continue;
            }
            if let Some(other) = self.same_span_stack(id) {
                self.join_y(id, other);
                settled.push(id);
            }
        }
    }

    fn same_body_side(&self, id: TileId) -> Option<TileId> {
        let t = self.tile(id);

        let mut tp = t.tr;
        while let Some(n) = tp {
            let nt = self.tile(n);
            if nt.top() <= t.bottom() {
                break;
            }
            if nt.body == t.body {
                return Some(n);
            }
            tp = nt.lb;
        }

        let mut tp = t.bl;
        while let Some(n) = tp {
            let nt = self.tile(n);
            if nt.bottom() >= t.top() {
                break;
            }
            if nt.body == t.body {
                return Some(n);
            }
            tp = nt.rt;
        }
        None
    }

    fn same_span_stack(&self, id: TileId) -> Option<TileId> {
        let t = self.tile(id);
        [t.rt, t.lb].into_iter().flatten().find(|&n| {
            let nt = self.tile(n);
            nt.body == t.body && nt.left() == t.left() && nt.right() == t.right()
        })
    }

    /// Cuts `a` and `b` down to their common vertical band and joins the two
    /// band pieces. Returns every tile whose extent changed.
    fn splice(&mut self, a: TileId, b: TileId) -> Vec<TileId> {
        let lo = self.tile(a).bottom().max(self.tile(b).bottom());
        let hi = self.tile(a).top().min(self.tile(b).top());
        let mut changed = Vec::new();
        let a_mid = self.isolate_band(a, lo, hi, &mut changed);
        let b_mid = self.isolate_band(b, lo, hi, &mut changed);
        self.join_x(a_mid, b_mid);
        changed.push(a_mid);
        changed
    }

    fn isolate_band(
        &mut self,
        id: TileId,
        lo: Coord,
        hi: Coord,
        changed: &mut Vec<TileId>,
    ) -> TileId {
        let mut t = id;
        if self.tile(t).top() > hi {
            changed.push(self.split_y(t, hi));
        }
        if self.tile(t).bottom() < lo {
            let upper = self.split_y(t, lo);
            changed.push(t);
            t = upper;
        }
        t
    }
}
