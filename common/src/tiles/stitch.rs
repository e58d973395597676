use super::plane::{Plane, Tile};
use crate::db::indices::TileId;
use crate::geom::coord::Coord;
use crate::geom::rect::Rect;

impl<C: Clone> Plane<C> {
    /// Splits `id` at `x`. `id` keeps the left part; the returned
    /// tile is the right part with the same body and a copy of the client.
    pub fn split_x(&mut self, id: TileId, x: Coord) -> TileId {
        let old = self.tile(id).clone();
        assert!(
            old.left() < x && x < old.right(),
            "split_x at {} outside tile {:?}",
            x,
            old.rect
        );

        let new = self.alloc(Tile {
            rect: Rect::from_coords(x, old.bottom(), old.right(), old.top()),
            body: old.body,
            client: old.client.clone(),
            bl: Some(id),
            lb: None,
            tr: old.tr,
            rt: old.rt,
        });

        // Right edge
        let mut tp = old.tr;
        while let Some(t) = tp {
            if self.tile(t).bl != Some(id) {
                break;
            }
            self.tile_mut(t).bl = Some(new);
            tp = self.tile(t).lb;
        }
        {
            let tile = self.tile_mut(id);
            tile.tr = Some(new);
            tile.rect.max.x = x;
        }

        // Top edge
        let mut tp = old.rt;
        while let Some(t) = tp {
            if self.tile(t).left() < x {
                break;
            }
            self.tile_mut(t).lb = Some(new);
            tp = self.tile(t).bl;
        }
        self.tile_mut(id).rt = tp;

        // Bottom edge
        let mut tp = old.lb;
        while let Some(t) = tp {
            if self.tile(t).right() > x {
                break;
            }
            tp = self.tile(t).tr;
        }
        self.tile_mut(new).lb = tp;
        while let Some(t) = tp {
            if self.tile(t).rt != Some(id) {
                break;
            }
            self.tile_mut(t).rt = Some(new);
            tp = self.tile(t).tr;
        }

        new
    }

    /// Splits `id` at `y`. `id` keeps the bottom part; the returned
    /// tile is the top part.
    pub fn split_y(&mut self, id: TileId, y: Coord) -> TileId {
        let old = self.tile(id).clone();
        assert!(
            old.bottom() < y && y < old.top(),
            "split_y at {} outside tile {:?}",
            y,
            old.rect
        );

        let new = self.alloc(Tile {
            rect: Rect::from_coords(old.left(), y, old.right(), old.top()),
            body: old.body,
            client: old.client.clone(),
            bl: None,
            lb: Some(id),
            tr: old.tr,
            rt: old.rt,
        });

        // Top edge
        let mut tp = old.rt;
        while let Some(t) = tp {
            if self.tile(t).lb != Some(id) {
                break;
            }
            self.tile_mut(t).lb = Some(new);
            tp = self.tile(t).bl;
        }
        {
            let tile = self.tile_mut(id);
            tile.rt = Some(new);
            tile.rect.max.y = y;
        }

        // Right edge
        let mut tp = old.tr;
        while let Some(t) = tp {
            if self.tile(t).bottom() < y {
                break;
            }
            self.tile_mut(t).bl = Some(new);
            tp = self.tile(t).lb;
        }
        self.tile_mut(id).tr = tp;

        // Left edge
        let mut tp = old.bl;
        while let Some(t) = tp {
            if self.tile(t).top() > y {
                break;
            }
            tp = self.tile(t).rt;
        }
        self.tile_mut(new).bl = tp;
        while let Some(t) = tp {
            if self.tile(t).tr != Some(id) {
                break;
            }
            self.tile_mut(t).tr = Some(new);
            tp = self.tile(t).rt;
        }

        new
    }

    /// Joins two horizontally adjacent tiles with identical top and bottom.
    /// `keep` survives with the combined extent; `absorb` is retired.
    pub fn join_x(&mut self, keep: TileId, absorb: TileId) {
        let k = self.tile(keep).rect;
        let a = self.tile(absorb).clone();
        assert!(
            k.bottom() == a.bottom()
                && k.top() == a.top()
                && (k.right() == a.left() || a.right() == k.left()),
            "join_x of non-adjacent tiles {:?} and {:?}",
            k,
            a.rect
        );

        let mut tp = a.rt;
        while let Some(t) = tp {
            if self.tile(t).lb != Some(absorb) {
                break;
            }
            self.tile_mut(t).lb = Some(keep);
            tp = self.tile(t).bl;
        }
        let mut tp = a.lb;
        while let Some(t) = tp {
            if self.tile(t).rt != Some(absorb) {
                break;
            }
            self.tile_mut(t).rt = Some(keep);
            tp = self.tile(t).tr;
        }

        if k.left() < a.left() {
            let mut tp = a.tr;
            while let Some(t) = tp {
                if self.tile(t).bl != Some(absorb) {
                    break;
                }
                self.tile_mut(t).bl = Some(keep);
                tp = self.tile(t).lb;
            }
            let tile = self.tile_mut(keep);
            tile.tr = a.tr;
            tile.rt = a.rt;
            tile.rect.max.x = a.right();
        } else {
            let mut tp = a.bl;
            while let Some(t) = tp {
                if self.tile(t).tr != Some(absorb) {
                    break;
                }
                self.tile_mut(t).tr = Some(keep);
                tp = self.tile(t).rt;
            }
            let tile = self.tile_mut(keep);
            tile.bl = a.bl;
            tile.lb = a.lb;
            tile.rect.min.x = a.left();
        }

        self.retire(absorb, keep);
    }

    /// Joins two vertically adjacent tiles with identical left and right.
    /// `keep` survives with the combined extent; `absorb` is retired.
    pub fn join_y(&mut self, keep: TileId, absorb: TileId) {
        let k = self.tile(keep).rect;
        let a = self.tile(absorb).clone();
        assert!(
            k.left() == a.left()
                && k.right() == a.right()
                && (k.top() == a.bottom() || a.top() == k.bottom()),
            "join_y of non-adjacent tiles {:?} and {:?}",
            k,
            a.rect
        );

        let mut tp = a.tr;
        while let Some(t) = tp {
            if self.tile(t).bl != Some(absorb) {
                break;
            }
            self.tile_mut(t).bl = Some(keep);
            tp = self.tile(t).lb;
        }
        let mut tp = a.bl;
        while let Some(t) = tp {
            if self.tile(t).tr != Some(absorb) {
                break;
            }
            self.tile_mut(t).tr = Some(keep);
            tp = self.tile(t).rt;
        }

        if k.bottom() < a.bottom() {
            let mut tp = a.rt;
            while let Some(t) = tp {
                if self.tile(t).lb != Some(absorb) {
                    break;
                }
                self.tile_mut(t).lb = Some(keep);
                tp = self.tile(t).bl;
            }
            let tile = self.tile_mut(keep);
            tile.rt = a.rt;
            tile.tr = a.tr;
            tile.rect.max.y = a.top();
        } else {
            let mut tp = a.lb;
            while let Some(t) = tp {
                if self.tile(t).rt != Some(absorb) {
                    break;
                }
                self.tile_mut(t).rt = Some(keep);
                tp = self.tile(t).tr;
            }
            let tile = self.tile_mut(keep);
            tile.lb = a.lb;
            tile.bl = a.bl;
            tile.rect.min.y = a.bottom();
        }

        self.retire(absorb, keep);
    }
}
