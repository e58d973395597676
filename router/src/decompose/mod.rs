pub mod corner;
pub mod distance;
pub mod flags;
pub mod marker;
pub mod silhouette;
pub mod verify;

use crate::channel_map::ChannelMap;
use crate::grid::RouteGrid;
use chandec_common::db::core::{LayoutDb, Netlist};
use chandec_common::db::indices::{DefId, TileId};
use chandec_common::geom::point::Point;
use chandec_common::geom::rect::Rect;
use chandec_common::tiles::{Body, BoundaryFinalized, Plane};
use chandec_common::util::config::DecomposeConfig;
use chandec_common::util::profiler::ScopedTimer;
use corner::{corner_points, usable_corner};
use marker::{Boundary, mark_channel};

/// Internal cell holding the channel planes of the last run.
pub const CHANNEL_DEF: &str = "__CHANNEL__";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecomposeStats {
    pub corners: usize,
    pub usable: usize,
    pub horizontal: usize,
    pub vertical: usize,
}

/// Decomposes the empty space of `target` inside `area` into channels.
///
/// `area` is grown to the routing grid first (half a pitch off the grid
/// lines) and the caller sees the normalized rectangle. Returns the internal
/// cell whose result plane holds the channels, or `None` when the area has
/// no extent. `channels` is emptied at the start of every run.
pub fn decompose<H>(
    db: &mut LayoutDb,
    target: DefId,
    area: &mut Rect,
    netlist: Option<&Netlist>,
    config: &DecomposeConfig,
    channels: &mut ChannelMap<H>,
) -> Option<DefId> {
    let _timer = ScopedTimer::new("Channel Decomposition");
    channels.reset();

    let grid = RouteGrid::from_config(config);
    *area = grid.normalize(*area);
    if area.is_empty() {
        log::warn!("Routing area {:?} is too small to decompose", area);
        return None;
    }
    if let Some(netlist) = netlist {
        log::debug!(
            "Decomposing for netlist '{}' ({} nets)",
            netlist.name,
            netlist.nets.len()
        );
    }

    let solids = silhouette::silhouette(
        db,
        target,
        *area,
        &grid,
        config.subcell_sep_up,
        config.subcell_sep_down,
    );
    log::debug!(
        "Painting {} sub-cell footprints of '{}'",
        solids.len(),
        db.def(target).name
    );

    let def = find_channel_def(db);
    let _pause = db.undo.pause();

    let planes = db.reset_channel_planes(def, *area);
    for r in &solids {
        planes.paint(*r, Body::Solid);
    }
    let stats = decompose_planes(&planes.check, &mut planes.result, *area);
    let count = channels_in(&planes.result, *area).len();

    db.def_mut(def).recompute_bbox();
    log::info!(
        "Decomposed {:?} into {} channels: {} corners, {} usable, {} horizontal, {} vertical",
        area,
        count,
        stats.corners,
        stats.usable,
        stats.horizontal,
        stats.vertical
    );
    Some(def)
}

/// Front end taking the netlist by name. `"-"` stands for the netlist named
/// after `target`; a missing or empty netlist is reported and the run goes
/// ahead without one.
pub fn decompose_named<H>(
    db: &mut LayoutDb,
    target: DefId,
    area: &mut Rect,
    name: Option<&str>,
    config: &DecomposeConfig,
    channels: &mut ChannelMap<H>,
) -> Option<DefId> {
    let netlist = name.and_then(|name| {
        let name = if name == "-" {
            db.def(target).name.as_str()
        } else {
            name
        };
        match db.netlist(name) {
            Some(n) if !n.nets.is_empty() => Some(n.clone()),
            _ => {
                log::warn!("No nets in netlist '{}'", name);
                None
            }
        }
    });
    decompose(db, target, area, netlist.as_ref(), config, channels)
}

/// Runs the corner-extension pass over an already painted pair of planes.
/// `check` is only read; `result` ends up holding the channels.
pub fn decompose_planes(
    check: &Plane<()>,
    result: &mut Plane<BoundaryFinalized>,
    area: Rect,
) -> DecomposeStats {
    split_to_area(result, area);
    flags::init_flags(result, area);

    let mut stats = DecomposeStats::default();
    for id in check.tiles_in(area) {
        let tile = check.tile(id);
        if !tile.is_solid() {
            continue;
        }
        for (p, kind) in corner_points(tile.rect()) {
            stats.corners += 1;
            let Some(c) = usable_corner(result, area, p, kind) else {
                continue;
            };
            stats.usable += 1;
            match mark_channel(result, area, &c) {
                Boundary::Horizontal => stats.horizontal += 1,
                Boundary::Vertical => stats.vertical += 1,
            }
        }
    }
    stats
}

/// Cuts the tiles crossing the edges of `area` so every tile lies either
/// inside or outside it. Solids are assumed to be clipped to the area, so
/// only space tiles can cross an edge.
pub fn split_to_area<C: Clone>(plane: &mut Plane<C>, area: Rect) {
    // Above and below the area the plane is one strip wide.
    if let Some(id) = plane.find(Point::new(area.left(), area.top())) {
        let t = plane.tile(id);
        if t.bottom() < area.top() && t.top() > area.top() {
            plane.split_y(id, area.top());
        }
    }
    if let Some(id) = plane.find(Point::new(area.left(), area.bottom() - 1)) {
        let t = plane.tile(id);
        if t.bottom() < area.bottom() && t.top() > area.bottom() {
            plane.split_y(id, area.bottom());
        }
    }

    for x in [area.left(), area.right()] {
        let mut y = area.bottom();
        while y < area.top() {
            let Some(mut id) = plane.find(Point::new(x, y)) else {
                break;
            };
            let t = plane.tile(id);
            if t.left() < x && t.right() > x {
                id = plane.split_x(id, x);
            }
            y = plane.tile(id).top();
        }
    }
}

/// Space tiles of `result` lying inside `area`: the channels of a run.
pub fn channels_in(result: &Plane<BoundaryFinalized>, area: Rect) -> Vec<(TileId, Rect)> {
    result
        .tiles_in(area)
        .into_iter()
        .filter_map(|id| {
            let t = result.tile(id);
            (t.is_space() && area.contains_rect(&t.rect())).then(|| (id, t.rect()))
        })
        .collect()
}

/// Looks up the internal channel cell, creating it on first use.
pub fn find_channel_def(db: &mut LayoutDb) -> DefId {
    let id = db.def_or_create(CHANNEL_DEF);
    db.def_mut(id).is_internal = true;
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chandec_common::db::undo::UndoEvent;
    use chandec_common::geom::transform::Transform;

    fn config(spacing: i64, sep: i64) -> DecomposeConfig {
        DecomposeConfig {
            grid_spacing: spacing,
            subcell_sep_up: sep,
            subcell_sep_down: sep,
            ..DecomposeConfig::default()
        }
    }

    #[test]
    fn split_to_area_separates_inside_from_outside() {
        let mut plane: Plane<()> = Plane::new(Rect::from_coords(0, 0, 100, 100));
        plane.paint(Rect::from_coords(40, 40, 50, 50), Body::Solid);
        let area = Rect::from_coords(20, 30, 70, 80);

        split_to_area(&mut plane, area);
        plane.validate().unwrap();
        assert_eq!(plane.len(), 13);
        for id in plane.ids() {
            let r = plane.tile(id).rect();
            assert!(
                area.contains_rect(&r) || !area.overlaps(&r),
                "{:?} crosses the area edge",
                r
            );
        }

        // A second pass finds nothing left to cut.
        split_to_area(&mut plane, area);
        assert_eq!(plane.len(), 13);
    }

    #[test]
    fn decomposition_inside_a_larger_plane() {
        let bounds = Rect::from_coords(0, 0, 100, 100);
        let area = Rect::from_coords(20, 30, 70, 80);
        let mut check: Plane<()> = Plane::new(bounds);
        let mut result: Plane<BoundaryFinalized> = Plane::new(bounds);
        let solid = Rect::from_coords(40, 40, 50, 50);
        check.paint(solid, Body::Solid);
        result.paint(solid, Body::Solid);

        let stats = decompose_planes(&check, &mut result, area);
        assert_eq!(stats.corners, 4);
        assert!(stats.usable > 0);
        verify::verify(&check, &result, area).unwrap();

        let covered: i128 = channels_in(&result, area)
            .iter()
            .map(|(_, r)| r.area())
            .sum();
        assert_eq!(covered, area.area() - solid.area());
    }

    #[test]
    fn degenerate_area_leaves_database_alone() {
        let mut db = LayoutDb::new();
        let top = db.add_def("top", Rect::from_coords(0, 0, 100, 100)).unwrap();
        let mut channels: ChannelMap<u32> = ChannelMap::new();
        channels.insert(TileId::new(0), 7);

        let mut area = Rect::from_coords(50, 0, 10, 100);
        let out = decompose(&mut db, top, &mut area, None, &config(10, 0), &mut channels);
        assert!(out.is_none());
        assert!(channels.is_empty());
        assert!(db.lookup_def(CHANNEL_DEF).is_none());
    }

    #[test]
    fn run_fills_internal_cell_without_recording_undo() {
        let mut db = LayoutDb::new();
        db.add_def("child", Rect::from_coords(0, 0, 10, 10)).unwrap();
        let top = db.add_def("top", Rect::from_coords(0, 0, 100, 100)).unwrap();
        db.add_use(top, "u1", "child", Transform::translate(42, 42), None)
            .unwrap();
        db.undo.clear();

        let mut area = Rect::from_coords(0, 0, 100, 100);
        let mut channels: ChannelMap<()> = ChannelMap::new();
        let def = decompose(&mut db, top, &mut area, None, &config(10, 2), &mut channels)
            .unwrap();

        assert_eq!(area, Rect::from_coords(-5, -5, 105, 105));
        let cell = db.def(def);
        assert_eq!(cell.name, CHANNEL_DEF);
        assert!(cell.is_internal);
        assert_eq!(cell.bbox, Rect::from_coords(35, 35, 65, 65));
        assert_eq!(
            db.undo.events(),
            &[UndoEvent::DefCreated(CHANNEL_DEF.to_string())]
        );
        assert!(db.undo.is_enabled());

        // A second run reuses the cell.
        let mut again = Rect::from_coords(0, 0, 100, 100);
        let second = decompose(&mut db, top, &mut again, None, &config(10, 2), &mut channels);
        assert_eq!(second, Some(def));
        assert_eq!(db.num_defs(), 3);
    }

    #[test]
    fn named_netlist_lookup() {
        let mut db = LayoutDb::new();
        let top = db.add_def("top", Rect::from_coords(0, 0, 100, 100)).unwrap();
        let mut nl = Netlist::new("top");
        nl.add_net("n1");
        db.add_netlist(nl);
        db.add_netlist(Netlist::new("empty"));

        let mut channels: ChannelMap<()> = ChannelMap::new();
        for name in [Some("-"), Some("top"), Some("empty"), Some("missing"), None] {
            let mut area = Rect::from_coords(0, 0, 100, 100);
            let def = decompose_named(&mut db, top, &mut area, name, &config(10, 0), &mut channels);
            assert!(def.is_some(), "{:?}", name);
        }
    }
}
