use chandec_common::db::core::LayoutDb;
use chandec_common::geom::point::Point;
use chandec_common::geom::rect::Rect;
use chandec_common::geom::transform::Transform;
use chandec_common::tiles::Corner::{NE, NW, SE, SW};
use chandec_common::tiles::{Body, BoundaryFinalized, ChannelPlanes, Corner, Plane};
use chandec_common::util::config::DecomposeConfig;
use chandec_router::channel_map::ChannelMap;
use chandec_router::decompose::corner::usable_corner;
use chandec_router::decompose::distance::{horizontal_distance, vertical_run};
use chandec_router::decompose::flags::init_flags;
use chandec_router::decompose::marker::{Boundary, mark_channel};
use chandec_router::decompose::verify::verify;
use chandec_router::decompose::{DecomposeStats, channels_in, decompose, decompose_planes};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const AREA: Rect = Rect {
    min: Point { x: 0, y: 0 },
    max: Point { x: 100, y: 100 },
};

fn painted(solids: &[Rect]) -> ChannelPlanes {
    let mut planes = ChannelPlanes::new(AREA);
    for &r in solids {
        planes.paint(r, Body::Solid);
    }
    planes
}

fn run(solids: &[Rect]) -> (ChannelPlanes, DecomposeStats) {
    let mut planes = painted(solids);
    let stats = decompose_planes(&planes.check, &mut planes.result, AREA);
    (planes, stats)
}

fn quads(marked: &[Corner]) -> BoundaryFinalized {
    let mut flags = BoundaryFinalized::NONE;
    for &c in marked {
        flags.mark(c);
    }
    flags
}

/// Channels sorted bottom-up, left to right, with their flags.
fn channels(plane: &Plane<BoundaryFinalized>) -> Vec<(Rect, BoundaryFinalized)> {
    let mut out: Vec<_> = channels_in(plane, AREA)
        .into_iter()
        .map(|(id, r)| (r, *plane.client(id)))
        .collect();
    out.sort_by_key(|(r, _)| (r.bottom(), r.left()));
    out
}

fn r(x1: i64, y1: i64, x2: i64, y2: i64) -> Rect {
    Rect::from_coords(x1, y1, x2, y2)
}

#[test]
fn centered_block_splits_vertically_on_ties() {
    let (planes, stats) = run(&[r(40, 40, 60, 60)]);
    assert_eq!(
        stats,
        DecomposeStats {
            corners: 4,
            usable: 4,
            horizontal: 0,
            vertical: 4
        }
    );

    let all = BoundaryFinalized::ALL;
    assert_eq!(
        channels(&planes.result),
        vec![
            (r(0, 0, 40, 100), all),
            (r(40, 0, 60, 40), quads(&[SW, SE])),
            (r(60, 0, 100, 100), all),
            (r(40, 60, 60, 100), quads(&[NW, NE])),
        ]
    );
    verify(&planes.check, &planes.result, AREA).unwrap();
}

#[test]
fn stacked_blocks_of_different_widths() {
    let (planes, stats) = run(&[r(40, 20, 60, 40), r(20, 60, 80, 80)]);
    assert_eq!(stats.usable, 8);
    assert_eq!(stats.horizontal, 2);
    assert_eq!(stats.vertical, 6);

    let all = BoundaryFinalized::ALL;
    assert_eq!(
        channels(&planes.result),
        vec![
            (r(0, 0, 40, 60), quads(&[NW, SW, SE])),
            (r(40, 0, 60, 20), quads(&[SW, SE])),
            (r(60, 0, 100, 60), quads(&[NE, SW, SE])),
            (r(40, 40, 60, 60), BoundaryFinalized::NONE),
            (r(0, 60, 20, 100), all),
            (r(80, 60, 100, 100), all),
            (r(20, 80, 80, 100), quads(&[NW, NE])),
        ]
    );
    verify(&planes.check, &planes.result, AREA).unwrap();
}

#[test]
fn downward_walk_passes_overhanging_step() {
    let mut planes = painted(&[r(40, 20, 60, 40), r(20, 60, 80, 80)]);
    init_flags(&mut planes.result, AREA);
    let plane = &planes.result;

    let c = usable_corner(plane, AREA, Point::new(80, 60), SE).unwrap();
    assert_eq!(horizontal_distance(plane, &c), 20);
    let run = vertical_run(plane, AREA, &c);
    assert_eq!(run.distance, 60);
    assert_eq!(Some(run.bottom), plane.find(Point::new(80, 10)));
}

#[test]
fn corners_on_the_area_boundary_are_ignored() {
    let mut planes = painted(&[r(60, 20, 80, 100)]);
    init_flags(&mut planes.result, AREA);
    assert!(usable_corner(&planes.result, AREA, Point::new(60, 100), NW).is_none());
    assert!(usable_corner(&planes.result, AREA, Point::new(80, 100), NE).is_none());
    assert!(usable_corner(&planes.result, AREA, Point::new(60, 20), SW).is_some());
}

#[test]
fn equal_horizontal_candidates_mark_both_tiles() {
    let mut planes = painted(&[r(20, 40, 40, 60), r(60, 20, 80, 100)]);
    init_flags(&mut planes.result, AREA);
    let plane = &mut planes.result;

    let c = usable_corner(plane, AREA, Point::new(40, 60), NE).unwrap();
    assert_eq!(horizontal_distance(plane, &c), 20);
    assert_eq!(vertical_run(plane, AREA, &c).distance, 40);
    assert_eq!(mark_channel(plane, AREA, &c), Boundary::Horizontal);

    assert_eq!(plane.tile(c.near).rect(), r(40, 40, 60, 60));
    assert_eq!(*plane.client(c.near), quads(&[NW, NE]));
    assert_eq!(plane.tile(c.far).rect(), r(0, 60, 60, 100));
    assert_eq!(*plane.client(c.far), quads(&[NW, NE, SE]));
}

#[test]
fn blocks_beside_a_full_height_column() {
    let (planes, stats) = run(&[r(20, 40, 40, 60), r(60, 20, 80, 100)]);
    assert_eq!(stats.corners, 8);
    assert_eq!(stats.usable, 6);
    assert_eq!(stats.horizontal, 4);

    let all = BoundaryFinalized::ALL;
    assert_eq!(
        channels(&planes.result),
        vec![
            (r(0, 0, 60, 40), all),
            (r(60, 0, 80, 20), quads(&[SW, SE])),
            (r(80, 0, 100, 100), all),
            (r(0, 40, 20, 60), all),
            (r(40, 40, 60, 60), all),
            (r(0, 60, 60, 100), all),
        ]
    );
    verify(&planes.check, &planes.result, AREA).unwrap();
}

#[test]
fn flag_initialization_is_idempotent() {
    let (mut planes, _) = run(&[r(40, 20, 60, 40), r(20, 60, 80, 80)]);
    init_flags(&mut planes.result, AREA);
    let once: Vec<_> = planes.result.ids().map(|id| *planes.result.client(id)).collect();
    init_flags(&mut planes.result, AREA);
    let twice: Vec<_> = planes.result.ids().map(|id| *planes.result.client(id)).collect();
    assert_eq!(once, twice);
}

#[test]
fn database_run_paints_snapped_silhouette() {
    let mut db = LayoutDb::new();
    db.add_def("child", r(0, 0, 10, 10)).unwrap();
    let top = db.add_def("top", r(0, 0, 100, 100)).unwrap();
    db.add_use(top, "u1", "child", Transform::translate(42, 42), None)
        .unwrap();

    let config = DecomposeConfig {
        grid_spacing: 10,
        subcell_sep_up: 2,
        subcell_sep_down: 2,
        ..DecomposeConfig::default()
    };
    let mut area = r(0, 0, 100, 100);
    let mut map: ChannelMap<Rect> = ChannelMap::new();
    let def = decompose(&mut db, top, &mut area, None, &config, &mut map).unwrap();
    assert_eq!(area, r(-5, -5, 105, 105));

    let planes = db.def(def).planes.as_ref().unwrap();
    let solids: Vec<Rect> = planes
        .result
        .ids()
        .filter(|&id| planes.result.tile(id).is_solid())
        .map(|id| planes.result.tile(id).rect())
        .collect();
    assert_eq!(solids, vec![r(35, 35, 65, 65)]);
    verify(&planes.check, &planes.result, area).unwrap();

    for (id, rect) in channels_in(&planes.result, area) {
        map.insert(id, rect);
    }
    assert_eq!(map.len(), 4);
}

#[test]
fn degenerate_area_returns_none() {
    let mut db = LayoutDb::new();
    let top = db.add_def("top", r(0, 0, 100, 100)).unwrap();
    let config = DecomposeConfig {
        grid_spacing: 10,
        ..DecomposeConfig::default()
    };
    let mut area = r(50, 0, 10, 100);
    let mut map: ChannelMap<()> = ChannelMap::new();
    assert!(decompose(&mut db, top, &mut area, None, &config, &mut map).is_none());
}

fn random_layout(rng: &mut StdRng) -> Vec<Rect> {
    let n = rng.gen_range(1..8);
    (0..n)
        .map(|_| {
            let x = rng.gen_range(0..18) * 5;
            let y = rng.gen_range(0..18) * 5;
            let w = rng.gen_range(1..6) * 5;
            let h = rng.gen_range(1..6) * 5;
            r(x, y, (x + w).min(100), (y + h).min(100))
        })
        .collect()
}

#[test]
fn random_layouts_keep_all_invariants() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for round in 0..200 {
        let solids = random_layout(&mut rng);
        let (planes, stats) = run(&solids);

        if let Err(e) = verify(&planes.check, &planes.result, AREA) {
            panic!("round {} with {:?}: {}", round, solids, e);
        }
        assert_eq!(stats.usable, stats.horizontal + stats.vertical);

        let solid_area: i128 = planes
            .result
            .ids()
            .map(|id| planes.result.tile(id))
            .filter(|t| t.is_solid())
            .map(|t| t.rect().area())
            .sum();
        let channel_area: i128 = channels_in(&planes.result, AREA)
            .iter()
            .map(|(_, r)| r.area())
            .sum();
        assert_eq!(solid_area + channel_area, AREA.area(), "round {}", round);
    }
}
