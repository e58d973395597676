use crate::grid::RouteGrid;
use chandec_common::db::core::LayoutDb;
use chandec_common::db::indices::DefId;
use chandec_common::geom::coord::Coord;
use chandec_common::geom::rect::Rect;

/// Solid footprints of the sub-cells of `target` that overlap `area`: every
/// array element's box grown by the separations, snapped outward to the
/// grid's half-pitch positions and clipped to the area.
pub fn silhouette(
    db: &LayoutDb,
    target: DefId,
    area: Rect,
    grid: &RouteGrid,
    sep_up: Coord,
    sep_down: Coord,
) -> Vec<Rect> {
    let def = db.def(target);
    let mut rects = Vec::new();
    for use_id in def.uses_in(area) {
        let cell_use = def.cell_use(use_id);
        let child = db.def(cell_use.def).bbox;
        if child.is_empty() {
            log::debug!("Skipping empty sub-cell '{}'", cell_use.name);
            continue;
        }
        for t in cell_use.elements() {
            let r = grid
                .round_rect(t.apply_rect(child), sep_up, sep_down, true)
                .clip(&area);
            if !r.is_empty() {
                rects.push(r);
            }
        }
    }
    rects
}

#[cfg(test)]
mod tests {
    use super::*;
    use chandec_common::db::core::ArrayInfo;
    use chandec_common::geom::point::Point;
    use chandec_common::geom::transform::Transform;

    fn db_with_child() -> (LayoutDb, DefId) {
        let mut db = LayoutDb::new();
        db.add_def("child", Rect::from_coords(0, 0, 10, 10)).unwrap();
        let top = db.add_def("top", Rect::from_coords(0, 0, 100, 100)).unwrap();
        (db, top)
    }

    #[test]
    fn single_use_is_inflated_and_snapped() {
        let (mut db, top) = db_with_child();
        db.add_use(top, "u1", "child", Transform::translate(42, 42), None)
            .unwrap();
        let grid = RouteGrid::new(Point::new(0, 0), 10);
        let area = grid.normalize(Rect::from_coords(0, 0, 100, 100));
        let rects = silhouette(&db, top, area, &grid, 2, 2);
        assert_eq!(rects, vec![Rect::from_coords(35, 35, 65, 65)]);
    }

    #[test]
    fn array_elements_are_painted_separately() {
        let (mut db, top) = db_with_child();
        let array = ArrayInfo {
            columns: 3,
            rows: 1,
            x_sep: 30,
            y_sep: 0,
        };
        db.add_use(top, "arr", "child", Transform::translate(10, 40), Some(array))
            .unwrap();
        let grid = RouteGrid::new(Point::new(0, 0), 10);
        let area = grid.normalize(Rect::from_coords(0, 0, 100, 100));
        let rects = silhouette(&db, top, area, &grid, 0, 0);
        assert_eq!(
            rects,
            vec![
                Rect::from_coords(5, 35, 25, 55),
                Rect::from_coords(35, 35, 55, 55),
                Rect::from_coords(65, 35, 85, 55),
            ]
        );
    }

    #[test]
    fn footprints_are_clipped_to_the_area() {
        let (mut db, top) = db_with_child();
        db.add_use(top, "edge", "child", Transform::translate(95, 50), None)
            .unwrap();
        db.add_use(top, "outside", "child", Transform::translate(300, 300), None)
            .unwrap();
        let grid = RouteGrid::new(Point::new(0, 0), 10);
        let area = Rect::from_coords(0, 0, 100, 100);
        let rects = silhouette(&db, top, area, &grid, 0, 0);
        assert_eq!(rects, vec![Rect::from_coords(85, 45, 100, 65)]);
    }
}
