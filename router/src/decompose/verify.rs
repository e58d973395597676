use super::corner::{corner_points, usable_corner};
use super::flags::border_flags;
use chandec_common::geom::rect::Rect;
use chandec_common::tiles::{BoundaryFinalized, Corner, Plane};
use rayon::prelude::*;

/// Post-run checks of a decomposition over `area`. Solid flag records are
/// full, border flags are present, no solid corner still needs a boundary,
/// no two vertically adjacent channels share their left and right edges, the
/// stitches are consistent and the solid geometry matches the scan plane.
pub fn verify(
    check: &Plane<()>,
    result: &Plane<BoundaryFinalized>,
    area: Rect,
) -> Result<(), String> {
    log::info!("Starting Channel Verification");

    let ((flags, corners), structure) = rayon::join(
        || {
            rayon::join(
                || check_flags(result, area),
                || check_corners(check, result, area),
            )
        },
        || check_structure(check, result, area),
    );

    let mut msgs = Vec::new();
    for (errors, pass, fail) in [
        (flags, "Boundary flags are consistent.", "Boundary Flag Mismatch"),
        (corners, "No usable corners remain.", "Dangling Usable Corners"),
        (structure, "Channel plane is irreducible.", "Plane Structure Broken"),
    ] {
        if errors.is_empty() {
            log::info!("\x1b[32mPASS\x1b[0m: {}", pass);
        } else {
            log::error!("\x1b[31mFAIL\x1b[0m: {}", fail);
            for e in &errors {
                log::error!("  {}", e);
            }
            msgs.extend(errors);
        }
    }

    if msgs.is_empty() {
        log::info!("\x1b[32mSUCCESS\x1b[0m: VALID DECOMPOSITION");
        Ok(())
    } else {
        Err(msgs.join("\n"))
    }
}

fn check_flags(result: &Plane<BoundaryFinalized>, area: Rect) -> Vec<String> {
    result
        .tiles_in(area)
        .par_iter()
        .filter_map(|&id| {
            let t = result.tile(id);
            let flags = t.client;
            if t.is_solid() {
                return (!flags.is_full())
                    .then(|| format!("solid tile {:?} has flags {:?}", t.rect(), flags));
            }
            let border = border_flags(t.rect(), area);
            let missing = Corner::ALL
                .into_iter()
                .filter(|&c| border.is_marked(c) && !flags.is_marked(c))
                .count();
            (missing > 0).then(|| {
                format!(
                    "channel {:?} on the area border has flags {:?}",
                    t.rect(),
                    flags
                )
            })
        })
        .collect()
}

fn check_corners(
    check: &Plane<()>,
    result: &Plane<BoundaryFinalized>,
    area: Rect,
) -> Vec<String> {
    check
        .tiles_in(area)
        .par_iter()
        .filter(|&&id| check.tile(id).is_solid())
        .flat_map_iter(|&id| corner_points(check.tile(id).rect()))
        .filter_map(|(p, kind)| {
            usable_corner(result, area, p, kind)
                .map(|_| format!("{:?} corner at ({}, {}) is still usable", kind, p.x, p.y))
        })
        .collect()
}

fn check_structure(
    check: &Plane<()>,
    result: &Plane<BoundaryFinalized>,
    area: Rect,
) -> Vec<String> {
    let mut errors = Vec::new();
    if let Err(e) = result.validate() {
        errors.push(format!("stitches: {}", e));
    }

    for id in result.tiles_in(area) {
        let t = result.tile(id);
        if t.is_solid() || !area.contains_rect(&t.rect()) {
            continue;
        }
        let Some(down) = result.bottom_left(id) else {
            continue;
        };
        let d = result.tile(down);
        if d.is_space()
            && d.left() == t.left()
            && d.right() == t.right()
            && area.contains_rect(&d.rect())
        {
            errors.push(format!(
                "channels {:?} and {:?} could be merged",
                t.rect(),
                d.rect()
            ));
        }
    }

    let solids = |mut rects: Vec<Rect>| {
        rects.sort_by_key(|r| (r.bottom(), r.left(), r.top(), r.right()));
        rects
    };
    let scanned = solids(
        check
            .ids()
            .filter(|&id| check.tile(id).is_solid())
            .map(|id| check.tile(id).rect())
            .collect(),
    );
    let kept = solids(
        result
            .ids()
            .filter(|&id| result.tile(id).is_solid())
            .map(|id| result.tile(id).rect())
            .collect(),
    );
    if scanned != kept {
        errors.push(format!(
            "solid geometry differs: {} tiles scanned, {} in the channel plane",
            scanned.len(),
            kept.len()
        ));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompose::decompose_planes;
    use chandec_common::geom::point::Point;
    use chandec_common::tiles::{Body, ChannelPlanes};

    fn decomposed(solids: &[Rect]) -> (ChannelPlanes, Rect) {
        let area = Rect::from_coords(0, 0, 100, 100);
        let mut planes = ChannelPlanes::new(area);
        for &r in solids {
            planes.paint(r, Body::Solid);
        }
        decompose_planes(&planes.check, &mut planes.result, area);
        (planes, area)
    }

    #[test]
    fn finished_decomposition_passes() {
        let (planes, area) = decomposed(&[
            Rect::from_coords(40, 20, 60, 40),
            Rect::from_coords(20, 60, 80, 80),
        ]);
        verify(&planes.check, &planes.result, area).unwrap();
    }

    #[test]
    fn untouched_plane_reports_open_corners() {
        let area = Rect::from_coords(0, 0, 100, 100);
        let mut planes = ChannelPlanes::new(area);
        planes.paint(Rect::from_coords(40, 40, 60, 60), Body::Solid);
        crate::decompose::flags::init_flags(&mut planes.result, area);
        let err = verify(&planes.check, &planes.result, area).unwrap_err();
        assert!(err.contains("still usable"), "{}", err);
    }

    #[test]
    fn lost_border_flag_is_reported() {
        let (mut planes, area) = decomposed(&[Rect::from_coords(40, 40, 60, 60)]);
        let top = planes.result.find(Point::new(0, 99)).unwrap();
        planes.result.client_mut(top).clear(Corner::NW);
        let err = verify(&planes.check, &planes.result, area).unwrap_err();
        assert!(err.contains("area border"), "{}", err);
    }
}
