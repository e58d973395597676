use crate::geom::rect::Rect;
use crate::tiles::{BoundaryFinalized, Corner, Plane};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as ImageRect;
use std::path::Path;

const BACKGROUND: Rgb<u8> = Rgb([20, 20, 20]);
const SOLID: Rgb<u8> = Rgb([180, 60, 60]);
const OUTLINE: Rgb<u8> = Rgb([200, 200, 200]);
const FINAL_EDGE: Rgb<u8> = Rgb([255, 215, 0]);

/// Renders the channel partition of `area`: sub-cell silhouettes in red,
/// channels in shades of blue with a light outline, and horizontal edges
/// marked final in gold.
pub fn draw_channels(
    plane: &Plane<BoundaryFinalized>,
    area: Rect,
    filename: &str,
    width: u32,
    height: u32,
) -> image::ImageResult<()> {
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    if area.is_empty() {
        return img.save(Path::new(filename));
    }

    let scale_x = width as f64 / area.width() as f64;
    let scale_y = height as f64 / area.height() as f64;
    let map = |x: i64, y: i64| {
        (
            (x - area.left()) as f64 * scale_x,
            height as f64 - (y - area.bottom()) as f64 * scale_y,
        )
    };

    for (n, id) in plane.tiles_in(area).into_iter().enumerate() {
        let tile = plane.tile(id);
        let r = tile.rect().clip(&area);
        let (x0, y_top) = map(r.left(), r.top());
        let (x1, y_bot) = map(r.right(), r.bottom());
        let w = (x1 - x0).max(1.0) as u32;
        let h = (y_bot - y_top).max(1.0) as u32;
        let rect = ImageRect::at(x0 as i32, y_top as i32).of_size(w, h);

        if tile.is_solid() {
            draw_filled_rect_mut(&mut img, rect, SOLID);
            continue;
        }

        let shade = 60 + (n % 5) as u8 * 20;
        draw_filled_rect_mut(&mut img, rect, Rgb([30, shade / 2, shade + 40]));
        draw_hollow_rect_mut(&mut img, rect, OUTLINE);

        let flags = tile.client;
        let (xm, _) = map((r.left() + r.right()) / 2, r.top());
        for corner in Corner::ALL {
            if !flags.is_marked(corner) {
                continue;
            }
            let y = if corner.is_north() { y_top } else { y_bot - 1.0 };
            let (from, to) = if corner.is_east() { (xm, x1 - 1.0) } else { (x0, xm) };
            draw_line_segment_mut(
                &mut img,
                (from as f32, y as f32),
                (to as f32, y as f32),
                FINAL_EDGE,
            );
        }
    }

    img.save(Path::new(filename))
}
