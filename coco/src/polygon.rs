use image::{GrayImage, imageops};
use imageproc::{
    contours::{BorderType, find_contours},
    geometry::approximate_polygon_dp,
    point::Point,
};

/// Outer contours of every foreground component, simplified with
/// Douglas-Peucker at `tolerance` pixels and flattened to `[x0, y0, x1, y1, ..]`.
///
/// The mask is traced inside a one-pixel zero border so components touching
/// the image edge still get a closed outer contour. Holes are not emitted.
/// When simplification collapses a contour below three vertices the traced
/// contour is kept as is; contours with fewer than three points are dropped.
pub fn mask_to_polygons(mask: &GrayImage, tolerance: f64) -> Vec<Vec<f64>> {
    let (w, h) = mask.dimensions();
    if w == 0 || h == 0 {
        return Vec::new();
    }
    let mut padded = GrayImage::new(w + 2, h + 2);
    imageops::replace(&mut padded, mask, 1, 1);

    let (max_x, max_y) = (w as i32 - 1, h as i32 - 1);
    find_contours::<i32>(&padded)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer))
        .filter_map(|c| {
            let points = simplify(c.points, tolerance);
            if points.len() < 3 {
                return None;
            }
            Some(
                points
                    .iter()
                    .flat_map(|p| {
                        [
                            f64::from((p.x - 1).clamp(0, max_x)),
                            f64::from((p.y - 1).clamp(0, max_y)),
                        ]
                    })
                    .collect(),
            )
        })
        .collect()
}

fn simplify(points: Vec<Point<i32>>, tolerance: f64) -> Vec<Point<i32>> {
    if tolerance <= 0.0 || points.len() < 3 {
        return points;
    }
    let simplified = approximate_polygon_dp(&points, tolerance, true);
    if simplified.len() < 3 { points } else { simplified }
}
