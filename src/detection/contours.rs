use image::GrayImage;
use image::imageops;
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;

pub use imageproc::geometry::contour_area;

/// Outer borders of top-level foreground regions. Holes and anything nested
/// inside a hole are skipped.
///
/// Border following only reports an outer border for regions with background
/// on their left, so the image is traced inside a one pixel background frame
/// and the points are shifted back afterwards.
pub fn find_external_contours(binary: &GrayImage) -> Vec<Vec<Point<i32>>> {
    let mut framed = GrayImage::new(binary.width() + 2, binary.height() + 2);
    imageops::replace(&mut framed, binary, 1, 1);

    find_contours::<i32>(&framed)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| c.points.into_iter().map(|p| Point::new(p.x - 1, p.y - 1)).collect())
        .collect()
}

/// Length of the closed contour, including the closing segment
pub fn perimeter(points: &[Point<i32>]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    arc_length(points, true)
}

/// Douglas-Peucker simplification of a closed contour.
///
/// The ring is cut at two mutually distant points (the point farthest from
/// the first one, and the point farthest from that), each half is simplified
/// as an open curve, and the halves are joined without repeating the cuts.
/// Vertices the split left on a straight run are then pruned.
pub fn approximate_closed(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 || epsilon <= 0.0 {
        return points.to_vec();
    }

    let first_cut = farthest_from(points, 0);
    let second_cut = farthest_from(points, first_cut);
    if first_cut == second_cut {
        return vec![points[first_cut]];
    }

    let ring: Vec<Point<i32>> = points[first_cut..]
        .iter()
        .chain(&points[..first_cut])
        .copied()
        .collect();
    let split = (second_cut + n - first_cut) % n;

    let mut result = approximate_polygon_dp(&ring[..=split], epsilon, false);
    result.pop();

    let mut tail = ring[split..].to_vec();
    tail.push(ring[0]);
    let second_half = approximate_polygon_dp(&tail, epsilon, false);
    result.extend_from_slice(&second_half[..second_half.len() - 1]);

    prune_flat_vertices(result, epsilon)
}

/// Index of the point farthest from `points[origin]`; `origin` itself when
/// every point coincides with it
fn farthest_from(points: &[Point<i32>], origin: usize) -> usize {
    let o = points[origin];
    let mut best = (origin, 0i64);
    for (i, p) in points.iter().enumerate() {
        let dx = (p.x - o.x) as i64;
        let dy = (p.y - o.y) as i64;
        let d = dx * dx + dy * dy;
        if d > best.1 {
            best = (i, d);
        }
    }
    best.0
}

/// Repeatedly drop the flattest vertex while it lies within `epsilon` of the
/// line through its two neighbours. Never goes below a triangle.
fn prune_flat_vertices(mut polygon: Vec<Point<i32>>, epsilon: f64) -> Vec<Point<i32>> {
    while polygon.len() > 3 {
        let n = polygon.len();
        let flattest = (0..n)
            .map(|i| {
                let d = distance_to_line(polygon[i], polygon[(i + n - 1) % n], polygon[(i + 1) % n]);
                (i, d)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));

        match flattest {
            Some((i, d)) if d < epsilon => {
                polygon.remove(i);
            }
            _ => break,
        }
    }
    polygon
}

/// Distance from `p` to the infinite line through `a` and `b`
/// (to `a` itself when the two coincide)
fn distance_to_line(p: Point<i32>, a: Point<i32>, b: Point<i32>) -> f64 {
    let (dx, dy) = ((b.x - a.x) as f64, (b.y - a.y) as f64);
    let (px, py) = ((p.x - a.x) as f64, (p.y - a.y) as f64);
    let length = dx.hypot(dy);
    if length == 0.0 {
        return px.hypot(py);
    }
    (dx * py - dy * px).abs() / length
}

/// Simplify with a tolerance proportional to the contour's perimeter
pub fn approximate_by_perimeter(points: &[Point<i32>], epsilon_fraction: f64) -> Vec<Point<i32>> {
    approximate_closed(points, epsilon_fraction * perimeter(points))
}
