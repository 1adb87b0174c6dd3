use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;
use tempfile::NamedTempFile;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const INK: Rgb<u8> = Rgb([30, 30, 30]);

/// Plain white canvas
pub fn blank_canvas(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, WHITE)
}

pub fn draw_square(canvas: &mut RgbImage, x: i32, y: i32, side: u32) {
    draw_filled_rect_mut(canvas, Rect::at(x, y).of_size(side, side), INK);
}

pub fn draw_rectangle(canvas: &mut RgbImage, x: i32, y: i32, width: u32, height: u32) {
    draw_filled_rect_mut(canvas, Rect::at(x, y).of_size(width, height), INK);
}

pub fn draw_triangle(canvas: &mut RgbImage, apex: (i32, i32), base_left: (i32, i32), base_right: (i32, i32)) {
    draw_polygon_mut(
        canvas,
        &[
            Point::new(apex.0, apex.1),
            Point::new(base_right.0, base_right.1),
            Point::new(base_left.0, base_left.1),
        ],
        INK,
    );
}

/// Regular polygon with its first vertex at `rotation_deg` from the +x axis
pub fn draw_regular_polygon(canvas: &mut RgbImage, center: (f64, f64), radius: f64, sides: usize, rotation_deg: f64) {
    let points: Vec<Point<i32>> = (0..sides)
        .map(|k| {
            let angle = rotation_deg.to_radians() + std::f64::consts::TAU * k as f64 / sides as f64;
            Point::new(
                (center.0 + radius * angle.cos()).round() as i32,
                (center.1 + radius * angle.sin()).round() as i32,
            )
        })
        .collect();
    draw_polygon_mut(canvas, &points, INK);
}

/// Five-pointed star: ten alternating outer and inner vertices, tip up
pub fn draw_star(canvas: &mut RgbImage, center: (f64, f64), outer: f64, inner: f64) {
    let points: Vec<Point<i32>> = (0..10)
        .map(|k| {
            let radius = if k % 2 == 0 { outer } else { inner };
            let angle = -std::f64::consts::FRAC_PI_2 + std::f64::consts::PI * k as f64 / 5.0;
            Point::new(
                (center.0 + radius * angle.cos()).round() as i32,
                (center.1 + radius * angle.sin()).round() as i32,
            )
        })
        .collect();
    draw_polygon_mut(canvas, &points, INK);
}

pub fn draw_disk(canvas: &mut RgbImage, center: (i32, i32), radius: i32) {
    draw_filled_circle_mut(canvas, center, radius, INK);
}

/// Tiny dots well under the minimum area
pub fn sprinkle_speckles(canvas: &mut RgbImage, positions: &[(i32, i32)]) {
    for &(x, y) in positions {
        draw_filled_circle_mut(canvas, (x, y), 2, INK);
    }
}

/// Single 50px square at (60, 60) plus a handful of speckles
pub fn square_with_speckles() -> DynamicImage {
    let mut canvas = blank_canvas(240, 200);
    draw_square(&mut canvas, 60, 60, 50);
    sprinkle_speckles(&mut canvas, &[(10, 10), (200, 30), (180, 170), (20, 180), (150, 90)]);
    DynamicImage::ImageRgb8(canvas)
}

/// Writes the image to a temporary PNG file that is removed when dropped
pub fn save_temp_png(img: &DynamicImage) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), ImageFormat::Png)
        .expect("Failed to save test image");
    file
}
