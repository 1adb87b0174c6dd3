//! End-to-end tests for shape detection on synthetic images.
//!
//! Tests cover:
//! - A single square among noise speckles
//! - Several shape kinds in one image
//! - Rotated polygons, stars, disks and shapes touching the frame
//! - Detector configuration (minimum area)
//! - Annotated output and debug directory layout

mod common;

use common::*;
use image::{DynamicImage, Rgb};

#[test]
fn test_square_among_speckles() -> anyhow::Result<()> {
    let detector = ShapeDetector::new();
    let shapes = detector.detect(&square_with_speckles())?;

    assert_eq!(shapes.len(), 1, "speckles must not produce shapes: {:?}", shapes);
    let square = &shapes[0];
    assert_eq!(square.label, ShapeLabel::Square);
    assert!((square.area - 2500.0).abs() < 150.0, "area was {}", square.area);
    assert_eq!(square.bbox, BoundingBox { x: 60, y: 60, width: 50, height: 50 });
    assert_eq!(square.polygon.vertex_count(), 4);
    assert!(square.annotation_text().starts_with("Square 2"));

    Ok(())
}

#[test]
fn test_annotated_image_has_single_box() -> anyhow::Result<()> {
    let img = square_with_speckles();
    let detection = ShapeDetector::new().process(img.clone())?;

    assert_eq!(detection.shapes.len(), 1);
    assert_eq!(*detection.annotated.get_pixel(60, 60), Rgb([0, 255, 0]));
    assert_eq!(*detection.annotated.get_pixel(109, 109), Rgb([0, 255, 0]));
    // speckles are left alone
    assert_eq!(*detection.annotated.get_pixel(10, 10), INK);
    // the original is returned untouched
    assert_eq!(detection.original.to_rgb8(), img.to_rgb8());

    Ok(())
}

#[test]
fn test_mixed_shapes_are_sorted_top_to_bottom() -> anyhow::Result<()> {
    let mut canvas = blank_canvas(420, 320);
    draw_triangle(&mut canvas, (300, 20), (240, 130), (360, 130));
    draw_square(&mut canvas, 30, 40, 60);
    draw_rectangle(&mut canvas, 60, 200, 150, 50);
    let img = DynamicImage::ImageRgb8(canvas);

    let shapes = ShapeDetector::new().detect(&img)?;
    let labels: Vec<ShapeLabel> = shapes.iter().map(|s| s.label).collect();
    assert_eq!(labels, vec![ShapeLabel::Triangle, ShapeLabel::Square, ShapeLabel::Rectangle]);

    let rectangle = &shapes[2];
    assert_eq!(rectangle.bbox.width, 150);
    assert_eq!(rectangle.bbox.height, 50);
    assert!((rectangle.area - 149.0 * 49.0).abs() < 1.0);

    Ok(())
}

fn single_shape(canvas: image::RgbImage, config: DetectorConfig) -> anyhow::Result<DetectedShape> {
    let mut shapes = ShapeDetector::with_config(config).detect(&DynamicImage::ImageRgb8(canvas))?;
    assert_eq!(shapes.len(), 1, "expected one shape: {:?}", shapes);
    Ok(shapes.remove(0))
}

#[test]
fn test_rotated_pentagons_and_hexagons() -> anyhow::Result<()> {
    for rotation in [0.0, 10.0, 35.0, 145.0] {
        let mut canvas = blank_canvas(240, 240);
        draw_regular_polygon(&mut canvas, (120.0, 120.0), 80.0, 5, rotation);
        let shape = single_shape(canvas, DetectorConfig::default())?;
        assert_eq!(shape.label, ShapeLabel::Pentagon, "pentagon at {} degrees", rotation);
    }

    for rotation in [0.0, 5.0, 25.0, 55.0, 60.0] {
        let mut canvas = blank_canvas(240, 240);
        draw_regular_polygon(&mut canvas, (120.0, 120.0), 80.0, 6, rotation);
        let shape = single_shape(canvas, DetectorConfig::default())?;
        assert_eq!(shape.label, ShapeLabel::Hexagon, "hexagon at {} degrees", rotation);
        assert_eq!(shape.polygon.vertex_count(), 6);
    }

    Ok(())
}

#[test]
fn test_star_has_ten_vertices() -> anyhow::Result<()> {
    let mut canvas = blank_canvas(240, 240);
    draw_star(&mut canvas, (120.0, 120.0), 80.0, 32.0);

    let shape = single_shape(canvas, DetectorConfig::default())?;
    assert_eq!(shape.label, ShapeLabel::Star);
    assert_eq!(shape.polygon.vertex_count(), 10);

    Ok(())
}

#[test]
fn test_disk_vertex_count_depends_on_epsilon() -> anyhow::Result<()> {
    let disk = || {
        let mut canvas = blank_canvas(240, 240);
        draw_disk(&mut canvas, (120, 120), 60);
        canvas
    };

    // at the default tolerance a disk simplifies to an octagon, which has
    // no bucket of its own
    let coarse = single_shape(disk(), DetectorConfig::default())?;
    assert_eq!(coarse.polygon.vertex_count(), 8);
    assert_eq!(coarse.label, ShapeLabel::Heart);

    let fine = single_shape(
        disk(),
        DetectorConfig {
            epsilon_fraction: 0.005,
            ..DetectorConfig::default()
        },
    )?;
    assert!(fine.polygon.vertex_count() > 14);
    assert_eq!(fine.label, ShapeLabel::Circle);

    Ok(())
}

#[test]
fn test_shapes_touching_the_frame() -> anyhow::Result<()> {
    let mut canvas = blank_canvas(100, 100);
    draw_square(&mut canvas, 0, 0, 40);
    let shape = single_shape(canvas, DetectorConfig::default())?;
    assert_eq!(shape.label, ShapeLabel::Square);
    assert_eq!(shape.bbox, BoundingBox { x: 0, y: 0, width: 40, height: 40 });

    let mut canvas = blank_canvas(100, 100);
    draw_square(&mut canvas, 60, 60, 40);
    let shape = single_shape(canvas, DetectorConfig::default())?;
    assert_eq!(shape.bbox, BoundingBox { x: 60, y: 60, width: 40, height: 40 });

    Ok(())
}

#[test]
fn test_light_shape_on_dark_background_reports_the_frame() -> anyhow::Result<()> {
    let mut canvas = image::RgbImage::from_pixel(100, 100, INK);
    imageproc::drawing::draw_filled_rect_mut(
        &mut canvas,
        imageproc::rect::Rect::at(30, 30).of_size(40, 40),
        WHITE,
    );

    let shape = single_shape(canvas, DetectorConfig::default())?;
    assert_eq!(shape.bbox, BoundingBox { x: 0, y: 0, width: 100, height: 100 });

    Ok(())
}

#[test]
fn test_lower_min_area_keeps_speckles() -> anyhow::Result<()> {
    let config = DetectorConfig {
        min_area: 1.0,
        ..DetectorConfig::default()
    };
    let shapes = ShapeDetector::with_config(config).detect(&square_with_speckles())?;
    assert_eq!(shapes.len(), 6);
    assert_eq!(shapes.iter().filter(|s| s.label == ShapeLabel::Square).count(), 1);

    Ok(())
}

#[test]
fn test_blank_image_has_no_shapes() -> anyhow::Result<()> {
    let mut canvas = blank_canvas(100, 100);
    sprinkle_speckles(&mut canvas, &[(50, 50)]);
    let shapes = ShapeDetector::new().detect(&DynamicImage::ImageRgb8(canvas))?;
    assert!(shapes.is_empty());

    Ok(())
}

#[test]
fn test_process_uploaded_file_bytes() -> anyhow::Result<()> {
    let file = save_temp_png(&square_with_speckles());
    let bytes = std::fs::read(file.path())?;

    let detection = ShapeDetector::new().process_bytes(&bytes)?;
    assert_eq!(detection.shapes.len(), 1);
    assert_eq!(detection.annotated.dimensions(), (240, 200));

    Ok(())
}

#[test]
fn test_detection_is_repeatable() -> anyhow::Result<()> {
    let img = square_with_speckles();
    let detector = ShapeDetector::new();
    let first = detector.detect(&img)?;
    let second = detector.detect(&img)?;

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.label, b.label);
        assert_eq!(a.area, b.area);
        assert_eq!(a.polygon, b.polygon);
    }

    Ok(())
}

#[test]
fn test_debug_outputs_follow_lineage() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let out = dir.path().join("debug");

    let detector = ShapeDetector::new().with_debug(out.clone());
    let shapes = detector.detect(&square_with_speckles())?;
    assert_eq!(shapes.len(), 1);

    assert!(out.join("00_input").join("01.png").exists());
    assert!(out.join("01_grayscale_conversion").join("01.png").exists());
    assert!(out.join("02_otsu_threshold").join("01-01.png").exists());
    assert_eq!(std::fs::read_dir(out.join("03_contour_detection"))?.count(), 6);
    assert_eq!(std::fs::read_dir(out.join("05_shape_classification"))?.count(), 1);

    // a second run into the same, now non-empty, directory is refused
    assert!(detector.detect(&square_with_speckles()).is_err());

    Ok(())
}

#[test]
fn test_json_report() -> anyhow::Result<()> {
    let shapes = ShapeDetector::new().detect(&square_with_speckles())?;
    let json: serde_json::Value = serde_json::to_value(&shapes)?;

    assert_eq!(json[0]["label"], "Square");
    assert_eq!(json[0]["bbox"]["width"], 50);
    assert_eq!(json[0]["polygon"].as_array().map(|p| p.len()), Some(4));

    Ok(())
}
