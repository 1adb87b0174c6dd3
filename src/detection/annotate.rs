use ab_glyph::{FontRef, PxScale};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::error::ShapeError;
use crate::models::DetectedShape;

pub const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const LABEL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const LABEL_SCALE: f32 = 18.0;
/// Gap between the label baseline and the top of its box
pub const LABEL_OFFSET: i32 = 10;

static LABEL_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

pub fn label_font() -> Result<FontRef<'static>, ShapeError> {
    FontRef::try_from_slice(LABEL_FONT).map_err(|_| ShapeError::FontLoad)
}

/// Copy of `img` with a box and "<Label> <Area>" text for every shape
pub fn annotate(img: &DynamicImage, shapes: &[DetectedShape]) -> Result<RgbImage, ShapeError> {
    let font = label_font()?;
    let mut canvas = img.to_rgb8();

    for shape in shapes {
        draw_box(&mut canvas, shape);

        let text_x = shape.bbox.x.max(0);
        let text_y = (shape.bbox.y - LABEL_OFFSET - LABEL_SCALE as i32).max(0);
        draw_text_mut(
            &mut canvas,
            LABEL_COLOR,
            text_x,
            text_y,
            PxScale::from(LABEL_SCALE),
            &font,
            &shape.annotation_text(),
        );
    }

    Ok(canvas)
}

/// Two pixel wide outline along the inside of the bounding box
fn draw_box(canvas: &mut RgbImage, shape: &DetectedShape) {
    let bbox = shape.bbox;
    draw_hollow_rect_mut(canvas, Rect::at(bbox.x, bbox.y).of_size(bbox.width, bbox.height), BOX_COLOR);
    if bbox.width > 2 && bbox.height > 2 {
        draw_hollow_rect_mut(
            canvas,
            Rect::at(bbox.x + 1, bbox.y + 1).of_size(bbox.width - 2, bbox.height - 2),
            BOX_COLOR,
        );
    }
}
