extern crate ab_glyph;
extern crate image;
extern crate imageproc;

use crate::display::DisplaySink;
use crate::presentation::{Color, Layout, LayoutLine};
use crate::result;

// HUB75 panel geometry.
pub const PANEL_WIDTH: u32 = 64;
pub const PANEL_HEIGHT: u32 = 32;

const TEXT_X: i32 = 1;
const FIRST_LINE_Y: i32 = 0;
const SECOND_LINE_Y: i32 = 9;
const UPDATED_LINE_Y: i32 = 24;
const TEXT_SCALE: f32 = 8.0;

/// Renders each layout into a panel-sized PNG on disk.
pub struct ImageDisplay {
    font: ab_glyph::FontVec,
    png_out: String,
}

impl ImageDisplay {
    pub fn new(font_path: &str, png_out: &str) -> result::MetroDashResult<ImageDisplay> {
        let font_bytes = std::fs::read(font_path)?;
        let font = ab_glyph::FontVec::try_from_vec(font_bytes).map_err(
            |_| result::make_error(&format!("Not a usable font: {}", font_path)))?;

        return Ok(ImageDisplay {
            font: font,
            png_out: png_out.to_string(),
        });
    }
}

impl DisplaySink for ImageDisplay {
    fn show(&mut self, layout: &Layout) -> result::MetroDashResult<()> {
        let imgbuf = generate_image(layout, &self.font);
        return write_png(&imgbuf, &self.png_out);
    }
}

/// Writes next to `path` and renames over it, so readers never see a
/// partly written file.
pub fn write_png(imgbuf: &image::RgbImage, path: &str) -> result::MetroDashResult<()> {
    let tmp_path = format!("{}.tmp", path);
    imgbuf.save_with_format(&tmp_path, image::ImageFormat::Png)?;
    std::fs::rename(&tmp_path, path)?;
    return Ok(());
}

pub fn to_rgb(color: Color) -> image::Rgb<u8> {
    return image::Rgb([color.r, color.g, color.b]);
}

pub fn generate_image(layout: &Layout, font: &ab_glyph::FontVec) -> image::RgbImage {
    let mut imgbuf = image::RgbImage::new(PANEL_WIDTH, PANEL_HEIGHT);

    draw_line(&mut imgbuf, font, FIRST_LINE_Y, &layout.first);
    if let Some(ref second) = layout.second {
        draw_line(&mut imgbuf, font, SECOND_LINE_Y, second);
    }
    if let Some(ref updated) = layout.updated {
        draw_line(&mut imgbuf, font, UPDATED_LINE_Y, updated);
    }

    return imgbuf;
}

fn draw_line(imgbuf: &mut image::RgbImage, font: &ab_glyph::FontVec, y: i32, line: &LayoutLine) {
    imageproc::drawing::draw_text_mut(
        imgbuf, to_rgb(line.color), TEXT_X, y, ab_glyph::PxScale::from(TEXT_SCALE), font, &line.text);
}
