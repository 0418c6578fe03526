//! Compositor - draws text onto the template canvas

use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};

use crate::fonts::FontSet;
use crate::layout::{LayoutSpec, TextAlign, TextPlacement};

pub const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Extra pixels between lines of multi-line text
const LINE_SPACING: f32 = 4.0;

/// Draw the recipient name and certificate number for a layout.
pub fn compose(
    canvas: &mut RgbaImage,
    fonts: &FontSet,
    layout: &LayoutSpec,
    name: &str,
    certificate_number: &str,
) {
    draw_text(canvas, fonts.get(layout.name.font), &layout.name, name, TEXT_COLOR);
    draw_text(
        canvas,
        fonts.get(layout.number.font),
        &layout.number,
        certificate_number,
        TEXT_COLOR,
    );
}

/// Advance width of a single line
pub fn line_width(font: &Font<'_>, size: f32, text: &str) -> f32 {
    let scale = Scale::uniform(size);
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Draw `text` with its box anchored at the placement's top-left corner.
///
/// Lines of multi-line text are aligned inside the widest line; a single
/// line is unaffected by the alignment.
pub fn draw_text(
    canvas: &mut RgbaImage,
    font: &Font<'_>,
    placement: &TextPlacement,
    text: &str,
    color: Rgba<u8>,
) {
    let scale = Scale::uniform(placement.size);
    let v_metrics = font.v_metrics(scale);
    let line_height = v_metrics.ascent - v_metrics.descent + v_metrics.line_gap + LINE_SPACING;

    let lines: Vec<&str> = text.lines().collect();
    let widths: Vec<f32> = lines.iter().map(|l| line_width(font, placement.size, l)).collect();
    let block_width = widths.iter().cloned().fold(0.0, f32::max);

    for (i, (line, width)) in lines.iter().zip(&widths).enumerate() {
        let offset = match placement.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => (block_width - width) / 2.0,
            TextAlign::Right => block_width - width,
        };
        let origin = point(
            placement.x as f32 + offset,
            placement.y as f32 + v_metrics.ascent + i as f32 * line_height,
        );

        for glyph in font.layout(line, scale, origin) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 {
                    return;
                }
                let (px, py) = (px as u32, py as u32);
                if px >= canvas.width() || py >= canvas.height() {
                    return;
                }
                blend(canvas.get_pixel_mut(px, py), color, coverage);
            });
        }
    }
}

fn blend(dst: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let a = coverage.clamp(0.0, 1.0) * (color.0[3] as f32 / 255.0);
    if a <= 0.0 {
        return;
    }
    let inv = 1.0 - a;
    for c in 0..3 {
        dst.0[c] = (color.0[c] as f32 * a + dst.0[c] as f32 * inv).round() as u8;
    }
    let dst_a = dst.0[3] as f32 / 255.0;
    dst.0[3] = ((a + dst_a * inv) * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FontRole;
    use std::path::Path;

    const SYSTEM_FONTS: [&str; 4] = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/Library/Fonts/Arial.ttf",
    ];

    fn system_font() -> Option<Font<'static>> {
        SYSTEM_FONTS
            .iter()
            .map(Path::new)
            .find(|p| p.is_file())
            .and_then(|p| crate::fonts::load_font(p).ok())
    }

    fn at(x: i32, y: i32, align: TextAlign) -> TextPlacement {
        TextPlacement { x, y, size: 40.0, font: FontRole::Name, align }
    }

    fn inked(canvas: &RgbaImage) -> Vec<(u32, u32)> {
        canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] < 128)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn test_blend() {
        let mut px = Rgba([255, 255, 255, 255]);
        blend(&mut px, TEXT_COLOR, 1.0);
        assert_eq!(px, Rgba([0, 0, 0, 255]));

        let mut px = Rgba([255, 255, 255, 255]);
        blend(&mut px, TEXT_COLOR, 0.0);
        assert_eq!(px, Rgba([255, 255, 255, 255]));

        let mut px = Rgba([200, 200, 200, 255]);
        blend(&mut px, TEXT_COLOR, 0.5);
        assert_eq!(px, Rgba([100, 100, 100, 255]));
    }

    #[test]
    fn test_text_lands_right_of_and_below_anchor() {
        let Some(font) = system_font() else { return };
        let mut canvas = RgbaImage::from_pixel(400, 200, Rgba([255, 255, 255, 255]));
        draw_text(&mut canvas, &font, &at(50, 60, TextAlign::Center), "Hello", TEXT_COLOR);

        let ink = inked(&canvas);
        assert!(!ink.is_empty());
        assert!(ink.iter().all(|&(x, y)| x >= 50 && y >= 60));
    }

    #[test]
    fn test_text_is_clipped_at_bounds() {
        let Some(font) = system_font() else { return };
        let mut canvas = RgbaImage::from_pixel(60, 60, Rgba([255, 255, 255, 255]));
        // anchor outside the canvas must not panic
        draw_text(&mut canvas, &font, &at(680, 1035, TextAlign::Center), "XZ8001", TEXT_COLOR);
        draw_text(&mut canvas, &font, &at(-30, -10, TextAlign::Left), "XZ8001", TEXT_COLOR);
        assert!(inked(&canvas).iter().all(|&(x, y)| x < 60 && y < 60));
    }

    #[test]
    fn test_center_alignment_of_lines() {
        let Some(font) = system_font() else { return };
        let mut left = RgbaImage::from_pixel(400, 300, Rgba([255, 255, 255, 255]));
        let mut centered = left.clone();
        let text = "WWWWWW\ni";
        draw_text(&mut left, &font, &at(10, 10, TextAlign::Left), text, TEXT_COLOR);
        draw_text(&mut centered, &font, &at(10, 10, TextAlign::Center), text, TEXT_COLOR);

        let second_line_min_x = |img: &RgbaImage| {
            inked(img)
                .into_iter()
                .filter(|&(_, y)| y > 70)
                .map(|(x, _)| x)
                .min()
        };
        assert!(second_line_min_x(&centered) > second_line_min_x(&left));
    }

    #[test]
    fn test_line_width_grows_with_text() {
        let Some(font) = system_font() else { return };
        assert_eq!(line_width(&font, 40.0, ""), 0.0);
        assert!(line_width(&font, 40.0, "AB") > line_width(&font, 40.0, "A"));
    }
}
