use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut, draw_line_segment_mut},
    rect::Rect,
};

use crate::layout::{DiagramLayout, Line, Marker, Text, GLYPH_SIZE};
use crate::RenderParams;

pub(crate) fn paint(layout: &DiagramLayout, params: &RenderParams) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(layout.width, layout.height, params.background);
    let ink = params.ink;

    for line in layout.strings.iter().chain(&layout.frets) {
        draw_thick_line(&mut canvas, line, ink);
    }

    for marker in &layout.markers {
        match *marker {
            Marker::Open { center, radius } => {
                let c = (center.0.round() as i32, center.1.round() as i32);
                // 3px ring
                for r in radius - 1..=radius + 1 {
                    draw_hollow_circle_mut(&mut canvas, c, r, ink);
                }
            }
            Marker::Muted { center, half_size } => {
                let (cx, cy) = center;
                for o in [-1.0f32, 0.0, 1.0] {
                    draw_line_segment_mut(
                        &mut canvas,
                        (cx - half_size + o, cy - half_size),
                        (cx + half_size + o, cy + half_size),
                        ink,
                    );
                    draw_line_segment_mut(
                        &mut canvas,
                        (cx + half_size + o, cy - half_size),
                        (cx - half_size + o, cy + half_size),
                        ink,
                    );
                }
            }
        }
    }

    for dot in &layout.dots {
        let c = (dot.center.0.round() as i32, dot.center.1.round() as i32);
        draw_filled_circle_mut(&mut canvas, c, dot.radius, ink);

        if let Some(finger) = dot.finger {
            let half = (GLYPH_SIZE * params.text_scale) as f32 / 2.0;
            draw_text(
                &mut canvas,
                &Text {
                    origin: (dot.center.0 - half, dot.center.1 - half),
                    scale: params.text_scale,
                    content: finger.to_string(),
                },
                params.background,
            );
        }
    }

    for text in &layout.texts {
        draw_text(&mut canvas, text, ink);
    }

    canvas
}

// Only axis-aligned lines are laid out, so a filled rect covers them.
fn draw_thick_line(canvas: &mut RgbImage, line: &Line, color: Rgb<u8>) {
    let half = line.thickness as f32 / 2.0;
    let x0 = line.from.0.min(line.to.0) - half;
    let y0 = line.from.1.min(line.to.1) - half;
    let w = (line.from.0 - line.to.0).abs() + line.thickness as f32;
    let h = (line.from.1 - line.to.1).abs() + line.thickness as f32;

    let rect = Rect::at(x0.round() as i32, y0.round() as i32).of_size(
        (w.round() as u32).max(1),
        (h.round() as u32).max(1),
    );
    draw_filled_rect_mut(canvas, rect, color);
}

fn draw_text(canvas: &mut RgbImage, text: &Text, color: Rgb<u8>) {
    let scale = text.scale;
    let (x0, y0) = (text.origin.0.round() as i32, text.origin.1.round() as i32);
    let advance = (GLYPH_SIZE * scale) as i32;

    for (i, ch) in text.content.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch) else {
            log::debug!("no glyph for {ch:?}, leaving a blank cell");
            continue;
        };
        let gx = x0 + i as i32 * advance;

        for (row, &bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                // bit 0 is the leftmost pixel
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px = gx + (col * scale) as i32;
                let py = y0 + (row as u32 * scale) as i32;
                draw_filled_rect_mut(canvas, Rect::at(px, py).of_size(scale, scale), color);
            }
        }
    }
}
