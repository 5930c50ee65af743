use chord_schema::{ChordDiagram, StringState, DIAGRAM_FRETS, MAX_FRET, STRING_COUNT};
use image::Rgb;

use crate::ChordError;

/// Side length of one unscaled glyph cell.
pub const GLYPH_SIZE: u32 = 8;

/// Space between the high-e dot and the position label.
const LABEL_GAP: f32 = 6.0;

#[derive(Debug, Clone, Copy)]
pub struct RenderParams {
    pub width: u32,
    pub height: u32,
    pub margin_x: f32,
    pub top_margin: f32,
    pub fret_spacing: f32,
    pub line_width: u32,
    pub nut_width: u32,
    pub dot_radius: i32,
    pub ring_radius: i32,
    pub title_scale: u32,
    pub text_scale: u32,
    pub background: Rgb<u8>,
    pub ink: Rgb<u8>,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            width: 500,
            height: 600,
            margin_x: 90.0,
            top_margin: 140.0,
            fret_spacing: 70.0,
            line_width: 3,
            nut_width: 8,
            dot_radius: 18,
            ring_radius: 10,
            title_scale: 4,
            text_scale: 2,
            background: Rgb([255, 255, 255]),
            ink: Rgb([0, 0, 0]),
        }
    }
}

impl RenderParams {
    fn validate(&self) -> Result<(), ChordError> {
        let invalid = |msg: String| -> Result<(), ChordError> { Err(ChordError::new("E3002", msg)) };

        if self.line_width == 0 || self.nut_width == 0 || self.title_scale == 0 || self.text_scale == 0 {
            return invalid("line widths and text scales must be positive".to_string());
        }
        if self.dot_radius <= 0 || self.ring_radius <= 0 {
            return invalid("marker radii must be positive".to_string());
        }
        if self.fret_spacing <= 0.0 || self.margin_x < 0.0 || self.top_margin < 0.0 {
            return invalid("fret spacing must be positive and margins non-negative".to_string());
        }
        if self.width as f32 <= 2.0 * self.margin_x {
            return invalid(format!(
                "canvas width {} leaves no room between {}px margins",
                self.width, self.margin_x
            ));
        }
        let widest_label = format!("{MAX_FRET}fr");
        let label_end = self.position_label_x() + text_width(&widest_label, self.text_scale) as f32;
        if label_end > self.width as f32 {
            return invalid(format!(
                "canvas width {} cannot fit the position label (needs {label_end}px)",
                self.width
            ));
        }
        let grid_bottom = self.top_margin + DIAGRAM_FRETS as f32 * self.fret_spacing;
        if self.height as f32 <= grid_bottom {
            return invalid(format!(
                "canvas height {} is smaller than the grid ({grid_bottom}px)",
                self.height
            ));
        }
        Ok(())
    }

    /// Left edge of the `"<N>fr"` label, clear of any dot on the high-e string.
    fn position_label_x(&self) -> f32 {
        self.width as f32 - self.margin_x + self.dot_radius as f32 + LABEL_GAP
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub thickness: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub center: (f32, f32),
    pub radius: i32,
    pub finger: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Marker {
    Open { center: (f32, f32), radius: i32 },
    Muted { center: (f32, f32), half_size: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// Top-left corner.
    pub origin: (f32, f32),
    pub scale: u32,
    pub content: String,
}

/// Everything needed to paint one diagram, in pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramLayout {
    pub width: u32,
    pub height: u32,
    pub base_fret: u8,
    pub string_xs: Vec<f32>,
    pub fret_ys: Vec<f32>,
    pub strings: Vec<Line>,
    pub frets: Vec<Line>,
    pub markers: Vec<Marker>,
    pub dots: Vec<Dot>,
    pub texts: Vec<Text>,
}

pub fn text_width(content: &str, scale: u32) -> u32 {
    content.chars().count() as u32 * GLYPH_SIZE * scale
}

pub fn layout(diagram: &ChordDiagram, params: &RenderParams) -> Result<DiagramLayout, ChordError> {
    params.validate()?;

    let shape = &diagram.shape;
    let base_fret = shape.base_fret();
    let width = params.width as f32;

    let string_spacing = (width - 2.0 * params.margin_x) / (STRING_COUNT - 1) as f32;
    let string_xs: Vec<f32> = (0..STRING_COUNT)
        .map(|i| params.margin_x + i as f32 * string_spacing)
        .collect();
    let fret_ys: Vec<f32> = (0..=DIAGRAM_FRETS)
        .map(|i| params.top_margin + i as f32 * params.fret_spacing)
        .collect();

    let (left, right) = (string_xs[0], string_xs[STRING_COUNT - 1]);
    let (top, bottom) = (fret_ys[0], fret_ys[DIAGRAM_FRETS as usize]);

    let strings = string_xs
        .iter()
        .map(|&x| Line {
            from: (x, top),
            to: (x, bottom),
            thickness: params.line_width,
        })
        .collect();

    let frets = fret_ys
        .iter()
        .enumerate()
        .map(|(i, &y)| Line {
            from: (left, y),
            to: (right, y),
            thickness: if i == 0 && base_fret == 1 {
                params.nut_width
            } else {
                params.line_width
            },
        })
        .collect();

    let mut texts = Vec::new();

    let title_w = text_width(&diagram.name, params.title_scale) as f32;
    texts.push(Text {
        origin: (((width - title_w) / 2.0).max(0.0), 40.0),
        scale: params.title_scale,
        content: diagram.name.clone(),
    });

    if base_fret > 1 {
        let glyph_h = (GLYPH_SIZE * params.text_scale) as f32;
        texts.push(Text {
            origin: (params.position_label_x(), top + params.fret_spacing / 2.0 - glyph_h / 2.0),
            scale: params.text_scale,
            content: format!("{base_fret}fr"),
        });
    }

    let indicator_y = params.top_margin - 30.0;
    let mut markers = Vec::new();
    let mut dots = Vec::new();

    for (state, &x) in shape.strings.iter().zip(&string_xs) {
        match *state {
            StringState::Muted => markers.push(Marker::Muted {
                center: (x, indicator_y),
                half_size: params.ring_radius as f32 * 0.8,
            }),
            StringState::Open => markers.push(Marker::Open {
                center: (x, indicator_y),
                radius: params.ring_radius,
            }),
            StringState::Fretted { fret, finger } => {
                let relative = fret as i32 - base_fret as i32 + 1;
                if relative < 1 || relative > DIAGRAM_FRETS as i32 {
                    log::warn!(
                        "{}: fret {fret} is outside the drawn range starting at fret {base_fret}",
                        diagram.name
                    );
                    continue;
                }
                let y = params.top_margin + (relative as f32 - 0.5) * params.fret_spacing;
                dots.push(Dot {
                    center: (x, y),
                    radius: params.dot_radius,
                    finger,
                });
            }
        }
    }

    if let Some(label) = &shape.label {
        texts.push(Text {
            origin: (left, bottom + 30.0),
            scale: params.text_scale,
            content: label.clone(),
        });
    }

    log::debug!(
        "{}: base fret {base_fret}, {} dots, {} open/muted markers",
        diagram.name,
        dots.len(),
        markers.len()
    );

    Ok(DiagramLayout {
        width: params.width,
        height: params.height,
        base_fret,
        string_xs,
        fret_ys,
        strings,
        frets,
        markers,
        dots,
        texts,
    })
}
