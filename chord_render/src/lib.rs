use std::{fs, io::Cursor, path::Path};

use chord_schema::ChordDiagram;
use image::{ImageFormat, RgbImage};

mod draw;
mod error;
pub mod layout;
mod library;

pub use error::{ChordError, ChordErrorKind};
pub use layout::RenderParams;
pub use library::ChordLibrary;

/// Looks a chord up in the built-in table.
pub fn lookup(name: &str) -> Result<ChordDiagram, ChordError> {
    ChordLibrary::builtin().lookup(name)
}

/// Draws the diagram into an in-memory image. No file I/O happens here.
pub fn render(diagram: &ChordDiagram, params: &RenderParams) -> Result<RgbImage, ChordError> {
    let layout = layout::layout(diagram, params).map_err(|e| e.with_chord(diagram.name.clone()))?;
    Ok(draw::paint(&layout, params))
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, ChordError> {
    let mut out: Vec<u8> = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .map_err(|e| ChordError::new("E3001", format!("failed to encode PNG: {e}")))?;
    Ok(out)
}

/// Encodes `image` as PNG and writes it to `path`, replacing any existing file.
///
/// Parent directories are not created.
pub fn write_png(image: &RgbImage, path: impl AsRef<Path>) -> Result<(), ChordError> {
    let path = path.as_ref();
    let png = encode_png(image)?;
    fs::write(path, &png).map_err(|e| {
        ChordError::new("E4001", format!("failed to write PNG {}: {e}", path.display()))
            .with_file(path.display().to_string())
    })?;
    log::debug!("wrote {} bytes to {}", png.len(), path.display());
    Ok(())
}
