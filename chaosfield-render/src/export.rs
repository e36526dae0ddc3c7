//! PNG export with embedded metadata (tEXt chunks).

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::buffer::RenderBuffer;
use crate::error::RenderError;

const KEY_PREFIX: &str = "Chaosfield";

/// Where rendered images are written.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
        }
    }
}

impl ExportConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Create the output directory (and parents) if missing.
    pub fn ensure_dir(&self) -> crate::Result<&Path> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(&self.output_dir)
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

/// Metadata to embed in an exported PNG.
///
/// `kind` and `description` are always written; every extra field becomes a
/// `Chaosfield.<key>` chunk.
#[derive(Debug, Clone, Default)]
pub struct ExportMetadata {
    pub kind: String,
    pub description: String,
    fields: Vec<(String, String)>,
}

impl ExportMetadata {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    pub fn field(mut self, key: &str, value: impl ToString) -> Self {
        self.fields.push((key.to_string(), value.to_string()));
        self
    }

    fn text_chunks(&self, width: u32, height: u32) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("Software".to_string(), "chaosfield".to_string()),
            (format!("{KEY_PREFIX}.Kind"), self.kind.clone()),
            (format!("{KEY_PREFIX}.Resolution"), format!("{width}x{height}")),
        ];
        if !self.description.is_empty() {
            pairs.push(("Description".to_string(), self.description.clone()));
        }
        pairs.extend(
            self.fields
                .iter()
                .map(|(k, v)| (format!("{KEY_PREFIX}.{k}"), v.clone())),
        );
        pairs
    }
}

/// Write an RGBA buffer as a PNG file with embedded metadata.
pub fn export_png(buffer: &RenderBuffer, path: &Path, metadata: &ExportMetadata) -> crate::Result<()> {
    let expected = buffer.width as usize * buffer.height as usize * 4;
    if buffer.pixels.len() != expected {
        return Err(RenderError::BufferSize {
            expected,
            actual: buffer.pixels.len(),
        });
    }

    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    for (key, value) in metadata.text_chunks(buffer.width, buffer.height) {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.pixels)?;
    png_writer.finish()?;

    debug!(
        "Exported PNG {}x{} to {}",
        buffer.width,
        buffer.height,
        path.display()
    );
    Ok(())
}
