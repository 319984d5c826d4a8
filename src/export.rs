use std::fs;
use std::path::Path;

use image::{ColorType, ImageFormat};

use crate::bake::Baked;

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Image(image::ImageError),
    BufferMismatch { width: usize, height: usize, len: usize },
}

/// Writes the field as a PNG, replacing any existing file and creating
/// missing parent directories.
pub fn write_png(baked: &Baked, path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let (bytes, width, height, channels, color) = match baked {
        Baked::Gray(g) => (g.data.as_slice(), g.width, g.height, 1, ColorType::L8),
        Baked::Rgba(c) => (c.as_bytes(), c.width, c.height, 4, ColorType::Rgba8),
    };
    if bytes.len() != width * height * channels {
        return Err(ExportError::BufferMismatch {
            width,
            height,
            len: bytes.len(),
        });
    }
    image::save_buffer_with_format(
        path,
        bytes,
        width as u32,
        height as u32,
        color,
        ImageFormat::Png,
    )?;
    Ok(())
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::Image(e)
    }
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "export io error: {}", e),
            ExportError::Image(e) => write!(f, "png encode failed: {}", e),
            ExportError::BufferMismatch { width, height, len } => {
                write!(f, "buffer of {} bytes does not match a {}x{} image", len, width, height)
            }
        }
    }
}

impl std::error::Error for ExportError {}
