//! Framebuffer export
//!
//! TGA is written by hand: an 18-byte header followed by raw BGRA rows, top
//! row first. PNG screenshots go through the `image` crate.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::rasterizer::Framebuffer;

/// Size of the fixed TGA header
pub const TGA_HEADER_LEN: usize = 18;

/// Uncompressed truecolor image type
const TGA_TYPE_TRUECOLOR: u8 = 2;
/// 8 alpha bits, origin at the top-left
const TGA_DESCRIPTOR_TOP_LEFT_ALPHA8: u8 = 0x28;

/// Error type for image export
#[derive(Debug)]
pub enum ExportError {
    IoError(std::io::Error),
    ImageError(image::ImageError),
    /// TGA stores dimensions as 16-bit values
    TooLarge { width: usize, height: usize },
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::IoError(e)
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::ImageError(e)
    }
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::IoError(e) => write!(f, "IO error: {}", e),
            ExportError::ImageError(e) => write!(f, "Image error: {}", e),
            ExportError::TooLarge { width, height } => {
                write!(f, "{}x{} exceeds the 65535 pixel TGA limit", width, height)
            }
        }
    }
}

impl std::error::Error for ExportError {}

fn tga_header(width: usize, height: usize) -> Result<[u8; TGA_HEADER_LEN], ExportError> {
    let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(ExportError::TooLarge { width, height }),
    };

    let mut header = [0u8; TGA_HEADER_LEN];
    header[2] = TGA_TYPE_TRUECOLOR;
    header[12..14].copy_from_slice(&w.to_le_bytes());
    header[14..16].copy_from_slice(&h.to_le_bytes());
    header[16] = 32;
    header[17] = TGA_DESCRIPTOR_TOP_LEFT_ALPHA8;
    Ok(header)
}

fn write_tga<W: Write>(fb: &Framebuffer, out: &mut W) -> Result<(), ExportError> {
    out.write_all(&tga_header(fb.width, fb.height)?)?;
    for row in fb.pixels.chunks_exact(fb.width.max(1)) {
        for pixel in row {
            out.write_all(&pixel.to_bgra())?;
        }
    }
    Ok(())
}

/// Encode the framebuffer as an in-memory TGA file
pub fn encode_tga(fb: &Framebuffer) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::with_capacity(TGA_HEADER_LEN + fb.pixels.len() * 4);
    write_tga(fb, &mut bytes)?;
    Ok(bytes)
}

/// Write the framebuffer to a TGA file
pub fn export_tga<P: AsRef<Path>>(fb: &Framebuffer, path: P) -> Result<(), ExportError> {
    // Check dimensions before touching the filesystem
    tga_header(fb.width, fb.height)?;

    let mut out = BufWriter::new(File::create(path.as_ref())?);
    write_tga(fb, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Write the framebuffer to a PNG file
pub fn export_png<P: AsRef<Path>>(fb: &Framebuffer, path: P) -> Result<(), ExportError> {
    let width = u32::try_from(fb.width).map_err(|_| ExportError::TooLarge { width: fb.width, height: fb.height })?;
    let height = u32::try_from(fb.height).map_err(|_| ExportError::TooLarge { width: fb.width, height: fb.height })?;

    image::save_buffer(path.as_ref(), fb.as_bytes(), width, height, image::ExtendedColorType::Rgba8)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Color;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("softraster-{}-{}", std::process::id(), name))
    }

    fn two_by_two() -> Framebuffer {
        let mut fb = Framebuffer::new(2, 2);
        fb.pixels = vec![
            Color::with_alpha(10, 20, 30, 40),
            Color::with_alpha(50, 60, 70, 80),
            Color::with_alpha(90, 100, 110, 120),
            Color::with_alpha(130, 140, 150, 160),
        ];
        fb
    }

    #[test]
    fn test_tga_round_trip() {
        let fb = two_by_two();
        let path = temp_path("round-trip.tga");
        export_tga(&fb, &path).expect("temp dir is writable");

        let bytes = std::fs::read(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(bytes.len(), TGA_HEADER_LEN + 16);
        assert_eq!(bytes[2], 2);
        assert_eq!(u16::from_le_bytes([bytes[12], bytes[13]]), 2);
        assert_eq!(u16::from_le_bytes([bytes[14], bytes[15]]), 2);
        assert_eq!(bytes[16], 32);

        let body = &bytes[TGA_HEADER_LEN..];
        assert_eq!(&body[0..4], &[30, 20, 10, 40]);
        assert_eq!(&body[4..8], &[70, 60, 50, 80]);
        assert_eq!(&body[8..12], &[110, 100, 90, 120]);
        assert_eq!(&body[12..16], &[150, 140, 130, 160]);
    }

    #[test]
    fn test_encode_matches_file() {
        let fb = two_by_two();
        let path = temp_path("encode.tga");
        export_tga(&fb, &path).unwrap();
        let from_file = std::fs::read(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(encode_tga(&fb).unwrap(), from_file);
    }

    #[test]
    fn test_wide_dimensions_little_endian() {
        let fb = Framebuffer::new(300, 1);
        let bytes = encode_tga(&fb).unwrap();
        assert_eq!(&bytes[12..16], &[0x2C, 0x01, 0x01, 0x00]);
    }

    #[test]
    fn test_oversized_buffer_rejected() {
        let fb = Framebuffer::new(70_000, 0);
        assert!(matches!(encode_tga(&fb), Err(ExportError::TooLarge { .. })));
    }

    #[test]
    fn test_unwritable_path_reports_error() {
        let fb = two_by_two();
        let path = temp_path("missing-dir").join("nested").join("out.tga");
        assert!(matches!(export_tga(&fb, &path), Err(ExportError::IoError(_))));
    }

    #[test]
    fn test_png_export() {
        let fb = two_by_two();
        let path = temp_path("shot.png");
        export_png(&fb, &path).expect("temp dir is writable");
        let bytes = std::fs::read(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
