//! Helpers for turning a GPU readback into a PNG on disk.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use image::RgbaImage;

use crate::error::ScreenshotError;

/// `{prefix}_{unix_seconds}.png`
pub fn file_name(prefix: &str, unix_seconds: u64) -> String {
    format!("{prefix}_{unix_seconds}.png")
}

pub fn timestamped_file_name(prefix: &str) -> String {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    file_name(prefix, seconds)
}

/// Row pitch for a texture-to-buffer copy of `width` RGBA8 texels.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

pub fn is_bgra(format: wgpu::TextureFormat) -> bool {
    matches!(
        format,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    )
}

/// Strips row padding and, for BGRA surfaces, swaps the red and blue channels.
pub fn unpad_rows(
    data: &[u8],
    width: u32,
    height: u32,
    padded_row: u32,
    bgra: bool,
) -> Result<RgbaImage, ScreenshotError> {
    let expected = padded_row as usize * height as usize;
    if data.len() < expected {
        return Err(ScreenshotError::BufferSize {
            expected,
            actual: data.len(),
        });
    }

    let row_bytes = width as usize * 4;
    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in data.chunks(padded_row as usize).take(height as usize) {
        pixels.extend_from_slice(&row[..row_bytes]);
    }
    if bgra {
        for texel in pixels.chunks_exact_mut(4) {
            texel.swap(0, 2);
        }
    }

    RgbaImage::from_raw(width, height, pixels).ok_or(ScreenshotError::BufferSize {
        expected: row_bytes * height as usize,
        actual: 0,
    })
}

pub fn save(image: &RgbaImage, path: impl AsRef<Path>) -> Result<(), ScreenshotError> {
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_uses_prefix_and_seconds() {
        assert_eq!(file_name("peach_castle", 1700000000), "peach_castle_1700000000.png");
    }

    #[test]
    fn rows_are_padded_to_copy_alignment() {
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(1), 256);
    }

    #[test]
    fn unpad_drops_padding_and_swizzles_bgra() {
        let padded = padded_bytes_per_row(2);
        let mut data = vec![0u8; padded as usize * 2];
        // Row 0: blue texel, green texel in BGRA order.
        data[..8].copy_from_slice(&[255, 0, 0, 255, 0, 255, 0, 255]);
        // Row 1: red texel.
        let row1 = padded as usize;
        data[row1..row1 + 4].copy_from_slice(&[0, 0, 255, 255]);

        let img = unpad_rows(&data, 2, 2, padded, true).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 255, 0, 255]);
        assert_eq!(img.get_pixel(0, 1).0, [255, 0, 0, 255]);
    }

    #[test]
    fn unpad_rejects_short_buffers() {
        let err = unpad_rows(&[0u8; 16], 2, 2, 256, false).unwrap_err();
        assert!(matches!(err, ScreenshotError::BufferSize { expected: 512, actual: 16 }));
    }

    #[test]
    fn save_writes_png() {
        let dir = std::env::temp_dir().join(format!("castle_shot_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file_name("test", 1));
        save(&RgbaImage::new(4, 4), &path).unwrap();
        assert!(path.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
