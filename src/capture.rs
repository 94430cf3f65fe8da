// ============================================================================
// capture.rs — Sketchbook
// F12 screenshots: unpadding the GPU readback and writing timestamped PNGs.
// ============================================================================

use std::fs;
use std::path::{Path, PathBuf};

/// Rows of a texture-to-buffer copy are padded to 256 bytes.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (width * 4).div_ceil(align) * align
}

/// Strip row padding and convert BGRA to RGBA when `bgra` is set.
pub fn unpad_rows(data: &[u8], padded_bpr: u32, width: u32, height: u32, bgra: bool) -> Vec<u8> {
    let row_bytes = (width * 4) as usize;
    let mut rgba = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * padded_bpr as usize;
        let Some(row_data) = data.get(start..start + row_bytes) else {
            break;
        };
        if bgra {
            for px in row_data.chunks_exact(4) {
                rgba.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
            }
        } else {
            rgba.extend_from_slice(row_data);
        }
    }
    rgba
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("cannot create {0:?}: {1}")]
    Dir(PathBuf, #[source] std::io::Error),
    #[error("cannot write {0:?}: {1}")]
    Image(PathBuf, #[source] image::ImageError),
}

/// Write an RGBA frame to `dir/screenshot_<timestamp>.png`.
pub fn save_screenshot(dir: &Path, width: u32, height: u32, rgba: &[u8]) -> Result<PathBuf, CaptureError> {
    fs::create_dir_all(dir).map_err(|e| CaptureError::Dir(dir.to_path_buf(), e))?;
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%3f");
    let path = dir.join(format!("screenshot_{stamp}.png"));
    image::save_buffer(&path, rgba, width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| CaptureError::Image(path.clone(), e))?;
    Ok(path)
}

pub fn is_bgra(format: wgpu::TextureFormat) -> bool {
    matches!(
        format,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_rounds_up_to_alignment() {
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(500), 2048);
    }

    #[test]
    fn unpad_drops_padding_and_swaps_channels() {
        // 2x2 image, rows padded to 12 bytes.
        let data = [
            1, 2, 3, 4, 5, 6, 7, 8, 0, 0, 0, 0, //
            9, 10, 11, 12, 13, 14, 15, 16, 0, 0, 0, 0,
        ];
        let rgba = unpad_rows(&data, 12, 2, 2, true);
        assert_eq!(rgba, vec![3, 2, 1, 4, 7, 6, 5, 8, 11, 10, 9, 12, 15, 14, 13, 16]);

        let plain = unpad_rows(&data, 12, 2, 2, false);
        assert_eq!(&plain[..8], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(plain.len(), 16);
    }

    #[test]
    fn screenshot_is_written_as_png() {
        let dir = std::env::temp_dir().join(format!("sketchbook-shots-{}", std::process::id()));
        let rgba = vec![255u8; 4 * 3 * 2];
        let path = save_screenshot(&dir, 3, 2, &rgba).unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    #[test]
    fn bgra_formats_are_detected() {
        assert!(is_bgra(wgpu::TextureFormat::Bgra8UnormSrgb));
        assert!(!is_bgra(wgpu::TextureFormat::Rgba8UnormSrgb));
    }
}
