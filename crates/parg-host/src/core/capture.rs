use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::engine::{FrameCapture, RowOrder};
use crate::error::HostError;

/// Finds `-capture <file>` in an engine argument list.
///
/// The flag needs a following value; when it repeats, the last one wins.
pub fn capture_path(args: &[String]) -> Option<PathBuf> {
    args.windows(2)
        .rfind(|pair| pair[0] == "-capture")
        .map(|pair| PathBuf::from(&pair[1]))
}

/// Reverses the order of `height` rows of `row_bytes` each, in place.
pub fn flip_rows(pixels: &mut [u8], row_bytes: usize, height: usize) {
    if row_bytes == 0 {
        return;
    }
    let rows = &mut pixels[..row_bytes * height];
    for top in 0..height / 2 {
        let bottom = height - 1 - top;
        let (head, tail) = rows.split_at_mut(bottom * row_bytes);
        head[top * row_bytes..(top + 1) * row_bytes].swap_with_slice(&mut tail[..row_bytes]);
    }
}

/// Writes a read-back frame as an RGBA PNG, top row first.
pub fn write_png(path: &Path, frame: FrameCapture) -> Result<(), HostError> {
    let FrameCapture {
        width,
        height,
        rows,
        mut rgba,
    } = frame;
    let fail = |reason: String| HostError::Capture {
        path: path.to_path_buf(),
        reason,
    };

    if rows == RowOrder::BottomUp {
        flip_rows(&mut rgba, width as usize * 4, height as usize);
    }

    let image = RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| fail(format!("pixel buffer does not hold {width}x{height} RGBA")))?;
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| fail(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    // ── arguments ──────────────────────────────────────────────────

    #[test]
    fn capture_takes_following_argument() {
        assert_eq!(
            capture_path(&args(&["-speed", "2", "-capture", "out.png"])),
            Some(PathBuf::from("out.png"))
        );
    }

    #[test]
    fn trailing_capture_flag_is_ignored() {
        assert_eq!(capture_path(&args(&["-capture"])), None);
        assert_eq!(capture_path(&args(&[])), None);
        assert_eq!(capture_path(&args(&["out.png"])), None);
    }

    #[test]
    fn last_capture_wins() {
        assert_eq!(
            capture_path(&args(&["-capture", "a.png", "-capture", "b.png"])),
            Some(PathBuf::from("b.png"))
        );
    }

    // ── rows ───────────────────────────────────────────────────────

    #[test]
    fn flip_reverses_rows() {
        let mut pixels = vec![1, 1, 2, 2, 3, 3];
        flip_rows(&mut pixels, 2, 3);
        assert_eq!(pixels, vec![3, 3, 2, 2, 1, 1]);

        let mut even = vec![1, 2, 3, 4];
        flip_rows(&mut even, 2, 2);
        assert_eq!(even, vec![3, 4, 1, 2]);
    }

    #[test]
    fn single_row_is_unchanged() {
        let mut pixels = vec![9, 8, 7, 6];
        flip_rows(&mut pixels, 4, 1);
        assert_eq!(pixels, vec![9, 8, 7, 6]);
    }

    // ── png ────────────────────────────────────────────────────────

    #[test]
    fn bottom_up_frame_is_written_top_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let frame = FrameCapture {
            width: 1,
            height: 2,
            rows: RowOrder::BottomUp,
            rgba: vec![0, 0, 255, 255, 255, 0, 0, 255],
        };

        write_png(&path, frame).unwrap();

        let image = image::open(&path).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (1, 2));
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(0, 1).0, [0, 0, 255, 255]);
    }

    #[test]
    fn short_buffer_is_capture_error() {
        let dir = tempfile::tempdir().unwrap();
        let frame = FrameCapture {
            width: 4,
            height: 4,
            rows: RowOrder::TopDown,
            rgba: vec![0; 8],
        };

        let err = write_png(&dir.path().join("short.png"), frame).unwrap_err();
        assert!(matches!(err, HostError::Capture { .. }));
    }
}
