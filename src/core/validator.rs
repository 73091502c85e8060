//! Image validation and color normalization

use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::{AnimationDecoder, DynamicImage, ImageDecoder, ImageFormat, ImageReader, ImageResult, Limits, RgbImage};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use super::error::SkipReason;
use super::job::DecoderLimits;

/// A decoded, validated image normalized to 8-bit RGB
///
/// Owns its pixel buffer outright; nothing refers back to the source file.
#[derive(Debug, Clone)]
pub struct AcceptedImage {
    pub path: PathBuf,
    pub image: RgbImage,
    /// Frames reported by the source file (1 for still images)
    pub frame_count: usize,
}

impl AcceptedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Load and validate an image file
///
/// # Arguments
/// * `path` - Candidate file that passed the extension filter
/// * `keep_animations` - Accept multi-frame files (first frame is kept)
/// * `limits` - Decoder allocation limits for this call
///
/// # Returns
/// The normalized image, or the reason it was skipped
pub fn load_image(
    path: &Path,
    keep_animations: bool,
    limits: DecoderLimits,
) -> Result<AcceptedImage, SkipReason> {
    // One read from disk; every later pass works on the in-memory bytes
    let bytes = fs::read(path).map_err(|e| SkipReason::from_io(path, &e))?;

    let format = detect_format(path, &bytes).ok_or_else(|| SkipReason::Unreadable {
        path: path.to_path_buf(),
        detail: "unrecognized image format".to_string(),
    })?;

    let decoded = decode(&bytes, format, limits.to_limits()).map_err(|e| unreadable(path, e))?;

    let frame_count =
        count_frames(&bytes, format, limits.to_limits()).map_err(|e| unreadable(path, e))?;
    if frame_count > 1 && !keep_animations {
        return Err(SkipReason::MultipleFrames {
            path: path.to_path_buf(),
            frames: frame_count,
        });
    }

    tracing::debug!(
        "Decoded {} as {:?} {}x{} ({:?}, {} frame(s))",
        path.display(),
        format,
        decoded.width(),
        decoded.height(),
        decoded.color(),
        frame_count
    );

    Ok(AcceptedImage {
        path: path.to_path_buf(),
        image: normalize(decoded),
        frame_count,
    })
}

/// Convert any color mode to 8-bit RGB, dropping alpha and palette data
pub fn normalize(image: DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.into_rgb8(),
    }
}

fn unreadable(path: &Path, err: image::ImageError) -> SkipReason {
    SkipReason::Unreadable {
        path: path.to_path_buf(),
        detail: err.to_string(),
    }
}

/// Sniff the format from content, falling back to the extension
fn detect_format(path: &Path, bytes: &[u8]) -> Option<ImageFormat> {
    let sniffed = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.format());
    sniffed.or_else(|| ImageFormat::from_path(path).ok())
}

fn decode(bytes: &[u8], format: ImageFormat, limits: Limits) -> ImageResult<DynamicImage> {
    let mut reader = ImageReader::with_format(Cursor::new(bytes), format);
    reader.limits(limits);
    reader.decode()
}

/// Number of frames stored in the file
///
/// Only GIF and APNG carry animations among the enabled decoders; every
/// other format counts as a single frame.
fn count_frames(bytes: &[u8], format: ImageFormat, limits: Limits) -> ImageResult<usize> {
    match format {
        ImageFormat::Gif => {
            let mut decoder = GifDecoder::new(Cursor::new(bytes))?;
            decoder.set_limits(limits)?;
            count_animation(decoder)
        }
        ImageFormat::Png => {
            let decoder = PngDecoder::with_limits(Cursor::new(bytes), limits)?;
            if decoder.is_apng()? {
                count_animation(decoder.apng()?)
            } else {
                Ok(1)
            }
        }
        _ => Ok(1),
    }
}

fn count_animation<'a, D: AnimationDecoder<'a>>(decoder: D) -> ImageResult<usize> {
    let mut frames = 0;
    for frame in decoder.into_frames() {
        frame?;
        frames += 1;
    }
    Ok(frames.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::{Frame, Rgba, RgbaImage};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_gif(path: &Path, frames: usize) {
        let file = fs::File::create(path).unwrap();
        let mut encoder = GifEncoder::new(file);
        for i in 0..frames {
            let shade = (i * 40) as u8;
            let buffer = RgbaImage::from_pixel(8, 8, Rgba([shade, 0, 255 - shade, 255]));
            encoder.encode_frame(Frame::new(buffer)).unwrap();
        }
    }

    #[test]
    fn test_load_png_normalizes_rgba() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alpha.png");
        RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 0])).save(&path).unwrap();

        let accepted = load_image(&path, false, DecoderLimits::Unlimited).unwrap();
        assert_eq!(accepted.dimensions(), (4, 3));
        assert_eq!(accepted.frame_count, 1);
        assert_eq!(accepted.image.get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn test_grayscale_becomes_rgb() {
        let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(2, 2, image::Luma([77])));
        let rgb = normalize(gray);
        assert_eq!(rgb.get_pixel(1, 1).0, [77, 77, 77]);
    }

    #[test]
    fn test_animated_gif_skipped_unless_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("anim.gif");
        write_gif(&path, 5);

        match load_image(&path, false, DecoderLimits::Unlimited) {
            Err(SkipReason::MultipleFrames { frames, .. }) => assert_eq!(frames, 5),
            other => panic!("expected multi-frame skip, got {:?}", other),
        }

        let kept = load_image(&path, true, DecoderLimits::Unlimited).unwrap();
        assert_eq!(kept.frame_count, 5);
        assert_eq!(kept.dimensions(), (8, 8));
    }

    #[test]
    fn test_single_frame_gif_accepted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("still.gif");
        write_gif(&path, 1);

        let accepted = load_image(&path, false, DecoderLimits::Unlimited).unwrap();
        assert_eq!(accepted.frame_count, 1);
    }

    #[test]
    fn test_garbage_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.jpg");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"definitely not a jpeg").unwrap();

        let result = load_image(&path, false, DecoderLimits::Unlimited);
        assert!(matches!(result, Err(SkipReason::Unreadable { .. })));
    }

    #[test]
    fn test_missing_file_is_os_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.png");

        let result = load_image(&path, false, DecoderLimits::Unlimited);
        assert!(matches!(result, Err(SkipReason::Os { .. })));
    }

    #[test]
    fn test_content_sniffing_beats_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("really_a_png.jpg");
        let mut bytes = Vec::new();
        RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 255]))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        fs::write(&path, bytes).unwrap();

        let accepted = load_image(&path, false, DecoderLimits::Unlimited).unwrap();
        assert_eq!(accepted.dimensions(), (3, 3));
    }
}
