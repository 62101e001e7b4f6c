//! Media metadata access for the EXIF and orientation strategies.
//!
//! Everything here degrades to `None` on unreadable or unsupported input:
//! metadata failures are per-file and must never abort a scan.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Broad media family of a file, detected from its leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

/// Probes the media family without decoding the file.
///
/// Unreadable files and unrecognized content count as [`MediaKind::Other`].
pub fn media_kind(path: &Path) -> MediaKind {
    match infer::get_from_path(path) {
        Ok(Some(kind)) => match kind.matcher_type() {
            infer::MatcherType::Image => MediaKind::Image,
            infer::MatcherType::Video => MediaKind::Video,
            _ => MediaKind::Other,
        },
        _ => MediaKind::Other,
    }
}

/// Names the aspect class of a pixel size.
///
/// ```
/// use mediatidy::metadata::ratio_name;
///
/// assert_eq!(ratio_name(100, 100), "Square");
/// assert_eq!(ratio_name(1920, 1080), "Landscape");
/// assert_eq!(ratio_name(1080, 1920), "Portrait");
/// ```
pub fn ratio_name(width: u32, height: u32) -> &'static str {
    if width == height {
        "Square"
    } else if width > height {
        "Landscape"
    } else {
        "Portrait"
    }
}

/// Decoded pixel dimensions of an image, from the header only.
pub fn image_dimensions(path: &Path) -> Option<(u32, u32)> {
    let reader = image::ImageReader::open(path)
        .ok()?
        .with_guessed_format()
        .ok()?;
    reader.into_dimensions().ok()
}

/// The color space string recorded in the image's EXIF block.
pub fn exif_color_model(path: &Path) -> Option<String> {
    let exif = read_exif(path)?;
    let field = exif.get_field(exif::Tag::ColorSpace, exif::In::PRIMARY)?;
    let value = field.display_value().to_string();
    if value.is_empty() { None } else { Some(value) }
}

/// The f-number the image was taken at.
pub fn exif_f_number(path: &Path) -> Option<f64> {
    let exif = read_exif(path)?;
    let field = exif.get_field(exif::Tag::FNumber, exif::In::PRIMARY)?;
    match &field.value {
        exif::Value::Rational(values) => values.first().map(|r| r.to_f64()),
        _ => None,
    }
}

/// Camera make and model joined with a space.
///
/// Either part may be missing; only when both are absent does this return
/// `None`.
pub fn exif_camera_model(path: &Path) -> Option<String> {
    let exif = read_exif(path)?;
    let make = ascii_field(&exif, exif::Tag::Make);
    let model = ascii_field(&exif, exif::Tag::Model);
    match (make, model) {
        (None, None) => None,
        (parts_make, parts_model) => {
            let joined = [parts_make, parts_model]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            Some(joined)
        }
    }
}

/// Presentation size of the first video track, transform applied.
///
/// MP4/QuickTime containers store the coded size together with a display
/// matrix; a 90 or 270 degree matrix swaps the axes on screen, so the
/// returned width/height are the absolute displayed dimensions.
pub fn video_display_size(path: &Path) -> Option<(u32, u32)> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let context = mp4parse::read_mp4(&mut reader).ok()?;

    let track = context
        .tracks
        .iter()
        .find(|t| matches!(t.track_type, mp4parse::TrackType::Video))?;
    let tkhd = track.tkhd.as_ref()?;

    // tkhd width/height are 16.16 fixed point.
    let width = tkhd.width >> 16;
    let height = tkhd.height >> 16;
    if width == 0 || height == 0 {
        return None;
    }

    let matrix = &tkhd.matrix;
    if matrix.a == 0 && matrix.d == 0 {
        Some((height, width))
    } else {
        Some((width, height))
    }
}

fn read_exif(path: &Path) -> Option<exif::Exif> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    exif::Reader::new().read_from_container(&mut reader).ok()
}

fn ascii_field(exif: &exif::Exif, tag: exif::Tag) -> Option<String> {
    let field = exif.get_field(tag, exif::In::PRIMARY)?;
    match &field.value {
        exif::Value::Ascii(parts) => {
            let text = String::from_utf8_lossy(parts.first()?).trim().to_string();
            if text.is_empty() { None } else { Some(text) }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    // Minimal ftyp box with an isom brand.
    const MP4_MAGIC: &[u8] = &[
        0x00, 0x00, 0x00, 0x18, b'f', b't', b'y', b'p', b'i', b's', b'o', b'm',
    ];

    #[test]
    fn test_ratio_name() {
        assert_eq!(ratio_name(640, 640), "Square");
        assert_eq!(ratio_name(640, 480), "Landscape");
        assert_eq!(ratio_name(480, 640), "Portrait");
    }

    #[test]
    fn test_media_kind_detects_image_magic() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("picture.png");
        fs::write(&path, PNG_MAGIC).expect("Failed to write file");

        assert_eq!(media_kind(&path), MediaKind::Image);
    }

    #[test]
    fn test_media_kind_detects_video_magic() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("clip.mp4");
        fs::write(&path, MP4_MAGIC).expect("Failed to write file");

        assert_eq!(media_kind(&path), MediaKind::Video);
    }

    #[test]
    fn test_media_kind_plain_text_is_other() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "just text").expect("Failed to write file");

        assert_eq!(media_kind(&path), MediaKind::Other);
        assert_eq!(media_kind(&temp_dir.path().join("missing")), MediaKind::Other);
    }

    #[test]
    fn test_image_dimensions_from_encoded_image() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("wide.png");
        image::RgbImage::new(6, 2)
            .save(&path)
            .expect("Failed to save image");

        assert_eq!(image_dimensions(&path), Some((6, 2)));
    }

    #[test]
    fn test_image_dimensions_rejects_truncated_image() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("broken.png");
        fs::write(&path, PNG_MAGIC).expect("Failed to write file");

        assert_eq!(image_dimensions(&path), None);
    }

    #[test]
    fn test_video_display_size_rejects_truncated_container() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("stub.mp4");
        fs::write(&path, MP4_MAGIC).expect("Failed to write file");

        assert_eq!(video_display_size(&path), None);
    }

    #[test]
    fn test_exif_fields_absent_without_exif_block() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("plain.png");
        image::RgbImage::new(2, 2)
            .save(&path)
            .expect("Failed to save image");

        assert_eq!(exif_color_model(&path), None);
        assert_eq!(exif_f_number(&path), None);
        assert_eq!(exif_camera_model(&path), None);
    }
}
