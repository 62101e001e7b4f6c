/// Grouping strategies and the process-wide strategy registry.
///
/// A strategy maps a [`FileRecord`] to an optional group key string. All
/// strategies are pure over the file's persisted attributes and return
/// `None` on any read failure; a file whose key cannot be computed is simply
/// excluded from that scan's output.
///
/// Strategy ids are persisted in the tidy options document, so they are a
/// compatibility contract: renaming an id silently orphans saved
/// configuration entries.
///
/// # Examples
///
/// ```
/// use mediatidy::strategy::{all_strategies, strategy_by_id};
///
/// let extension = strategy_by_id("extension").unwrap();
/// assert_eq!(extension.display_name(), "By kind");
/// assert!(all_strategies().len() > 1);
/// ```
use crate::media_group::FileRecord;
use crate::metadata::{self, MediaKind};
use chrono::{DateTime, Datelike, Local};

/// Id of the sentinel "more" entry.
///
/// The sentinel is a placeholder the presentation layer uses to open the
/// configuration editor. It is never persisted and never produces keys.
pub const SENTINEL_ID: &str = "more";

/// Which file timestamp a date strategy reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Creation,
    Modification,
}

/// How much of the date becomes part of the group key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateGranularity {
    Day,
    Month,
    Year,
}

/// Which EXIF attribute an EXIF strategy reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExifField {
    ColorModel,
    FNumber,
    Model,
}

/// The behavior behind a strategy descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Group by lowercased file extension.
    Extension,
    /// Group by a formatted file timestamp.
    DateAttribute {
        source: DateSource,
        granularity: DateGranularity,
    },
    /// Group by an embedded image attribute (images only).
    ExifAttribute(ExifField),
    /// Group by displayed aspect, dispatching on the probed media kind.
    Orientation,
    /// The non-selectable configuration placeholder.
    More,
}

/// An immutable strategy descriptor from the registry.
#[derive(Debug, Clone, Copy)]
pub struct TidyStrategy {
    id: &'static str,
    display_name: &'static str,
    kind: StrategyKind,
}

impl TidyStrategy {
    /// Stable identifier, persisted in the tidy options document.
    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn display_name(&self) -> &'static str {
        self.display_name
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self.kind, StrategyKind::More)
    }

    /// Computes the group key for a file, or `None` to exclude it.
    pub fn group_key(&self, file: &FileRecord) -> Option<String> {
        match self.kind {
            StrategyKind::Extension => file.extension(),
            StrategyKind::DateAttribute {
                source,
                granularity,
            } => date_key(file, source, granularity),
            StrategyKind::ExifAttribute(field) => exif_key(file, field),
            StrategyKind::Orientation => orientation_key(file),
            StrategyKind::More => None,
        }
    }
}

static STRATEGIES: [TidyStrategy; 12] = [
    TidyStrategy {
        id: "extension",
        display_name: "By kind",
        kind: StrategyKind::Extension,
    },
    TidyStrategy {
        id: "orientation",
        display_name: "By orientation",
        kind: StrategyKind::Orientation,
    },
    TidyStrategy {
        id: "creation_day",
        display_name: "By creation day",
        kind: StrategyKind::DateAttribute {
            source: DateSource::Creation,
            granularity: DateGranularity::Day,
        },
    },
    TidyStrategy {
        id: "creation_month",
        display_name: "By creation month",
        kind: StrategyKind::DateAttribute {
            source: DateSource::Creation,
            granularity: DateGranularity::Month,
        },
    },
    TidyStrategy {
        id: "creation_year",
        display_name: "By creation year",
        kind: StrategyKind::DateAttribute {
            source: DateSource::Creation,
            granularity: DateGranularity::Year,
        },
    },
    TidyStrategy {
        id: "modification_day",
        display_name: "By modification day",
        kind: StrategyKind::DateAttribute {
            source: DateSource::Modification,
            granularity: DateGranularity::Day,
        },
    },
    TidyStrategy {
        id: "modification_month",
        display_name: "By modification month",
        kind: StrategyKind::DateAttribute {
            source: DateSource::Modification,
            granularity: DateGranularity::Month,
        },
    },
    TidyStrategy {
        id: "modification_year",
        display_name: "By modification year",
        kind: StrategyKind::DateAttribute {
            source: DateSource::Modification,
            granularity: DateGranularity::Year,
        },
    },
    TidyStrategy {
        id: "exif_model",
        display_name: "By camera model",
        kind: StrategyKind::ExifAttribute(ExifField::Model),
    },
    TidyStrategy {
        id: "exif_f_number",
        display_name: "By f-number",
        kind: StrategyKind::ExifAttribute(ExifField::FNumber),
    },
    TidyStrategy {
        id: "exif_color_model",
        display_name: "By color model",
        kind: StrategyKind::ExifAttribute(ExifField::ColorModel),
    },
    TidyStrategy {
        id: SENTINEL_ID,
        display_name: "More…",
        kind: StrategyKind::More,
    },
];

/// All known strategies, sentinel last. Read-only after process start.
pub fn all_strategies() -> &'static [TidyStrategy] {
    &STRATEGIES
}

/// Looks a strategy up by its stable id.
pub fn strategy_by_id(id: &str) -> Option<&'static TidyStrategy> {
    STRATEGIES.iter().find(|s| s.id == id)
}

fn date_key(file: &FileRecord, source: DateSource, granularity: DateGranularity) -> Option<String> {
    let time = match source {
        DateSource::Creation => file.created(),
        DateSource::Modification => file.modified(),
    }?;
    Some(format_date_key(time.into(), granularity))
}

/// Formats a timestamp as a group key.
///
/// Keys are numeric and non-zero-padded (`2023`, `2023-3`, `2023-3-7`).
/// This exact representation is what ends up as folder names on disk and
/// must stay stable across runs, so no locale formatting is involved.
fn format_date_key(moment: DateTime<Local>, granularity: DateGranularity) -> String {
    match granularity {
        DateGranularity::Year => format!("{}", moment.year()),
        DateGranularity::Month => format!("{}-{}", moment.year(), moment.month()),
        DateGranularity::Day => {
            format!("{}-{}-{}", moment.year(), moment.month(), moment.day())
        }
    }
}

fn exif_key(file: &FileRecord, field: ExifField) -> Option<String> {
    // Only image-family files are worth handing to the EXIF reader.
    if metadata::media_kind(file.path()) != MediaKind::Image {
        return None;
    }
    match field {
        ExifField::ColorModel => metadata::exif_color_model(file.path()),
        ExifField::FNumber => {
            metadata::exif_f_number(file.path()).map(|value| format!("F{}", value))
        }
        ExifField::Model => metadata::exif_camera_model(file.path()),
    }
}

/// The one runtime type dispatch among the strategies: images go through
/// the image decoder, videos through the container track, anything else is
/// excluded.
fn orientation_key(file: &FileRecord) -> Option<String> {
    let (width, height) = match metadata::media_kind(file.path()) {
        MediaKind::Image => metadata::image_dimensions(file.path())?,
        MediaKind::Video => metadata::video_display_size(file.path())?,
        MediaKind::Other => return None,
    };
    Some(metadata::ratio_name(width, height).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = all_strategies().iter().map(|s| s.id()).collect();
        assert_eq!(ids.len(), all_strategies().len());
    }

    #[test]
    fn test_sentinel_is_last_and_keyless() {
        let sentinel = all_strategies().last().expect("registry is not empty");
        assert!(sentinel.is_sentinel());
        assert_eq!(sentinel.id(), SENTINEL_ID);

        let record = FileRecord::new(PathBuf::from("/a/b.jpg"));
        assert_eq!(sentinel.group_key(&record), None);
    }

    #[test]
    fn test_lookup_by_id() {
        assert!(strategy_by_id("creation_month").is_some());
        assert!(strategy_by_id("no_such_strategy").is_none());
    }

    #[test]
    fn test_extension_key_is_lowercased() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("IMG_0001.JPG");
        fs::write(&path, "data").expect("Failed to write file");

        let strategy = strategy_by_id("extension").expect("known id");
        let key = strategy.group_key(&FileRecord::new(path));
        assert_eq!(key, Some("jpg".to_string()));
    }

    #[test]
    fn test_extensionless_file_has_no_key() {
        let strategy = strategy_by_id("extension").expect("known id");
        let record = FileRecord::new(PathBuf::from("/somewhere/README"));
        assert_eq!(strategy.group_key(&record), None);
    }

    #[test]
    fn test_date_key_formats_without_padding() {
        let moment = Local.with_ymd_and_hms(2023, 3, 7, 14, 30, 0).unwrap();
        assert_eq!(format_date_key(moment, DateGranularity::Day), "2023-3-7");
        assert_eq!(format_date_key(moment, DateGranularity::Month), "2023-3");
        assert_eq!(format_date_key(moment, DateGranularity::Year), "2023");
    }

    #[test]
    fn test_date_key_two_digit_components() {
        let moment = Local.with_ymd_and_hms(2021, 11, 23, 8, 0, 0).unwrap();
        assert_eq!(format_date_key(moment, DateGranularity::Day), "2021-11-23");
    }

    #[test]
    fn test_modification_day_key_for_real_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("note.txt");
        fs::write(&path, "x").expect("Failed to write file");

        let strategy = strategy_by_id("modification_day").expect("known id");
        let key = strategy
            .group_key(&FileRecord::new(path))
            .expect("fresh file has a modification time");

        // The file was written just now, so the key is today's.
        let today = Local::now();
        assert_eq!(
            key,
            format!("{}-{}-{}", today.year(), today.month(), today.day())
        );
    }

    #[test]
    fn test_exif_strategies_skip_non_images() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "definitely not an image").expect("Failed to write file");

        let record = FileRecord::new(path);
        for id in ["exif_model", "exif_f_number", "exif_color_model"] {
            let strategy = strategy_by_id(id).expect("known id");
            assert_eq!(strategy.group_key(&record), None, "strategy {}", id);
        }
    }

    #[test]
    fn test_orientation_key_for_image() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let wide = temp_dir.path().join("wide.png");
        image::RgbImage::new(8, 4)
            .save(&wide)
            .expect("Failed to save image");
        let tall = temp_dir.path().join("tall.png");
        image::RgbImage::new(4, 8)
            .save(&tall)
            .expect("Failed to save image");

        let strategy = strategy_by_id("orientation").expect("known id");
        assert_eq!(
            strategy.group_key(&FileRecord::new(wide)),
            Some("Landscape".to_string())
        );
        assert_eq!(
            strategy.group_key(&FileRecord::new(tall)),
            Some("Portrait".to_string())
        );
    }

    #[test]
    fn test_orientation_key_skips_other_kinds() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("data.bin");
        fs::write(&path, [0u8; 32]).expect("Failed to write file");

        let strategy = strategy_by_id("orientation").expect("known id");
        assert_eq!(strategy.group_key(&FileRecord::new(path)), None);
    }
}
