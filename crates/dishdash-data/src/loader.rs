//! Loading pipeline: finds the kitchen's data files, deserializes them, and
//! builds the core grid and configuration.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers, plus [`load_kitchen_data`] which ties them
//! together for a data directory.

use std::path::{Path, PathBuf};

use dishdash_core::config::KitchenConfig;
use dishdash_core::engine::Kitchen;
use dishdash_core::grid::{GridError, TileGrid, TileKind};
use serde::de::DeserializeOwned;

use crate::schema::{LayoutData, TuningData};

/// Base name of the required layout file.
pub const LAYOUT_FILE: &str = "layout";
/// Base name of the optional tuning file.
pub const TUNING_FILE: &str = "tuning";

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: &'static str, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The layout rows do not form a valid grid.
    #[error("invalid layout in {file}: {source}")]
    Layout { file: PathBuf, source: GridError },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &'static str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name,
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    let parse_error = |detail: String| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    };

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
    }
}

// ===========================================================================
// Kitchen data
// ===========================================================================

/// Everything needed to build a [`Kitchen`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitchenData {
    pub grid: TileGrid,
    pub config: KitchenConfig,
}

impl KitchenData {
    pub fn into_kitchen(self) -> Kitchen {
        Kitchen::new(self.grid, self.config)
    }
}

/// Load `layout.*` (required) and `tuning.*` (optional) from `dir`.
pub fn load_kitchen_data(dir: &Path) -> Result<KitchenData, DataLoadError> {
    let layout_path = require_data_file(dir, LAYOUT_FILE)?;
    let layout: LayoutData = deserialize_file(&layout_path)?;
    let grid = layout.to_grid().map_err(|source| DataLoadError::Layout {
        file: layout_path.clone(),
        source,
    })?;
    if grid.positions_of(TileKind::Table).is_empty() {
        log::warn!(
            "{} has no tables; every arriving customer ends the game",
            layout_path.display()
        );
    }

    let config = match find_data_file(dir, TUNING_FILE)? {
        Some(path) => {
            let tuning: TuningData = deserialize_file(&path)?;
            log::debug!("applying tuning from {}", path.display());
            tuning.apply(KitchenConfig::default())
        }
        None => {
            log::info!("no tuning file in {}; using defaults", dir.display());
            KitchenConfig::default()
        }
    };

    log::info!(
        "loaded {}x{} kitchen from {}",
        grid.columns(),
        grid.rows(),
        layout_path.display()
    );
    Ok(KitchenData { grid, config })
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use dishdash_core::item::FoodCategory;
    use dishdash_core::id::TilePoint;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "dishdash_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("layout.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("layout.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("layout.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        for name in ["layout.yaml", "layout"] {
            assert!(matches!(
                detect_format(Path::new(name)),
                Err(DataLoadError::UnsupportedFormat { .. })
            ));
        }
    }

    // -----------------------------------------------------------------------
    // find_data_file / require_data_file
    // -----------------------------------------------------------------------

    #[test]
    fn find_data_file_found_and_missing() {
        let dir = make_test_dir("find");
        assert_eq!(find_data_file(&dir, "layout").unwrap(), None);

        fs::write(dir.join("layout.toml"), "").unwrap();
        assert_eq!(
            find_data_file(&dir, "layout").unwrap(),
            Some(dir.join("layout.toml"))
        );

        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("tuning.ron"), "()").unwrap();
        fs::write(dir.join("tuning.json"), "{}").unwrap();

        let result = find_data_file(&dir, "tuning");
        assert!(matches!(
            result,
            Err(DataLoadError::ConflictingFormats { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn require_data_file_missing() {
        let dir = make_test_dir("require_missing");

        let result = require_data_file(&dir, LAYOUT_FILE);
        assert!(matches!(
            result,
            Err(DataLoadError::MissingRequired { file: "layout", .. })
        ));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // deserialize_file
    // -----------------------------------------------------------------------

    #[test]
    fn deserialize_file_parse_error() {
        let dir = make_test_dir("deser_parse_err");
        let path = dir.join("layout.ron");
        fs::write(&path, "this is not valid RON {{{").unwrap();

        let result: Result<LayoutData, _> = deserialize_file(&path);
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // load_kitchen_data
    // -----------------------------------------------------------------------

    #[test]
    fn loads_layout_without_tuning() {
        let dir = make_test_dir("load_layout_only");
        fs::write(dir.join("layout.json"), r#"{ "rows": ["CMS", "XT."] }"#).unwrap();

        let data = load_kitchen_data(&dir).unwrap();
        assert_eq!(data.grid.kind_at(TilePoint::new(1, 1)), TileKind::Table);
        assert_eq!(data.config, KitchenConfig::default());

        cleanup(&dir);
    }

    #[test]
    fn loads_layout_and_tuning() {
        let dir = make_test_dir("load_both");
        fs::write(dir.join("layout.toml"), "rows = [\"CM\", \"TT\"]\n").unwrap();
        fs::write(
            dir.join("tuning.ron"),
            "(category: Some(Steak), points_per_serve: Some(3), spawn_on_start: Some(false))",
        )
        .unwrap();

        let data = load_kitchen_data(&dir).unwrap();
        assert_eq!(data.config.category, FoodCategory::Steak);
        assert_eq!(data.config.points_per_serve, 3);
        assert!(!data.config.spawn_on_start);

        let mut kitchen = data.into_kitchen();
        kitchen.start().unwrap();
        assert_eq!(kitchen.next_customer_in(), None);

        cleanup(&dir);
    }

    #[test]
    fn ragged_layout_is_a_layout_error() {
        let dir = make_test_dir("load_ragged");
        fs::write(dir.join("layout.ron"), r#"(rows: ["CCC", "C"])"#).unwrap();

        let result = load_kitchen_data(&dir);
        assert!(matches!(
            result,
            Err(DataLoadError::Layout {
                source: GridError::RaggedRow { row: 1, .. },
                ..
            })
        ));

        cleanup(&dir);
    }

    #[test]
    fn missing_layout_is_reported() {
        let dir = make_test_dir("load_missing");
        fs::write(dir.join("tuning.json"), "{}").unwrap();

        assert!(matches!(
            load_kitchen_data(&dir),
            Err(DataLoadError::MissingRequired { .. })
        ));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // Error display messages
    // -----------------------------------------------------------------------

    #[test]
    fn error_display_messages() {
        let e = DataLoadError::MissingRequired {
            file: "layout",
            dir: PathBuf::from("/data"),
        };
        assert!(format!("{e}").contains("layout"));
        assert!(format!("{e}").contains("/data"));

        let e = DataLoadError::ConflictingFormats {
            a: PathBuf::from("tuning.ron"),
            b: PathBuf::from("tuning.json"),
        };
        let msg = format!("{e}");
        assert!(msg.contains("tuning.ron"));
        assert!(msg.contains("tuning.json"));

        let e = DataLoadError::Layout {
            file: PathBuf::from("layout.ron"),
            source: GridError::Empty,
        };
        assert_eq!(format!("{e}"), "invalid layout in layout.ron: layout has no rows");
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let data_err: DataLoadError = io_err.into();
        assert!(matches!(data_err, DataLoadError::Io(_)));
        assert!(format!("{data_err}").contains("file not found"));
    }
}
