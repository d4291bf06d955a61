//! Run configuration: plausibility range, category palette, row order and
//! the cosmetic map options handed through to the visualization layer.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use csv::Reader;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Inclusive bounds on the distance between consecutive observations, meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlausibilityRange {
    min_m: u32,
    max_m: u32,
}

impl PlausibilityRange {
    pub fn new(min_m: u32, max_m: u32) -> Result<Self> {
        if min_m > max_m {
            return Err(Error::DegenerateRange { min: min_m, max: max_m });
        }
        Ok(Self { min_m, max_m })
    }

    pub fn min_m(&self) -> u32 {
        self.min_m
    }

    pub fn max_m(&self) -> u32 {
        self.max_m
    }

    pub fn contains(&self, distance_m: f64) -> bool {
        distance_m >= f64::from(self.min_m) && distance_m <= f64::from(self.max_m)
    }
}

impl Default for PlausibilityRange {
    fn default() -> Self {
        Self { min_m: 0, max_m: 200 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStyle {
    pub label: String,
    pub rgba: [u8; 4],
}

/// Fixed mapping from category id to display color.
///
/// The palette's keys are also the set of categories every summary reports,
/// present in the data or not.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPalette {
    styles: BTreeMap<i64, CategoryStyle>,
}

impl CategoryPalette {
    pub fn new(styles: BTreeMap<i64, CategoryStyle>) -> Result<Self> {
        if styles.is_empty() {
            return Err(Error::Palette("palette has no categories".to_string()));
        }
        Ok(Self { styles })
    }

    pub fn color(&self, category: i64) -> Result<[u8; 4]> {
        self.styles
            .get(&category)
            .map(|s| s.rgba)
            .ok_or(Error::UnknownCategory(category))
    }

    pub fn categories(&self) -> impl Iterator<Item = i64> + '_ {
        self.styles.keys().copied()
    }

    /// (id, label, color) in ascending id order.
    pub fn legend(&self) -> Vec<(i64, &str, [u8; 4])> {
        self.styles
            .iter()
            .map(|(id, s)| (*id, s.label.as_str(), s.rgba))
            .collect()
    }
}

impl Default for CategoryPalette {
    fn default() -> Self {
        let builtin = [
            (1, "Blue", [0, 0, 255, 250]),
            (2, "Red", [255, 0, 0, 250]),
            (3, "Green", [0, 255, 0, 250]),
            (4, "Orange", [255, 106, 0, 250]),
            (5, "Dark Green", [0, 88, 0, 250]),
        ];
        let styles = builtin
            .into_iter()
            .map(|(id, label, rgba)| (id, CategoryStyle { label: label.to_string(), rgba }))
            .collect();
        Self { styles }
    }
}

#[derive(Debug, Deserialize)]
struct PaletteRecord {
    category: i64,
    label: String,
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

/// Load a palette from a `category,label,r,g,b,a` CSV file.
pub fn load_palette(path: &Path) -> Result<CategoryPalette> {
    let file = File::open(path)?;
    let mut rdr = Reader::from_reader(file);

    let mut styles = BTreeMap::new();
    for result in rdr.deserialize::<PaletteRecord>() {
        let record = result?;
        let style = CategoryStyle {
            label: record.label,
            rgba: [record.r, record.g, record.b, record.a],
        };
        if styles.insert(record.category, style).is_some() {
            return Err(Error::Palette(format!("category {} listed twice", record.category)));
        }
    }

    info!(path = %path.display(), categories = styles.len(), "loaded category palette");
    CategoryPalette::new(styles)
}

/// Use the palette file when one is given and exists, otherwise the built-in one.
pub fn load_palette_or_default(path: Option<&Path>) -> Result<CategoryPalette> {
    match path {
        Some(p) if p.exists() => load_palette(p),
        Some(p) => {
            warn!(path = %p.display(), "palette file not found, using built-in palette");
            Ok(CategoryPalette::default())
        }
        None => Ok(CategoryPalette::default()),
    }
}

/// Whether rows keep their upload order or are sorted by `time` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOrder {
    #[default]
    AsUploaded,
    ByTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapStyle {
    #[default]
    Dark,
    Light,
}

impl MapStyle {
    pub fn url(&self) -> &'static str {
        match self {
            MapStyle::Dark => "mapbox://styles/innodesign/ckl128luk027z17mwftpdxyg1",
            MapStyle::Light => "mapbox://styles/mapbox/streets-v8",
        }
    }
}

pub const MIN_MARKER_SIZE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapViewOptions {
    pub marker_size: u32,
    pub style: MapStyle,
}

impl MapViewOptions {
    pub fn new(marker_size: u32, style: MapStyle) -> Result<Self> {
        if marker_size < MIN_MARKER_SIZE {
            return Err(Error::InvalidMarkerSize(marker_size));
        }
        Ok(Self { marker_size, style })
    }
}

impl Default for MapViewOptions {
    fn default() -> Self {
        Self {
            marker_size: 8,
            style: MapStyle::Dark,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub range: PlausibilityRange,
    pub palette: CategoryPalette,
    pub order: RowOrder,
    pub map: MapViewOptions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_range_rejects_min_above_max() {
        assert!(matches!(
            PlausibilityRange::new(300, 200),
            Err(Error::DegenerateRange { min: 300, max: 200 })
        ));
        assert!(PlausibilityRange::new(50, 50).is_ok());
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = PlausibilityRange::new(10, 20).unwrap();
        assert!(range.contains(10.0));
        assert!(range.contains(20.0));
        assert!(!range.contains(9.99));
        assert!(!range.contains(20.01));
        assert_eq!(PlausibilityRange::default(), PlausibilityRange::new(0, 200).unwrap());
    }

    #[test]
    fn test_default_palette() {
        let palette = CategoryPalette::default();
        assert_eq!(palette.categories().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(palette.color(4).unwrap(), [255, 106, 0, 250]);
        assert!(matches!(palette.color(6), Err(Error::UnknownCategory(6))));
        assert_eq!(palette.legend()[4].1, "Dark Green");
    }

    #[test]
    fn test_marker_size_minimum() {
        assert!(matches!(MapViewOptions::new(1, MapStyle::Light), Err(Error::InvalidMarkerSize(1))));
        assert_eq!(MapViewOptions::new(2, MapStyle::Light).unwrap().marker_size, 2);
    }

    #[test]
    fn test_load_palette_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "category,label,r,g,b,a").unwrap();
        writeln!(file, "1,Walking,10,20,30,255").unwrap();
        writeln!(file, "7,Cycling,40,50,60,128").unwrap();
        file.flush().unwrap();

        let palette = load_palette(file.path()).unwrap();
        assert_eq!(palette.color(7).unwrap(), [40, 50, 60, 128]);
        assert!(palette.color(2).is_err());
    }

    #[test]
    fn test_load_palette_rejects_duplicates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "category,label,r,g,b,a\n1,A,0,0,0,0\n1,B,0,0,0,0").unwrap();
        file.flush().unwrap();
        assert!(matches!(load_palette(file.path()), Err(Error::Palette(_))));
    }

    #[test]
    fn test_missing_palette_file_falls_back() {
        let palette = load_palette_or_default(Some(Path::new("/nonexistent/palette.csv"))).unwrap();
        assert_eq!(palette, CategoryPalette::default());
    }
}
