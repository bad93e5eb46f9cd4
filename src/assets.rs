//! # Static Assets
//!
//! Icons and fonts are loaded once at start-up and shared read-only between
//! requests.
//!
//! ## Icons
//! The icon directory holds PNGs named after [`Condition::asset_name`]:
//! - `cloudy.png`: standard resolution
//! - `cloudy@2x.png`: double resolution, used for the header
//! - `clear_night.png`: night variant of `clear_day.png` (optional)
//!
//! Only the alpha channel matters. Icons are kept as alpha masks and stamped
//! onto the 1-bit canvas with a hard threshold: no dithering, no blending.
//!
//! ## Fonts
//! Text uses the ISO-8859-1 mono fonts bundled with embedded-graphics, so the
//! degree sign is available without shipping font files.

use crate::conditions::Condition;
use embedded_graphics::{
    mono_font::{iso_8859_1, MonoFont},
    pixelcolor::BinaryColor,
    prelude::*,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Problems with a single asset. Never fatal: the element is left out.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("asset not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("could not decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Alpha channel of an icon
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IconMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl IconMask {
    pub fn from_rgba(image: &image::RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            alpha: image.pixels().map(|p| p.0[3]).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Paint black wherever alpha is strictly above `threshold`; leave the rest untouched.
    pub fn draw_thresholded<D>(&self, target: &mut D, origin: Point, threshold: u8) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let width = self.width as usize;
        let pixels = self.alpha.iter().enumerate().filter_map(|(i, &a)| {
            (a > threshold).then(|| {
                let x = (i % width) as i32;
                let y = (i / width) as i32;
                Pixel(origin + Point::new(x, y), BinaryColor::On)
            })
        });
        target.draw_iter(pixels)
    }
}

/// Resolved icon key, e.g. `partly_cloudy_night` or `rain@2x`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IconRef(String);

impl IconRef {
    pub fn key(&self) -> &str {
        &self.0
    }
}

/// Icon masks keyed by file stem.
#[derive(Clone, Debug, Default)]
pub struct IconLibrary {
    dir: PathBuf,
    icons: HashMap<String, IconMask>,
}

impl IconLibrary {
    /// Load every `*.png` in `dir`.
    ///
    /// A missing directory or an undecodable file is logged and skipped; the
    /// dashboard then renders without those icons.
    pub fn load<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let mut icons = HashMap::new();

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Icon directory unavailable, rendering without icons");
                return Self { dir, icons };
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("png") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match load_mask(&path) {
                Ok(mask) => {
                    debug!(icon = stem, width = mask.width, height = mask.height, "Loaded icon");
                    icons.insert(stem.to_string(), mask);
                }
                Err(e) => warn!(error = %e, "Skipping icon"),
            }
        }

        info!(dir = %dir.display(), count = icons.len(), "Icon library loaded");
        Self { dir, icons }
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.icons.contains_key(key)
    }

    /// Pick the icon for a weather code.
    ///
    /// `full_day` selects the compound daily table, `resolution == 2` the `@2x`
    /// file. With `night` set, the name's "day" becomes "night" when such a file
    /// was loaded; otherwise the day icon is used.
    ///
    /// Unmapped codes give `None`, and so do icons that were never loaded.
    pub fn icon_for(&self, code: i32, full_day: bool, night: bool, resolution: u8) -> Option<IconRef> {
        let name = Condition::classify(code, full_day).asset_name()?;
        let suffix = if resolution == 2 { "@2x" } else { "" };
        let day = IconRef(format!("{}{}", name, suffix));

        if night {
            let night_icon = IconRef(day.0.replace("day", "night"));
            if night_icon != day && self.contains(&night_icon.0) {
                return Some(night_icon);
            }
        }

        match self.get(&day) {
            Ok(_) => Some(day),
            Err(e) => {
                debug!(code, error = %e, "No icon for weather code");
                None
            }
        }
    }

    /// File an icon is (or would be) loaded from
    pub fn path_for(&self, icon: &IconRef) -> PathBuf {
        self.dir.join(format!("{}.png", icon.0))
    }

    pub fn get(&self, icon: &IconRef) -> Result<&IconMask, AssetError> {
        self.icons
            .get(&icon.0)
            .ok_or_else(|| AssetError::Missing(self.path_for(icon)))
    }
}

fn load_mask(path: &Path) -> Result<IconMask, AssetError> {
    let image = image::open(path).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(IconMask::from_rgba(&image.to_rgba8()))
}

/// Bundled ISO-8859-1 faces used on the dashboard
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontFace {
    Tiny5x8,
    Small6x12,
    Regular7x14,
    Bold6x13,
    Bold9x18,
    Large10x20,
}

impl FontFace {
    pub fn font(self) -> &'static MonoFont<'static> {
        match self {
            FontFace::Tiny5x8 => &iso_8859_1::FONT_5X8,
            FontFace::Small6x12 => &iso_8859_1::FONT_6X12,
            FontFace::Regular7x14 => &iso_8859_1::FONT_7X14,
            FontFace::Bold6x13 => &iso_8859_1::FONT_6X13_BOLD,
            FontFace::Bold9x18 => &iso_8859_1::FONT_9X18_BOLD,
            FontFace::Large10x20 => &iso_8859_1::FONT_10X20,
        }
    }
}

/// Font for each text role on the dashboard
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Typography {
    pub date: FontFace,
    pub updated: FontFace,
    pub temp_high: FontFace,
    pub temp_low: FontFace,
    pub curve_label: FontFace,
    pub axis_label: FontFace,
    pub wind: FontFace,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            date: FontFace::Regular7x14,
            updated: FontFace::Tiny5x8,
            temp_high: FontFace::Large10x20,
            temp_low: FontFace::Bold9x18,
            curve_label: FontFace::Small6x12,
            axis_label: FontFace::Small6x12,
            wind: FontFace::Bold6x13,
        }
    }
}

/// Everything the renderer reads from outside the forecast
#[derive(Clone, Debug, Default)]
pub struct Assets {
    pub icons: IconLibrary,
    pub typography: Typography,
}

impl Assets {
    pub fn load<P: AsRef<Path>>(icons_dir: P) -> Self {
        Self {
            icons: IconLibrary::load(icons_dir),
            typography: Typography::default(),
        }
    }
}
