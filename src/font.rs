//! Font lookup for label text.
//!
//! [`FontBook::load_font`] always hands back something that can measure and
//! draw text. Outline fonts (TrueType/OpenType) are found by path or by file
//! name under the book's directories; when nothing usable turns up the
//! built-in 8x8 bitmap font is used at a fixed size.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use log::{debug, info, warn};
use thiserror::Error;
use walkdir::WalkDir;

/// Font file looked up when the caller does not name one.
pub const DEFAULT_FONT_NAME: &str = "DejaVuSans.ttf";

/// Label font size as a fraction of the image width.
pub const FONT_SIZE_RATIO: f32 = 0.03;

/// Environment variable holding extra font directories (platform path list).
pub const FONT_DIRS_ENV: &str = "BOXTAG_FONT_DIRS";

/// Integer upscale applied to the 8x8 bitmap glyphs.
const BITMAP_SCALE: u32 = 2;
const BITMAP_GLYPH: u32 = 8;

#[derive(Debug, Error)]
enum FontError {
    #[error("no font named '{0}' in the search path")]
    NotFound(String),

    #[error("failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a usable font file")]
    Invalid { path: PathBuf },
}

/// A font ready to measure and draw label text.
#[derive(Clone, Debug)]
pub enum LabelFont {
    /// A parsed outline font at a pixel scale.
    Outline { font: FontArc, scale: PxScale },
    /// The built-in bitmap font; its size does not follow the image.
    Bitmap,
}

impl LabelFont {
    /// The fixed-size font used when no outline font can be loaded.
    pub fn fallback() -> Self {
        LabelFont::Bitmap
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, LabelFont::Bitmap)
    }

    /// Returns the rendered `(width, height)` of `text` in pixels.
    ///
    /// The height is the font's line height, so it is the same for every
    /// string, including the empty one.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        match self {
            LabelFont::Outline { font, scale } => {
                let (width, _) = text_size(*scale, font, text);
                let height = font.as_scaled(*scale).height().ceil().max(0.0) as u32;
                (width, height)
            }
            LabelFont::Bitmap => {
                let advance = BITMAP_GLYPH * BITMAP_SCALE;
                let chars = text.chars().count() as u32;
                (chars.saturating_mul(advance), advance)
            }
        }
    }

    /// Draws `text` with its top-left corner at `(x, y)`. Pixels outside
    /// the image are skipped.
    pub fn draw(&self, image: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, text: &str) {
        match self {
            LabelFont::Outline { font, scale } => {
                draw_text_mut(image, color, x, y, *scale, font, text);
            }
            LabelFont::Bitmap => draw_bitmap_text(image, color, x, y, text),
        }
    }
}

fn draw_bitmap_text(image: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, text: &str) {
    let (width, height) = (image.width() as i64, image.height() as i64);
    let scale = BITMAP_SCALE as i64;
    let advance = (BITMAP_GLYPH * BITMAP_SCALE) as i64;

    for (i, ch) in text.chars().enumerate() {
        let origin_x = x as i64 + i as i64 * advance;
        if origin_x >= width {
            break;
        }
        if origin_x + advance <= 0 {
            continue;
        }
        let Some(rows) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            continue;
        };
        for (row_idx, row) in rows.iter().enumerate() {
            for bit in 0..BITMAP_GLYPH {
                // Bit 0 is the leftmost column.
                if (row >> bit) & 1 == 0 {
                    continue;
                }
                let px = origin_x + bit as i64 * scale;
                let py = y as i64 + row_idx as i64 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        let (cx, cy) = (px + dx, py + dy);
                        if (0..width).contains(&cx) && (0..height).contains(&cy) {
                            image.put_pixel(cx as u32, cy as u32, color);
                        }
                    }
                }
            }
        }
    }
}

/// A set of directories to search for font files.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    dirs: Vec<PathBuf>,
}

impl FontBook {
    pub fn new(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            dirs: dirs.into_iter().collect(),
        }
    }

    /// A book with no directories; only explicit paths resolve.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Directories from `BOXTAG_FONT_DIRS`, followed by the platform's
    /// usual system font directories.
    pub fn from_env() -> Self {
        let mut dirs: Vec<PathBuf> = env::var_os(FONT_DIRS_ENV)
            .map(|paths| env::split_paths(&paths).collect())
            .unwrap_or_default();
        dirs.extend(system_font_dirs());
        Self { dirs }
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dirs.push(dir.into());
        self
    }

    /// Appends `other`'s directories after this book's own.
    pub fn extend_from(mut self, other: FontBook) -> Self {
        self.dirs.extend(other.dirs);
        self
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Finds a font file by path, or by file name under the search
    /// directories. Names without an extension also try `.ttf` and `.otf`.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let direct = Path::new(name);
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }

        let candidates: Vec<String> = if direct.extension().is_some() {
            vec![name.to_string()]
        } else {
            vec![format!("{}.ttf", name), format!("{}.otf", name)]
        };

        self.dirs.iter().filter(|dir| dir.is_dir()).find_map(|dir| {
            WalkDir::new(dir)
                .follow_links(true)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .find(|entry| {
                    let file_name = entry.file_name().to_string_lossy();
                    candidates.iter().any(|c| file_name.eq_ignore_ascii_case(c))
                })
                .map(|entry| entry.into_path())
        })
    }

    /// Loads `name` at `size` pixels, falling back to the bitmap font.
    ///
    /// Never fails: a missing, unreadable or malformed font is logged and
    /// replaced by [`LabelFont::fallback`].
    pub fn load_font(&self, name: &str, size: f32) -> LabelFont {
        match self.try_load(name, size) {
            Ok(font) => font,
            Err(err @ FontError::NotFound(_)) => {
                info!("{}; using built-in bitmap font", err);
                LabelFont::fallback()
            }
            Err(err) => {
                warn!("{}; using built-in bitmap font", err);
                LabelFont::fallback()
            }
        }
    }

    /// Loads `name` sized for labels on an image `image_width` pixels wide.
    pub fn font_for_width(&self, name: &str, image_width: u32) -> LabelFont {
        self.load_font(name, label_font_size(image_width))
    }

    fn try_load(&self, name: &str, size: f32) -> Result<LabelFont, FontError> {
        let path = self
            .locate(name)
            .ok_or_else(|| FontError::NotFound(name.to_string()))?;
        let data = fs::read(&path).map_err(|source| FontError::Read {
            path: path.clone(),
            source,
        })?;
        let font = FontArc::try_from_vec(data).map_err(|_| FontError::Invalid { path: path.clone() })?;
        debug!("loaded font {} at {:.1}px", path.display(), size);
        Ok(LabelFont::Outline {
            font,
            scale: PxScale::from(size),
        })
    }
}

/// Font size in pixels for labels on an image of the given width.
pub fn label_font_size(image_width: u32) -> f32 {
    (image_width as f32 * FONT_SIZE_RATIO).round().max(1.0)
}

fn system_font_dirs() -> Vec<PathBuf> {
    let home = env::var_os("HOME").map(PathBuf::from);
    let mut dirs = Vec::new();
    if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
        if let Some(home) = &home {
            dirs.push(home.join("Library/Fonts"));
        }
    } else if cfg!(target_os = "windows") {
        let windir = env::var_os("WINDIR").unwrap_or_else(|| "C:\\Windows".into());
        dirs.push(PathBuf::from(windir).join("Fonts"));
    } else {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(home) = &home {
            dirs.push(home.join(".local/share/fonts"));
            dirs.push(home.join(".fonts"));
        }
    }
    dirs
}
