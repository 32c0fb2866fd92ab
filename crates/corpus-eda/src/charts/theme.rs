//! Process-wide chart style, initialised once before the first render.

use once_cell::sync::OnceCell;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Font family every chart text is drawn with.
pub const FONT_FAMILY: &str = "sans-serif";

/// Locations searched for a TrueType font when none is configured.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static THEME: OnceCell<ChartTheme> = OnceCell::new();

/// Colours, sizes and text settings shared by every chart.
#[derive(Debug, Clone)]
pub struct ChartTheme {
    pub histogram_size: (u32, u32),
    pub boxplot_size: (u32, u32),
    pub heatmap_size: (u32, u32),
    pub scatter_size: (u32, u32),

    pub background: RGBColor,
    pub grid: RGBColor,
    pub histogram_fill: RGBColor,
    pub density_line: RGBColor,
    pub boxplot_fill: RGBColor,
    pub scatter_point: RGBColor,
    pub scatter_alpha: f64,
    pub missing_cell: RGBColor,

    pub caption_size: u32,
    pub label_size: u32,
    pub annotation_size: u32,

    /// Whether a font was registered; without one, charts carry no text.
    pub labels: bool,
    /// The registered font file, if any.
    pub font: Option<PathBuf>,
}

impl ChartTheme {
    fn new(font: Option<PathBuf>) -> Self {
        Self {
            histogram_size: (800, 400),
            boxplot_size: (400, 600),
            heatmap_size: (800, 600),
            scatter_size: (800, 600),

            background: WHITE,
            grid: RGBColor(220, 220, 220),
            histogram_fill: RGBColor(135, 206, 235),
            density_line: RGBColor(70, 130, 180),
            boxplot_fill: RGBColor(240, 128, 128),
            scatter_point: RGBColor(0, 0, 139),
            scatter_alpha: 0.6,
            missing_cell: RGBColor(190, 190, 190),

            caption_size: 22,
            label_size: 15,
            annotation_size: 18,

            labels: font.is_some(),
            font,
        }
    }
}

/// Initialise the chart theme.
///
/// Only the first call has an effect; later calls return the theme built by
/// the first one.
pub fn init_theme(font_path: Option<&Path>) -> &'static ChartTheme {
    THEME.get_or_init(|| {
        let font = register_first_font(font_path);
        match &font {
            Some(path) => info!("Chart font: {}", path.display()),
            None => warn!("No usable TrueType font found; charts will be rendered without text"),
        }
        ChartTheme::new(font)
    })
}

/// The active theme, initialising it with system font discovery if needed.
pub fn theme() -> &'static ChartTheme {
    init_theme(None)
}

fn register_first_font(configured: Option<&Path>) -> Option<PathBuf> {
    let candidates = configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from));

    for path in candidates {
        match try_register_font(&path) {
            Ok(()) => return Some(path),
            Err(reason) => debug!("Skipping font {}: {}", path.display(), reason),
        }
    }
    None
}

fn try_register_font(path: &Path) -> Result<(), String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    // plotters keeps registered font data for the rest of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes)
        .map_err(|_| format!("{} is not a usable TrueType font", path.display()))
}
