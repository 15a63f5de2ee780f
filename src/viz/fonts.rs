//! One-time registration of the "sans-serif" font used by the `ab_glyph`
//! text path. `ab_glyph` doesn't discover OS fonts, so a TrueType/OpenType
//! file is located and registered once per process.
//!
//! Lookup order: the explicit path (CLI `--font`), the `CHARTGRID_FONT`
//! environment variable, well-known system locations, then the user's font
//! directory.

use anyhow::{Result, anyhow};
use plotters::style::FontStyle;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const FONT_ENV: &str = "CHARTGRID_FONT";

const SYSTEM_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static REGISTERED: OnceLock<Result<PathBuf, String>> = OnceLock::new();

/// Register the sans-serif font if that has not happened yet and return the
/// path it was loaded from. Later calls return the first outcome; `explicit`
/// only matters on the first call.
pub fn ensure_font(explicit: Option<&Path>) -> Result<PathBuf> {
    REGISTERED
        .get_or_init(|| register(explicit))
        .clone()
        .map_err(|e| anyhow!(e))
}

fn register(explicit: Option<&Path>) -> Result<PathBuf, String> {
    let candidates = candidate_paths(explicit);
    let mut last_err = String::from("no font file found");
    for path in candidates {
        match std::fs::read(&path) {
            Ok(bytes) => {
                let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
                match plotters::style::register_font("sans-serif", FontStyle::Normal, bytes) {
                    Ok(()) => {
                        log::info!("registered font {}", path.display());
                        return Ok(path);
                    }
                    Err(_) => {
                        log::warn!("{} is not a usable font", path.display());
                        last_err = format!("{} is not a usable font", path.display());
                    }
                }
            }
            Err(e) => {
                log::debug!("font candidate {}: {e}", path.display());
                last_err = format!("cannot read {}: {e}", path.display());
            }
        }
    }
    Err(format!(
        "{last_err}; pass --font or set {FONT_ENV} to a TrueType/OpenType file"
    ))
}

fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    // An explicit choice is never silently replaced by a fallback.
    if let Some(p) = explicit {
        return vec![p.to_path_buf()];
    }
    if let Some(p) = std::env::var_os(FONT_ENV).filter(|p| !p.is_empty()) {
        return vec![PathBuf::from(p)];
    }
    let mut out: Vec<PathBuf> = SYSTEM_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .filter(|p| p.is_file())
        .collect();
    if let Some(dir) = dirs::font_dir() {
        out.extend(scan_font_dir(&dir));
    }
    out
}

/// TrueType/OpenType files directly inside `dir` or one level below,
/// sorted so results are stable.
fn scan_font_dir(dir: &Path) -> Vec<PathBuf> {
    let is_font = |p: &Path| {
        p.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
    };
    let mut found = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return found;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if let Ok(inner) = std::fs::read_dir(&path) {
                found.extend(inner.flatten().map(|e| e.path()).filter(|p| is_font(p)));
            }
        } else if is_font(&path) {
            found.push(path);
        }
    }
    found.sort();
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_is_the_only_candidate() {
        let p = Path::new("/nonexistent/font.ttf");
        assert_eq!(candidate_paths(Some(p)), vec![p.to_path_buf()]);
    }

    #[test]
    fn scan_finds_nested_font_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.TTF"), b"x").unwrap();
        std::fs::write(dir.path().join("sub").join("b.otf"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        let found = scan_font_dir(dir.path());
        assert_eq!(found.len(), 2);
    }
}
