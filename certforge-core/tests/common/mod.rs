//! Shared fixtures: a resource directory with system fonts and blank templates.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SYSTEM_FONTS: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
];

pub fn system_font() -> Option<PathBuf> {
    SYSTEM_FONTS.iter().map(PathBuf::from).find(|p| p.is_file())
}

/// Resource directory with no fonts and no templates
pub fn empty_resources() -> TempDir {
    TempDir::new().unwrap()
}

/// Resource directory with both fonts installed, or None without a system font
pub fn resources_with_fonts() -> Option<TempDir> {
    let font = system_font()?;
    let dir = TempDir::new().unwrap();
    fs::copy(&font, dir.path().join("SIMLI.TTF")).unwrap();
    fs::copy(&font, dir.path().join("timesbd.ttf")).unwrap();
    Some(dir)
}

/// White template large enough to hold every layout anchor
pub fn add_template(dir: &Path, filename: &str) {
    let img = image::RgbImage::from_pixel(1400, 1900, image::Rgb([255, 255, 255]));
    img.save(dir.join(filename)).unwrap();
}

pub fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
