use std::{fs, path::Path, sync::Arc};

use anyhow::Context;
use eframe::egui;

const EXTRA_FONT: &str = "planner-extra";

/// Appends the font at `path` as a fallback for both families, so glyphs the
/// bundled fonts lack (wire labels such as 日期 or 活動) still render.
pub fn install_fallback_font(ctx: &egui::Context, path: &Path) -> anyhow::Result<()> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read font file {}", path.display()))?;
    ctx.set_fonts(with_fallback(egui::FontDefinitions::default(), bytes));
    tracing::info!(font = %path.display(), "installed fallback font");
    Ok(())
}

fn with_fallback(mut fonts: egui::FontDefinitions, bytes: Vec<u8>) -> egui::FontDefinitions {
    fonts.font_data.insert(
        EXTRA_FONT.to_owned(),
        Arc::new(egui::FontData::from_owned(bytes)),
    );
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(EXTRA_FONT.to_owned());
    }
    fonts
}
