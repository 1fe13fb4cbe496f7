//! Plain-text usage report listing every discovered slot

use crate::catalog::slot::Slot;
use crate::io::error::{Result, fs_error};
use std::fmt::Write as _;
use std::path::Path;

/// First line of every report
pub const REPORT_TITLE: &str = "PictureChanger and Picture object usages and sizes";

/// Render one block per slot, sorted by container path then hierarchy path
pub fn render_report(slots: &[Slot]) -> String {
    let mut ordered: Vec<&Slot> = slots.iter().collect();
    ordered.sort_by(|a, b| {
        a.container
            .cmp(&b.container)
            .then_with(|| a.hierarchy_path.cmp(&b.hierarchy_path))
    });

    let mut text = String::new();
    let _ = writeln!(text, "{REPORT_TITLE}");
    let _ = writeln!(text);

    for slot in ordered {
        let _ = writeln!(text, "- {}: {}", slot.container_kind.label(), slot.container);
        let _ = writeln!(text, "  Object Type: {}", slot.kind.label());
        let _ = writeln!(text, "  GameObject: {}", slot.hierarchy_path);
        let _ = writeln!(text, "  Size group: {}", slot.size_group);
        if slot.sizes.is_empty() {
            let _ = writeln!(text, "  Textures: <none>");
        } else {
            let sizes: Vec<String> = slot.sizes.iter().map(|(w, h)| format!("{w}x{h}")).collect();
            let _ = writeln!(text, "  Textures: {}", sizes.join(", "));
        }
        let _ = writeln!(text);
    }
    text
}

/// Write the rendered report, creating its parent folder
///
/// # Errors
///
/// Returns an error if the folder or the file cannot be written
pub fn write_report(slots: &[Slot], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| fs_error(parent, "create directory", e))?;
    }
    std::fs::write(path, render_report(slots)).map_err(|e| fs_error(path, "write report", e))
}
