use anyhow::Context;
use common::metadata::{display_value, DESCRIPTION, IMAGE, NAME};
use common::{locator, Metadata, TokenId};
use std::path::{Path, PathBuf};

/// Width of the separator lines in console output.
pub const RULE_WIDTH: usize = 60;

pub fn banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\n{title}\n{rule}")
}

/// Human-readable summary of a metadata document.
///
/// Well-known fields come first (name, description, image, attributes),
/// then every other top-level field in document order.
pub fn render(metadata: &Metadata, gateway: &str) -> String {
    let mut lines = vec![String::new(), banner("METADATA ANALYSIS")];

    if let Some(name) = metadata.get(NAME) {
        lines.push(format!("\nName: {}", display_value(name)));
    }

    if let Some(description) = metadata.get(DESCRIPTION) {
        lines.push(format!("\nDescription: {}", display_value(description)));
    }

    if let Some(image) = metadata.get(IMAGE) {
        let image = match image.as_str() {
            Some(uri) => locator::resolve_locator(uri, gateway),
            None => display_value(image),
        };
        lines.push(format!("\nImage URL: {image}"));
    }

    if let Some(traits) = metadata.traits() {
        lines.push(format!("\nAttributes/Traits ({} total):", traits.len()));
        lines.push("-".repeat(RULE_WIDTH));
        for t in &traits {
            lines.push(format!("  • {}: {}", t.trait_type, t.value));
        }
    }

    let mut extra = metadata.extra_fields().peekable();
    if extra.peek().is_some() {
        lines.push("\nOther Fields:".to_string());
        for (key, value) in extra {
            lines.push(format!("  • {}: {}", key, display_value(value)));
        }
    }

    lines.join("\n")
}

/// `<dir>/<prefix>_<token_id>_metadata.json`
pub fn output_path(dir: &Path, prefix: &str, token_id: &TokenId) -> PathBuf {
    dir.join(format!("{prefix}_{token_id}_metadata.json"))
}

/// Write the full document as 2-space indented JSON, replacing any previous run's file.
pub fn persist(
    metadata: &Metadata,
    token_id: &TokenId,
    dir: &Path,
    prefix: &str,
) -> anyhow::Result<PathBuf> {
    let path = output_path(dir, prefix, token_id);
    let json = serde_json::to_string_pretty(metadata).context("failed to serialize metadata")?;
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
