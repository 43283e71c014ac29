use crate::error::CompareError;
use crate::style::rules::{sass_comparison_rules, Rule};
use log::{debug, trace};
use std::fs;
use std::path::Path;

/// Reshape Sass-compiled CSS so it can be diffed byte-for-byte against the
/// Less-compiled output.
///
/// Pure and total: the input is never modified and every rule that finds
/// nothing to rewrite is a no-op.
pub fn normalize(css_text: &str) -> String {
    normalize_with(css_text, sass_comparison_rules())
}

/// Run `rules` over `css_text` in order, each rule seeing the previous one's output.
pub fn normalize_with(css_text: &str, rules: &[Rule]) -> String {
    debug!(
        "Normalizing {} bytes of CSS with {} rules",
        css_text.len(),
        rules.len()
    );

    let normalized = rules.iter().fold(css_text.to_owned(), |text, rule| {
        let rewritten = rule.apply(&text);
        if rewritten != text {
            trace!(
                "{}: {} -> {} bytes",
                rule.description(),
                text.len(),
                rewritten.len()
            );
        }
        rewritten
    });

    debug!("Normalized CSS is {} bytes", normalized.len());
    normalized
}

/// Normalize the stylesheet at `path` in place.
pub fn normalize_file(path: &Path) -> Result<(), CompareError> {
    let css_text = fs::read_to_string(path)
        .map_err(|e| CompareError::io(format!("Error reading file \"{}\"", path.display()), e))?;

    let normalized = normalize(&css_text);

    fs::write(path, normalized)
        .map_err(|e| CompareError::io(format!("Error writing file \"{}\"", path.display()), e))
}
