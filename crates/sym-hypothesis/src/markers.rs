//! `§n` transcript section anchors
//!
//! Consumers validating citations treat an out-of-range anchor as a
//! warning, never a hard failure: a bad anchor degrades a citation, it
//! does not invalidate the evidence.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static MARKER: Lazy<Regex> = Lazy::new(|| {
    // Fixed pattern, compiled once.
    Regex::new(r"§(\d+)").expect("valid section marker pattern")
});

/// One suspicious section anchor found in a text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerWarning {
    /// The referenced section number
    pub section: u32,
    /// Byte offset of the marker in the scanned text
    pub offset: usize,
    /// Highest valid section at scan time
    pub max_section: u32,
}

impl std::fmt::Display for MarkerWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "§{} at byte {} is outside 1..=§{}",
            self.section, self.offset, self.max_section
        )
    }
}

/// Scan a text for `§n` anchors outside `1..=max_section`
///
/// Returns the out-of-range anchors in document order; each is also
/// logged. In-range anchors produce nothing.
#[must_use]
pub fn verify_markers(text: &str, max_section: u32) -> Vec<MarkerWarning> {
    let mut warnings = Vec::new();
    for capture in MARKER.captures_iter(text) {
        let whole = capture.get(0).map_or(0, |m| m.start());
        // Digit runs too long for u32 are certainly out of range.
        let section = capture[1].parse::<u32>().unwrap_or(u32::MAX);
        if section == 0 || section > max_section {
            let warning = MarkerWarning {
                section,
                offset: whole,
                max_section,
            };
            warn!(%warning, "out-of-range section anchor");
            warnings.push(warning);
        }
    }
    warnings
}
