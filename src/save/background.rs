//! Classification of legacy freeform CSS `background` strings.

use crate::save::model::{BackgroundDef, BackgroundKind};

/// What a legacy background string turned out to be.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LegacyBackground {
    Color(String),
    Gradient(String),
    /// Image path, with the `url(...)` wrapper and quotes removed.
    Image(String),
}

/// Classify a CSS background string; `None` when nothing recognisable was found.
pub fn classify(css: &str) -> Option<LegacyBackground> {
    let s = css.trim();
    if is_hex_color(s) || is_rgb_function(s) {
        return Some(LegacyBackground::Color(s.to_owned()));
    }
    if s.contains("gradient(") {
        return Some(LegacyBackground::Gradient(s.to_owned()));
    }
    if let Some(path) = url_path(s) {
        return Some(LegacyBackground::Image(path.to_owned()));
    }
    None
}

impl LegacyBackground {
    /// Structured descriptor with the other slots left empty.
    pub fn into_def(self, size: String, repeat: String) -> BackgroundDef {
        let (kind, last_color, last_gradient, last_image) = match self {
            Self::Color(c) => (BackgroundKind::Color, c, String::new(), String::new()),
            Self::Gradient(g) => (BackgroundKind::Gradient, String::new(), g, String::new()),
            Self::Image(i) => (BackgroundKind::Image, String::new(), String::new(), i),
        };
        BackgroundDef {
            kind,
            last_color,
            last_gradient,
            last_image,
            size,
            repeat,
        }
    }
}

fn is_hex_color(s: &str) -> bool {
    let Some(digits) = s.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 4 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

fn is_rgb_function(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    let (inner, expected) = if let Some(rest) = lower.strip_prefix("rgba(") {
        (rest, 4)
    } else if let Some(rest) = lower.strip_prefix("rgb(") {
        (rest, 3)
    } else {
        return false;
    };
    let Some(inner) = inner.strip_suffix(')') else {
        return false;
    };

    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    parts.len() == expected
        && parts.iter().all(|p| {
            let p = p.strip_suffix('%').unwrap_or(p);
            !p.is_empty() && p.parse::<f64>().is_ok_and(f64::is_finite)
        })
}

fn url_path(s: &str) -> Option<&str> {
    let inner = s.strip_prefix("url(")?;
    let end = inner.rfind(')')?;
    let path = inner[..end].trim().trim_matches(|c| c == '"' || c == '\'');
    (!path.is_empty()).then_some(path)
}

#[cfg(test)]
#[path = "../../tests/unit/save/background.rs"]
mod tests;
