//! Color utilities for severities and correlation ids.

use owo_colors::{AnsiColors, DynColors, OwoColorize, Style};

use crate::severity::Severity;

/// 12 visually distinct ANSI colors for correlation id coloring
///
/// Standard and bright variants, readable on both light and dark backgrounds.
const ID_COLORS: [AnsiColors; 12] = [
    AnsiColors::Red,
    AnsiColors::Green,
    AnsiColors::Yellow,
    AnsiColors::Blue,
    AnsiColors::Magenta,
    AnsiColors::Cyan,
    AnsiColors::BrightRed,
    AnsiColors::BrightGreen,
    AnsiColors::BrightYellow,
    AnsiColors::BrightBlue,
    AnsiColors::BrightMagenta,
    AnsiColors::BrightCyan,
];

/// Deterministically maps a correlation id to one of the palette colors
///
/// The same id always gets the same color, so the lines of one request stand
/// out among interleaved requests.
pub fn get_color_for_id(id: &str) -> AnsiColors {
    let hash = id
        .chars()
        .fold(0u32, |acc, c| acc.wrapping_mul(31).wrapping_add(c as u32));
    ID_COLORS[(hash as usize) % ID_COLORS.len()]
}

/// Syslog palette: red for error and worse (alert in yellow), yellow for
/// notice, green for info, blue for debug.
pub fn get_color_for_severity(severity: Severity) -> AnsiColors {
    match severity {
        Severity::Emerg | Severity::Crit | Severity::Error | Severity::Warning => AnsiColors::Red,
        Severity::Alert | Severity::Notice => AnsiColors::Yellow,
        Severity::Info => AnsiColors::Green,
        Severity::Debug => AnsiColors::Blue,
    }
}

/// Formats a correlation id as `[id]`, colored when `colorize` is set.
pub fn bracketed_id(id: &str, colorize: bool) -> String {
    if colorize {
        let style = Style::new().color(DynColors::Ansi(get_color_for_id(id)));
        format!("[{}]", id).style(style).to_string()
    } else {
        format!("[{}]", id)
    }
}

/// Renders a severity name, colored when `colorize` is set.
pub fn severity_label(severity: Severity, colorize: bool) -> String {
    if colorize {
        let style = Style::new().color(DynColors::Ansi(get_color_for_severity(severity)));
        severity.as_str().style(style).to_string()
    } else {
        severity.as_str().to_string()
    }
}
