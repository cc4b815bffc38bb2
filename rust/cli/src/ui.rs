//! Terminal output helpers shared by the command handlers.

use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Renders a price, or `max` when the item can no longer be bought.
pub fn price_cell(price: Option<u32>) -> String {
    match price {
        Some(p) => p.to_string(),
        None => "max".to_string(),
    }
}

/// Renders 0..=3 stars as a fixed-width bar.
pub fn star_bar(stars: u8) -> String {
    let filled = stars.min(3) as usize;
    format!("{}{}", "*".repeat(filled), ".".repeat(3 - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_cell_marks_unavailable() {
        assert_eq!(price_cell(Some(150)), "150");
        assert_eq!(price_cell(None), "max");
    }

    #[test]
    fn star_bar_is_fixed_width() {
        assert_eq!(star_bar(0), "...");
        assert_eq!(star_bar(2), "**.");
        assert_eq!(star_bar(9), "***");
    }
}
