/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const DIM: &'static str = "\x1b[2m";
    pub const RED: &'static str = "\x1b[31m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const YELLOW: &'static str = "\x1b[33m";
}

/// Wrap `text` in `code` when color output is on
pub fn paint(text: &str, code: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", code, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub const BRANCH: &str = "\u{251c}\u{2500}\u{2500} ";
pub const LAST_BRANCH: &str = "\u{2514}\u{2500}\u{2500} ";
pub const PIPE: &str = "\u{2502}   ";
pub const GAP: &str = "    ";
