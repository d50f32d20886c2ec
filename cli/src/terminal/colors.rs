use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightCyan;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const COMPROMISED: Color = Color::BrightRed;
pub const NO_MATCH: Color = Color::Green;
pub const FAILURE: Color = Color::Yellow;
pub const MUTED: Color = Color::BrightBlack;
