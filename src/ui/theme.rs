use ratatui::style::Color;

pub const ACCENT: Color = Color::Rgb(140, 115, 200);
pub const HEADER_BG: Color = Color::Rgb(25, 25, 38);
pub const STATUS_BG: Color = Color::Rgb(30, 30, 40);
pub const SEPARATOR: Color = Color::Rgb(55, 55, 75);
pub const BORDER_COLOR: Color = Color::Rgb(70, 70, 95);
pub const DIM_TEXT: Color = Color::Rgb(100, 100, 120);
pub const LINK: Color = Color::Rgb(90, 150, 230);
pub const KEY_COLOR: Color = Color::Cyan;
pub const ERROR_FG: Color = Color::LightRed;
pub const WARN_FG: Color = Color::Yellow;
pub const HEADING_FG: Color = Color::White;
pub const CODE_FG: Color = Color::Rgb(180, 200, 140);
pub const QUOTE_FG: Color = Color::Rgb(150, 150, 170);
