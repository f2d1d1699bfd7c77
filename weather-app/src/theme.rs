use ratatui::style::Color;

pub const LABEL_GREEN: Color = Color::Rgb(0x00, 0xff, 0x00);
pub const HEADING_BLUE: Color = Color::Rgb(0x00, 0x80, 0xff);
pub const WARNING_RED: Color = Color::Rgb(0xff, 0x00, 0x00);
pub const BORDER: Color = Color::Rgb(0x40, 0x40, 0x40);
pub const POPUP_BORDER: Color = Color::Rgb(0xe5, 0xe5, 0xe5);
pub const MUTED_TEXT: Color = Color::Rgb(0x6b, 0x72, 0x80);
pub const ACTIVE_HIGHLIGHT: Color = Color::Rgb(0x26, 0x26, 0x26);
