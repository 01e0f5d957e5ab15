use ratatui::style::Color;

pub const BG_PRIMARY: Color = Color::Rgb(0, 0, 0);
pub const BG_PANEL: Color = Color::Rgb(12, 12, 12);
pub const FG_PRIMARY: Color = Color::Rgb(190, 190, 190);
pub const FG_DIM: Color = Color::Rgb(128, 128, 128);

pub const BAR_BG: Color = Color::Rgb(23, 52, 127);
pub const BAR_TEXT: Color = Color::Rgb(235, 240, 255);

pub const DIALOG_BG: Color = Color::Rgb(79, 79, 79);
pub const DIALOG_BORDER: Color = Color::Rgb(208, 208, 208);

pub const BORDER_IDLE: Color = Color::Rgb(61, 120, 120);
pub const BORDER_FOCUS: Color = Color::Rgb(187, 94, 0);
pub const HIGHLIGHT_BG: Color = Color::Rgb(120, 160, 255);
pub const SELECTION_BG: Color = Color::Rgb(108, 108, 108);
pub const SELECTION_FG: Color = Color::Rgb(255, 255, 255);

pub const USER_LABEL: Color = Color::Cyan;
pub const AGENT_LABEL: Color = Color::Rgb(120, 200, 140);
pub const NOTICE_SUCCESS: Color = Color::Rgb(40, 110, 60);
pub const NOTICE_ERROR: Color = Color::Rgb(150, 40, 40);
pub const ERROR_TEXT: Color = Color::LightRed;
