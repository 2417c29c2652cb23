use ratatui::style::{Color, Modifier, Style};

pub const BG: Color = Color::Rgb(15, 17, 26);
pub const SURFACE: Color = Color::Rgb(23, 26, 38);
pub const BORDER: Color = Color::Rgb(46, 52, 72);
pub const TEXT: Color = Color::Rgb(216, 221, 235);
pub const TEXT_DIM: Color = Color::Rgb(108, 116, 140);
pub const ACCENT: Color = Color::Rgb(129, 132, 245);
pub const GREEN: Color = Color::Rgb(88, 168, 118);
pub const AMBER: Color = Color::Rgb(216, 160, 72);
pub const RED: Color = Color::Rgb(198, 92, 80);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn border(focused: bool) -> Style {
    if focused {
        accent()
    } else {
        Style::default().fg(BORDER)
    }
}

/// Style from a habit's stored hex color; dim text when it doesn't parse.
pub fn habit_color(hex: &str) -> Style {
    let h = hex.trim_start_matches('#');
    if h.len() == 6 {
        if let Ok(rgb) = u32::from_str_radix(h, 16) {
            let r = ((rgb >> 16) & 0xff) as u8;
            let g = ((rgb >> 8) & 0xff) as u8;
            let b = (rgb & 0xff) as u8;
            return Style::default().fg(Color::Rgb(r, g, b));
        }
    }
    dim()
}

/// Color band for a completion percentage.
pub fn rate_style(rate: f64) -> Style {
    if rate >= 80.0 {
        green()
    } else if rate >= 50.0 {
        amber()
    } else {
        dim()
    }
}
