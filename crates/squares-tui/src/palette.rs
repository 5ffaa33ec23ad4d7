use crossterm::style::Color;

/// Colour palette for the TUI
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Panel and menu border color
    pub border: Color,
    /// Black (non-playable) cells
    pub block: Color,
    /// Player-entered letter color
    pub filled: Color,
    /// Letter revealed by a smart hint
    pub hinted: Color,
    /// Clue number in the cell corner
    pub number: Color,
    /// Active cell background
    pub selected_bg: Color,
    /// Other cells of the active word
    pub highlight_bg: Color,
    /// Wrong letter color
    pub error: Color,
    /// Correct letter / solved word color
    pub success: Color,
    /// Timer/info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
    /// Disabled affordances
    pub dim: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

impl Palette {
    pub const NAMES: [&'static str; 3] = ["Dark", "Light", "High Contrast"];

    /// Palette by menu index
    pub fn by_index(index: usize) -> Self {
        match index {
            0 => Self::dark(),
            1 => Self::light(),
            _ => Self::high_contrast(),
        }
    }

    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 70, g: 75, b: 90 },
            block: Color::Rgb { r: 8, g: 8, b: 12 },
            filled: Color::Rgb { r: 80, g: 180, b: 255 },
            hinted: Color::Rgb { r: 200, g: 140, b: 255 },
            number: Color::Rgb { r: 140, g: 150, b: 180 },
            selected_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            highlight_bg: Color::Rgb { r: 40, g: 46, b: 66 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
            dim: Color::DarkGrey,
        }
    }

    pub fn light() -> Self {
        Self {
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 180, g: 180, b: 195 },
            block: Color::Rgb { r: 40, g: 40, b: 50 },
            filled: Color::Rgb { r: 30, g: 100, b: 200 },
            hinted: Color::Rgb { r: 130, g: 60, b: 190 },
            number: Color::Rgb { r: 110, g: 110, b: 130 },
            selected_bg: Color::Rgb { r: 180, g: 200, b: 255 },
            highlight_bg: Color::Rgb { r: 225, g: 230, b: 248 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
            dim: Color::Rgb { r: 170, g: 170, b: 180 },
        }
    }

    pub fn high_contrast() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            border: Color::Grey,
            block: Color::DarkGrey,
            filled: Color::Cyan,
            hinted: Color::Magenta,
            number: Color::Yellow,
            selected_bg: Color::Blue,
            highlight_bg: Color::Rgb { r: 40, g: 40, b: 40 },
            error: Color::Red,
            success: Color::Green,
            info: Color::Grey,
            key: Color::Yellow,
            dim: Color::DarkGrey,
        }
    }
}
