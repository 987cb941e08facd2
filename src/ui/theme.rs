use log::Level;
use ratatui::prelude::*;

/// Theme errors
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("Unknown theme '{0}' (available: {1})")]
    Unknown(String, String),
}

/// Runtime theme with direct field access for all UI elements
#[derive(Debug, Clone)]
pub struct Theme {
    // === Default Colors ===
    pub default_fg: Color,
    pub default_bg: Color,

    // === Backgrounds ===
    pub selection_bg: Color,
    pub status_bar_bg: Color,
    pub search_focused_bg: Color,
    pub confirm_modal_bg: Color,

    // === Clip List Elements ===
    pub clip_number: Style,
    pub clip_text: Style,
    pub clip_text_selected: Style,
    pub clip_list_header: Style,
    pub clip_list_item_count: Style,
    pub search_input: Style,

    // === Preview Panel ===
    pub preview_text: Style,
    pub preview_placeholder: Style,

    // === Status Bar ===
    pub status_key: Style,
    pub status_desc: Style,

    // === Confirm Modal ===
    pub confirm_text: Style,
    pub confirm_key: Style,
    pub confirm_warning: Style,

    // === Flash Messages ===
    pub flash_error: Style,
    pub flash_warn: Style,
    pub flash_info: Style,

    // === Divider ===
    pub divider: String,
    pub divider_style: Style,
}

/// The handful of colors a built-in theme is derived from
struct Palette {
    fg: Color,
    bg: Color,
    subtext: Color,
    surface: Color,
    mantle: Color,
    accent: Color,
    number: Color,
    search: Color,
    key: Color,
    danger: Color,
    overlay: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha theme (dark)
    pub fn catppuccin_mocha() -> Self {
        Self::from_palette(Palette {
            fg: Color::Rgb(205, 214, 244),
            bg: Color::Rgb(30, 30, 46),
            subtext: Color::Rgb(166, 173, 200),
            surface: Color::Rgb(69, 71, 90),
            mantle: Color::Rgb(24, 24, 37),
            accent: Color::Rgb(137, 180, 250),
            number: Color::Rgb(245, 194, 231),
            search: Color::Rgb(249, 226, 175),
            key: Color::Rgb(137, 220, 235),
            danger: Color::Rgb(243, 139, 168),
            overlay: Color::Rgb(108, 112, 134),
        })
    }

    /// Catppuccin Latte theme (light)
    pub fn catppuccin_latte() -> Self {
        Self::from_palette(Palette {
            fg: Color::Rgb(76, 79, 105),
            bg: Color::Rgb(239, 241, 245),
            subtext: Color::Rgb(108, 111, 133),
            surface: Color::Rgb(188, 192, 204),
            mantle: Color::Rgb(230, 233, 239),
            accent: Color::Rgb(30, 102, 245),
            number: Color::Rgb(234, 118, 203),
            search: Color::Rgb(223, 142, 29),
            key: Color::Rgb(4, 165, 229),
            danger: Color::Rgb(210, 15, 57),
            overlay: Color::Rgb(156, 160, 176),
        })
    }

    fn from_palette(p: Palette) -> Self {
        Theme {
            default_fg: p.fg,
            default_bg: p.bg,

            selection_bg: p.surface,
            status_bar_bg: p.mantle,
            search_focused_bg: p.mantle,
            confirm_modal_bg: p.mantle,

            clip_number: Style::default().fg(p.number).add_modifier(Modifier::BOLD),
            clip_text: Style::default().fg(p.fg),
            clip_text_selected: Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
            clip_list_header: Style::default().fg(p.subtext),
            clip_list_item_count: Style::default().fg(p.subtext).add_modifier(Modifier::DIM),
            search_input: Style::default().fg(p.search),

            preview_text: Style::default().fg(p.fg),
            preview_placeholder: Style::default().fg(p.subtext).add_modifier(Modifier::ITALIC),

            status_key: Style::default().fg(p.fg).add_modifier(Modifier::BOLD),
            status_desc: Style::default().fg(p.subtext),

            confirm_text: Style::default().fg(p.fg),
            confirm_key: Style::default().fg(p.key).add_modifier(Modifier::BOLD),
            confirm_warning: Style::default().fg(p.danger),

            flash_error: Style::default().fg(p.danger).add_modifier(Modifier::BOLD),
            flash_warn: Style::default().fg(p.search),
            flash_info: Style::default().fg(p.subtext),

            divider: "│".to_string(),
            divider_style: Style::default().fg(p.overlay),
        }
    }

    /// Load a built-in theme by name
    pub fn load(name: &str) -> Result<Self, ThemeError> {
        BuiltInTheme::from_name(name)
            .map(|t| t.to_theme())
            .ok_or_else(|| {
                let names: Vec<&str> = BuiltInTheme::all().iter().map(|t| t.name()).collect();
                ThemeError::Unknown(name.to_string(), names.join(", "))
            })
    }

    /// Style for a flash message of the given level
    pub fn flash_style(&self, level: Level) -> Style {
        match level {
            Level::Error => self.flash_error,
            Level::Warn => self.flash_warn,
            _ => self.flash_info,
        }
    }
}

/// Built-in theme variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltInTheme {
    CatppuccinMocha,
    CatppuccinLatte,
}

impl BuiltInTheme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "catppuccin-mocha" => Some(Self::CatppuccinMocha),
            "catppuccin-latte" => Some(Self::CatppuccinLatte),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CatppuccinMocha => "catppuccin-mocha",
            Self::CatppuccinLatte => "catppuccin-latte",
        }
    }

    pub fn all() -> &'static [BuiltInTheme] {
        &[Self::CatppuccinMocha, Self::CatppuccinLatte]
    }

    pub fn to_theme(&self) -> Theme {
        match self {
            Self::CatppuccinMocha => Theme::catppuccin_mocha(),
            Self::CatppuccinLatte => Theme::catppuccin_latte(),
        }
    }
}
