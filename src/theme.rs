use catppuccin::PALETTE;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;
use tracing::warn;

const fn catppuccin_to_color(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

/// Immutable color set built once at startup and handed to every widget by
/// reference.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub base: Color,
    pub mantle: Color,

    pub surface1: Color,
    pub surface2: Color,

    pub overlay0: Color,
    pub overlay1: Color,

    pub text: Color,
    pub subtext0: Color,

    pub mauve: Color,
    pub red: Color,
    pub peach: Color,
    pub yellow: Color,
    pub green: Color,
    pub teal: Color,
    pub sky: Color,
    pub blue: Color,
    pub lavender: Color,

    pub border_type: BorderType,
}

impl Theme {
    const fn from_catppuccin(flavor: &catppuccin::Flavor) -> Self {
        let c = &flavor.colors;
        Self {
            base: catppuccin_to_color(&c.base),
            mantle: catppuccin_to_color(&c.mantle),
            surface1: catppuccin_to_color(&c.surface1),
            surface2: catppuccin_to_color(&c.surface2),
            overlay0: catppuccin_to_color(&c.overlay0),
            overlay1: catppuccin_to_color(&c.overlay1),
            text: catppuccin_to_color(&c.text),
            subtext0: catppuccin_to_color(&c.subtext0),
            mauve: catppuccin_to_color(&c.mauve),
            red: catppuccin_to_color(&c.red),
            peach: catppuccin_to_color(&c.peach),
            yellow: catppuccin_to_color(&c.yellow),
            green: catppuccin_to_color(&c.green),
            teal: catppuccin_to_color(&c.teal),
            sky: catppuccin_to_color(&c.sky),
            blue: catppuccin_to_color(&c.blue),
            lavender: catppuccin_to_color(&c.lavender),
            border_type: BorderType::Rounded,
        }
    }

    #[must_use]
    pub fn new(flavor: Flavor) -> Self {
        Self::from_catppuccin(match flavor {
            Flavor::Latte => &PALETTE.latte,
            Flavor::Frappe => &PALETTE.frappe,
            Flavor::Macchiato => &PALETTE.macchiato,
            Flavor::Mocha => &PALETTE.mocha,
        })
    }

    #[must_use]
    pub const fn base(&self) -> Color {
        self.base
    }

    #[must_use]
    pub const fn mantle(&self) -> Color {
        self.mantle
    }

    #[must_use]
    pub const fn text(&self) -> Color {
        self.text
    }

    #[must_use]
    pub const fn subtext0(&self) -> Color {
        self.subtext0
    }

    #[must_use]
    pub const fn overlay0(&self) -> Color {
        self.overlay0
    }

    #[must_use]
    pub const fn overlay1(&self) -> Color {
        self.overlay1
    }

    #[must_use]
    pub const fn primary(&self) -> Color {
        self.blue
    }

    #[must_use]
    pub const fn success(&self) -> Color {
        self.green
    }

    #[must_use]
    pub const fn warning(&self) -> Color {
        self.yellow
    }

    #[must_use]
    pub const fn error(&self) -> Color {
        self.red
    }

    #[must_use]
    pub const fn info(&self) -> Color {
        self.sky
    }

    #[must_use]
    pub const fn border(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn border_focused(&self) -> Color {
        self.lavender
    }

    #[must_use]
    pub const fn selection_bg(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn header(&self) -> Color {
        self.yellow
    }

    // JSON detail panes
    #[must_use]
    pub const fn json_key(&self) -> Color {
        self.blue
    }

    #[must_use]
    pub const fn json_string(&self) -> Color {
        self.green
    }

    #[must_use]
    pub const fn json_number(&self) -> Color {
        self.peach
    }

    #[must_use]
    pub const fn json_bool(&self) -> Color {
        self.mauve
    }

    #[must_use]
    pub const fn json_null(&self) -> Color {
        self.overlay1
    }

    #[must_use]
    pub const fn json_punctuation(&self) -> Color {
        self.subtext0
    }

    /// Style laid over a search hit inside otherwise styled text.
    #[must_use]
    pub fn search_match(&self) -> Style {
        Style::default()
            .fg(self.base)
            .bg(self.yellow)
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(Flavor::Mocha)
    }
}

/// Catppuccin flavors selectable through `theme.name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Latte,
    Frappe,
    Macchiato,
    Mocha,
}

impl Flavor {
    const ALL: [Self; 4] = [Self::Latte, Self::Frappe, Self::Macchiato, Self::Mocha];

    const fn name(self) -> &'static str {
        match self {
            Self::Latte => "latte",
            Self::Frappe => "frappe",
            Self::Macchiato => "macchiato",
            Self::Mocha => "mocha",
        }
    }

    /// Accepts `mocha`, `Catppuccin Mocha` and `catppuccin-frappé` alike.
    fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase().replace('é', "e");
        let name = name
            .strip_prefix("catppuccin")
            .map_or(name.as_str(), |rest| rest.trim_start_matches([' ', '-', '_']));
        Self::ALL.into_iter().find(|flavor| flavor.name() == name)
    }
}

/// Look up a theme by name, falling back to Mocha.
pub fn theme_from_name(name: &str) -> Theme {
    Flavor::parse(name).map_or_else(
        || {
            warn!(name, "Unknown theme, using Catppuccin Mocha");
            Theme::default()
        },
        Theme::new,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_names() {
        assert_eq!(Flavor::parse("Catppuccin Latte"), Some(Flavor::Latte));
        assert_eq!(Flavor::parse("catppuccin-frappé"), Some(Flavor::Frappe));
        assert_eq!(Flavor::parse(" MACCHIATO "), Some(Flavor::Macchiato));
        assert_eq!(Flavor::parse("catppuccin"), None);
        assert_eq!(theme_from_name("latte").base, Theme::new(Flavor::Latte).base);
    }

    #[test]
    fn test_unknown_theme_falls_back_to_mocha() {
        assert_eq!(theme_from_name("solarized").base, Theme::new(Flavor::Mocha).base);
    }
}
