use std::{
    fmt::Display,
    fs::File,
    io::{self, IsTerminal},
};

use colored::Color;

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum ColorSetting {
    #[default]
    Automatic,
    Always,
    Never,
}

pub(crate) mod codes {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIMMED: &str = "\x1b[2m";
}

pub trait SupportsColor {
    fn supports_color(&self) -> bool;
}

macro_rules! impl_supports_color_for_terminals {
    [$($ty:ty),* $(,)?] => {$(
        impl SupportsColor for $ty {
            fn supports_color(&self) -> bool {
                self.is_terminal()
            }
        }
    )*};
}

impl_supports_color_for_terminals![io::Stdout, io::Stderr, File];

impl SupportsColor for Vec<u8> {
    fn supports_color(&self) -> bool {
        false
    }
}

impl<W: SupportsColor + ?Sized> SupportsColor for &mut W {
    fn supports_color(&self) -> bool {
        (**self).supports_color()
    }
}

impl ColorSetting {
    pub fn use_color(self, target: &impl SupportsColor) -> bool {
        match self {
            ColorSetting::Automatic => target.supports_color(),
            ColorSetting::Always => true,
            ColorSetting::Never => false,
        }
    }
}

/// Wraps text in escape codes, or leaves it alone when color is off.
///
/// The codes are written directly instead of going through `colored`'s global
/// switch, so [`ColorSetting::Always`] holds even when stdout is not a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn color(&self, text: impl Display, color: Color) -> String {
        match self.enabled {
            true => format!("\x1b[{}m{text}{}", color.to_fg_str(), codes::RESET),
            false => text.to_string(),
        }
    }

    pub fn bold(&self, text: impl Display) -> String {
        self.wrap(codes::BOLD, text)
    }

    pub fn dimmed(&self, text: impl Display) -> String {
        self.wrap(codes::DIMMED, text)
    }

    fn wrap(&self, code: &str, text: impl Display) -> String {
        match self.enabled {
            true => format!("{code}{text}{}", codes::RESET),
            false => text.to_string(),
        }
    }
}
