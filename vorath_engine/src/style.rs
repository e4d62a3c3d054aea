//! Styling helpers for terminal output.
//!
//! The [`GameStyle`] trait provides a set of convenience methods for applying
//! ANSI styling via the `colored` crate. Implementations for `&str` and
//! `String` are provided so string literals can be styled directly.

use colored::{ColoredString, Colorize};
use textwrap::{Options, termwidth};

const MAX_TEXT_WIDTH: usize = 100;

/// Convenience trait for applying color and style to text output.
pub trait GameStyle {
    fn hero_style(&self) -> ColoredString;
    fn enemy_style(&self) -> ColoredString;
    fn item_style(&self) -> ColoredString;
    fn banner_style(&self) -> ColoredString;
    fn narrative_style(&self) -> ColoredString;
    fn chapter_style(&self) -> ColoredString;
    fn damage_style(&self) -> ColoredString;
    fn heal_style(&self) -> ColoredString;
    fn dice_style(&self) -> ColoredString;
    fn flourish_style(&self) -> ColoredString;
    fn menu_style(&self) -> ColoredString;
    fn prompt_style(&self) -> ColoredString;
    fn status_style(&self) -> ColoredString;
    fn error_style(&self) -> ColoredString;
    fn denied_style(&self) -> ColoredString;
    fn subheading_style(&self) -> ColoredString;
    fn section_style(&self) -> ColoredString;
}

impl GameStyle for &str {
    fn section_style(&self) -> ColoredString {
        let bracketed = format!("[{self}]");
        bracketed.truecolor(75, 80, 75)
    }
    fn subheading_style(&self) -> ColoredString {
        self.underline()
    }
    fn hero_style(&self) -> ColoredString {
        self.truecolor(110, 220, 110).bold()
    }
    fn enemy_style(&self) -> ColoredString {
        self.truecolor(223, 77, 10)
    }
    fn item_style(&self) -> ColoredString {
        self.truecolor(220, 180, 40)
    }
    fn banner_style(&self) -> ColoredString {
        self.truecolor(230, 230, 30).bold()
    }
    fn narrative_style(&self) -> ColoredString {
        self.italic().truecolor(102, 208, 250)
    }
    fn chapter_style(&self) -> ColoredString {
        self.truecolor(223, 77, 10).underline()
    }
    fn damage_style(&self) -> ColoredString {
        self.truecolor(230, 80, 80)
    }
    fn heal_style(&self) -> ColoredString {
        self.truecolor(13, 180, 60)
    }
    fn dice_style(&self) -> ColoredString {
        self.dimmed().truecolor(160, 160, 230)
    }
    fn flourish_style(&self) -> ColoredString {
        self.bold().truecolor(255, 140, 0)
    }
    fn menu_style(&self) -> ColoredString {
        self.truecolor(200, 200, 200)
    }
    fn prompt_style(&self) -> ColoredString {
        self.truecolor(75, 180, 255).bold()
    }
    fn status_style(&self) -> ColoredString {
        self.truecolor(220, 40, 220)
    }
    fn error_style(&self) -> ColoredString {
        self.truecolor(230, 30, 30)
    }
    fn denied_style(&self) -> ColoredString {
        self.italic().truecolor(230, 30, 30)
    }
}

impl GameStyle for String {
    fn section_style(&self) -> ColoredString {
        self.as_str().section_style()
    }
    fn subheading_style(&self) -> ColoredString {
        self.as_str().subheading_style()
    }
    fn hero_style(&self) -> ColoredString {
        self.as_str().hero_style()
    }
    fn enemy_style(&self) -> ColoredString {
        self.as_str().enemy_style()
    }
    fn item_style(&self) -> ColoredString {
        self.as_str().item_style()
    }
    fn banner_style(&self) -> ColoredString {
        self.as_str().banner_style()
    }
    fn narrative_style(&self) -> ColoredString {
        self.as_str().narrative_style()
    }
    fn chapter_style(&self) -> ColoredString {
        self.as_str().chapter_style()
    }
    fn damage_style(&self) -> ColoredString {
        self.as_str().damage_style()
    }
    fn heal_style(&self) -> ColoredString {
        self.as_str().heal_style()
    }
    fn dice_style(&self) -> ColoredString {
        self.as_str().dice_style()
    }
    fn flourish_style(&self) -> ColoredString {
        self.as_str().flourish_style()
    }
    fn menu_style(&self) -> ColoredString {
        self.as_str().menu_style()
    }
    fn prompt_style(&self) -> ColoredString {
        self.as_str().prompt_style()
    }
    fn status_style(&self) -> ColoredString {
        self.as_str().status_style()
    }
    fn error_style(&self) -> ColoredString {
        self.as_str().error_style()
    }
    fn denied_style(&self) -> ColoredString {
        self.as_str().denied_style()
    }
}

/// Wrapping options for ordinary paragraphs.
pub fn normal_block() -> Options<'static> {
    Options::new(termwidth().min(MAX_TEXT_WIDTH))
}

/// Wrapping options for indented paragraphs such as story text.
pub fn indented_block() -> Options<'static> {
    Options::new(termwidth().min(MAX_TEXT_WIDTH))
        .initial_indent("    ")
        .subsequent_indent("    ")
}
