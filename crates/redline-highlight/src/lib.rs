//! Syntax highlighting and terminal styling for redline.
//!
//! JSON and TOML are highlighted with syntect; everything else is plain ANSI styling for
//! headers, warnings and flat-text excerpts.

#![warn(missing_docs)]

mod excerpt;

pub use excerpt::{mark_span, preview};
use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// Highlights structured text for the terminal.
pub struct Highlighter {
    /// Language definitions, including TOML from the two-face extras.
    syntax_set: SyntaxSet,
    /// Available color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// Theme in use.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a highlighter with the Dracula theme.
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Highlights TOML.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Highlights JSON.
    pub fn highlight_json(&self, content: &str) -> String {
        self.highlight(content, "json")
    }

    /// Highlights `content` as the syntax with the given extension or name.
    ///
    /// Unknown syntaxes fall back to plain text.
    pub fn highlight(&self, content: &str, syntax_name: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension(syntax_name)
            .or_else(|| self.syntax_set.find_syntax_by_name(syntax_name))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut lines = HighlightLines::new(syntax, self.theme_set.get(self.theme));
        let mut output = String::new();
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = lines
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        output.push_str(colors::RESET);
        output
    }
}

/// ANSI escape codes.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text, for headers.
    pub const CYAN: &str = "\x1b[36m";
    /// Green text, for success.
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow text, for warnings.
    pub const YELLOW: &str = "\x1b[33m";
    /// Red text, for errors.
    pub const RED: &str = "\x1b[31m";
    /// Reverse video, for marked spans.
    pub const REVERSE: &str = "\x1b[7m";
    /// Dim text.
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Wraps `text` in the given escape codes.
fn styled(codes: &[&str], text: &str) -> String {
    format!("{}{text}{}", codes.concat(), colors::RESET)
}

/// Formats a header in bold cyan.
pub fn header(text: &str) -> String {
    styled(&[colors::BOLD, colors::CYAN], text)
}

/// Formats a subheader in bold.
pub fn subheader(text: &str) -> String {
    styled(&[colors::BOLD], text)
}

/// Formats secondary text.
pub fn dim(text: &str) -> String {
    styled(&[colors::DIM], text)
}

/// Formats a success message in green.
pub fn success(text: &str) -> String {
    styled(&[colors::GREEN], text)
}

/// Formats a warning in yellow.
pub fn warning(text: &str) -> String {
    styled(&[colors::YELLOW], text)
}

/// Formats an error in red.
pub fn error(text: &str) -> String {
    styled(&[colors::RED], text)
}

/// Indents every line of `content` by two spaces.
pub fn indent_content(content: &str) -> String {
    content
        .lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
