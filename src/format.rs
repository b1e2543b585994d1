//! Inline code formatting for lesson text.
//!
//! Lesson authors wrap code in `<code>...</code>` tags inside explanations,
//! goals and bullet points. Formatters expand those tags into whatever the
//! display surface understands.

use colored::Colorize;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref CODE_TAG: Regex = Regex::new(r"(?s)<code>(.*?)</code>")
        .expect("code tag pattern is a valid regex");
}

pub trait TextFormatter {
    fn format(&self, raw: &str) -> String;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeStyle {
    /// Wraps code in backticks.
    Plain,
    /// Highlights code with terminal colors.
    Colored,
}

#[derive(Clone, Copy, Debug)]
pub struct CodeTagFormatter {
    style: CodeStyle,
}

impl CodeTagFormatter {
    pub fn new(style: CodeStyle) -> Self {
        Self { style }
    }
}

impl Default for CodeTagFormatter {
    fn default() -> Self {
        Self::new(CodeStyle::Colored)
    }
}

impl TextFormatter for CodeTagFormatter {
    fn format(&self, raw: &str) -> String {
        CODE_TAG
            .replace_all(raw, |caps: &Captures| match self.style {
                CodeStyle::Plain => format!("`{}`", &caps[1]),
                CodeStyle::Colored => caps[1].cyan().bold().to_string(),
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> CodeTagFormatter {
        CodeTagFormatter::new(CodeStyle::Plain)
    }

    #[test]
    fn expands_every_tag() {
        assert_eq!(
            plain().format("call <code>print</code> on <code>x</code>"),
            "call `print` on `x`"
        );
    }

    #[test]
    fn leaves_untagged_text_alone() {
        assert_eq!(plain().format("no code here"), "no code here");
        assert_eq!(plain().format(""), "");
    }

    #[test]
    fn unclosed_tag_is_literal() {
        assert_eq!(plain().format("a <code>b"), "a <code>b");
    }

    #[test]
    fn tags_may_span_lines() {
        assert_eq!(plain().format("<code>a\nb</code>"), "`a\nb`");
    }
}
