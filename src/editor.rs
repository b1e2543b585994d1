//! Code editor state: the learner's current code and caret position.

use crate::{constants::CARET, models::CourseView};

/// Removes the first caret sentinel from `code`.
///
/// Returns the code without the sentinel and the character offset at which it
/// was found. Any further sentinels are kept as literal text.
pub fn strip_caret(code: &str) -> (String, Option<usize>) {
    match code.find(CARET) {
        Some(byte_index) => {
            let mut stripped = String::with_capacity(code.len() - CARET.len());
            stripped.push_str(&code[..byte_index]);
            stripped.push_str(&code[byte_index + CARET.len()..]);

            (stripped, Some(code[..byte_index].chars().count()))
        }
        None => (code.to_string(), None),
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CodeEditor {
    text: String,
    caret: usize,
    focused: bool,
}

impl CodeEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret offset, in characters.
    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Loads a lesson's starter code, placing the caret at the sentinel or at
    /// the start of the text if there is none.
    pub fn load_default(&mut self, view: &CourseView) {
        let (text, caret) = strip_caret(&view.default_code);

        log::debug!(
            "Loading default code for '{}', caret at {caret:?}",
            view.subject
        );

        self.text = text;
        self.caret = caret.unwrap_or(0);
        self.focus();
    }

    pub fn load_solution(&mut self, view: &CourseView) {
        log::debug!("Loading solution code for '{}'", view.subject);

        self.text = view.solution_code.clone();
        self.caret = self.caret.min(self.char_count());
    }

    /// Replaces the whole buffer, leaving the caret at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.caret = self.char_count();
    }

    /// Inserts `text` at the caret and moves the caret past it.
    pub fn insert(&mut self, text: &str) {
        let byte_index = self
            .text
            .char_indices()
            .nth(self.caret)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len());

        self.text.insert_str(byte_index, text);
        self.caret += text.chars().count();
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn view(default_code: &str, solution_code: &str) -> CourseView {
        CourseView {
            subject: "test".to_string(),
            default_code: default_code.to_string(),
            solution_code: solution_code.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn caret_at_sentinel() {
        let mut editor = CodeEditor::new();
        editor.load_default(&view("print(CARETx)", ""));

        assert_eq!(editor.text(), "print(x)");
        assert_eq!(editor.caret(), 6);
        assert!(editor.is_focused());
    }

    #[test]
    fn caret_defaults_to_start() {
        let mut editor = CodeEditor::new();
        editor.set_text("some previous text");
        editor.load_default(&view("x = 1", ""));

        assert_eq!(editor.text(), "x = 1");
        assert_eq!(editor.caret(), 0);
    }

    #[test]
    fn first_sentinel_wins() {
        let (text, caret) = strip_caret("aCARETbCARETc");

        assert_eq!(text, "abCARETc");
        assert_eq!(caret, Some(1));
    }

    #[test]
    fn caret_counts_characters() {
        let (text, caret) = strip_caret("é → CARET");

        assert_eq!(text, "é → ");
        assert_eq!(caret, Some(4));
    }

    #[test]
    fn load_default_is_idempotent() {
        let mut once = CodeEditor::new();
        once.load_default(&view("fn main() {\n    CARET\n}", ""));

        let mut twice = CodeEditor::new();
        twice.load_default(&view("fn main() {\n    CARET\n}", ""));
        twice.load_default(&view("fn main() {\n    CARET\n}", ""));

        assert_eq!(once, twice);
    }

    #[test]
    fn load_solution_is_verbatim_and_idempotent() {
        let view = view("CARET", "print(CARET)");
        let mut editor = CodeEditor::new();

        editor.load_solution(&view);
        let once = editor.text().to_string();
        editor.load_solution(&view);

        assert_eq!(editor.text(), "print(CARET)");
        assert_eq!(editor.text(), once);
    }

    #[test]
    fn insert_at_caret() {
        let mut editor = CodeEditor::new();
        editor.load_default(&view("print(CARET)", ""));
        editor.insert("\"hé\"");

        assert_eq!(editor.text(), "print(\"hé\")");
        assert_eq!(editor.caret(), 10);
    }

    proptest! {
        #[test]
        fn sentinel_is_removed_at_its_offset(
            before in "[a-z(){} \n]{0,20}",
            after in "[a-z(){} \n]{0,20}",
        ) {
            let mut editor = CodeEditor::new();
            editor.load_default(&view(&format!("{before}{CARET}{after}"), ""));

            prop_assert_eq!(editor.text(), format!("{before}{after}"));
            prop_assert_eq!(editor.caret(), before.chars().count());
        }
    }
}
