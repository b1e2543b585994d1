//! Projection of bullet point lists into display containers.

use thiserror::Error;

use crate::{constants::BULLET_INDENT, format::TextFormatter};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RenderError {
    #[error("no bullet point template for container '{0}'")]
    MissingTemplate(String),
}

/// A display section holding bullet points.
pub trait BulletContainer {
    fn name(&self) -> &str;
    fn clear(&mut self);
    fn append(&mut self, text: String) -> Result<(), RenderError>;
    fn set_visible(&mut self, visible: bool);
}

/// Outcome of a projection, mostly useful to tests and logs.
#[derive(Debug, PartialEq, Eq)]
pub struct Projection {
    pub rendered: usize,
    pub aborted: bool,
}

/// Appends every non-empty fragment to `container`, formatted and indented.
///
/// Empty fragments are authoring placeholders and are skipped. When nothing
/// gets rendered the container is hidden. A rendering failure stops the
/// projection of this container only.
pub fn project_bullets<C>(
    fragments: &[String],
    container: &mut C,
    formatter: &dyn TextFormatter,
) -> Projection
where
    C: BulletContainer + ?Sized,
{
    let mut rendered = 0;
    let mut aborted = false;

    for fragment in fragments.iter().filter(|f| !f.is_empty()) {
        let text = format!("{BULLET_INDENT}{}", formatter.format(fragment));

        if let Err(err) = container.append(text) {
            log::error!("{err}, skipping remaining bullet points");
            aborted = true;
            break;
        }

        rendered += 1;
    }

    if rendered == 0 {
        container.set_visible(false);
    }

    Projection { rendered, aborted }
}

/// In-memory bullet section, rendered by the terminal session.
#[derive(Debug, Clone)]
pub struct BulletList {
    name: String,
    items: Vec<String>,
    visible: bool,
    has_template: bool,
}

impl BulletList {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            items: vec![],
            visible: true,
            has_template: true,
        }
    }

    /// A list that cannot render any item.
    #[cfg(test)]
    pub fn without_template(name: &str) -> Self {
        Self { has_template: false, ..Self::new(name) }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl BulletContainer for BulletList {
    fn name(&self) -> &str {
        &self.name
    }

    fn clear(&mut self) {
        self.items.clear();
        self.visible = true;
    }

    fn append(&mut self, text: String) -> Result<(), RenderError> {
        if !self.has_template {
            return Err(RenderError::MissingTemplate(self.name.clone()));
        }

        self.items.push(text);
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{CodeStyle, CodeTagFormatter};
    use proptest::prelude::*;

    fn fragments(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn skips_placeholders_and_formats() {
        let formatter = CodeTagFormatter::new(CodeStyle::Plain);
        let mut list = BulletList::new("code");

        let projection = project_bullets(
            &fragments(&["", "use <code>x</code>", "", "then y"]),
            &mut list,
            &formatter,
        );

        assert_eq!(projection, Projection { rendered: 2, aborted: false });
        assert_eq!(list.items(), &["    use `x`", "    then y"]);
        assert!(list.is_visible());
    }

    #[test]
    fn empty_sequence_hides_container() {
        let formatter = CodeTagFormatter::new(CodeStyle::Plain);
        let mut list = BulletList::new("examples");

        project_bullets(&[], &mut list, &formatter);

        assert!(!list.is_visible());
        assert!(list.items().is_empty());
    }

    #[test]
    fn does_not_clear_existing_items() {
        let formatter = CodeTagFormatter::new(CodeStyle::Plain);
        let mut list = BulletList::new("code");
        list.append("    old".to_string()).unwrap();

        project_bullets(&fragments(&["new"]), &mut list, &formatter);

        assert_eq!(list.items(), &["    old", "    new"]);
    }

    #[test]
    fn missing_template_aborts_section() {
        let formatter = CodeTagFormatter::new(CodeStyle::Plain);
        let mut list = BulletList::without_template("code");

        let projection =
            project_bullets(&fragments(&["a", "b"]), &mut list, &formatter);

        assert_eq!(projection, Projection { rendered: 0, aborted: true });
        assert!(list.items().is_empty());
        assert!(!list.is_visible());
    }

    proptest! {
        #[test]
        fn visible_iff_any_non_empty(
            items in prop::collection::vec(
                prop_oneof![Just(String::new()), "[a-z ]{1,12}"],
                0..8,
            )
        ) {
            let formatter = CodeTagFormatter::new(CodeStyle::Plain);
            let mut list = BulletList::new("code");

            project_bullets(&items, &mut list, &formatter);

            let expected = items
                .iter()
                .filter(|s| !s.is_empty())
                .map(|s| format!("{BULLET_INDENT}{s}"))
                .collect::<Vec<_>>();

            prop_assert_eq!(list.is_visible(), !expected.is_empty());
            prop_assert_eq!(list.items(), &expected[..]);
        }
    }
}
