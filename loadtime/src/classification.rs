//! Unit kind classification relative to the root unit.
//!
//! Every completed load is tagged with how it relates to the unit being
//! profiled. Names are dotted paths (`app.util.strings`), and relationships
//! are decided purely from those paths plus the immediate parent.
//!
//! # Classification Rules
//!
//! 1. **No unit** (the "no parent" sentinel) → `Root`
//! 2. **The root, or an ancestor of it** → `Root`
//!    - `app` when profiling `app.cli`: loading `app.cli` executes the `app`
//!      package first, which is still the root side of the tree
//! 3. **Inside the root's namespace** (`app.util`) → `Project`
//! 4. **Anything else** → `Direct` if its parent is `Root`/`Project`,
//!    otherwise `Transitive`
//!
//! The parent in rule 4 is classified on its own name only (its own parent is
//! treated as absent), so an unrelated parent always counts as `Direct` and
//! its children as `Transitive`.

use crossterm::style::{Color, Stylize};
use serde::Serialize;
use std::fmt;

/// How a loaded unit relates to the root unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// The root unit itself (or a package enclosing it)
    Root,
    /// A sub-unit inside the root's namespace
    Project,
    /// An external unit loaded straight from root/project code
    #[serde(rename = "dependency")]
    Direct,
    /// An external unit reached only through another external unit
    Transitive,
}

impl UnitKind {
    pub const ALL: [UnitKind; 4] = [
        UnitKind::Root,
        UnitKind::Project,
        UnitKind::Direct,
        UnitKind::Transitive,
    ];

    /// Label used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            UnitKind::Root => "root",
            UnitKind::Project => "project",
            UnitKind::Direct => "dependency",
            UnitKind::Transitive => "transitive",
        }
    }

    #[must_use]
    pub fn color(self) -> Color {
        match self {
            UnitKind::Root => Color::Blue,
            UnitKind::Project => Color::Red,
            UnitKind::Direct => Color::Yellow,
            UnitKind::Transitive => Color::Green,
        }
    }

    /// Label padded to a fixed width, colored unless `color` is false.
    #[must_use]
    pub fn colored(self, color: bool) -> String {
        let padded = format!("{:10}", self.label());
        if color {
            padded.with(self.color()).to_string()
        } else {
            padded
        }
    }

    /// Whether units of this kind belong to the profiled project.
    #[must_use]
    pub fn is_project_side(self) -> bool {
        matches!(self, UnitKind::Root | UnitKind::Project)
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Classify `unit`, loaded on behalf of `parent`, relative to `root`.
///
/// # Examples
///
/// ```
/// use loadtime::classification::{classify, UnitKind};
///
/// assert_eq!(classify("app", Some("app"), None), UnitKind::Root);
/// assert_eq!(classify("app", Some("app.util"), Some("app")), UnitKind::Project);
/// assert_eq!(classify("app", Some("requests"), Some("app")), UnitKind::Direct);
/// assert_eq!(classify("app", Some("urllib3"), Some("requests")), UnitKind::Transitive);
/// ```
#[must_use]
pub fn classify(root: &str, unit: Option<&str>, parent: Option<&str>) -> UnitKind {
    let Some(unit) = unit else {
        return UnitKind::Root;
    };

    if unit == root || is_descendant(root, unit) {
        return UnitKind::Root;
    }

    if is_descendant(unit, root) {
        return UnitKind::Project;
    }

    if classify(root, parent, None).is_project_side() {
        UnitKind::Direct
    } else {
        UnitKind::Transitive
    }
}

/// True if `name` lies strictly inside `ancestor`'s dotted namespace.
fn is_descendant(name: &str, ancestor: &str) -> bool {
    name.strip_prefix(ancestor)
        .is_some_and(|rest| rest.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_unit_is_root() {
        assert_eq!(classify("app", None, None), UnitKind::Root);
        assert_eq!(classify("app", None, Some("requests")), UnitKind::Root);
    }

    #[test]
    fn test_root_ignores_parent() {
        for parent in [None, Some("app"), Some("requests"), Some("app.util")] {
            assert_eq!(classify("app", Some("app"), parent), UnitKind::Root);
        }
    }

    #[test]
    fn test_ancestor_of_root_is_root() {
        assert_eq!(classify("app.cli", Some("app"), None), UnitKind::Root);
        assert_eq!(
            classify("app.cli.main", Some("app.cli"), Some("app")),
            UnitKind::Root
        );
    }

    #[test]
    fn test_sub_unit_is_project() {
        assert_eq!(
            classify("app", Some("app.util"), Some("app")),
            UnitKind::Project
        );
        // Even when reached through an external dependency
        assert_eq!(
            classify("app", Some("app.plugins"), Some("pluggy")),
            UnitKind::Project
        );
    }

    #[test]
    fn test_prefix_without_dot_is_not_project() {
        assert_eq!(
            classify("app", Some("application"), Some("app")),
            UnitKind::Direct
        );
        assert_eq!(
            classify("app.cli", Some("ap"), Some("app.cli")),
            UnitKind::Direct
        );
    }

    #[test]
    fn test_external_from_root_is_direct() {
        assert_eq!(
            classify("app", Some("requests"), Some("app")),
            UnitKind::Direct
        );
    }

    #[test]
    fn test_external_from_project_is_direct() {
        assert_eq!(
            classify("app", Some("json"), Some("app.util")),
            UnitKind::Direct
        );
    }

    #[test]
    fn test_external_from_external_is_transitive() {
        assert_eq!(
            classify("app", Some("urllib3"), Some("requests")),
            UnitKind::Transitive
        );
        assert_eq!(
            classify("app", Some("idna"), Some("urllib3")),
            UnitKind::Transitive
        );
    }

    #[test]
    fn test_missing_parent_is_direct() {
        assert_eq!(classify("app", Some("requests"), None), UnitKind::Direct);
    }

    #[test]
    fn test_labels_and_display() {
        assert_eq!(UnitKind::Direct.label(), "dependency");
        assert_eq!(format!("{:12}|", UnitKind::Root), "root        |");
        assert_eq!(UnitKind::Project.colored(false), "project   ");
        assert!(UnitKind::Project.colored(true).contains("project"));
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&UnitKind::ALL).unwrap();
        assert_eq!(json, r#"["root","project","dependency","transitive"]"#);
    }
}
