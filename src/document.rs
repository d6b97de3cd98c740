//! Host document sections.
//!
//! A PZot source file carries its dependency formula ahead of the formula
//! proper:
//!
//! ```text
//! DEPENDENCIES: (&& (dep (-p- a) (-p- b)) ...)
//! FORMULA: (alw (-> (-p- a) (next (-p- b))))
//! ```
//!
//! Only the `DEPENDENCIES:` part is ours; the `FORMULA:` section is carried
//! through untouched.

use std::fmt;

pub const DEPENDENCIES_MARKER: &str = "DEPENDENCIES:";
pub const FORMULA_MARKER: &str = "FORMULA:";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("document has no {DEPENDENCIES_MARKER} section")]
    MissingDependencies,
    #[error("document has no {FORMULA_MARKER} section after {DEPENDENCIES_MARKER}")]
    MissingFormula,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDocument {
    dependencies: String,
    /// Everything from `FORMULA:` on, marker included.
    formula: String,
}

impl HostDocument {
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let start = text
            .find(DEPENDENCIES_MARKER)
            .ok_or(DocumentError::MissingDependencies)?
            + DEPENDENCIES_MARKER.len();
        let end = text[start..]
            .find(FORMULA_MARKER)
            .map(|offset| start + offset)
            .ok_or(DocumentError::MissingFormula)?;

        Ok(Self {
            dependencies: text[start..end].trim().to_string(),
            formula: text[end..].to_string(),
        })
    }

    /// The dependency formula, trimmed.
    pub fn dependencies(&self) -> &str {
        &self.dependencies
    }

    pub fn formula_section(&self) -> &str {
        &self.formula
    }

    /// Same document with its dependency formula replaced.
    pub fn with_dependencies(&self, dependencies: impl Into<String>) -> Self {
        Self {
            dependencies: dependencies.into(),
            formula: self.formula.clone(),
        }
    }
}

impl fmt::Display for HostDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DEPENDENCIES_MARKER} {}\n{}", self.dependencies, self.formula)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOC: &str = "DEPENDENCIES: (dep (-p- a)\n  (-p- b))\nFORMULA: (alw (-p- a))\n";

    #[test]
    fn isolates_dependency_formula() {
        let doc = HostDocument::parse(DOC).expect("parse");
        assert_eq!(doc.dependencies(), "(dep (-p- a)\n  (-p- b))");
        assert_eq!(doc.formula_section(), "FORMULA: (alw (-p- a))\n");
    }

    #[test]
    fn splices_new_formula_and_keeps_the_rest() {
        let doc = HostDocument::parse(DOC).expect("parse");
        let updated = doc.with_dependencies("(dep (-p- a) (-p- c))");
        assert_eq!(
            updated.to_string(),
            "DEPENDENCIES: (dep (-p- a) (-p- c))\nFORMULA: (alw (-p- a))\n"
        );
        assert_eq!(HostDocument::parse(&updated.to_string()), Ok(updated));
    }

    #[test]
    fn missing_sections_are_reported() {
        assert_eq!(
            HostDocument::parse("FORMULA: (-p- a)"),
            Err(DocumentError::MissingDependencies)
        );
        assert_eq!(
            HostDocument::parse("DEPENDENCIES: (dep (-p- a) (-p- b))"),
            Err(DocumentError::MissingFormula)
        );
    }
}
