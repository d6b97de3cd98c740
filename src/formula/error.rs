//! Error types for formula parsing.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    /// A `dep` clause appears inside another `dep` clause. Clauses only
    /// combine side by side (optionally under `&&`), never by nesting.
    #[error("nested dependency clause at offset {offset} (inside the clause starting at {outer})")]
    NestedDependency { offset: usize, outer: usize },
}
