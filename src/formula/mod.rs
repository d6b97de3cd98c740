//! Formula layer: the textual dependency notation.
//!
//! This module is intentionally separate from the graph. It owns:
//! - Literal text (period wrappers around a labelled atom)
//! - the s-expression tokenizer and tree
//! - dependency clause extraction and formula serialization

pub mod clause;
pub mod error;
pub mod expr;
pub mod literal;

pub use clause::{CONJUNCTION, DEPENDENCY, DependencyClause, dependency_clauses, write_formula};
pub use error::FormulaError;
pub use expr::{Expr, Token, parse_expressions, tokenize};
pub use literal::{ADVANCE, DELAY, LITERAL_MARKER, Literal};
