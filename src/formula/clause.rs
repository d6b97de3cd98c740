//! Dependency clauses: extraction from the expression tree and formula
//! serialization.
//!
//! A clause `(dep <main> <target>*)` says that `main` depends on every
//! target. Independent clauses sit side by side, usually under a single
//! `(&& ...)` conjunction.

use crate::formula::FormulaError;
use crate::formula::expr::{Expr, parse_expressions};
use crate::formula::literal::Literal;
use std::fmt;
use tracing::debug;

/// Operator of a dependency clause.
pub const DEPENDENCY: &str = "dep";
/// Operator combining several clauses.
pub const CONJUNCTION: &str = "&&";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyClause {
    pub main: Literal,
    pub targets: Vec<Literal>,
}

impl fmt::Display for DependencyClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({DEPENDENCY} {}", self.main)?;
        for target in &self.targets {
            write!(f, " {target}")?;
        }
        f.write_str(")")
    }
}

/// Collect every `dep` clause of `text` in source order.
///
/// Non-`dep` lists (conjunctions, stray literals) carry no graph data and
/// are only searched for clauses. A clause whose main literal has an empty
/// label is dropped, as are empty target literals.
pub fn dependency_clauses(text: &str) -> Result<Vec<DependencyClause>, FormulaError> {
    let mut out = Vec::new();
    for expr in parse_expressions(text) {
        collect(text, &expr, &mut out)?;
    }
    Ok(out)
}

fn collect(
    text: &str,
    expr: &Expr<'_>,
    out: &mut Vec<DependencyClause>,
) -> Result<(), FormulaError> {
    if expr.head() != Some(DEPENDENCY) {
        if let Expr::List { items, .. } = expr {
            for item in items {
                collect(text, item, out)?;
            }
        }
        return Ok(());
    }

    let operands = expr.operands();
    if let Some(nested) = operands.iter().find_map(|e| e.find_list(DEPENDENCY)) {
        return Err(FormulaError::NestedDependency {
            offset: nested.span().start,
            outer: expr.span().start,
        });
    }

    let mut literals = operands.iter().map(|e| Literal::parse(&text[e.span()]));
    let Some(main) = literals.next() else {
        debug!(offset = expr.span().start, "skipping empty dependency clause");
        return Ok(());
    };
    if main.is_empty() {
        debug!(offset = expr.span().start, "skipping clause without a main literal");
        return Ok(());
    }

    out.push(DependencyClause {
        main,
        targets: literals.filter(|l| !l.is_empty()).collect(),
    });
    Ok(())
}

/// Render clauses as one formula: nothing for no clauses, the bare clause
/// for one, a conjunction for more.
pub fn write_formula(clauses: &[DependencyClause]) -> String {
    match clauses {
        [] => String::new(),
        [single] => single.to_string(),
        many => {
            let body: Vec<String> = many.iter().map(|c| c.to_string()).collect();
            format!("({CONJUNCTION} {})", body.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_single_clause() {
        let clauses = dependency_clauses("(dep(-p- a)(-p- b))").expect("parse");
        assert_eq!(
            clauses,
            vec![DependencyClause {
                main: Literal::new("a", 0),
                targets: vec![Literal::new("b", 0)],
            }]
        );
    }

    #[test]
    fn extracts_clauses_under_conjunction_in_order() {
        let text = "(&& (dep(-p- a)(-p- b))\n  (dep(next(-p- c))(yesterday(-p- d))(-p- e)))";
        let clauses = dependency_clauses(text).expect("parse");
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].main, Literal::new("a", 0));
        assert_eq!(clauses[1].main, Literal::new("c", 1));
        assert_eq!(
            clauses[1].targets,
            vec![Literal::new("d", -1), Literal::new("e", 0)]
        );
    }

    #[test]
    fn rejects_nested_clause() {
        let err = dependency_clauses("(dep (-p- a) (dep (-p- b) (-p- c)))").unwrap_err();
        assert_eq!(
            err,
            FormulaError::NestedDependency {
                offset: 13,
                outer: 0
            }
        );
    }

    #[test]
    fn skips_clause_with_empty_main_literal() {
        let clauses = dependency_clauses("(dep () (-p- b)) (dep (-p- c))").expect("parse");
        assert_eq!(
            clauses,
            vec![DependencyClause {
                main: Literal::new("c", 0),
                targets: vec![],
            }]
        );
    }

    #[test]
    fn ignores_formula_without_clauses() {
        assert!(dependency_clauses("(&& (-p- a) (next (-p- b)))").expect("parse").is_empty());
        assert!(dependency_clauses("").expect("parse").is_empty());
    }

    #[test]
    fn writes_conjunction_only_for_several_clauses() {
        let one = DependencyClause {
            main: Literal::new("a", 1),
            targets: vec![Literal::new("b", 0)],
        };
        let two = DependencyClause {
            main: Literal::new("c", 0),
            targets: vec![Literal::new("d", -1)],
        };

        assert_eq!(write_formula(&[]), "");
        assert_eq!(write_formula(&[one.clone()]), "(dep (next (-p- a)) (-p- b))");
        assert_eq!(
            write_formula(&[one, two]),
            "(&& (dep (next (-p- a)) (-p- b)) (dep (-p- c) (yesterday (-p- d))))"
        );
    }
}
