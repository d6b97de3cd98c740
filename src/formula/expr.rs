//! Balanced-parenthesis tokenizer and expression tree.
//!
//! The formula is an s-expression dialect: `(` and `)` delimit lists,
//! whitespace separates atoms, and everything else is atom text. Atoms may
//! also end at a parenthesis, so `(dep(-p-a)(-p-b))` tokenizes the same as
//! its spaced-out form.

use std::ops::Range;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    LParen,
    RParen,
    Atom(&'a str),
}

/// A token plus its byte offset in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spanned<'a> {
    pub token: Token<'a>,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr<'a> {
    Atom {
        text: &'a str,
        span: Range<usize>,
    },
    List {
        items: Vec<Expr<'a>>,
        span: Range<usize>,
    },
}

impl<'a> Expr<'a> {
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Atom { span, .. } | Expr::List { span, .. } => span.clone(),
        }
    }

    /// The operator of a list: its first item when that item is an atom.
    pub fn head(&self) -> Option<&'a str> {
        match self {
            Expr::List { items, .. } => match items.first() {
                Some(Expr::Atom { text, .. }) => Some(*text),
                _ => None,
            },
            Expr::Atom { .. } => None,
        }
    }

    /// Items after the head (all items when the list has no atom head).
    pub fn operands(&self) -> &[Expr<'a>] {
        match self {
            Expr::List { items, .. } if self.head().is_some() => &items[1..],
            Expr::List { items, .. } => items,
            Expr::Atom { .. } => &[],
        }
    }

    /// Depth-first search for a list whose head is `operator`.
    pub fn find_list(&self, operator: &str) -> Option<&Expr<'a>> {
        if self.head() == Some(operator) {
            return Some(self);
        }
        match self {
            Expr::List { items, .. } => items.iter().find_map(|item| item.find_list(operator)),
            Expr::Atom { .. } => None,
        }
    }
}

pub fn tokenize(text: &str) -> Vec<Spanned<'_>> {
    let mut out = Vec::new();
    let mut atom_start: Option<usize> = None;

    for (offset, ch) in text.char_indices() {
        let delimiter = ch == '(' || ch == ')' || ch.is_whitespace();
        if !delimiter {
            atom_start.get_or_insert(offset);
            continue;
        }

        if let Some(start) = atom_start.take() {
            out.push(Spanned {
                token: Token::Atom(&text[start..offset]),
                offset: start,
            });
        }
        match ch {
            '(' => out.push(Spanned {
                token: Token::LParen,
                offset,
            }),
            ')' => out.push(Spanned {
                token: Token::RParen,
                offset,
            }),
            _ => {}
        }
    }

    if let Some(start) = atom_start {
        out.push(Spanned {
            token: Token::Atom(&text[start..]),
            offset: start,
        });
    }

    out
}

/// Build the top-level expression sequence.
///
/// Unbalanced input is tolerated: a stray `)` is skipped and lists still
/// open at end of input are closed there. Both cases are reported with a
/// warning.
pub fn parse_expressions(text: &str) -> Vec<Expr<'_>> {
    // Open lists: (start offset, items so far).
    let mut stack: Vec<(usize, Vec<Expr<'_>>)> = Vec::new();
    let mut top: Vec<Expr<'_>> = Vec::new();

    for Spanned { token, offset } in tokenize(text) {
        match token {
            Token::LParen => stack.push((offset, Vec::new())),
            Token::RParen => match stack.pop() {
                Some((start, items)) => {
                    let list = Expr::List {
                        items,
                        span: start..offset + 1,
                    };
                    push_item(&mut stack, &mut top, list);
                }
                None => warn!(offset, "skipping unmatched ')' in formula"),
            },
            Token::Atom(atom) => {
                let expr = Expr::Atom {
                    text: atom,
                    span: offset..offset + atom.len(),
                };
                push_item(&mut stack, &mut top, expr);
            }
        }
    }

    if !stack.is_empty() {
        warn!(
            unclosed = stack.len(),
            "formula ended with open lists, closing them at end of input"
        );
    }
    while let Some((start, items)) = stack.pop() {
        let list = Expr::List {
            items,
            span: start..text.len(),
        };
        push_item(&mut stack, &mut top, list);
    }

    top
}

fn push_item<'a>(stack: &mut [(usize, Vec<Expr<'a>>)], top: &mut Vec<Expr<'a>>, expr: Expr<'a>) {
    match stack.last_mut() {
        Some((_, items)) => items.push(expr),
        None => top.push(expr),
    }
}
