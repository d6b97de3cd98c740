//! Literal text: a labelled atom shifted in time.
//!
//! Grammar:
//!   (-p- label)             bare literal, period 0
//!   (next <literal>)        period + 1
//!   (yesterday <literal>)   period - 1
//!
//! Wrappers nest, so `(yesterday (yesterday (-p- a)))` is `a` at period -2.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// Marks the innermost literal: `(-p- label)`.
pub const LITERAL_MARKER: &str = "-p-";
/// Advances the wrapped literal by one period.
pub const ADVANCE: &str = "next";
/// Delays the wrapped literal by one period.
pub const DELAY: &str = "yesterday";

static ADVANCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnext\b").expect("advance keyword pattern"));
static DELAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\byesterday\b").expect("delay keyword pattern"));
// Everything that is structure rather than label: parens, whitespace, the
// marker and both wrapper keywords.
static STRUCTURAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[()\s]|-p-|\bnext\b|\byesterday\b").expect("structural token pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub label: String,
    pub period: i64,
}

impl Literal {
    pub fn new(label: impl Into<String>, period: i64) -> Self {
        Self {
            label: label.into(),
            period,
        }
    }

    /// Parse one literal leniently.
    ///
    /// The period is the number of `next` wrappers minus the number of
    /// `yesterday` wrappers; the label is whatever is left once every
    /// structural token is stripped. Malformed text never fails: without
    /// the `-p-` marker the label simply degrades to the leftover text,
    /// which may be empty.
    ///
    /// Labels that are themselves a wrapper keyword cannot round-trip.
    /// Keyword matching is per word, and `.`, `-` and other non-word
    /// characters count as word breaks: `a.next` parses as `a.` one period
    /// later, and a label such as `x-p-y` loses its embedded marker.
    pub fn parse(text: &str) -> Self {
        let advances = ADVANCE_RE.find_iter(text).count() as i64;
        let delays = DELAY_RE.find_iter(text).count() as i64;
        let label = Self::clean_label(text);

        if !text.contains(LITERAL_MARKER) {
            debug!(text, label = %label, "literal without marker, keeping leftover text as label");
        }

        Self {
            label,
            period: advances - delays,
        }
    }

    /// Strip structural tokens from a label so that it survives a
    /// serialize/parse round trip unchanged.
    pub fn clean_label(label: &str) -> String {
        STRUCTURAL_RE.replace_all(label, "").into_owned()
    }

    /// Same literal with its label cleaned.
    pub fn normalized(self) -> Self {
        Self {
            label: Self::clean_label(&self.label),
            period: self.period,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_empty()
    }
}

impl fmt::Display for Literal {
    /// Serialize back to the nested wrapper form, the left inverse of
    /// [`Literal::parse`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.period > 0 { ADVANCE } else { DELAY };
        let depth = self.period.unsigned_abs();

        for _ in 0..depth {
            write!(f, "({keyword} ")?;
        }
        write!(f, "({LITERAL_MARKER} {})", self.label)?;
        for _ in 0..depth {
            f.write_str(")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("(-p- a)", "a", 0)]
    #[case("(-p-a)", "a", 0)]
    #[case("(next(-p- a))", "a", 1)]
    #[case("(next (next (-p- speed)))", "speed", 2)]
    #[case("(yesterday (-p- b))", "b", -1)]
    #[case("(next (yesterday (-p- c)))", "c", 0)]
    #[case("(-p- nextStep)", "nextStep", 0)]
    fn parses_label_and_period(#[case] text: &str, #[case] label: &str, #[case] period: i64) {
        assert_eq!(Literal::parse(text), Literal::new(label, period));
    }

    #[rstest]
    #[case(Literal::new("a", 0), "(-p- a)")]
    #[case(Literal::new("a", 1), "(next (-p- a))")]
    #[case(Literal::new("b", -2), "(yesterday (yesterday (-p- b)))")]
    fn serializes_nested_wrappers(#[case] literal: Literal, #[case] text: &str) {
        assert_eq!(literal.to_string(), text);
    }

    #[test]
    fn parse_inverts_serialize() {
        for period in -4..=4 {
            let literal = Literal::new("valve_open", period);
            assert_eq!(Literal::parse(&literal.to_string()), literal);
        }
    }

    #[rstest]
    #[case("New Node 3", "NewNode3")]
    #[case("a)(b", "ab")]
    #[case("x-p-y", "xy")]
    #[case("next day", "day")]
    #[case("nextStep", "nextStep")]
    fn clean_label_matches_what_parse_yields(#[case] raw: &str, #[case] clean: &str) {
        assert_eq!(Literal::clean_label(raw), clean);
        let literal = Literal::new(raw, 2).normalized();
        assert_eq!(Literal::parse(&literal.to_string()), literal);
    }

    #[rstest]
    #[case("(-p- a.next)", "a.", 1)]
    #[case("(-p- x-p-y)", "xy", 0)]
    fn keywords_after_non_word_characters_still_count(
        #[case] text: &str,
        #[case] label: &str,
        #[case] period: i64,
    ) {
        assert_eq!(Literal::parse(text), Literal::new(label, period));
    }

    #[test]
    fn missing_marker_degrades_to_leftover_text() {
        assert_eq!(Literal::parse("(next (foo))"), Literal::new("foo", 1));
        assert!(Literal::parse("()").is_empty());
    }
}
