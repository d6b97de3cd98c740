//! Period aggregates kept alongside the period index.

use serde::Serialize;

/// Period range and population of a graph.
///
/// The empty graph sits at the baseline: both bounds 0 and no periods.
/// Insertions widen the range from wherever it currently is, so a fresh
/// graph always spans period 0 until a removal trims a bound back to the
/// periods actually present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodBounds {
    pub lower: i64,
    pub upper: i64,
    /// `upper - lower + 1`, or 0 for the empty graph.
    pub count: usize,
    /// Population of the most crowded period.
    pub max_nodes_in_period: usize,
}

impl PeriodBounds {
    pub fn contains(&self, period: i64) -> bool {
        self.count > 0 && (self.lower..=self.upper).contains(&period)
    }

    /// Widen to include `period`, whose bucket now holds `population` nodes.
    pub(crate) fn include(&mut self, period: i64, population: usize) {
        self.upper = self.upper.max(period);
        self.lower = self.lower.min(period);
        self.recount();
        self.max_nodes_in_period = self.max_nodes_in_period.max(population);
    }

    /// Called after the bucket for `period` was deleted. A bound that
    /// pointed at it moves to the nearest remaining period; with no periods
    /// left everything returns to the baseline.
    pub(crate) fn trim(&mut self, period: i64, remaining: Option<(i64, i64)>) {
        let Some((first, last)) = remaining else {
            *self = Self::default();
            return;
        };
        if period == self.lower {
            self.lower = first;
        }
        if period == self.upper {
            self.upper = last;
        }
        self.recount();
    }

    fn recount(&mut self) {
        self.count = usize::try_from(self.upper - self.lower)
            .map(|span| span + 1)
            .unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn include_keeps_baseline_period() {
        let mut bounds = PeriodBounds::default();
        bounds.include(3, 1);
        assert_eq!(
            bounds,
            PeriodBounds {
                lower: 0,
                upper: 3,
                count: 4,
                max_nodes_in_period: 1
            }
        );
    }

    #[test]
    fn trim_moves_bound_to_remaining_period() {
        let mut bounds = PeriodBounds::default();
        bounds.include(-2, 1);
        bounds.include(4, 2);
        bounds.trim(-2, Some((1, 4)));
        assert_eq!((bounds.lower, bounds.upper, bounds.count), (1, 4, 4));
    }

    #[test]
    fn trim_without_periods_resets() {
        let mut bounds = PeriodBounds::default();
        bounds.include(2, 1);
        bounds.trim(2, None);
        assert_eq!(bounds, PeriodBounds::default());
        assert!(!bounds.contains(0));
    }
}
