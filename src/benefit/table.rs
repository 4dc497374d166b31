//! Month-indexed benefit factor table and its single-slot cache
//!
//! The table holds the benefit factor (fraction of PIA) for every claiming
//! month from 62y0m (index 0) through 70y0m (index 96). It depends only on
//! birth year, so the cache keeps exactly one table and rebuilds it when a
//! different birth year is requested.

use log::debug;
use serde::{Deserialize, Serialize};

use super::factor::monthly_benefit_amount;

/// Earliest claiming age
pub const EARLIEST_CLAIMING_AGE: f64 = 62.0;

/// Number of claiming months in the window 62y0m..=70y0m
pub const CLAIMING_MONTHS: usize = 8 * 12 + 1;

/// Index of the last claiming month (70y0m)
pub const LAST_CLAIMING_INDEX: usize = CLAIMING_MONTHS - 1;

/// Benefit factor for claiming at one exact age
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBenefitEntry {
    pub age_year: u32,
    /// Month within the year of age (0-11)
    pub age_month: u32,
    /// Fraction of PIA paid when claiming at this age
    pub factor: f64,
}

impl MonthlyBenefitEntry {
    /// Months after the 62nd birthday at which this claiming age falls
    pub fn months_after_62(&self) -> usize {
        ((self.age_year - 62) * 12 + self.age_month) as usize
    }

    /// Claiming age in fractional years
    pub fn claiming_age(&self) -> f64 {
        self.age_year as f64 + self.age_month as f64 / 12.0
    }
}

/// Benefit factors for all 97 claiming months for one birth year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBenefitTable {
    birth_year: i32,
    entries: Vec<MonthlyBenefitEntry>,
}

impl MonthlyBenefitTable {
    /// Build the normalized (PIA = 1) table for a birth year
    pub fn build(birth_year: i32) -> Self {
        let entries = (0..CLAIMING_MONTHS)
            .map(|index| {
                let claiming_age = claiming_age_for_index(index);
                MonthlyBenefitEntry {
                    age_year: 62 + (index / 12) as u32,
                    age_month: (index % 12) as u32,
                    factor: monthly_benefit_amount(birth_year, claiming_age, 1.0),
                }
            })
            .collect();

        Self { birth_year, entries }
    }

    pub fn birth_year(&self) -> i32 {
        self.birth_year
    }

    pub fn entries(&self) -> &[MonthlyBenefitEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at an index; indices past 70y0m are clamped to the last entry
    pub fn entry(&self, index: usize) -> &MonthlyBenefitEntry {
        &self.entries[index.min(LAST_CLAIMING_INDEX)]
    }

    /// Benefit factor at an index (clamped like [`entry`](Self::entry))
    pub fn factor(&self, index: usize) -> f64 {
        self.entry(index).factor
    }

    /// Monthly benefit in dollars for a claiming age and PIA
    pub fn monthly_benefit(&self, claiming_age: f64, pia: f64) -> f64 {
        self.factor(index_for_claiming_age(claiming_age)) * pia
    }
}

/// Claiming age (fractional years) for a table index
pub fn claiming_age_for_index(index: usize) -> f64 {
    EARLIEST_CLAIMING_AGE + index as f64 / 12.0
}

/// Table index for a claiming age, rounded to the nearest month and
/// clamped to [0, 96]
pub fn index_for_claiming_age(claiming_age: f64) -> usize {
    let index = ((claiming_age - EARLIEST_CLAIMING_AGE) * 12.0).round();
    if index <= 0.0 {
        0
    } else {
        (index as usize).min(LAST_CLAIMING_INDEX)
    }
}

/// Single-slot cache of the benefit table, keyed by birth year.
///
/// Owned by the caller and passed by `&mut` into the engines. A rebuild
/// replaces the whole table in one assignment.
#[derive(Debug, Default)]
pub struct BenefitTableCache {
    table: Option<MonthlyBenefitTable>,

    /// Statistics
    pub hits: u64,
    pub rebuilds: u64,
}

impl BenefitTableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Birth year of the resident table, if any
    pub fn cached_birth_year(&self) -> Option<i32> {
        self.table.as_ref().map(|t| t.birth_year())
    }

    /// Table for `birth_year`, rebuilding only if the birth year changed
    pub fn table_for(&mut self, birth_year: i32) -> &MonthlyBenefitTable {
        if self.cached_birth_year() == Some(birth_year) {
            self.hits += 1;
        } else {
            debug!(
                "Rebuilding benefit table for birth year {} (was {:?})",
                birth_year,
                self.cached_birth_year()
            );
            self.rebuilds += 1;
            self.table = None;
        }
        self.table.get_or_insert_with(|| MonthlyBenefitTable::build(birth_year))
    }

    /// Drop the resident table
    pub fn clear(&mut self) {
        self.table = None;
        self.hits = 0;
        self.rebuilds = 0;
    }
}

/// Monthly benefit in dollars, using (and if needed rebuilding) the cache
pub fn monthly_benefit(
    cache: &mut BenefitTableCache,
    birth_year: i32,
    claiming_age: f64,
    pia: f64,
) -> f64 {
    cache.table_for(birth_year).monthly_benefit(claiming_age, pia)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benefit::fra::{full_retirement_age, full_retirement_month_index};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_table_shape() {
        let table = MonthlyBenefitTable::build(1957);
        assert_eq!(table.len(), 97);

        let first = table.entry(0);
        assert_eq!((first.age_year, first.age_month), (62, 0));

        let mid = table.entry(29);
        assert_eq!((mid.age_year, mid.age_month), (64, 5));
        assert_eq!(mid.months_after_62(), 29);

        let last = table.entry(96);
        assert_eq!((last.age_year, last.age_month), (70, 0));
    }

    #[test]
    fn test_factor_is_one_at_fra() {
        for year in 1954..=1960 {
            let table = MonthlyBenefitTable::build(year);
            assert_eq!(table.factor(full_retirement_month_index(year)), 1.0);
        }
    }

    #[test]
    fn test_strictly_increasing() {
        let table = MonthlyBenefitTable::build(1958);
        for pair in table.entries().windows(2) {
            assert!(pair[1].factor > pair[0].factor);
        }
    }

    #[test]
    fn test_lookup_rounds_and_clamps() {
        let table = MonthlyBenefitTable::build(1960);
        assert_abs_diff_eq!(table.monthly_benefit(62.0, 1000.0), 700.0, epsilon = 1e-9);
        assert_abs_diff_eq!(table.monthly_benefit(70.0, 1000.0), 1240.0, epsilon = 1e-9);

        // Below 62 and above 70 clamp to the window ends
        assert_eq!(table.monthly_benefit(55.0, 1000.0), table.monthly_benefit(62.0, 1000.0));
        assert_eq!(table.monthly_benefit(75.0, 1000.0), table.monthly_benefit(70.0, 1000.0));

        // Rounded to the nearest month
        assert_eq!(index_for_claiming_age(64.0 + 5.4 / 12.0), 29);
        assert_eq!(index_for_claiming_age(64.0 + 5.6 / 12.0), 30);
    }

    #[test]
    fn test_cache_rebuilds_only_on_birth_year_change() {
        let mut cache = BenefitTableCache::new();
        assert_eq!(cache.cached_birth_year(), None);

        monthly_benefit(&mut cache, 1956, 65.0, 1000.0);
        monthly_benefit(&mut cache, 1956, 68.0, 1000.0);
        assert_eq!(cache.rebuilds, 1);
        assert_eq!(cache.hits, 1);

        monthly_benefit(&mut cache, 1959, 65.0, 1000.0);
        assert_eq!(cache.rebuilds, 2);
        assert_eq!(cache.cached_birth_year(), Some(1959));

        cache.clear();
        assert_eq!(cache.cached_birth_year(), None);
    }

    #[test]
    fn test_cached_lookup_matches_formula_at_fra() {
        let mut cache = BenefitTableCache::new();
        let fra = full_retirement_age(1955);
        assert_abs_diff_eq!(monthly_benefit(&mut cache, 1955, fra, 1500.0), 1500.0, epsilon = 1e-9);
    }
}
