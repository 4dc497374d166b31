//! Claiming-age optimization
//!
//! Every candidate month from 62y0m through 70y0m is evaluated and the
//! strictly best one kept, so earlier months win ties. A search that finds
//! nothing above zero reports month 0 with value 0.

use std::io::Write;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::benefit::{claiming_age_for_index, BenefitTableCache, MonthlyBenefitTable, CLAIMING_MONTHS};
use crate::error::Result;
use crate::format::AgeFormat;
use crate::projection::{accumulated_balance, present_value_at_62, AnnualRate};

/// Result of a claiming-age search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestClaimingAge {
    /// Months after the 62nd birthday, 0..=96
    pub best_month_index: usize,
    /// NPV or end balance at the best month
    pub best_value: f64,
}

impl BestClaimingAge {
    pub fn claiming_age(&self) -> f64 {
        claiming_age_for_index(self.best_month_index)
    }
}

/// Exhaustive scan over the 97 claiming months
fn scan<F>(value_at: F) -> BestClaimingAge
where
    F: Fn(f64) -> f64,
{
    let mut best = BestClaimingAge {
        best_month_index: 0,
        best_value: 0.0,
    };

    for index in 0..CLAIMING_MONTHS {
        let value = value_at(claiming_age_for_index(index));
        if value > best.best_value {
            best = BestClaimingAge {
                best_month_index: index,
                best_value: value,
            };
        }
    }

    best
}

/// Claiming month maximizing present value at 62
pub fn best_by_npv(
    table: &MonthlyBenefitTable,
    age_at_death: f64,
    rate: AnnualRate,
    pia: f64,
) -> BestClaimingAge {
    scan(|claiming_age| present_value_at_62(table, claiming_age, age_at_death, rate, pia))
}

/// Claiming month maximizing the accumulated balance at death.
/// `birth_month` is 1..=12.
pub fn best_by_balance(
    table: &MonthlyBenefitTable,
    age_at_death: f64,
    rate: AnnualRate,
    cola: f64,
    birth_month: u32,
    pia: f64,
) -> BestClaimingAge {
    scan(|claiming_age| {
        accumulated_balance(table, claiming_age, age_at_death, rate, cola, birth_month, pia)
    })
}

/// NPV-optimal claiming age using (and if needed rebuilding) the cache
pub fn best_claiming_age_by_npv(
    cache: &mut BenefitTableCache,
    birth_year: i32,
    age_at_death: f64,
    annual_rate: f64,
    pia: f64,
) -> BestClaimingAge {
    let best = best_by_npv(
        cache.table_for(birth_year),
        age_at_death,
        AnnualRate::new(annual_rate),
        pia,
    );
    debug!(
        "Best NPV claiming month for {} dying at {} with {}%: {} ({:.2})",
        birth_year, age_at_death, annual_rate, best.best_month_index, best.best_value
    );
    best
}

/// Balance-optimal claiming age using (and if needed rebuilding) the cache
#[allow(clippy::too_many_arguments)]
pub fn best_claiming_age_by_balance(
    cache: &mut BenefitTableCache,
    birth_year: i32,
    age_at_death: f64,
    annual_rate: f64,
    cola: f64,
    birth_month: u32,
    pia: f64,
) -> BestClaimingAge {
    let best = best_by_balance(
        cache.table_for(birth_year),
        age_at_death,
        AnnualRate::new(annual_rate),
        cola,
        birth_month,
        pia,
    );
    debug!(
        "Best balance claiming month for {} dying at {} with {}%: {} ({:.2})",
        birth_year, age_at_death, annual_rate, best.best_month_index, best.best_value
    );
    best
}

/// Interest rates (percent) across the grid columns
pub const GRID_RATES: std::ops::RangeInclusive<i32> = -4..=8;

/// Ages at death down the grid rows start here and step by this many years
pub const GRID_FIRST_AGE_AT_DEATH: u32 = 62;
pub const GRID_AGE_STEP: usize = 2;

/// One row of the best-claiming-age grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestAgeRow {
    pub age_at_death: u32,
    /// One entry per rate in [`GRID_RATES`]
    pub cells: Vec<BestClaimingAge>,
}

/// Balance-optimal claiming ages by longevity (rows) and interest rate (columns)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestAgeGrid {
    pub birth_year: i32,
    pub birth_month: u32,
    pub cola: f64,
    pub pia: f64,
    pub rates: Vec<f64>,
    pub rows: Vec<BestAgeRow>,
}

impl BestAgeGrid {
    /// Evaluate the grid for ages at death 62, 64, ... up to `max_age_at_death`.
    /// Rows run in parallel over the shared table.
    pub fn build(
        table: &MonthlyBenefitTable,
        birth_month: u32,
        cola: f64,
        pia: f64,
        max_age_at_death: u32,
    ) -> Self {
        let rates: Vec<f64> = GRID_RATES.map(f64::from).collect();
        let ages: Vec<u32> = (GRID_FIRST_AGE_AT_DEATH..=max_age_at_death)
            .step_by(GRID_AGE_STEP)
            .collect();

        debug!(
            "Building best-age grid: {} rows x {} rates for birth year {}",
            ages.len(),
            rates.len(),
            table.birth_year()
        );

        let rows = ages
            .par_iter()
            .map(|&age_at_death| BestAgeRow {
                age_at_death,
                cells: rates
                    .iter()
                    .map(|&rate| {
                        best_by_balance(
                            table,
                            f64::from(age_at_death),
                            AnnualRate::new(rate),
                            cola,
                            birth_month,
                            pia,
                        )
                    })
                    .collect(),
            })
            .collect();

        Self {
            birth_year: table.birth_year(),
            birth_month,
            cola,
            pia,
            rates,
            rows,
        }
    }

    /// Write the grid as CSV: one row per age at death, claiming ages as
    /// `year:month` under each rate
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let mut header = vec!["AgeAtDeath".to_string()];
        header.extend(self.rates.iter().map(|r| format!("{:.1}%", r)));
        csv.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.age_at_death.to_string()];
            record.extend(
                row.cells
                    .iter()
                    .map(|cell| AgeFormat::Colon.format(cell.claiming_age())),
            );
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_short_life_claims_at_62() {
        let mut cache = BenefitTableCache::new();
        let best = best_claiming_age_by_npv(&mut cache, 1960, 63.0, 3.0, 1000.0);
        assert_eq!(best.best_month_index, 0);
        assert!(best.best_value > 0.0);

        let best = best_claiming_age_by_balance(&mut cache, 1960, 63.0, 3.0, 0.0, 1, 1000.0);
        assert_eq!(best.best_month_index, 0);
    }

    #[test]
    fn test_long_life_negative_rate_claims_at_70() {
        let mut cache = BenefitTableCache::new();
        let best = best_claiming_age_by_npv(&mut cache, 1960, 100.0, -2.0, 1000.0);
        assert_eq!(best.best_month_index, 96);
        assert_abs_diff_eq!(best.claiming_age(), 70.0);

        let best = best_claiming_age_by_balance(&mut cache, 1960, 100.0, 0.0, 0.0, 1, 1000.0);
        assert_eq!(best.best_month_index, 96);
    }

    #[test]
    fn test_nothing_positive_reports_month_zero() {
        let mut cache = BenefitTableCache::new();
        let best = best_claiming_age_by_npv(&mut cache, 1960, 62.0, 3.0, 1000.0);
        assert_eq!(best, BestClaimingAge { best_month_index: 0, best_value: 0.0 });
    }

    #[test]
    fn test_tie_keeps_first() {
        let best = scan(|_| 5.0);
        assert_eq!(best.best_month_index, 0);
        assert_eq!(best.best_value, 5.0);

        // Plateau from 63 onward: the first month of the plateau wins
        let best = scan(|age| if age >= 63.0 { 10.0 } else { 1.0 });
        assert_eq!(best.best_month_index, 12);
    }

    #[test]
    fn test_grid_shape_and_bounds() {
        let table = MonthlyBenefitTable::build(1958);
        let grid = BestAgeGrid::build(&table, 6, 2.0, 1000.0, 100);

        assert_eq!(grid.rates.len(), 13);
        assert_eq!(grid.rates[0], -4.0);
        assert_eq!(grid.rows.len(), 20);
        assert_eq!(grid.rows[0].age_at_death, 62);
        assert_eq!(grid.rows.last().unwrap().age_at_death, 100);
        for row in &grid.rows {
            assert_eq!(row.cells.len(), 13);
            assert!(row.cells.iter().all(|c| c.best_month_index <= 96));
        }
        // Age at death 62: nothing is collected
        assert!(grid.rows[0].cells.iter().all(|c| c.best_value == 0.0));
    }

    #[test]
    fn test_grid_csv() {
        let table = MonthlyBenefitTable::build(1960);
        let grid = BestAgeGrid::build(&table, 1, 0.0, 1000.0, 64);
        let mut out = Vec::new();
        grid.write_csv(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("AgeAtDeath,-4.0%,-3.0%"));
        assert!(header.ends_with("8.0%"));
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(1).unwrap().starts_with("62,62:0"));
    }
}
