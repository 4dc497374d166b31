//! Benefit-versus-claiming-age schedule
//!
//! One row per claiming month, with the dollar benefit and its ratios to
//! the age-62, FRA and age-70 benefits.

use serde::Serialize;

use super::fra::{full_retirement_age, full_retirement_month_index};
use super::table::{claiming_age_for_index, MonthlyBenefitTable, LAST_CLAIMING_INDEX};
use crate::format::{format_date, AgeFormat};

/// SSA classification of a claiming age relative to FRA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RetirementClass {
    Early,
    Normal,
    Late,
}

/// A single row of the schedule
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRow {
    pub months_after_62: usize,
    /// Claiming age as `year:month`
    pub claiming_age: String,
    /// Calendar month the claiming age falls in
    pub claiming_date: String,
    pub class: RetirementClass,
    pub monthly_benefit: f64,

    /// Percent increase over the previous month (None for 62y0m)
    pub increase_from_previous_month_pct: Option<f64>,
    /// Percent increase over 12 months earlier (None before 63y0m)
    pub increase_from_previous_year_pct: Option<f64>,

    pub ratio_to_age_62_pct: f64,
    pub ratio_to_fra_pct: f64,
    pub ratio_to_age_70_pct: f64,

    /// Months of the larger benefit needed to recover the one month
    /// given up by delaying (None for 62y0m)
    pub payback_months: Option<f64>,
}

/// Full schedule for one claimant
#[derive(Debug, Clone, Serialize)]
pub struct BenefitSchedule {
    pub birth_year: i32,
    pub birth_month: u32,
    pub pia: f64,
    pub full_retirement_age: f64,
    pub rows: Vec<ScheduleRow>,
}

impl BenefitSchedule {
    /// Build the schedule from a table. `birth_month` is 1..=12.
    pub fn build(table: &MonthlyBenefitTable, birth_month: u32, pia: f64) -> Self {
        let birth_year = table.birth_year();
        let fra_index = full_retirement_month_index(birth_year);
        let factor = |i: usize| table.factor(i);

        let rows = (0..=LAST_CLAIMING_INDEX)
            .map(|m| {
                let class = match m.cmp(&fra_index) {
                    std::cmp::Ordering::Less => RetirementClass::Early,
                    std::cmp::Ordering::Equal => RetirementClass::Normal,
                    std::cmp::Ordering::Greater => RetirementClass::Late,
                };

                let current = factor(m);
                let (prev_month_pct, payback) = if m == 0 {
                    (None, None)
                } else {
                    let previous = factor(m - 1);
                    (
                        Some(100.0 * current / previous - 100.0),
                        Some(previous / (current - previous)),
                    )
                };
                let prev_year_pct = (m >= 12).then(|| 100.0 * current / factor(m - 12) - 100.0);

                ScheduleRow {
                    months_after_62: m,
                    claiming_age: AgeFormat::Colon.format(claiming_age_for_index(m)),
                    claiming_date: format_date(
                        birth_year + 62,
                        birth_month as i64 - 1 + m as i64,
                    ),
                    class,
                    monthly_benefit: current * pia,
                    increase_from_previous_month_pct: prev_month_pct,
                    increase_from_previous_year_pct: prev_year_pct,
                    ratio_to_age_62_pct: 100.0 * current / factor(0),
                    ratio_to_fra_pct: 100.0 * current / factor(fra_index),
                    ratio_to_age_70_pct: 100.0 * current / factor(LAST_CLAIMING_INDEX),
                    payback_months: payback,
                }
            })
            .collect();

        Self {
            birth_year,
            birth_month,
            pia,
            full_retirement_age: full_retirement_age(birth_year),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_schedule_born_1960() {
        let table = MonthlyBenefitTable::build(1960);
        let schedule = BenefitSchedule::build(&table, 3, 1000.0);

        assert_eq!(schedule.rows.len(), 97);

        let first = &schedule.rows[0];
        assert_eq!(first.claiming_age, "62:0");
        assert_eq!(first.claiming_date, "March 2022");
        assert_eq!(first.class, RetirementClass::Early);
        assert_abs_diff_eq!(first.monthly_benefit, 700.0, epsilon = 1e-9);
        assert!(first.increase_from_previous_month_pct.is_none());
        assert!(first.payback_months.is_none());
        assert_abs_diff_eq!(first.ratio_to_fra_pct, 70.0, epsilon = 1e-9);

        let fra_row = &schedule.rows[60];
        assert_eq!(fra_row.class, RetirementClass::Normal);
        assert_eq!(fra_row.claiming_age, "67:0");
        assert_abs_diff_eq!(fra_row.monthly_benefit, 1000.0, epsilon = 1e-9);

        let last = &schedule.rows[96];
        assert_eq!(last.class, RetirementClass::Late);
        assert_abs_diff_eq!(last.ratio_to_age_70_pct, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(last.ratio_to_age_62_pct, 1240.0 / 7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_payback_after_fra() {
        let table = MonthlyBenefitTable::build(1960);
        let schedule = BenefitSchedule::build(&table, 1, 1000.0);

        // Past FRA each month adds 8%/12 of PIA: 1000 / (80/12) = 150 months
        let row = &schedule.rows[61];
        assert_abs_diff_eq!(row.payback_months.unwrap(), 150.0, epsilon = 1e-6);
        assert!(row.increase_from_previous_year_pct.unwrap() > 0.0);
    }
}
