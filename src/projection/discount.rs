//! Monthly compounding and present value of a benefit stream
//!
//! Rates are quoted as annual percentages and applied monthly as
//! `annual / 12 / 100`. Present values are taken at the 62nd birthday.

use serde::{Deserialize, Serialize};

use crate::benefit::{BenefitTableCache, MonthlyBenefitTable, EARLIEST_CLAIMING_AGE};

/// An annual interest rate in percent, compounded monthly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualRate {
    pub percent: f64,
}

impl AnnualRate {
    pub fn new(percent: f64) -> Self {
        Self { percent }
    }

    /// Periodic (monthly) rate as a decimal
    pub fn monthly(&self) -> f64 {
        self.percent / 12.0 / 100.0
    }

    /// One month of growth, `1 + monthly()`
    pub fn growth_factor(&self) -> f64 {
        1.0 + self.monthly()
    }

    /// Factor discounting a payment `months` months back to the start
    pub fn discount_to_month(&self, months: usize) -> f64 {
        1.0 / self.growth_factor().powi(months as i32)
    }
}

/// Whole months from the 62nd birthday to `age`, rounded, never negative
pub fn months_after_62(age: f64) -> usize {
    let months = ((age - EARLIEST_CLAIMING_AGE) * 12.0).round();
    if months > 0.0 {
        months as usize
    } else {
        0
    }
}

/// Present value at age 62 of the monthly benefit for `claiming_age`,
/// paid through the month before `age_at_death`.
///
/// The payment in month `m` (0 = the month of the 62nd birthday) is
/// discounted `m + 1` months.
pub fn present_value_at_62(
    table: &MonthlyBenefitTable,
    claiming_age: f64,
    age_at_death: f64,
    rate: AnnualRate,
    pia: f64,
) -> f64 {
    let monthly_benefit = table.monthly_benefit(claiming_age, pia);
    let first_month = months_after_62(claiming_age);
    let death_month = months_after_62(age_at_death);

    (first_month..death_month)
        .map(|m| monthly_benefit * rate.discount_to_month(m + 1))
        .sum()
}

/// Net present value at age 62, using (and if needed rebuilding) the cache.
/// `annual_rate` is in percent.
pub fn net_present_value(
    cache: &mut BenefitTableCache,
    birth_year: i32,
    claiming_age: f64,
    age_at_death: f64,
    annual_rate: f64,
    pia: f64,
) -> f64 {
    present_value_at_62(
        cache.table_for(birth_year),
        claiming_age,
        age_at_death,
        AnnualRate::new(annual_rate),
        pia,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_monthly_rate() {
        let rate = AnnualRate::new(6.0);
        assert_abs_diff_eq!(rate.monthly(), 0.005);
        assert_relative_eq!(rate.discount_to_month(12), 1.005_f64.powi(-12), max_relative = 1e-12);
        assert_eq!(AnnualRate::new(0.0).discount_to_month(240), 1.0);
    }

    #[test]
    fn test_months_after_62() {
        assert_eq!(months_after_62(62.0), 0);
        assert_eq!(months_after_62(61.0), 0);
        assert_eq!(months_after_62(64.0 + 5.0 / 12.0), 29);
        assert_eq!(months_after_62(100.0), 456);
    }

    #[test]
    fn test_zero_rate_is_plain_sum() {
        let mut cache = BenefitTableCache::new();
        // Born 1960, claim at 67 (PIA), die at 77: 120 payments
        let npv = net_present_value(&mut cache, 1960, 67.0, 77.0, 0.0, 1000.0);
        assert_abs_diff_eq!(npv, 120_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_discounted_annuity() {
        let mut cache = BenefitTableCache::new();
        // Claim at 62 (700/month) for 12 months at 6%: ordinary annuity
        let npv = net_present_value(&mut cache, 1960, 62.0, 63.0, 6.0, 1000.0);
        let expected = 700.0 * (1.0 - 1.005_f64.powi(-12)) / 0.005;
        assert_relative_eq!(npv, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_when_death_precedes_claim() {
        let mut cache = BenefitTableCache::new();
        assert_eq!(net_present_value(&mut cache, 1958, 66.0, 62.0, 3.0, 1000.0), 0.0);
        assert_eq!(net_present_value(&mut cache, 1958, 66.0, 60.0, 3.0, 1000.0), 0.0);
        assert_eq!(net_present_value(&mut cache, 1958, 66.0, 66.0, 3.0, 1000.0), 0.0);
        assert_eq!(net_present_value(&mut cache, 1958, 68.0, 67.5, 3.0, 1000.0), 0.0);
    }

    #[test]
    fn test_nan_rate_propagates() {
        let mut cache = BenefitTableCache::new();
        assert!(net_present_value(&mut cache, 1958, 66.0, 80.0, f64::NAN, 1000.0).is_nan());
    }
}
