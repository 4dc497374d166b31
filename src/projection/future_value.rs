//! Single-stream future value used by the balance optimizer
//!
//! Deposits the monthly benefit from the claiming month until the month
//! before death, compounding the balance monthly. COLA raises the benefit
//! once a year, in the month that falls in December for the claimant's
//! birth month.

use crate::benefit::{BenefitTableCache, MonthlyBenefitTable};
use super::discount::{months_after_62, AnnualRate};

/// Future value at `age_at_death` of the benefit stream for `claiming_age`.
/// `birth_month` is 1..=12, `cola` in percent.
pub fn accumulated_balance(
    table: &MonthlyBenefitTable,
    claiming_age: f64,
    age_at_death: f64,
    rate: AnnualRate,
    cola: f64,
    birth_month: u32,
    pia: f64,
) -> f64 {
    let mut monthly_benefit = table.monthly_benefit(claiming_age, pia);
    let first_month = months_after_62(claiming_age);
    let death_month = months_after_62(age_at_death);
    let growth = rate.growth_factor();
    let cola_month = cola_month_offset(birth_month);

    let mut balance = 0.0;
    for m in 0..death_month {
        if m > 0 && m % 12 == cola_month {
            monthly_benefit *= 1.0 + cola / 100.0;
        }
        if m >= first_month {
            balance = balance * growth + monthly_benefit;
        }
    }
    balance
}

/// Month-after-62 remainder (mod 12) on which December falls
fn cola_month_offset(birth_month: u32) -> usize {
    let month_index = (birth_month.clamp(1, 12) - 1) as usize;
    11 - month_index
}

/// Future value using (and if needed rebuilding) the cache.
/// `annual_rate` and `cola` are in percent, `birth_month` is 1..=12.
#[allow(clippy::too_many_arguments)]
pub fn future_value(
    cache: &mut BenefitTableCache,
    birth_year: i32,
    claiming_age: f64,
    age_at_death: f64,
    annual_rate: f64,
    cola: f64,
    birth_month: u32,
    pia: f64,
) -> f64 {
    accumulated_balance(
        cache.table_for(birth_year),
        claiming_age,
        age_at_death,
        AnnualRate::new(annual_rate),
        cola,
        birth_month,
        pia,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_zero_rate_zero_cola() {
        let mut cache = BenefitTableCache::new();
        let fv = future_value(&mut cache, 1960, 67.0, 77.0, 0.0, 0.0, 1, 1000.0);
        assert_abs_diff_eq!(fv, 120_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_compounding() {
        let mut cache = BenefitTableCache::new();
        // 12 deposits of 700 at 6%: future value of an ordinary annuity
        let fv = future_value(&mut cache, 1960, 62.0, 63.0, 6.0, 0.0, 1, 1000.0);
        let expected = 700.0 * (1.005_f64.powi(12) - 1.0) / 0.005;
        assert_relative_eq!(fv, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_cola_lands_on_december() {
        let mut cache = BenefitTableCache::new();
        // Born in December: months 11, 23 ... after 62 are Novembers, so the
        // first bump is at m = 11 - 11 = 0, which is skipped; the next is m = 12
        let december = future_value(&mut cache, 1960, 62.0, 63.0 + 1.0 / 12.0, 0.0, 10.0, 12, 1000.0);
        assert_abs_diff_eq!(december, 12.0 * 700.0 + 770.0, epsilon = 1e-9);

        // Born in January: bump at m = 11
        let january = future_value(&mut cache, 1960, 62.0, 63.0, 0.0, 10.0, 1, 1000.0);
        assert_abs_diff_eq!(january, 11.0 * 700.0 + 770.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_after_death() {
        let mut cache = BenefitTableCache::new();
        assert_eq!(future_value(&mut cache, 1960, 66.0, 65.0, 5.0, 2.0, 6, 1000.0), 0.0);
    }
}
