//! Early-reduction and delayed-credit benefit formula

use super::fra::full_retirement_age;

/// Claiming ages within this distance of FRA pay exactly the PIA
pub const FRA_EPSILON: f64 = 0.001;

/// Latest claiming age that still earns delayed retirement credit
pub const MAX_CREDIT_AGE: f64 = 70.0;

/// Annual reduction for the first 36 months early (5/9 of 1% per month)
const FIRST_TIER_ANNUAL_REDUCTION: f64 = 12.0 * 5.0 / 900.0;

/// Annual reduction beyond 36 months early (5/12 of 1% per month)
const SECOND_TIER_ANNUAL_REDUCTION: f64 = 12.0 * 5.0 / 1200.0;

/// Years covered by the first reduction tier
const FIRST_TIER_YEARS: f64 = 3.0;

/// Delayed retirement credit per year past FRA (birth years 1943+)
const DELAYED_CREDIT_PER_YEAR: f64 = 0.08;

/// Monthly benefit for claiming at `claiming_age` given a PIA.
///
/// Pass `pia = 1.0` to get the bare adjustment factor. The early reduction
/// is not floored: a claiming age far enough below FRA gives a negative
/// result.
pub fn monthly_benefit_amount(birth_year: i32, claiming_age: f64, pia: f64) -> f64 {
    let fra = full_retirement_age(birth_year);

    if (claiming_age - fra).abs() < FRA_EPSILON {
        return pia;
    }

    if claiming_age < fra {
        return pia * early_reduction_factor(fra - claiming_age);
    }

    // f64::min would swallow a NaN claiming age
    let credited_age = if claiming_age > MAX_CREDIT_AGE { MAX_CREDIT_AGE } else { claiming_age };
    let years_late = credited_age - fra;
    pia * (1.0 + years_late * DELAYED_CREDIT_PER_YEAR)
}

/// Fraction of PIA paid when claiming `years_early` before FRA
pub fn early_reduction_factor(years_early: f64) -> f64 {
    if years_early <= FIRST_TIER_YEARS {
        1.0 - years_early * FIRST_TIER_ANNUAL_REDUCTION
    } else {
        1.0 - FIRST_TIER_YEARS * FIRST_TIER_ANNUAL_REDUCTION
            - (years_early - FIRST_TIER_YEARS) * SECOND_TIER_ANNUAL_REDUCTION
    }
}
