//! CLAGESS - Social Security claiming-age estimator
//!
//! This library provides:
//! - Full retirement age and the early-reduction / delayed-credit benefit formula
//! - A month-indexed benefit table (62y0m..70y0m) behind a single-slot cache
//! - Net present value and future value of a benefit stream
//! - A month-by-month bank balance simulator across claiming ages and rates
//! - Exhaustive claiming-age optimizers and the best-age grid

pub mod benefit;
pub mod error;
pub mod estimator;
pub mod format;
pub mod optimizer;
pub mod params;
pub mod projection;

// Re-export commonly used types
pub use benefit::{
    full_retirement_age, monthly_benefit, BenefitSchedule, BenefitTableCache, MonthlyBenefitTable,
};
pub use error::{ClagessError, Result, ValidationErrors};
pub use estimator::Estimator;
pub use format::{format_date, parse_age, parse_claiming_ages, AgeFormat};
pub use optimizer::{
    best_claiming_age_by_balance, best_claiming_age_by_npv, BestAgeGrid, BestClaimingAge,
};
pub use params::{BirthDate, ProjectionParameters};
pub use projection::{future_value, net_present_value, simulate_bank_balance, BalanceProjection};
