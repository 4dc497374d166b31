//! Benefit calculation: full retirement age, the claiming-age formula, and
//! the month-indexed benefit table

mod fra;
mod factor;
mod table;
mod schedule;

pub use fra::{full_retirement_age, full_retirement_month_index};
pub use factor::{early_reduction_factor, monthly_benefit_amount, FRA_EPSILON, MAX_CREDIT_AGE};
pub use table::{
    claiming_age_for_index, index_for_claiming_age, monthly_benefit, BenefitTableCache,
    MonthlyBenefitEntry, MonthlyBenefitTable, CLAIMING_MONTHS, EARLIEST_CLAIMING_AGE,
    LAST_CLAIMING_INDEX,
};
pub use schedule::{BenefitSchedule, RetirementClass, ScheduleRow};
