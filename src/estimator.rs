//! Estimator for repeated queries against one cached benefit table
//!
//! Holds the single-slot table cache, so a session that keeps asking about
//! the same birth year builds the 97-month table once.

use crate::benefit::{BenefitSchedule, BenefitTableCache, MonthlyBenefitTable};
use crate::optimizer::{self, BestAgeGrid, BestClaimingAge};
use crate::params::ProjectionParameters;
use crate::projection::{self, BalanceProjection};

/// Cached-table front end over the benefit, projection and optimizer engines
///
/// # Example
/// ```ignore
/// let mut estimator = Estimator::new();
///
/// for rate in [0.0, 3.0, 6.0] {
///     let best = estimator.best_claiming_age_by_npv(1960, 85.0, rate, 1000.0);
///     println!("{}% -> {}", rate, best.claiming_age());
/// }
/// ```
#[derive(Debug, Default)]
pub struct Estimator {
    cache: BenefitTableCache,
}

impl Estimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Benefit table for `birth_year`, rebuilding the cache on a miss
    pub fn table(&mut self, birth_year: i32) -> &MonthlyBenefitTable {
        self.cache.table_for(birth_year)
    }

    pub fn cache(&self) -> &BenefitTableCache {
        &self.cache
    }

    pub fn monthly_benefit(&mut self, birth_year: i32, claiming_age: f64, pia: f64) -> f64 {
        self.table(birth_year).monthly_benefit(claiming_age, pia)
    }

    pub fn net_present_value(
        &mut self,
        birth_year: i32,
        claiming_age: f64,
        age_at_death: f64,
        annual_rate: f64,
        pia: f64,
    ) -> f64 {
        projection::net_present_value(
            &mut self.cache,
            birth_year,
            claiming_age,
            age_at_death,
            annual_rate,
            pia,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn future_value(
        &mut self,
        birth_year: i32,
        claiming_age: f64,
        age_at_death: f64,
        annual_rate: f64,
        cola: f64,
        birth_month: u32,
        pia: f64,
    ) -> f64 {
        projection::future_value(
            &mut self.cache,
            birth_year,
            claiming_age,
            age_at_death,
            annual_rate,
            cola,
            birth_month,
            pia,
        )
    }

    pub fn best_claiming_age_by_npv(
        &mut self,
        birth_year: i32,
        age_at_death: f64,
        annual_rate: f64,
        pia: f64,
    ) -> BestClaimingAge {
        optimizer::best_claiming_age_by_npv(&mut self.cache, birth_year, age_at_death, annual_rate, pia)
    }

    pub fn best_claiming_age_by_balance(
        &mut self,
        birth_year: i32,
        age_at_death: f64,
        annual_rate: f64,
        cola: f64,
        birth_month: u32,
        pia: f64,
    ) -> BestClaimingAge {
        optimizer::best_claiming_age_by_balance(
            &mut self.cache,
            birth_year,
            age_at_death,
            annual_rate,
            cola,
            birth_month,
            pia,
        )
    }

    /// Bank balance projection for one parameter set
    pub fn simulate(&mut self, params: &ProjectionParameters) -> BalanceProjection {
        projection::simulate_bank_balance(&mut self.cache, params)
    }

    /// Run several parameter sets, reusing the table while the birth year holds
    pub fn simulate_batch(&mut self, params: &[ProjectionParameters]) -> Vec<BalanceProjection> {
        params.iter().map(|p| self.simulate(p)).collect()
    }

    /// Month-by-month payment schedule from 62 through 70
    pub fn schedule(&mut self, birth_year: i32, birth_month: u32, pia: f64) -> BenefitSchedule {
        BenefitSchedule::build(self.table(birth_year), birth_month, pia)
    }

    /// Best-claiming-age grid for the birth date, COLA and PIA in `params`,
    /// with ages at death up to `params.max_age`
    pub fn best_age_grid(&mut self, params: &ProjectionParameters) -> BestAgeGrid {
        let max_age_at_death = params.max_age.floor().max(0.0) as u32;
        BestAgeGrid::build(
            self.cache.table_for(params.birth_year),
            params.birth_month,
            params.cola,
            params.pia,
            max_age_at_death,
        )
    }
}
