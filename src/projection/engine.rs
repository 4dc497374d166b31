//! Month-by-month bank balance simulation
//!
//! Every (claiming age × interest rate) combination runs its own balance
//! side by side, so one run yields a comparison matrix. Benefits are
//! deposited from the claiming month, interest accrues on the prior balance
//! (or borrowing cost while it is negative), spending is withdrawn, and the
//! benefit is raised by COLA every December.

use log::debug;

use crate::benefit::{index_for_claiming_age, BenefitTableCache, MonthlyBenefitTable};
use crate::format::{format_date, AgeFormat};
use crate::params::ProjectionParameters;
use super::cashflows::{BalanceCell, BalanceColumn, BalanceProjection, BalanceRow};
use super::discount::{months_after_62, AnnualRate};
use super::state::SimulationState;

/// Bank balance simulator over a prebuilt benefit table
pub struct BankBalanceSimulator<'a> {
    table: &'a MonthlyBenefitTable,
    params: &'a ProjectionParameters,
}

impl<'a> BankBalanceSimulator<'a> {
    /// The table must be built for `params.birth_year`
    pub fn new(table: &'a MonthlyBenefitTable, params: &'a ProjectionParameters) -> Self {
        Self { table, params }
    }

    /// Columns in claiming-age-major order
    pub fn columns(&self) -> Vec<BalanceColumn> {
        let several_rates = self.params.interest_rates.len() > 1;
        let mut columns = Vec::with_capacity(
            self.params.claiming_ages.len() * self.params.interest_rates.len(),
        );

        for &claiming_age in &self.params.claiming_ages {
            let index = index_for_claiming_age(claiming_age);
            let entry = self.table.entry(index);
            for &rate in &self.params.interest_rates {
                let mut label = AgeFormat::Colon.format(claiming_age);
                if several_rates {
                    label.push_str(&format!(" @ {}%", rate));
                }
                columns.push(BalanceColumn {
                    label,
                    claiming_age,
                    interest_rate: rate,
                    start_month: entry.months_after_62(),
                    factor: entry.factor,
                });
            }
        }
        columns
    }

    /// Run the simulation
    pub fn run(&self) -> BalanceProjection {
        let params = self.params;
        let birth = params.birth_date();
        let columns = self.columns();

        let horizon = months_after_62(params.max_age) as i64;
        let arrears = i64::from(params.arrears);
        let num_months = horizon + arrears;
        let first_month: i64 = if params.pay_down_balance > 0.0 { -1 } else { 0 };
        let borrow_monthly = AnnualRate::new(params.borrow_rate).monthly();

        debug!(
            "Simulating {} column(s) for birth {}-{:02}, months {}..={}",
            columns.len(),
            birth.year,
            birth.month,
            first_month,
            num_months
        );

        let mut states: Vec<SimulationState> = columns
            .iter()
            .map(|_| SimulationState::new(params.pay_down_balance))
            .collect();
        let mut projection = BalanceProjection::new(birth, params.pia, params.arrears, columns);

        for m in first_month..=num_months {
            let calendar = birth.month_index() + m;
            let mut cells = Vec::with_capacity(states.len());

            for (state, column) in states.iter_mut().zip(&projection.columns) {
                state.apply_cola(m, birth.month_index(), params.cola);

                let mut cell = BalanceCell {
                    balance: state.balance,
                    ..Default::default()
                };

                if (0..num_months).contains(&m) {
                    let invest_monthly = AnnualRate::new(column.interest_rate).monthly();
                    let interest = state.monthly_interest(invest_monthly, borrow_monthly);
                    let benefit_starts = column.start_month as i64 + arrears;
                    let benefit = if m >= benefit_starts && m <= horizon {
                        column.factor * params.pia * state.cola_factor
                    } else {
                        0.0
                    };

                    state.settle(interest, benefit, params.monthly_spending);
                    cell = BalanceCell {
                        interest,
                        benefit,
                        balance: state.balance,
                    };
                }
                cells.push(cell);
            }

            let best_column = (m >= 0).then(|| best_positive_column(&cells));
            let cola_factor = states.first().map(|s| s.cola_factor).unwrap_or(1.0);

            projection.add_row(BalanceRow {
                months_after_62: m,
                date: format_date(birth.year + 62, calendar),
                payment_date: params
                    .arrears
                    .then(|| format_date(birth.year + 62, calendar + 1)),
                age: AgeFormat::Colon.format(62.0 + m as f64 / 12.0),
                cola_factor,
                cells,
                best_column,
            });
        }

        projection
    }
}

/// Index of the highest balance strictly above zero; the first column wins
/// ties and is returned when no balance is positive
fn best_positive_column(cells: &[BalanceCell]) -> usize {
    let mut best_balance = 0.0;
    let mut best_column = 0;
    for (i, cell) in cells.iter().enumerate() {
        if cell.balance > best_balance {
            best_balance = cell.balance;
            best_column = i;
        }
    }
    best_column
}

/// Run a bank balance projection, using (and if needed rebuilding) the cache
pub fn simulate_bank_balance(
    cache: &mut BenefitTableCache,
    params: &ProjectionParameters,
) -> BalanceProjection {
    let table = cache.table_for(params.birth_year);
    BankBalanceSimulator::new(table, params).run()
}
