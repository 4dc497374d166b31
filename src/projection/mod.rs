//! Benefit stream valuation and the bank-balance projection engine

mod discount;
mod future_value;
mod state;
mod engine;
mod cashflows;

pub use discount::{months_after_62, net_present_value, present_value_at_62, AnnualRate};
pub use future_value::{accumulated_balance, future_value};
pub use state::{is_december, SimulationState};
pub use engine::{simulate_bank_balance, BankBalanceSimulator};
pub use cashflows::{BalanceCell, BalanceColumn, BalanceProjection, BalanceRow, ColumnSummary};
