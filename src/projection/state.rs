//! Running state of one bank-balance column during a simulation

/// State of one (claiming age, interest rate) column
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Signed bank balance; negative while a loan is outstanding
    pub balance: f64,

    /// Cumulative COLA multiplier applied to the benefit
    pub cola_factor: f64,
}

impl SimulationState {
    /// Initialize with the loan being paid down (0 for none)
    pub fn new(pay_down_balance: f64) -> Self {
        Self {
            balance: -pay_down_balance,
            cola_factor: 1.0,
        }
    }

    /// Apply the annual COLA when `months_after_62` falls in December.
    ///
    /// `birth_month_index` is 0..=11. The loan row of a January birthday
    /// (calendar position -1) never triggers.
    pub fn apply_cola(&mut self, months_after_62: i64, birth_month_index: i64, cola: f64) {
        if is_december(months_after_62, birth_month_index) {
            self.cola_factor *= 1.0 + cola / 100.0;
        }
    }

    /// Interest for the month: investment rate on a non-negative balance,
    /// borrowing rate on a negative one. Rates are monthly decimals.
    pub fn monthly_interest(&self, invest_monthly: f64, borrow_monthly: f64) -> f64 {
        if self.balance >= 0.0 {
            self.balance * invest_monthly
        } else {
            self.balance * borrow_monthly
        }
    }

    /// Close the month
    pub fn settle(&mut self, interest: f64, benefit: f64, spending: f64) {
        self.balance += benefit + interest - spending;
    }
}

/// Whether a month offset from the 62nd birthday lands in December
pub fn is_december(months_after_62: i64, birth_month_index: i64) -> bool {
    let calendar = birth_month_index + months_after_62;
    calendar >= 0 && calendar % 12 == 11
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_interest_uses_borrow_rate_when_negative() {
        let mut state = SimulationState::new(10_000.0);
        assert_abs_diff_eq!(state.monthly_interest(0.01, 0.005), -50.0);

        state.balance = 1_000.0;
        assert_abs_diff_eq!(state.monthly_interest(0.01, 0.005), 10.0);
    }

    #[test]
    fn test_december_detection() {
        // Born in March (index 2): month 9 after the birthday is December
        assert!(is_december(9, 2));
        assert!(is_december(21, 2));
        assert!(!is_december(10, 2));
        // Born in January: the loan row at -1 is not a December
        assert!(!is_december(-1, 0));
        assert!(is_december(11, 0));
    }

    #[test]
    fn test_cola_compounds() {
        let mut state = SimulationState::new(0.0);
        for m in 0..36 {
            state.apply_cola(m, 0, 2.0);
        }
        assert_abs_diff_eq!(state.cola_factor, 1.02_f64.powi(3), epsilon = 1e-12);
    }

    #[test]
    fn test_settle() {
        let mut state = SimulationState::new(0.0);
        state.settle(5.0, 1_000.0, 200.0);
        assert_abs_diff_eq!(state.balance, 805.0);
    }
}
