//! Projection parameters and their input-layer validation
//!
//! Parameters can be built in code, deserialized from JSON (every field but
//! the birth year has a default), or loaded from a JSON file. The engines
//! never validate; callers that accept user input run
//! [`ProjectionParameters::validate`] first.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationErrors};

/// Month and year of birth. `month` is 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthDate {
    pub year: i32,
    pub month: u32,
}

impl BirthDate {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Birth month as 0..=11
    pub fn month_index(&self) -> i64 {
        self.month as i64 - 1
    }
}

/// Inputs for a bank-balance projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParameters {
    pub birth_year: i32,

    /// Birth month, 1..=12 (default: January)
    #[serde(default = "default_birth_month")]
    pub birth_month: u32,

    /// Primary Insurance Amount, monthly dollars at FRA (default: $1000)
    #[serde(default = "default_pia")]
    pub pia: f64,

    /// Claiming ages to compare, fractional years (default: 62, 67, 70)
    #[serde(default = "default_claiming_ages")]
    pub claiming_ages: Vec<f64>,

    /// Annual investment rates in percent, one column group each (default: 0%)
    #[serde(default = "default_interest_rates")]
    pub interest_rates: Vec<f64>,

    /// Annual cost-of-living adjustment in percent
    #[serde(default)]
    pub cola: f64,

    /// Annual rate in percent charged on a negative balance
    #[serde(default)]
    pub borrow_rate: f64,

    /// Dollars deducted from the balance every month
    #[serde(default)]
    pub monthly_spending: f64,

    /// Outstanding loan the benefits pay down; the balance starts at its negative
    #[serde(default)]
    pub pay_down_balance: f64,

    /// Recognize each benefit the month after it is earned
    #[serde(default)]
    pub arrears: bool,

    /// Age to simulate to (default: 100)
    #[serde(default = "default_max_age")]
    pub max_age: f64,
}

fn default_birth_month() -> u32 { 1 }
fn default_pia() -> f64 { 1000.0 }
fn default_claiming_ages() -> Vec<f64> { vec![62.0, 67.0, 70.0] }
fn default_interest_rates() -> Vec<f64> { vec![0.0] }
fn default_max_age() -> f64 { 100.0 }

impl ProjectionParameters {
    /// Parameters with defaults for everything except the birth year
    pub fn for_birth_year(birth_year: i32) -> Self {
        Self {
            birth_year,
            birth_month: default_birth_month(),
            pia: default_pia(),
            claiming_ages: default_claiming_ages(),
            interest_rates: default_interest_rates(),
            cola: 0.0,
            borrow_rate: 0.0,
            monthly_spending: 0.0,
            pay_down_balance: 0.0,
            arrears: false,
            max_age: default_max_age(),
        }
    }

    /// Load parameters from a JSON file
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let params = serde_json::from_reader(BufReader::new(file))?;
        Ok(params)
    }

    pub fn birth_date(&self) -> BirthDate {
        BirthDate::new(self.birth_year, self.birth_month)
    }

    /// Check every field against its plausible range, collecting all
    /// failures. NaN fails every range check.
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !(1900..=2050).contains(&self.birth_year) {
            errors.push(format!(
                "Birth year={}, expecting value of between 1900 and 2050.",
                self.birth_year
            ));
        }
        if !(1..=12).contains(&self.birth_month) {
            errors.push(format!(
                "Birth month={}, expecting value of between 1 and 12.",
                self.birth_month
            ));
        }

        if self.claiming_ages.is_empty() {
            errors.push("Claiming-Ages: expecting at least one claiming age.");
        }
        for &age in &self.claiming_ages {
            if !(62.0..=70.0).contains(&age) {
                errors.push(format!(
                    "Claiming-Age={}, expecting value of between 62 and 70.",
                    age
                ));
            }
        }

        if !(62.0..=200.0).contains(&self.max_age) {
            errors.push(format!("Max age={}, expecting value >= 62 and <= 200.", self.max_age));
        }

        if self.interest_rates.is_empty() {
            errors.push("Investment Interest Rate: expecting at least one rate.");
        }
        if let Some(rate) = self
            .interest_rates
            .iter()
            .find(|r| !(-100.0..=1000.0).contains(*r))
        {
            errors.push(format!(
                "Investment Interest Rate={}%, seems out of range of reasonable values.",
                rate
            ));
        }

        if !(-100.0..=1000.0).contains(&self.cola) {
            errors.push(format!(
                "COLA={}%, seems out of range of reasonable values.",
                self.cola
            ));
        }
        if !(0.0..=10_000.0).contains(&self.pia) {
            errors.push(format!("PIA={}, value seems out of range.", self.pia));
        }
        if !(0.0..=10_000_000.0).contains(&self.pay_down_balance) {
            errors.push(format!(
                "Pay Down Balance={}, value seems out of range.",
                self.pay_down_balance
            ));
        }
        if !(0.0..=25.0).contains(&self.borrow_rate) {
            errors.push(format!(
                "Borrow Interest Rate={}%, value seems out of range.",
                self.borrow_rate
            ));
        }
        if !(0.0..=10_000.0).contains(&self.monthly_spending) {
            errors.push(format!(
                "Monthly Spending={}, value seems out of range.",
                self.monthly_spending
            ));
        }

        errors.into_result()
    }
}
