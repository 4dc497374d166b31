//! Bank-balance projection output structures

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::params::BirthDate;

/// One (claiming age, interest rate) combination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceColumn {
    /// `year:month`, suffixed with ` @ rate%` when several rates are compared
    pub label: String,
    pub claiming_age: f64,
    /// Annual investment rate in percent
    pub interest_rate: f64,
    /// Months after 62 at which the benefit is earned
    pub start_month: usize,
    /// Benefit factor (fraction of PIA)
    pub factor: f64,
}

/// Interest, benefit and closing balance of one column in one month
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceCell {
    pub interest: f64,
    pub benefit: f64,
    pub balance: f64,
}

/// A single month of the projection across all columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceRow {
    /// Months after the 62nd birthday; -1 is the opening loan row
    pub months_after_62: i64,
    /// Calendar month the benefit is earned (end of month)
    pub date: String,
    /// Calendar month the benefit is received, when projecting in arrears
    pub payment_date: Option<String>,
    /// Age as `year:month`
    pub age: String,
    pub cola_factor: f64,
    pub cells: Vec<BalanceCell>,
    /// Column with the highest positive balance this month (first wins ties)
    pub best_column: Option<usize>,
}

/// Complete bank-balance projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceProjection {
    pub birth: BirthDate,
    pub pia: f64,
    pub arrears: bool,
    pub columns: Vec<BalanceColumn>,
    pub rows: Vec<BalanceRow>,
}

impl BalanceProjection {
    pub fn new(birth: BirthDate, pia: f64, arrears: bool, columns: Vec<BalanceColumn>) -> Self {
        Self {
            birth,
            pia,
            arrears,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: BalanceRow) {
        self.rows.push(row);
    }

    /// Balance history of one column, for plotting
    pub fn column_series(&self, column: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r.cells[column].balance).collect()
    }

    /// Closing balance of a column (0 for an empty projection)
    pub fn final_balance(&self, column: usize) -> f64 {
        self.rows.last().map(|r| r.cells[column].balance).unwrap_or(0.0)
    }

    /// Highest balance a column reached at any month
    pub fn peak_balance(&self, column: usize) -> f64 {
        self.rows
            .iter()
            .map(|r| r.cells[column].balance)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Summary statistics per column
    pub fn summary(&self) -> Vec<ColumnSummary> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| ColumnSummary {
                label: column.label.clone(),
                total_benefits: self.rows.iter().map(|r| r.cells[i].benefit).sum(),
                total_interest: self.rows.iter().map(|r| r.cells[i].interest).sum(),
                final_balance: self.final_balance(i),
                peak_balance: self.peak_balance(i),
                months_best: self.rows.iter().filter(|r| r.best_column == Some(i)).count(),
            })
            .collect()
    }

    /// Write the month-by-month table as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = vec!["Month".to_string(), "Date".to_string()];
        if self.arrears {
            header.push("PaymentDate".to_string());
        }
        header.push("Age".to_string());
        header.push("ColaFactor".to_string());
        for column in &self.columns {
            header.push(format!("{} Interest", column.label));
            header.push(format!("{} Benefit", column.label));
            header.push(format!("{} Balance", column.label));
        }
        header.push("Best".to_string());
        csv.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![(row.months_after_62 + 1).to_string(), row.date.clone()];
            if self.arrears {
                record.push(row.payment_date.clone().unwrap_or_default());
            }
            record.push(row.age.clone());
            record.push(format!("{:.3}", row.cola_factor));
            for cell in &row.cells {
                record.push(format!("{:.2}", cell.interest));
                record.push(format!("{:.2}", cell.benefit));
                record.push(format!("{:.2}", cell.balance));
            }
            record.push(
                row.best_column
                    .map(|i| self.columns[i].label.clone())
                    .unwrap_or_default(),
            );
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }
}

/// Per-column totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub label: String,
    pub total_benefits: f64,
    pub total_interest: f64,
    pub final_balance: f64,
    pub peak_balance: f64,
    /// Months in which this column held the best balance
    pub months_best: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_column_projection() -> BalanceProjection {
        let column = |label: &str, age: f64| BalanceColumn {
            label: label.to_string(),
            claiming_age: age,
            interest_rate: 0.0,
            start_month: 0,
            factor: 1.0,
        };
        let mut projection = BalanceProjection::new(
            BirthDate::new(1960, 1),
            1000.0,
            false,
            vec![column("62:0", 62.0), column("70:0", 70.0)],
        );
        for (m, (a, b)) in [(100.0, 0.0), (200.0, 300.0), (150.0, 600.0)].iter().enumerate() {
            projection.add_row(BalanceRow {
                months_after_62: m as i64,
                date: String::new(),
                payment_date: None,
                age: String::new(),
                cola_factor: 1.0,
                cells: vec![
                    BalanceCell { interest: 0.0, benefit: 100.0, balance: *a },
                    BalanceCell { interest: 0.0, benefit: 300.0, balance: *b },
                ],
                best_column: Some(if b > a { 1 } else { 0 }),
            });
        }
        projection
    }

    #[test]
    fn test_final_and_peak() {
        let projection = two_column_projection();
        assert_eq!(projection.final_balance(0), 150.0);
        assert_eq!(projection.peak_balance(0), 200.0);
        assert_eq!(projection.column_series(1), vec![0.0, 300.0, 600.0]);

        let summary = projection.summary();
        assert_eq!(summary[0].months_best, 1);
        assert_eq!(summary[1].months_best, 2);
        assert_eq!(summary[1].total_benefits, 900.0);
    }

    #[test]
    fn test_write_csv() {
        let projection = two_column_projection();
        let mut out = Vec::new();
        projection.write_csv(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Month,Date,Age,ColaFactor,62:0 Interest,62:0 Benefit,62:0 Balance,70:0 Interest,70:0 Benefit,70:0 Balance,Best"
        );
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().last().unwrap().ends_with("600.00,70:0"));
    }
}
