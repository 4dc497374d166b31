//! CLAGESS CLI
//!
//! Command-line interface for benefit estimates, bank balance projections
//! and claiming-age optimization

use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};

use clagess::{
    format::month_name, parse_claiming_ages, AgeFormat, BalanceProjection, Estimator,
    ProjectionParameters,
};

/// CLAGESS - Social Security claiming-age estimator
#[derive(Parser)]
#[command(name = "clagess")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full retirement age for a birth year
    Fra {
        #[arg(long)]
        birth_year: i32,
    },

    /// Monthly benefit for every claiming month from 62 through 70
    Benefits(ClaimantArgs),

    /// Month-by-month bank balance across claiming ages and interest rates
    Balance(BalanceArgs),

    /// Best claiming age by NPV and by end balance
    Optimize(OptimizeArgs),

    /// Best claiming age for each age at death and interest rate
    Grid(GridArgs),
}

#[derive(Args, Debug)]
struct ClaimantArgs {
    #[arg(long)]
    birth_year: i32,

    /// 1..=12
    #[arg(long, default_value_t = 1)]
    birth_month: u32,

    /// Primary Insurance Amount
    #[arg(long, default_value_t = 1000.0)]
    pia: f64,
}

#[derive(Args, Debug)]
struct BalanceArgs {
    /// Read every parameter from a JSON file instead of flags
    #[arg(long, conflicts_with_all = ["birth_year", "claiming_ages", "rates"])]
    config: Option<PathBuf>,

    #[arg(long, required_unless_present = "config")]
    birth_year: Option<i32>,

    #[arg(long, default_value_t = 1)]
    birth_month: u32,

    #[arg(long, default_value_t = 1000.0)]
    pia: f64,

    /// e.g. "62 67 70", or "62 70 :6" for every six months from 62 to 70
    #[arg(long, default_value = "62 67 70")]
    claiming_ages: String,

    /// Annual investment rates in percent
    #[arg(long, value_delimiter = ',', default_value = "0", allow_negative_numbers = true)]
    rates: Vec<f64>,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    cola: f64,

    /// Annual rate in percent charged while the balance is negative
    #[arg(long, default_value_t = 0.0)]
    borrow_rate: f64,

    #[arg(long, default_value_t = 0.0)]
    spending: f64,

    /// Loan balance the benefits pay down
    #[arg(long, default_value_t = 0.0)]
    pay_down: f64,

    /// Recognize benefits the month after they are earned
    #[arg(long)]
    arrears: bool,

    #[arg(long, default_value_t = 100.0)]
    max_age: f64,

    /// Write the full table to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct OptimizeArgs {
    #[command(flatten)]
    claimant: ClaimantArgs,

    #[arg(long)]
    age_at_death: f64,

    /// Annual interest rate in percent
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    rate: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    cola: f64,
}

#[derive(Args, Debug)]
struct GridArgs {
    #[command(flatten)]
    claimant: ClaimantArgs,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    cola: f64,

    #[arg(long, default_value_t = 100.0)]
    max_age: f64,

    #[arg(long)]
    csv: Option<PathBuf>,
}

impl BalanceArgs {
    fn parameters(&self) -> Result<ProjectionParameters> {
        if let Some(path) = &self.config {
            info!("Loading parameters from {}", path.display());
            return ProjectionParameters::from_json_path(path)
                .with_context(|| format!("reading {}", path.display()));
        }

        let Some(birth_year) = self.birth_year else {
            bail!("--birth-year is required without --config");
        };
        Ok(ProjectionParameters {
            birth_year,
            birth_month: self.birth_month,
            pia: self.pia,
            claiming_ages: parse_claiming_ages(&self.claiming_ages)?,
            interest_rates: self.rates.clone(),
            cola: self.cola,
            borrow_rate: self.borrow_rate,
            monthly_spending: self.spending,
            pay_down_balance: self.pay_down,
            arrears: self.arrears,
            max_age: self.max_age,
        })
    }
}

/// Refuse to run on out-of-range input, reporting every problem
fn validated(params: ProjectionParameters) -> Result<ProjectionParameters> {
    if let Err(errors) = params.validate() {
        for message in errors.messages() {
            warn!("{}", message);
        }
        bail!(errors);
    }
    Ok(params)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    serde_json::to_writer_pretty(io::stdout().lock(), value)?;
    println!();
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut estimator = Estimator::new();

    match cli.command {
        Commands::Fra { birth_year } => {
            let fra = clagess::full_retirement_age(birth_year);
            if cli.json {
                print_json(&serde_json::json!({ "birth_year": birth_year, "full_retirement_age": fra }))?;
            } else {
                println!(
                    "Full retirement age for {}: {}",
                    birth_year,
                    AgeFormat::Long.format(fra)
                );
            }
        }

        Commands::Benefits(args) => {
            validated(ProjectionParameters {
                birth_month: args.birth_month,
                pia: args.pia,
                ..ProjectionParameters::for_birth_year(args.birth_year)
            })?;
            let schedule = estimator.schedule(args.birth_year, args.birth_month, args.pia);
            if cli.json {
                return print_json(&schedule);
            }

            println!(
                "Born {} {}, PIA ${:.2}, full retirement age {}",
                month_name(args.birth_month).unwrap_or("?"),
                args.birth_year,
                args.pia,
                AgeFormat::Colon.format(schedule.full_retirement_age)
            );
            println!(
                "{:>6} {:>15} {:>7} {:>10} {:>8} {:>8} {:>8} {:>8}",
                "Age", "Date", "Class", "Benefit", "%62", "%FRA", "%70", "Payback"
            );
            println!("{}", "-".repeat(80));
            for row in &schedule.rows {
                println!(
                    "{:>6} {:>15} {:>7} {:>10.2} {:>8.2} {:>8.2} {:>8.2} {:>8}",
                    row.claiming_age,
                    row.claiming_date,
                    format!("{:?}", row.class),
                    row.monthly_benefit,
                    row.ratio_to_age_62_pct,
                    row.ratio_to_fra_pct,
                    row.ratio_to_age_70_pct,
                    row.payback_months
                        .map(|p| format!("{:.1}", p))
                        .unwrap_or_default(),
                );
            }
        }

        Commands::Balance(args) => {
            let params = validated(args.parameters()?)?;
            let projection = estimator.simulate(&params);

            if let Some(path) = &args.csv {
                let file = File::create(path)
                    .with_context(|| format!("creating {}", path.display()))?;
                projection.write_csv(file)?;
                info!("Full table written to {}", path.display());
            }

            if cli.json {
                return print_json(&projection);
            }
            print_balance_summary(&projection);
        }

        Commands::Optimize(args) => {
            let c = &args.claimant;
            validated(ProjectionParameters {
                birth_month: c.birth_month,
                pia: c.pia,
                cola: args.cola,
                interest_rates: vec![args.rate],
                ..ProjectionParameters::for_birth_year(c.birth_year)
            })?;

            let by_npv =
                estimator.best_claiming_age_by_npv(c.birth_year, args.age_at_death, args.rate, c.pia);
            let by_balance = estimator.best_claiming_age_by_balance(
                c.birth_year,
                args.age_at_death,
                args.rate,
                args.cola,
                c.birth_month,
                c.pia,
            );

            if cli.json {
                return print_json(&serde_json::json!({ "by_npv": by_npv, "by_balance": by_balance }));
            }
            println!(
                "Best claiming age by NPV at 62:      {} (${:.2})",
                AgeFormat::Colon.format(by_npv.claiming_age()),
                by_npv.best_value
            );
            println!(
                "Best claiming age by balance at {}: {} (${:.2})",
                AgeFormat::ColonCompact.format(args.age_at_death),
                AgeFormat::Colon.format(by_balance.claiming_age()),
                by_balance.best_value
            );
        }

        Commands::Grid(args) => {
            let c = &args.claimant;
            let params = validated(ProjectionParameters {
                birth_month: c.birth_month,
                pia: c.pia,
                cola: args.cola,
                max_age: args.max_age,
                ..ProjectionParameters::for_birth_year(c.birth_year)
            })?;
            let grid = estimator.best_age_grid(&params);

            if let Some(path) = &args.csv {
                let file = File::create(path)
                    .with_context(|| format!("creating {}", path.display()))?;
                grid.write_csv(file)?;
                info!("Grid written to {}", path.display());
            }

            if cli.json {
                return print_json(&grid);
            }
            print!("{:>5}", "Death");
            for rate in &grid.rates {
                print!(" {:>6}", format!("{:.0}%", rate));
            }
            println!();
            for row in &grid.rows {
                print!("{:>5}", row.age_at_death);
                for cell in &row.cells {
                    print!(" {:>6}", AgeFormat::Colon.format(cell.claiming_age()));
                }
                println!();
            }
        }
    }

    Ok(())
}

fn print_balance_summary(projection: &BalanceProjection) {
    println!(
        "Bank balance for birth {}-{:02}, PIA ${:.2} ({} months)",
        projection.birth.year,
        projection.birth.month,
        projection.pia,
        projection.rows.len()
    );
    println!(
        "{:>16} {:>14} {:>14} {:>14} {:>14} {:>6}",
        "Column", "Benefits", "Interest", "Final", "Peak", "Best"
    );
    println!("{}", "-".repeat(84));
    for s in projection.summary() {
        println!(
            "{:>16} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>6}",
            s.label, s.total_benefits, s.total_interest, s.final_balance, s.peak_balance, s.months_best
        );
    }

    // Milestones every ten years
    println!("\nBalances by age:");
    for row in projection.rows.iter().filter(|r| r.months_after_62 >= 0 && r.months_after_62 % 120 == 0) {
        let balances: Vec<String> = row.cells.iter().map(|c| format!("{:>14.2}", c.balance)).collect();
        println!("  {:>6} {}", row.age, balances.join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_cola_and_rate_flags() {
        let cli = Cli::try_parse_from([
            "clagess", "optimize", "--birth-year", "1960", "--age-at-death", "80",
            "--cola", "-1", "--rate", "-2",
        ])
        .unwrap();
        match cli.command {
            Commands::Optimize(args) => {
                assert_eq!(args.cola, -1.0);
                assert_eq!(args.rate, -2.0);
            }
            _ => panic!("expected optimize"),
        }

        let cli = Cli::try_parse_from([
            "clagess", "balance", "--birth-year", "1960", "--cola", "-0.5", "--rates", "-1,3",
        ])
        .unwrap();
        match cli.command {
            Commands::Balance(args) => {
                assert_eq!(args.cola, -0.5);
                assert_eq!(args.rates, vec![-1.0, 3.0]);
            }
            _ => panic!("expected balance"),
        }

        let cli = Cli::try_parse_from(["clagess", "grid", "--birth-year", "1958", "--cola", "-3"])
            .unwrap();
        match cli.command {
            Commands::Grid(args) => assert_eq!(args.cola, -3.0),
            _ => panic!("expected grid"),
        }
    }
}
