//! Best claiming age grid for one birth date
//!
//! Outputs the balance-optimal claiming age for every combination of age at
//! death (rows) and interest rate (columns) as CSV

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clagess::{BenefitTableCache, BestAgeGrid, ProjectionParameters};
use clap::Parser;
use log::warn;

#[derive(Parser, Debug)]
#[command(about = "Best claiming age by longevity and interest rate")]
struct Args {
    #[arg(long)]
    birth_year: i32,

    /// 1..=12
    #[arg(long, default_value_t = 1)]
    birth_month: u32,

    /// Annual cost-of-living adjustment in percent
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    cola: f64,

    #[arg(long, default_value_t = 1000.0)]
    pia: f64,

    /// Last age at death in the grid
    #[arg(long, default_value_t = 100.0)]
    max_age: f64,

    #[arg(long, default_value = "best_age_grid.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let params = ProjectionParameters {
        birth_month: args.birth_month,
        cola: args.cola,
        pia: args.pia,
        max_age: args.max_age,
        ..ProjectionParameters::for_birth_year(args.birth_year)
    };
    if let Err(errors) = params.validate() {
        for message in errors.messages() {
            warn!("{}", message);
        }
        bail!(errors);
    }

    let start = Instant::now();
    println!("Building grid for {}-{:02}...", params.birth_year, params.birth_month);

    let mut cache = BenefitTableCache::new();
    let grid = BestAgeGrid::build(
        cache.table_for(params.birth_year),
        params.birth_month,
        params.cola,
        params.pia,
        params.max_age.floor() as u32,
    );
    println!("Grid complete in {:?}", start.elapsed());

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    grid.write_csv(file)?;
    println!("Output written to {}", args.output.display());

    // Print summary stats
    println!("\nGrid Summary:");
    for row in grid.rows.iter().step_by(5) {
        let ages: Vec<String> = row
            .cells
            .iter()
            .map(|c| clagess::AgeFormat::ColonCompact.format(c.claiming_age()))
            .collect();
        println!("  Age at death {:>3}: {}", row.age_at_death, ages.join(" "));
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_cola_flag() {
        let args = Args::try_parse_from(["best_age_grid", "--birth-year", "1960", "--cola", "-1"])
            .unwrap();
        assert_eq!(args.cola, -1.0);
        assert_eq!(args.output, PathBuf::from("best_age_grid.csv"));
    }
}
