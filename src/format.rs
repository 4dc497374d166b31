//! Age and date text conversions
//!
//! Ages are carried as fractional years everywhere in the engine; `64:5`
//! means 64 years and 5 months, i.e. `64 + 5/12`.

use chrono::Month;

use crate::error::{ClagessError, Result};

/// Textual representations of a fractional age
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeFormat {
    /// `66 y` or `66 y,  2 m`
    Short,
    /// `66 years, 2 months` (months always shown)
    Long,
    /// `66:2` (months always shown, `66:0`)
    Colon,
    /// `66` or `66:2`
    ColonCompact,
    /// `66 years` or `66 years  2 months`
    Words,
}

impl AgeFormat {
    pub fn format(self, age: f64) -> String {
        let (years, months) = years_months(age);
        match self {
            AgeFormat::Short if months == 0 => format!("{} y", years),
            AgeFormat::Short => format!("{} y,  {} m", years, months),
            AgeFormat::Long => format!("{} years, {} months", years, months),
            AgeFormat::Colon => format!("{}:{}", years, months),
            AgeFormat::ColonCompact if months == 0 => format!("{}", years),
            AgeFormat::ColonCompact => format!("{}:{}", years, months),
            AgeFormat::Words if months == 0 => format!("{} years", years),
            AgeFormat::Words => format!("{} years  {} months", years, months),
        }
    }
}

/// Split a fractional age into whole years and the nearest whole month.
/// A fraction that rounds up to 12 months carries into the next year.
pub fn years_months(age: f64) -> (i64, i64) {
    let years = age.floor();
    let months = ((age - years) * 12.0).round() as i64;
    if months >= 12 {
        (years as i64 + 1, months - 12)
    } else {
        (years as i64, months)
    }
}

/// Parse `"67"`, `"72.5"` or `"64:5"` into fractional years.
///
/// An empty year or month part is zero, so `":6"` is half a year (used as
/// a range increment) and `"64:"` is 64.
pub fn parse_age(text: &str) -> Result<f64> {
    let invalid = |reason: &str| ClagessError::InvalidAgeText {
        text: text.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty"));
    }

    let mut parts = trimmed.split(':');
    let year_part = parts.next().unwrap_or("").trim();
    let month_part = parts.next().map(str::trim);
    if parts.next().is_some() {
        return Err(invalid("more than one ':' separator"));
    }

    let years = if year_part.is_empty() {
        0.0
    } else {
        year_part.parse::<f64>().map_err(|e| invalid(&e.to_string()))?
    };

    let months = match month_part {
        None => 0.0,
        Some("") => 0.0,
        Some(m) => m.parse::<f64>().map_err(|e| invalid(&e.to_string()))?,
    };

    Ok(years + months / 12.0)
}

/// Parse a whitespace-separated list of claiming ages.
///
/// Three values `start stop increment` with `start < stop` and an
/// increment smaller than `stop` are expanded as a range, so `"62 64 :6"`
/// gives 62, 62:6, 63, 63:6, 64. Every value is snapped to a whole month.
pub fn parse_claiming_ages(text: &str) -> Result<Vec<f64>> {
    let invalid = |reason: &str| ClagessError::InvalidClaimingAges {
        text: text.to_string(),
        reason: reason.to_string(),
    };

    let values = text
        .split_whitespace()
        .map(parse_age)
        .collect::<Result<Vec<f64>>>()?;

    if values.is_empty() {
        return Err(invalid("no claiming ages given"));
    }

    let is_range = values.len() == 3 && values[0] < values[1] && values[2] < values[1];

    if !is_range {
        return Ok(values.into_iter().map(snap_to_month).collect());
    }

    let (start, stop, increment) = (values[0], values[1], values[2]);
    if increment <= 0.0 {
        return Err(invalid("range increment must be positive"));
    }

    // Tolerance keeps an exact endpoint such as 64 from dropping out
    let steps = ((stop - start) / increment + 1e-9).floor() as usize;
    Ok((0..=steps)
        .map(|i| snap_to_month(start + i as f64 * increment))
        .collect())
}

/// Round a fractional age to the nearest whole month
pub fn snap_to_month(age: f64) -> f64 {
    (age * 12.0).round() / 12.0
}

/// English month name for 1..=12
pub fn month_name(month: u32) -> Option<&'static str> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
}

/// Calendar label `num_months` after January of `start_year`,
/// e.g. `format_date(2022, 14) == "March 2023"`. Negative offsets step
/// back into the previous year.
pub fn format_date(start_year: i32, num_months: i64) -> String {
    let year = start_year as i64 + num_months.div_euclid(12);
    let month = num_months.rem_euclid(12) as u32 + 1;
    format!("{} {}", month_name(month).unwrap_or("?"), year)
}
