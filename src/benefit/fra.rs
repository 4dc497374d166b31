//! Full Retirement Age by birth year

/// First birth year in the FRA transition table
pub const FIRST_TRANSITION_YEAR: i32 = 1954;

/// Last birth year in the FRA transition table
pub const LAST_TRANSITION_YEAR: i32 = 1960;

/// FRA in years for birth years 1954..=1960.
/// The transition from 66 to 67 moves two months per birth year.
const FRA_TRANSITION: [f64; 7] = [
    66.0,              // 1954 and earlier
    66.0 + 2.0 / 12.0, // 1955
    66.0 + 4.0 / 12.0, // 1956
    66.0 + 6.0 / 12.0, // 1957
    66.0 + 8.0 / 12.0, // 1958
    66.0 + 10.0 / 12.0, // 1959
    67.0,              // 1960 and later
];

/// Full Retirement Age (fractional years) for a birth year.
///
/// Birth years outside the transition table use the nearest boundary value.
pub fn full_retirement_age(birth_year: i32) -> f64 {
    let year = birth_year.clamp(FIRST_TRANSITION_YEAR, LAST_TRANSITION_YEAR);
    FRA_TRANSITION[(year - FIRST_TRANSITION_YEAR) as usize]
}

/// Month offset from age 62 at which FRA is reached (e.g. 50 for 66y2m)
pub fn full_retirement_month_index(birth_year: i32) -> usize {
    ((full_retirement_age(birth_year) - 62.0) * 12.0).round() as usize
}
