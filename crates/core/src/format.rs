//! Date presentation helpers for dashboard views.

use chrono::{Datelike, NaiveDate};

/// Day of month with its English ordinal suffix ("1st", "22nd", "13th").
pub fn ordinal_day(day: u32) -> String {
    let suffix = match day {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{day}{suffix}")
}

/// Long-form rendering, e.g. "April 15, 2025". Absent dates render as "N/A".
pub fn long_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!("{} {}, {}", month_name(date.month()), date.day(), date.year()),
        None => "N/A".to_string(),
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}
