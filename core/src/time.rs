use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

/// Parses a due date relative to `today`.
///
/// Accepts `YYYY-MM-DD`, `today`/`tod`, `tomorrow`/`tom`, `eow` (coming
/// Sunday), `eom`, relative offsets `+Nd`, `+Nw`, `+Nm`, and weekday names
/// (`fri`, `2:fri` for the one after next).
pub fn parse_due_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty date string"));
    }

    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "tomorrow" | "tom" => return Ok(today + Duration::days(1)),
        "eow" => {
            let days_to_sunday = (7 - today.weekday().num_days_from_sunday() as i64) % 7;
            return Ok(today + Duration::days(days_to_sunday));
        }
        "eom" => return end_of_month(today),
        _ => {}
    }

    if let Some(rest) = input.strip_prefix('+') {
        return parse_relative(rest, today);
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Some((count, day_str)) = parse_weekday_token(input) {
        if let Ok(target) = parse_weekday_str(day_str) {
            let mut days_needed = target.num_days_from_sunday() as i64
                - today.weekday().num_days_from_sunday() as i64;
            if days_needed <= 0 {
                days_needed += 7;
            }
            let days_needed = (count - 1)
                .checked_mul(7)
                .and_then(|extra| days_needed.checked_add(extra))
                .ok_or_else(|| anyhow!("Date out of range: {}", input))?;
            return add_days(today, days_needed);
        }
    }

    Err(anyhow!("Could not parse date: {}", input))
}

fn parse_relative(rest: &str, today: NaiveDate) -> Result<NaiveDate> {
    if rest.len() < 2 {
        return Err(anyhow!("Invalid relative format: +{}", rest));
    }
    let (num_str, unit) = rest.split_at(rest.len() - 1);
    let count: u32 = num_str
        .parse()
        .map_err(|_| anyhow!("Invalid relative format: +{}", rest))?;

    match unit.to_lowercase().as_str() {
        "d" => add_days(today, i64::from(count)),
        "w" => add_days(today, i64::from(count) * 7),
        // clamps to the last day of a shorter month
        "m" => today
            .checked_add_months(Months::new(count))
            .ok_or_else(|| anyhow!("Date out of range: +{}", rest)),
        _ => Err(anyhow!("Unknown unit in relative time: {}", unit)),
    }
}

fn add_days(today: NaiveDate, days: i64) -> Result<NaiveDate> {
    Duration::try_days(days)
        .and_then(|offset| today.checked_add_signed(offset))
        .ok_or_else(|| anyhow!("Date out of range: {} days from {}", days, today))
}

fn end_of_month(today: NaiveDate) -> Result<NaiveDate> {
    let first = today
        .with_day(1)
        .and_then(|d| d.checked_add_months(Months::new(1)))
        .ok_or_else(|| anyhow!("Date out of range"))?;
    Ok(first - Duration::days(1))
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    match input.split_once(':') {
        Some((count, day)) => count.parse::<i64>().ok().filter(|c| *c >= 1).map(|c| (c, day)),
        None => Some((1, input)),
    }
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}
