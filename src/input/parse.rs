//! Pure validators for console entries.
//!
//! Every parser takes the raw line as typed and either returns the typed
//! value or the reason it was refused. Nothing here touches the console.

use chrono::NaiveDate;

use crate::error::Rejection;

/// Any non-blank text, trimmed
pub fn text(raw: &str) -> Result<String, Rejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Rejection::Empty);
    }
    Ok(trimmed.to_owned())
}

/// Free text that may be left blank
pub fn optional_text(raw: &str) -> Option<String> {
    text(raw).ok()
}

/// One or more ASCII digits, kept as a string (ERF and telephone numbers)
pub fn digits(raw: &str) -> Result<String, Rejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Rejection::NotDigits);
    }
    Ok(trimmed.to_owned())
}

/// Same shape as [`digits`], parsed to a non-negative integer
pub fn integer(raw: &str) -> Result<u64, Rejection> {
    let digits = digits(raw)?;
    // Only overflow can fail once the digit check passed
    digits.parse::<u64>().map_err(|_| Rejection::TooLarge)
}

pub fn decimal(raw: &str) -> Result<f64, Rejection> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| Rejection::NotANumber)?;
    if !value.is_finite() {
        return Err(Rejection::NotFinite);
    }
    Ok(value)
}

/// A [`decimal`] that must not be negative, used for fees and payments
pub fn amount(raw: &str) -> Result<f64, Rejection> {
    let value = decimal(raw)?;
    if value < 0.0 {
        return Err(Rejection::Negative);
    }
    Ok(value)
}

/// A calendar date written exactly as `YYYY-MM-DD`
pub fn date(raw: &str) -> Result<NaiveDate, Rejection> {
    let trimmed = raw.trim();
    let bytes = trimmed.as_bytes();

    let shaped = bytes.len() == 10
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });
    if !shaped {
        return Err(Rejection::DateFormat);
    }

    // Shape is fixed, so these slices are all digits
    let year = trimmed[0..4].parse::<i32>().map_err(|_| Rejection::DateFormat)?;
    let month = trimmed[5..7].parse::<u32>().map_err(|_| Rejection::DateFormat)?;
    let day = trimmed[8..10].parse::<u32>().map_err(|_| Rejection::DateFormat)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| Rejection::NoSuchDate(trimmed.to_owned()))
}

pub fn boolean(raw: &str) -> Result<bool, Rejection> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "t" => Ok(true),
        "false" | "f" => Ok(false),
        _ => Err(Rejection::NotBoolean),
    }
}

/// An [`integer`] that must fall within `min..=max` (menu choices)
pub fn choice(raw: &str, min: u64, max: u64) -> Result<u64, Rejection> {
    let out_of_range = Rejection::OutOfRange { min, max };
    let value = integer(raw).map_err(|_| out_of_range.clone())?;
    if value < min || value > max {
        return Err(out_of_range);
    }
    Ok(value)
}
