use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

static EMAIL_REGEX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

pub const ASSET_TYPES: [&str; 5] = ["vehicle", "machine", "flight", "appliance", "other"];

/// Asset type must be one of the known kinds
pub fn validate_asset_type(asset_type: &str) -> Result<(), ValidationError> {
    if ASSET_TYPES.contains(&asset_type.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut error = ValidationError::new("asset_type");
        error.message = Some(
            "Invalid asset type. Must be one of: vehicle, machine, flight, appliance, other".into(),
        );
        Err(error)
    }
}

/// Start must not come after end when both are known
pub fn validate_date_order(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), String> {
    match end {
        Some(end) if end < start => Err(format!(
            "End date {} cannot be before start date {}",
            end, start
        )),
        _ => Ok(()),
    }
}

/// Email sanity check used at signup
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    if email.len() > 255 {
        return Err("Email cannot be longer than 255 characters".to_string());
    }

    match EMAIL_REGEX.as_ref() {
        Some(pattern) if pattern.is_match(email) => Ok(()),
        Some(_) => Err("Invalid email format".to_string()),
        None => Err("Email pattern failed to compile".to_string()),
    }
}
