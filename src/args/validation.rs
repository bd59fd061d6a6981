pub const MAX_TIMEOUT_SECS: u64 = 120;

/// # Errors
///
/// Will return `Err` if the value is not an http(s) url
pub fn check_api_base(value: &str) -> Result<String, String> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(format!("The api base '{value}' must start with http:// or https://."))
    }
}

/// # Errors
///
/// Will return `Err` if the value is not a whole number of seconds in range
pub fn check_timeout_secs(value: &str) -> Result<u64, String> {
    let secs: u64 = value
        .parse()
        .map_err(|_| format!("The timeout '{value}' is not a whole number of seconds."))?;
    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(format!(
            "The timeout must be between 1 and {MAX_TIMEOUT_SECS} seconds, got {secs}."
        ));
    }
    Ok(secs)
}

/// # Errors
///
/// Will return `Err` if the value is not a positive number of seconds
pub fn check_ttl_secs(value: &str) -> Result<i64, String> {
    let secs: i64 = value
        .parse()
        .map_err(|_| format!("The ttl '{value}' is not a whole number of seconds."))?;
    if secs <= 0 {
        return Err(format!("The ttl must be positive, got {secs}."));
    }
    Ok(secs)
}

/// # Errors
///
/// Will return `Err` if the value is not `NAME:VALUE` with a non-empty name
pub fn parse_header(value: &str) -> Result<(String, String), String> {
    match value.split_once(':') {
        Some((name, val)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), val.trim().to_string()))
        }
        _ => Err(format!("The header '{value}' is not in NAME:VALUE form.")),
    }
}
