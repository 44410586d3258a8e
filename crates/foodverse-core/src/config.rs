use crate::app_config::{AppConfig, Environment};
use crate::geo::Coordinate;
use crate::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:7000/api/v1";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: f64| -> Result<f64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(default),
        }
    };

    let env = parse_environment(&or_default("FOODVERSE_ENV", "development"))?;

    let api_base_url = or_default("FOODVERSE_API_BASE_URL", DEFAULT_API_BASE_URL);
    if api_base_url.trim().is_empty() {
        return Err(invalid("FOODVERSE_API_BASE_URL", "must not be empty".to_string()));
    }
    let api_token = lookup("FOODVERSE_API_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());
    let log_level = or_default("FOODVERSE_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("FOODVERSE_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "FOODVERSE_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let search_radius_km = parse_f64("FOODVERSE_SEARCH_RADIUS_KM", 10.0)?;
    if !search_radius_km.is_finite() || search_radius_km <= 0.0 {
        return Err(invalid(
            "FOODVERSE_SEARCH_RADIUS_KM",
            format!("must be a positive number of kilometres, got {search_radius_km}"),
        ));
    }

    let fallback_location = Coordinate::new(
        parse_f64("FOODVERSE_FALLBACK_LAT", Coordinate::JAKARTA.latitude)?,
        parse_f64("FOODVERSE_FALLBACK_LNG", Coordinate::JAKARTA.longitude)?,
    );
    if !fallback_location.is_valid() {
        return Err(invalid(
            "FOODVERSE_FALLBACK_LAT",
            format!("fallback coordinate {fallback_location} is out of range"),
        ));
    }

    let settings_path = PathBuf::from(or_default(
        "FOODVERSE_SETTINGS_PATH",
        "./.foodverse/settings.json",
    ));

    Ok(AppConfig {
        env,
        api_base_url,
        api_token,
        log_level,
        request_timeout_secs,
        search_radius_km,
        fallback_location,
        settings_path,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FOODVERSE_ENV".to_string(),
            reason: format!("expected development, test or production, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
