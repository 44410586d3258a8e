use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "FOODVERSE_ENV"));
}

#[test]
fn build_app_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert!(cfg.api_token.is_none());
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert!((cfg.search_radius_km - 10.0).abs() < f64::EPSILON);
    assert_eq!(cfg.fallback_location, Coordinate::JAKARTA);
    assert_eq!(
        cfg.settings_path,
        std::path::PathBuf::from("./.foodverse/settings.json")
    );
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("FOODVERSE_ENV", "production");
    map.insert("FOODVERSE_API_BASE_URL", "https://api.foodverse.test/api/v1");
    map.insert("FOODVERSE_API_TOKEN", "secret-token");
    map.insert("FOODVERSE_REQUEST_TIMEOUT_SECS", "5");
    map.insert("FOODVERSE_SEARCH_RADIUS_KM", "2.5");
    map.insert("FOODVERSE_FALLBACK_LAT", "52.52");
    map.insert("FOODVERSE_FALLBACK_LNG", "13.405");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.api_base_url, "https://api.foodverse.test/api/v1");
    assert_eq!(cfg.api_token.as_deref(), Some("secret-token"));
    assert_eq!(cfg.request_timeout_secs, 5);
    assert!((cfg.search_radius_km - 2.5).abs() < f64::EPSILON);
    assert_eq!(cfg.fallback_location, Coordinate::new(52.52, 13.405));
}

#[test]
fn build_app_config_ignores_blank_token() {
    let mut map = HashMap::new();
    map.insert("FOODVERSE_API_TOKEN", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.api_token.is_none());
}

#[test]
fn build_app_config_rejects_non_numeric_timeout() {
    let mut map = HashMap::new();
    map.insert("FOODVERSE_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOODVERSE_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(FOODVERSE_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_timeout() {
    let mut map = HashMap::new();
    map.insert("FOODVERSE_REQUEST_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
}

#[test]
fn build_app_config_rejects_non_positive_radius() {
    let mut map = HashMap::new();
    map.insert("FOODVERSE_SEARCH_RADIUS_KM", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOODVERSE_SEARCH_RADIUS_KM"),
        "expected InvalidEnvVar(FOODVERSE_SEARCH_RADIUS_KM), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_out_of_range_fallback() {
    let mut map = HashMap::new();
    map.insert("FOODVERSE_FALLBACK_LAT", "123.0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
}

#[test]
fn debug_output_redacts_token() {
    let mut map = HashMap::new();
    map.insert("FOODVERSE_API_TOKEN", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}
