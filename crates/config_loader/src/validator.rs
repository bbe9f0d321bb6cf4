//! Configuration validation.
//!
//! Rules:
//! - session.input is non-empty and points at a JSON file
//! - engine.frame_rate within range, finite
//! - engine.frame_skip >= 1
//! - session name override, when given, is non-empty (it becomes the cache key)

use contracts::{ReplayConfig, TelemetryError};
use validator::Validate;

/// Validate a parsed configuration.
///
/// Returns the first error encountered, or `Ok(())`.
pub fn validate(config: &ReplayConfig) -> Result<(), TelemetryError> {
    validate_derived(config)?;
    validate_session(config)?;
    Ok(())
}

/// Run the declarative range checks and map the first failure to a
/// field-qualified error.
fn validate_derived(config: &ReplayConfig) -> Result<(), TelemetryError> {
    let Err(errors) = config.validate() else {
        return Ok(());
    };

    let field = errors
        .errors()
        .keys()
        .next()
        .map(|k| k.to_string())
        .unwrap_or_else(|| "config".to_string());

    Err(TelemetryError::config_validation(field, errors.to_string()))
}

fn validate_session(config: &ReplayConfig) -> Result<(), TelemetryError> {
    if config.session.input.as_os_str().is_empty() {
        return Err(TelemetryError::config_validation(
            "session.input",
            "input path cannot be empty",
        ));
    }

    if let Some(name) = &config.session.name {
        if name.trim().is_empty() {
            return Err(TelemetryError::config_validation(
                "session.name",
                "session name cannot be blank",
            ));
        }
    }

    if !config.engine.frame_rate.is_finite() {
        return Err(TelemetryError::config_validation(
            "engine.frame_rate",
            format!("frame_rate must be finite, got {}", config.engine.frame_rate),
        ));
    }

    Ok(())
}
