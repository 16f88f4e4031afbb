//! Custom validation functions shared across configuration modules.

use validator::ValidationError;

/// Windows and lookbacks must span a positive number of seconds.
pub fn validate_positive_secs(value: u64) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::new("must_be_positive"));
    }
    Ok(())
}

/// Ratio multipliers must be finite and strictly positive.
pub fn validate_multiplier(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::new("invalid_multiplier"));
    }
    Ok(())
}
