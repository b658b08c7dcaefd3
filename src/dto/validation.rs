//! Validation helpers for DTOs.

use validator::ValidationError;

/// Whether `color` is a `#RRGGBB` hexadecimal color.
pub fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Validates that a team color is written as `#RRGGBB`.
///
/// # Examples
///
/// ```ignore
/// validate_hex_color("#3B82F6") // Ok
/// validate_hex_color("3B82F6")  // Err - missing '#'
/// validate_hex_color("#3B82F")  // Err - too short
/// ```
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    if !is_hex_color(color) {
        let mut err = ValidationError::new("hex_color");
        err.message = Some(format!("Color must look like #RRGGBB (got `{color}`)").into());
        return Err(err);
    }
    Ok(())
}

/// Rejects names made only of whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that a sport identifier exists in the rule table.
pub fn validate_sport_id(sport_id: &str) -> Result<(), ValidationError> {
    if crate::state::sport::lookup(sport_id).is_none() {
        let mut err = ValidationError::new("unknown_sport");
        err.message = Some(format!("Unknown sport `{sport_id}`").into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_hex_color_valid() {
        assert!(validate_hex_color("#3B82F6").is_ok());
        assert!(validate_hex_color("#ef4444").is_ok());
        assert!(validate_hex_color("#000000").is_ok());
    }

    #[test]
    fn test_validate_hex_color_invalid() {
        assert!(validate_hex_color("3B82F6").is_err()); // missing '#'
        assert!(validate_hex_color("#3B82F").is_err()); // too short
        assert!(validate_hex_color("#3B82F6A").is_err()); // too long
        assert!(validate_hex_color("#GGGGGG").is_err()); // invalid hex
        assert!(validate_hex_color("#é12345").is_err()); // multi-byte
    }

    #[test]
    fn test_validate_not_blank_and_sport() {
        assert!(validate_not_blank("  ").is_err());
        assert!(validate_not_blank("Lakers").is_ok());
        assert!(validate_sport_id("netball").is_ok());
        assert!(validate_sport_id("curling").is_err());
    }
}
