//! Input validation for bet and entry payloads.
//!
//! The analyzers downstream assume clean input; these checks are the
//! upstream gate that makes that assumption hold.

use crate::DomainError;

pub const MAX_STATEMENT_LEN: usize = 1000;
pub const MAX_ENTRY_TEXT_LEN: usize = 10_000;

pub fn validate_probability(probability: f64) -> Result<(), DomainError> {
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(DomainError::InvalidInput(
            "Probability must be between 0 and 1".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_bet_input(statement: &str, probability: f64) -> Result<(), DomainError> {
    if statement.trim().is_empty() {
        return Err(DomainError::InvalidInput(
            "Statement is required".to_string(),
        ));
    }
    if statement.chars().count() > MAX_STATEMENT_LEN {
        return Err(DomainError::InvalidInput(
            "Statement is too long".to_string(),
        ));
    }
    validate_probability(probability)
}

pub fn validate_entry_input(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::InvalidInput("Text is required".to_string()));
    }
    if text.chars().count() > MAX_ENTRY_TEXT_LEN {
        return Err(DomainError::InvalidInput("Text is too long".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_bounds() {
        assert!(validate_probability(0.0).is_ok());
        assert!(validate_probability(1.0).is_ok());
        assert!(validate_probability(0.65).is_ok());
        assert!(validate_probability(-0.1).is_err());
        assert!(validate_probability(1.1).is_err());
        assert!(validate_probability(f64::NAN).is_err());
    }

    #[test]
    fn test_statement_bounds() {
        assert!(validate_bet_input("Rain tomorrow", 0.4).is_ok());
        assert!(validate_bet_input("", 0.4).is_err());
        assert!(validate_bet_input("   ", 0.4).is_err());
        assert!(validate_bet_input(&"x".repeat(MAX_STATEMENT_LEN + 1), 0.4).is_err());
    }

    #[test]
    fn test_entry_text_bounds() {
        assert!(validate_entry_input("Slept well.").is_ok());
        assert!(validate_entry_input("").is_err());
        assert!(validate_entry_input(&"x".repeat(MAX_ENTRY_TEXT_LEN + 1)).is_err());
    }
}
