//! Caller-side VIN precondition
//!
//! The registry adapter does not validate its input. Callers run `normalize_vin` first and
//! never send a rejected VIN to the network.

use crate::error::{ResolveError, ResolveResult};

/// Length of a modern (post-1981) VIN
pub const VIN_LENGTH: usize = 17;

/// Trim and upper-case `raw`, then require 17 characters from the VIN alphabet
///
/// The VIN alphabet is ASCII digits and letters, excluding I, O and Q.
pub fn normalize_vin(raw: &str) -> ResolveResult<String> {
    let vin = raw.trim().to_ascii_uppercase();

    if vin.chars().count() != VIN_LENGTH {
        return Err(ResolveError::InvalidInput(format!(
            "VIN must be {} characters, got {}",
            VIN_LENGTH,
            vin.chars().count()
        )));
    }

    if let Some(bad) = vin.chars().find(|c| !is_vin_char(*c)) {
        return Err(ResolveError::InvalidInput(format!(
            "VIN contains invalid character '{}'",
            bad
        )));
    }

    Ok(vin)
}

fn is_vin_char(c: char) -> bool {
    c.is_ascii_digit() || (c.is_ascii_uppercase() && !matches!(c, 'I' | 'O' | 'Q'))
}
