//! Order number validation
//!
//! Order numbers are decimal digit strings protected by a Luhn checksum.
//! [`OrderNumber`] can only be built through [`OrderNumber::parse`], so any
//! value of that type has already passed [`validate`].

use std::fmt;

// ============================================================================
// Luhn Checksum
// ============================================================================

/// Check an order number: all ASCII digits, at least two of them, Luhn sum
/// divisible by 10.
///
/// Never fails; malformed input is simply invalid.
///
/// # Examples
/// ```
/// use gophermart::order_number::validate;
///
/// assert!(validate("12345678903"));
/// assert!(!validate("1234567890"));
/// assert!(!validate(""));
/// assert!(!validate("12a"));
/// ```
pub fn validate(number: &str) -> bool {
    if number.len() < 2 || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = number
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let digit = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}

// ============================================================================
// OrderNumber - Validated Order Number (Private Field)
// ============================================================================

/// Rejected order number input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid order number: '{0}'")]
pub struct InvalidOrderNumber(pub String);

/// Validated order number (digits only, Luhn-correct)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Trim surrounding whitespace and validate
    ///
    /// # Errors
    /// Returns `InvalidOrderNumber` carrying the trimmed input when it fails
    /// [`validate`].
    pub fn parse(raw: &str) -> Result<Self, InvalidOrderNumber> {
        let trimmed = raw.trim();
        if validate(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(InvalidOrderNumber(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OrderNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
