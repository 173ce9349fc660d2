use std::{fmt, str::FromStr};

/// An extension SDK level.
///
/// Levels are non-negative integers that fit the signed 32-bit field used by
/// the wire format. They order numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SdkLevel(i32);

impl SdkLevel {
    /// Creates a level from a non-negative integer.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidLevelError`] if the value is negative.
    pub fn new(value: i32) -> Result<Self, InvalidLevelError> {
        if value < 0 {
            return Err(InvalidLevelError::Negative(i64::from(value)));
        }
        Ok(Self(value))
    }

    /// Returns the numeric value of the level.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i64> for SdkLevel {
    type Error = InvalidLevelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(InvalidLevelError::Negative(value));
        }
        let value = i32::try_from(value).map_err(|_| InvalidLevelError::OutOfRange(value))?;
        Ok(Self(value))
    }
}

impl fmt::Display for SdkLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SdkLevel {
    type Err = InvalidLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| InvalidLevelError::Syntax(s.to_string()))?;
        Self::try_from(value)
    }
}

/// Errors that can occur when constructing an [`SdkLevel`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidLevelError {
    /// The text is not an integer.
    #[error("Invalid SDK level '{0}': expected a non-negative integer")]
    Syntax(String),

    /// The value is below zero.
    #[error("Invalid SDK level {0}: cannot be negative")]
    Negative(i64),

    /// The value does not fit in a signed 32-bit integer.
    #[error("Invalid SDK level {0}: must not exceed {max}", max = i32::MAX)]
    OutOfRange(i64),
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("0", 0)]
    #[test_case("7", 7)]
    #[test_case(" 12 ", 12)]
    #[test_case("2147483647", i32::MAX; "upper bound")]
    fn parses_valid_levels(input: &str, expected: i32) {
        assert_eq!(input.parse::<SdkLevel>().unwrap().get(), expected);
    }

    #[test]
    fn rejects_negative() {
        assert_eq!(
            "-1".parse::<SdkLevel>(),
            Err(InvalidLevelError::Negative(-1))
        );
        assert!(SdkLevel::new(-5).is_err());
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            "2147483648".parse::<SdkLevel>(),
            Err(InvalidLevelError::OutOfRange(2_147_483_648))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            "seven".parse::<SdkLevel>(),
            Err(InvalidLevelError::Syntax(_))
        ));
    }

    #[test]
    fn orders_numerically() {
        let two = SdkLevel::new(2).unwrap();
        let ten = SdkLevel::new(10).unwrap();
        assert!(two < ten);
        assert_eq!(ten.to_string(), "10");
    }
}
