/// Core validation trait that all validators must implement.
///
/// # Type Parameters
///
/// * `T` - The type of data being validated (can be unsized like `str`)
///
/// # Examples
///
/// ```
/// use wsctl::validation::{ConfirmationPhraseValidator, Validator};
///
/// let validator = ConfirmationPhraseValidator::new("DELETE");
/// assert!(validator.validate("DELETE").is_ok());
/// assert!(validator.validate("delete").is_err());
/// ```
pub trait Validator<T: ?Sized> {
    type Error;

    /// Validate the input and return Ok(()) if valid, or Err with validation error
    fn validate(&self, input: &T) -> Result<(), Self::Error>;
}

/// Rejection produced by [`ConfirmationPhraseValidator`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Please type {expected} to confirm")]
pub struct PhraseMismatch {
    pub expected: &'static str,
}

/// Accepts only the exact phrase: case-sensitive, no trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPhraseValidator {
    phrase: &'static str,
}

impl ConfirmationPhraseValidator {
    pub const fn new(phrase: &'static str) -> Self {
        Self { phrase }
    }

    pub fn phrase(&self) -> &'static str {
        self.phrase
    }
}

impl Validator<str> for ConfirmationPhraseValidator {
    type Error = PhraseMismatch;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        if input == self.phrase {
            Ok(())
        } else {
            Err(PhraseMismatch {
                expected: self.phrase,
            })
        }
    }
}
