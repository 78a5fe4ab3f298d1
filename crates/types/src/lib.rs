//! # DXReport Types
//!
//! Validated text types shared by the DXReport crates.
//!
//! Form fields arrive as free text from a browser. These types give the core a single place
//! to decide what "present" means for a field: trimmed, and not blank.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// Wraps a `String` holding at least one non-whitespace character. The input is trimmed of
/// leading and trailing whitespace during construction, so `" Center 1 "` and `"Center 1"`
/// produce the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Builds a `NonEmptyText` from an optional form value.
    ///
    /// Missing and blank values both yield `None`.
    pub fn from_optional(input: Option<impl AsRef<str>>) -> Option<Self> {
        input.and_then(|s| Self::new(s).ok())
    }

    /// Consumes the wrapper and returns the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Normalises an optional free-text field to an owned string.
///
/// Missing values become the empty string; present values are trimmed. Used for form fields
/// that the record stores as plain strings even when the client omitted them.
pub fn text_or_empty(input: Option<impl AsRef<str>>) -> String {
    input
        .map(|s| s.as_ref().trim().to_owned())
        .unwrap_or_default()
}
