//! Parameter Entry - one named value with its optional uncertainty

use serde::{Deserialize, Serialize};

use crate::{Error, ParameterKind, ParameterValue, Result};

/// A single stored parameter.
///
/// The uncertainty, when present, has the same kind as the main value, and a
/// vector uncertainty has one element per main element.
/// [`ParameterEntry::with_error`] enforces this on construction; an entry
/// that arrives through deserialization is re-checked on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterEntry {
    name: String,
    main: ParameterValue,
    error: Option<ParameterValue>,
}

impl ParameterEntry {
    /// Create an entry without an uncertainty.
    #[must_use]
    pub fn new(name: impl Into<String>, main: impl Into<ParameterValue>) -> Self {
        Self {
            name: name.into(),
            main: main.into(),
            error: None,
        }
    }

    /// Create an entry with an uncertainty.
    ///
    /// # Errors
    ///
    /// - `UnsupportedOperation` if the main value is `Text` or `UInt32`
    /// - `TypeError` if the uncertainty is of a different kind than the main
    ///   value, or a vector of a different length
    pub fn with_error(
        name: impl Into<String>,
        main: impl Into<ParameterValue>,
        error: impl Into<ParameterValue>,
    ) -> Result<Self> {
        let name = name.into();
        let main = main.into();
        let error = error.into();

        if !main.kind().can_carry_error() {
            return Err(Error::UnsupportedOperation(format!(
                "{} parameter '{name}' cannot have an error value",
                main.kind()
            )));
        }
        if error.kind() != main.kind() {
            return Err(Error::TypeError(format!(
                "error value for '{name}' is {} but the parameter is {}",
                error.kind(),
                main.kind()
            )));
        }
        if let (Some(values), Some(errors)) = (main.as_vector(), error.as_vector()) {
            if values.len() != errors.len() {
                return Err(Error::TypeError(format!(
                    "error vector for '{name}' has {} elements but the parameter has {}",
                    errors.len(),
                    values.len()
                )));
            }
        }

        Ok(Self {
            name,
            main,
            error: Some(error),
        })
    }

    /// Get the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the main value.
    #[must_use]
    pub const fn main(&self) -> &ParameterValue {
        &self.main
    }

    /// Get the uncertainty, if one was supplied.
    #[must_use]
    pub const fn error(&self) -> Option<&ParameterValue> {
        self.error.as_ref()
    }

    /// Get the kind of the main value.
    #[must_use]
    pub const fn kind(&self) -> ParameterKind {
        self.main.kind()
    }

    /// Get the main value after checking the entry is consistent.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the stored uncertainty does not match the main kind.
    pub fn checked_main(&self) -> Result<&ParameterValue> {
        self.check()?;
        Ok(&self.main)
    }

    /// Get the uncertainty, failing when none can or does exist.
    ///
    /// # Errors
    ///
    /// - `UnsupportedOperation` for `Text` and `UInt32` parameters
    /// - `NotFound` if no uncertainty was supplied
    /// - `Internal` if the stored uncertainty does not match the main kind
    pub fn checked_error(&self) -> Result<&ParameterValue> {
        self.check()?;
        match self.main.kind() {
            ParameterKind::Text => Err(Error::UnsupportedOperation(format!(
                "string parameter '{}' has no error value",
                self.name
            ))),
            ParameterKind::UInt32 => Err(Error::UnsupportedOperation(format!(
                "uint32 parameter '{}' has no error value",
                self.name
            ))),
            ParameterKind::Float64 | ParameterKind::Float64Vector => {
                self.error.as_ref().ok_or_else(|| {
                    Error::NotFound(format!("no error value stored for '{}'", self.name))
                })
            }
        }
    }

    fn check(&self) -> Result<()> {
        match (&self.main, &self.error) {
            (main, Some(error)) if error.kind() != main.kind() => Err(Error::Internal(format!(
                "'{}' holds a {} value with a {} error value",
                self.name,
                main.kind(),
                error.kind()
            ))),
            (ParameterValue::Float64Vector(values), Some(ParameterValue::Float64Vector(errors)))
                if values.len() != errors.len() =>
            {
                Err(Error::Internal(format!(
                    "'{}' holds {} values with {} error values",
                    self.name,
                    values.len(),
                    errors.len()
                )))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_new_has_no_error() {
        let entry = ParameterEntry::new("F0", 29.946);
        assert_eq!(entry.name(), "F0");
        assert_eq!(entry.kind(), ParameterKind::Float64);
        assert!(entry.error().is_none());
        assert_eq!(entry.checked_error().unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_with_error_matching_kind() {
        let entry = ParameterEntry::with_error("F0", 29.946, 1e-10).unwrap();
        assert_eq!(entry.checked_error().unwrap(), &ParameterValue::Float64(1e-10));
    }

    #[test]
    fn test_with_error_kind_mismatch() {
        let err = ParameterEntry::with_error("F", vec![1.0, 2.0], 0.1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_with_error_vector_length_mismatch() {
        let err = ParameterEntry::with_error("F", vec![1.0, 2.0, 3.0], vec![0.1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);

        let entry =
            ParameterEntry::with_error("F", vec![1.0, 2.0], vec![0.1, 0.2]).unwrap();
        assert_eq!(
            entry.checked_error().unwrap(),
            &ParameterValue::Float64Vector(vec![0.1, 0.2])
        );
    }

    #[test]
    fn test_deserialized_length_mismatch_is_internal() {
        let json = r#"{"name":"F","main":{"Float64Vector":[1.0,2.0]},"error":{"Float64Vector":[0.1]}}"#;
        let entry: ParameterEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.checked_main().unwrap_err().kind(), ErrorKind::Internal);
        assert_eq!(entry.checked_error().unwrap_err().kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_with_error_on_text_is_unsupported() {
        let err = ParameterEntry::with_error("PSRJ", "J0534+2200", "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    }

    #[test]
    fn test_deserialized_mismatch_is_internal() {
        let json = r#"{"name":"F0","main":{"Float64":1.0},"error":{"Text":"oops"}}"#;
        let entry: ParameterEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.checked_main().unwrap_err().kind(), ErrorKind::Internal);
        assert_eq!(entry.checked_error().unwrap_err().kind(), ErrorKind::Internal);
    }
}
