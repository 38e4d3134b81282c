use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Region;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    MissingRegion,
    Validation,
    Port,
    NotInitialized,
    Config,
}

/// Serializable summary of an error, for logs and CLI output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorReport {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Intent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Please enter your full name")]
    NameRequired,
    #[error("Name must be at least {min} characters")]
    NameTooShort { min: usize },
    #[error("Please enter your email address")]
    EmailRequired,
    #[error("Please enter a valid email address")]
    EmailInvalid,
    #[error("Please select what interests you most")]
    IntentRequired,
}

impl ValidationError {
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::NameRequired | ValidationError::NameTooShort { .. } => {
                FormField::Name
            }
            ValidationError::EmailRequired | ValidationError::EmailInvalid => FormField::Email,
            ValidationError::IntentRequired => FormField::Intent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("{0} element not found")]
    MissingRegion(Region),
    #[error("presentation port failure: {0}")]
    Port(String),
    #[error("controller is not initialized")]
    NotInitialized,
    #[error("invalid controller config: {0}")]
    Config(String),
}

impl ControllerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ControllerError::MissingRegion(_) => ErrorCode::MissingRegion,
            ControllerError::Port(_) => ErrorCode::Port,
            ControllerError::NotInitialized => ErrorCode::NotInitialized,
            ControllerError::Config(_) => ErrorCode::Config,
        }
    }
}

impl From<ControllerError> for ErrorReport {
    fn from(value: ControllerError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}

impl From<ValidationError> for ErrorReport {
    fn from(value: ValidationError) -> Self {
        Self::new(ErrorCode::Validation, value.to_string())
    }
}
