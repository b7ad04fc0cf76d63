use crate::{
    error::{ConfigurationError, InvalidCursorError},
    value::Value,
};
use thiserror::Error as ThisError;

///
/// ValueContext
///
/// Direction of data flow for value validation. Configuration context covers
/// values extracted from server-side rows (a failure is a developer/config
/// bug); Cursor context covers values consumed from an incoming client
/// cursor (a failure means a malformed, tampered, or stale cursor). The
/// checks are identical; only the error taxonomy differs.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueContext {
    Configuration,
    Cursor,
}

///
/// ValidationError
/// Context-mapped validation failure.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValidationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Cursor(#[from] InvalidCursorError),
}

///
/// ValueFault
///
/// Context-free validation failure produced by the shared checks and mapped
/// into one taxonomy at the boundary where the data's origin is known.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum ValueFault {
    Null,
    Kind {
        expected: &'static str,
        value: Value,
    },
    Rule {
        message: String,
    },
}

impl ValueFault {
    pub(crate) fn into_error(self, column: &str, context: ValueContext) -> ValidationError {
        match context {
            ValueContext::Configuration => self.into_configuration(column).into(),
            ValueContext::Cursor => self.into_cursor(column).into(),
        }
    }

    pub(crate) fn into_configuration(self, column: &str) -> ConfigurationError {
        let column = column.to_string();

        match self {
            Self::Null => ConfigurationError::UnexpectedNull { column },
            Self::Kind { expected, value } => ConfigurationError::KindMismatch {
                column,
                expected,
                value,
            },
            Self::Rule { message } => ConfigurationError::RuleRejected { column, message },
        }
    }

    pub(crate) fn into_cursor(self, column: &str) -> InvalidCursorError {
        let column = column.to_string();

        match self {
            Self::Null => InvalidCursorError::UnexpectedNull { column },
            Self::Kind { expected, value } => InvalidCursorError::KindMismatch {
                column,
                expected,
                value,
            },
            Self::Rule { message } => InvalidCursorError::RuleRejected { column, message },
        }
    }
}
