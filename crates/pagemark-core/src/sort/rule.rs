use crate::value::Value;

///
/// RuleOutcome
///
/// Tagged outcome of a custom per-column value rule. Replaces the
/// bool-or-string polymorphism of loosely typed validators: an invalid
/// outcome either carries its own message or falls back to a default.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RuleOutcome {
    Valid,
    Invalid,
    InvalidWith(String),
}

impl RuleOutcome {
    /// Rejection message, or `None` for valid outcomes.
    #[must_use]
    pub(crate) fn into_message(self) -> Option<String> {
        match self {
            Self::Valid => None,
            Self::Invalid => Some("value failed its declared rule".to_string()),
            Self::InvalidWith(message) => Some(message),
        }
    }
}

///
/// ValueRule
///
/// One-method capability interface for custom per-column validation.
/// Closures of the matching shape implement it directly.
///

pub trait ValueRule: Send + Sync {
    fn evaluate(&self, value: &Value) -> RuleOutcome;
}

impl<F> ValueRule for F
where
    F: Fn(&Value) -> RuleOutcome + Send + Sync,
{
    fn evaluate(&self, value: &Value) -> RuleOutcome {
        self(value)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{RuleOutcome, ValueRule};
    use crate::value::Value;

    #[test]
    fn closures_implement_the_rule_capability() {
        let rule = |value: &Value| match value {
            Value::Int(n) if *n >= 0 => RuleOutcome::Valid,
            Value::Int(_) => RuleOutcome::InvalidWith("must be non-negative".to_string()),
            _ => RuleOutcome::Invalid,
        };

        assert_eq!(rule.evaluate(&Value::Int(3)), RuleOutcome::Valid);
        assert_eq!(
            rule.evaluate(&Value::Int(-1)),
            RuleOutcome::InvalidWith("must be non-negative".to_string())
        );
    }

    #[test]
    fn invalid_outcomes_carry_or_default_their_message() {
        assert_eq!(RuleOutcome::Valid.into_message(), None);
        assert_eq!(
            RuleOutcome::Invalid.into_message(),
            Some("value failed its declared rule".to_string())
        );
        assert_eq!(
            RuleOutcome::InvalidWith("nope".to_string()).into_message(),
            Some("nope".to_string())
        );
    }
}
