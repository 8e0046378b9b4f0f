use regex::Regex;
use std::sync::LazyLock;

/// Something a field's value has to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Must contain something other than whitespace.
    Required,

    /// Must be at least this many characters.
    MinLength(usize),

    /// Must look like an email address. Empty values pass; combine with
    /// `Required` if the field can't be left blank.
    Email,
}

impl Rule {
    fn check(self, value: &str) -> Result<(), Problem> {
        match self {
            Self::Required if value.trim().is_empty() => Err(Problem::Missing),
            Self::MinLength(min) if value.chars().count() < min => Err(Problem::TooShort(min)),
            Self::Email if !value.is_empty() && !is_email(value) => Err(Problem::NotAnEmail),
            _ => Ok(()),
        }
    }
}

static EMAIL_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

fn is_email(value: &str) -> bool {
    EMAIL_REGEX.as_ref().is_some_and(|re| re.is_match(value))
}

/// Why a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Problem {
    /// The field was empty.
    #[error("is required")]
    Missing,

    /// The field was shorter than the minimum.
    #[error("must be at least {0} characters")]
    TooShort(usize),

    /// The field wasn't an email address.
    #[error("must be a valid email address")]
    NotAnEmail,
}

/// The first field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} {problem}")]
pub struct Error {
    /// The field's name, as shown to the user
    pub field: &'static str,

    /// What was wrong with it
    pub problem: Problem,
}

/// Check fields in order, stopping at the first failure.
///
/// ## Errors
///
/// Returns the first rule that a field breaks.
pub fn validate(fields: &[(&'static str, &str, &[Rule])]) -> Result<(), Error> {
    for (field, value, rules) in fields {
        for rule in *rules {
            rule.check(value).map_err(|problem| Error {
                field: *field,
                problem,
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::email;
    use proptest::prelude::*;

    #[test]
    fn required_rejects_blank() {
        let err = validate(&[("email", "  ", &[Rule::Required])]).unwrap_err();

        assert_eq!(err.problem, Problem::Missing);
        assert_eq!(err.to_string(), "email is required");
    }

    #[test]
    fn reports_the_first_failing_field() {
        let err = validate(&[
            ("email", "a@b.com", &[Rule::Required, Rule::Email]),
            ("password", "", &[Rule::Required]),
            ("otp", "1", &[Rule::MinLength(6)]),
        ])
        .unwrap_err();

        assert_eq!(err.field, "password");
    }

    #[test]
    fn min_length_counts_characters() {
        assert!(validate(&[("otp", "12345", &[Rule::MinLength(6)])]).is_err());
        assert!(validate(&[("otp", "123456", &[Rule::MinLength(6)])]).is_ok());
        assert!(validate(&[("name", "ææææ", &[Rule::MinLength(4)])]).is_ok());

        assert_eq!(
            validate(&[("otp", "12345", &[Rule::MinLength(6)])])
                .unwrap_err()
                .to_string(),
            "otp must be at least 6 characters"
        );
    }

    #[test]
    fn email_problems_read_as_sentences() {
        let err = validate(&[("email", "nope", &[Rule::Email])]).unwrap_err();

        assert_eq!(err.problem, Problem::NotAnEmail);
        assert_eq!(err.to_string(), "email must be a valid email address");
    }

    #[test]
    fn email_only_checks_nonempty_values() {
        assert!(validate(&[("email", "", &[Rule::Email])]).is_ok());
        assert!(validate(&[("email", "nope", &[Rule::Email])]).is_err());
        assert!(validate(&[("email", "a b@c.com", &[Rule::Email])]).is_err());
    }

    proptest! {
        #[test]
        fn generated_emails_pass(address in email()) {
            prop_assert!(validate(&[("email", address.as_str(), &[Rule::Required, Rule::Email])]).is_ok());
        }

        #[test]
        fn short_values_fail_min_length(value in "[0-9]{0,5}") {
            prop_assert!(validate(&[("otp", value.as_str(), &[Rule::MinLength(6)])]).is_err());
        }
    }
}
