use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::errors::AuthError;

/// One violated constraint, reported back to the client.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub path: &'static str,
    pub msg: &'static str,
    pub location: &'static str,
}

impl FieldError {
    fn body(path: &'static str, msg: &'static str) -> Self {
        Self {
            kind: "field",
            path,
            msg,
            location: "body",
        }
    }

    /// The body itself could not be read as the expected JSON object.
    pub(crate) fn malformed_body() -> Self {
        Self::body("body", "Request body must be a JSON object with string fields!")
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

/// Collects every failed check instead of stopping at the first.
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    pub fn min_len(mut self, path: &'static str, value: &str, min: usize, msg: &'static str) -> Self {
        if value.chars().count() < min {
            self.errors.push(FieldError::body(path, msg));
        }
        self
    }

    pub fn email(mut self, path: &'static str, value: &str, msg: &'static str) -> Self {
        if !is_valid_email(value) {
            self.errors.push(FieldError::body(path, msg));
        }
        self
    }

    pub fn finish(self) -> Result<(), AuthError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AuthError::Validation(self.errors))
        }
    }
}

/// Request bodies that know their own constraints.
pub trait Validate {
    fn validate(&self) -> Result<(), AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+tag@sub.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "alice", "alice@", "@example.com", "alice@example", "a b@example.com"] {
            assert!(!is_valid_email(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn collects_all_failures() {
        let err = Checks::default()
            .min_len("username", "ab", 3, "too short")
            .email("email", "nope", "bad email")
            .min_len("password", "1234", 5, "too short")
            .finish()
            .unwrap_err();
        match err {
            AuthError::Validation(errors) => {
                let paths: Vec<_> = errors.iter().map(|e| e.path).collect();
                assert_eq!(paths, ["username", "email", "password"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn min_len_counts_characters_not_bytes() {
        assert!(Checks::default().min_len("username", "äöü", 3, "short").finish().is_ok());
        assert!(Checks::default().min_len("username", "äö", 3, "short").finish().is_err());
    }

    #[test]
    fn field_error_serializes_with_type_tag() {
        let json = serde_json::to_value(FieldError::body("email", "Enter a valid email!")).unwrap();
        assert_eq!(json["type"], "field");
        assert_eq!(json["path"], "email");
        assert_eq!(json["location"], "body");
    }
}
