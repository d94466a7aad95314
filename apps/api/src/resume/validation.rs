//! Contact-field checks applied to parsed resumes and manual candidate entry.

use serde::{Deserialize, Serialize};

use crate::progress::models::ValidityStatus;
use crate::resume::parser::ParsedResume;

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub status: ValidityStatus,
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.status == ValidityStatus::Valid
    }
}

pub fn validate_resume(resume: &ParsedResume) -> ValidationOutcome {
    let errors = validate_contact(
        resume.name.as_deref(),
        resume.email.as_deref(),
        resume.phone.as_deref(),
    );
    let status = if errors.is_empty() {
        ValidityStatus::Valid
    } else {
        ValidityStatus::Invalid
    };
    ValidationOutcome { status, errors }
}

/// Returns one message per problem; empty means the contact details are usable.
pub fn validate_contact(name: Option<&str>, email: Option<&str>, phone: Option<&str>) -> Vec<String> {
    let mut errors = Vec::new();

    if name.map(str::trim).unwrap_or_default().is_empty() {
        errors.push("Candidate name is missing".to_string());
    }

    match email.map(str::trim).filter(|e| !e.is_empty()) {
        None => errors.push("Email address is missing".to_string()),
        Some(email) if !is_plausible_email(email) => {
            errors.push(format!("Email address '{email}' is not valid"))
        }
        Some(_) => {}
    }

    if let Some(phone) = phone.map(str::trim).filter(|p| !p.is_empty()) {
        let digits = phone.chars().filter(char::is_ascii_digit).count();
        let allowed = phone
            .chars()
            .all(|c| c.is_ascii_digit() || " +-().".contains(c));
        if !allowed || !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
            errors.push(format!("Phone number '{phone}' is not valid"));
        }
    }

    errors
}

/// `local@domain.tld` with no whitespace; not a full RFC 5322 check.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2 && !host.starts_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resume(name: Option<&str>, email: Option<&str>, phone: Option<&str>) -> ParsedResume {
        ParsedResume {
            name: name.map(String::from),
            email: email.map(String::from),
            phone: phone.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_contact_is_valid() {
        let outcome = validate_resume(&resume(
            Some("Jane Doe"),
            Some("jane.doe@example.co.uk"),
            Some("+1 (512) 555-0100"),
        ));
        assert!(outcome.is_valid(), "{:?}", outcome.errors);
    }

    #[test]
    fn test_missing_name_and_email() {
        let outcome = validate_resume(&resume(None, Some("  "), None));
        assert_eq!(outcome.status, ValidityStatus::Invalid);
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors[0].contains("name"));
        assert!(outcome.errors[1].contains("Email"));
    }

    #[test]
    fn test_malformed_emails() {
        for email in ["jane", "jane@", "@example.com", "jane@example", "ja ne@example.com", "a@b@c.com", "jane@example.c"] {
            assert!(!is_plausible_email(email), "{email} should be rejected");
        }
        assert!(is_plausible_email("j@example.io"));
    }

    #[test]
    fn test_phone_digit_bounds() {
        assert_eq!(validate_contact(Some("A"), Some("a@b.io"), Some("12345")).len(), 1);
        assert_eq!(validate_contact(Some("A"), Some("a@b.io"), Some("call me")).len(), 1);
        assert!(validate_contact(Some("A"), Some("a@b.io"), Some("555 010 0199")).is_empty());
    }
}
