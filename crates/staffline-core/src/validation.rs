//! Client-side form validation.
//!
//! These checks run before anything is sent. The server still validates
//! every request; its messages arrive as `StafflineError::Api`.

use crate::error::{Result, StafflineError};
use crate::gateway::SignupRequest;
use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Loose email shape check: `local@domain.tld`, no whitespace.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(&email.to_lowercase())
}

/// US phone numbers: 10 digits, or 11 digits starting with 1.
pub fn validate_phone(phone: &str) -> bool {
    let digits: Vec<char> = phone.chars().filter(char::is_ascii_digit).collect();
    digits.len() == 10 || (digits.len() == 11 && digits[0] == '1')
}

pub fn validate_required(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn validate_min_length(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

pub fn validate_max_length(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

pub fn validate_positive_number(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .map(|n| n.is_finite() && n > 0.0)
        .unwrap_or(false)
}

/// Signup form as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
}

impl SignupForm {
    /// Checks the form and builds the request. The first failing rule wins.
    pub fn validate(&self) -> Result<SignupRequest> {
        let fields = [
            &self.email,
            &self.password,
            &self.confirm_password,
            &self.first_name,
            &self.last_name,
        ];
        if fields.iter().any(|f| f.is_empty()) {
            return Err(StafflineError::validation("Please fill in all fields"));
        }
        if !validate_email(&self.email) {
            return Err(StafflineError::validation(
                "Please enter a valid email address",
            ));
        }
        if !validate_min_length(&self.password, MIN_PASSWORD_LEN) {
            return Err(StafflineError::validation(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }
        if self.password != self.confirm_password {
            return Err(StafflineError::validation("Passwords do not match"));
        }

        Ok(SignupRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        })
    }
}
