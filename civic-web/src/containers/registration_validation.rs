//! Validation for the self-service registration form.
//!
//! Kept apart from the component so the rules can be tested natively.

use civic_shared::models::RegisterRequest;
use thiserror::Error;

/// Why a registration field was rejected.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum ValidationError {
    #[error("This field is required")]
    Required,
    #[error("Name must be at least 2 characters")]
    NameTooShort,
    #[error("Enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordsDoNotMatch,
    #[error("Enter a valid phone number")]
    InvalidPhone,
}

/// Form field a [`ValidationError`] belongs to.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Field {
    Name,
    Email,
    Password,
    ConfirmPassword,
    Phone,
}

/// Raw form values as typed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegistrationInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
}

/// Validate the form and build the request body.
///
/// # Errors
/// Returns the first offending field, in form order.
pub fn validate_registration(
    input: &RegistrationInput,
) -> Result<RegisterRequest, (Field, ValidationError)> {
    validate_name(&input.name).map_err(|err| (Field::Name, err))?;
    validate_email(&input.email).map_err(|err| (Field::Email, err))?;
    validate_password(&input.password).map_err(|err| (Field::Password, err))?;
    validate_confirm_password(&input.confirm_password, &input.password)
        .map_err(|err| (Field::ConfirmPassword, err))?;
    let phone = validate_phone(&input.phone).map_err(|err| (Field::Phone, err))?;

    Ok(RegisterRequest {
        name: input.name.trim().to_string(),
        email: input.email.trim().to_string(),
        password: input.password.clone(),
        phone,
    })
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required);
    }
    if trimmed.chars().count() < 2 {
        return Err(ValidationError::NameTooShort);
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required);
    }
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::InvalidEmail),
    }
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::Required);
    }
    if password.chars().count() < 8 {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

fn validate_confirm_password(
    confirm_password: &str,
    password: &str,
) -> Result<(), ValidationError> {
    if confirm_password.trim().is_empty() {
        return Err(ValidationError::Required);
    }
    if confirm_password != password {
        return Err(ValidationError::PasswordsDoNotMatch);
    }
    Ok(())
}

/// Phone is optional; when given it needs at least seven digits.
fn validate_phone(phone: &str) -> Result<Option<String>, ValidationError> {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let allowed = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    let digits = trimmed.chars().filter(char::is_ascii_digit).count();
    if allowed && digits >= 7 {
        Ok(Some(trimmed.to_string()))
    } else {
        Err(ValidationError::InvalidPhone)
    }
}
