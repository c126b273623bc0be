use crate::error::{InvalidFieldSnafu, RollcallError};
use email_address::{EmailAddress, Options};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Validate)]
pub struct Student {
    pub id: i64,
    #[validate(
        custom(function = "not_blank", message = "Name is required"),
        length(min = 3, max = 38, message = "Name length should be between 3 to 38")
    )]
    pub name: String,
    #[validate(custom(function = "plain_email"))]
    pub email: String,
}

/// A student that hasn't been given an id by a store yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentDto {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<Student> for StudentDto {
    fn from(Student { id, name, email }: Student) -> Self {
        Self { id, name, email }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddStudentRequestDto {
    #[validate(
        custom(function = "not_blank", message = "Name is required"),
        length(min = 3, max = 38, message = "Name length should be between 3 to 38")
    )]
    pub name: String,
    #[validate(custom(function = "plain_email"))]
    pub email: String,
}

impl From<AddStudentRequestDto> for NewStudent {
    fn from(AddStudentRequestDto { name, email }: AddStudentRequestDto) -> Self {
        Self { name, email }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

///a bare `local@domain` address, so `Name <addr>` forms are turned away
fn plain_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message("Email is required".into()));
    }

    let options = Options::default().without_display_text();
    if EmailAddress::parse_with_options(value, options).is_err() {
        return Err(
            ValidationError::new("email").with_message("Email should be a valid email address".into()),
        );
    }
    Ok(())
}

/// The fields a partial update is allowed to touch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StudentField {
    Name,
    Email,
}

impl FromStr for StudentField {
    type Err = RollcallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            _ => InvalidFieldSnafu { field: s }.fail(),
        }
    }
}

impl StudentField {
    pub fn apply(self, student: &mut Student, value: Value) {
        //strings go in as-is, anything else as its JSON text
        let value = match value {
            Value::String(s) => s,
            other => other.to_string(),
        };

        match self {
            Self::Name => student.name = value,
            Self::Email => student.email = value,
        }
    }
}
