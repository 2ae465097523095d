use colored::Colorize;
use inquire::Text;
use validator::{ValidateLength, ValidateUrl};

use crate::{
    error::{AppError, FieldErrors},
    profile::UserProfile,
};

/// Maximum length for the username, in characters
pub const MAX_USERNAME_LENGTH: u64 = 50;
/// Maximum length for the job title, in characters
pub const MAX_JOB_TITLE_LENGTH: u64 = 100;

/// Prompts user for input until valid input is provided
///
/// # Arguments
/// * `prompt_message` - Text shown in front of the input
/// * `initial_value` - Prefilled input, used when editing an existing profile
/// * `input_validation` - Check applied to every answer
pub fn prompt_until_valid<F>(
    prompt_message: &str,
    initial_value: Option<&str>,
    input_validation: F,
) -> Result<String, AppError>
where
    F: Fn(&str) -> Result<(), AppError>,
{
    loop {
        let mut prompt = Text::new(prompt_message);
        if let Some(value) = initial_value {
            prompt = prompt.with_initial_value(value);
        }

        let input: String = prompt.prompt()?;
        match input_validation(&input) {
            Ok(_) => break Ok(input),
            Err(AppError::Validation(errors)) => {
                for (_, message) in errors.iter() {
                    println!("{}", message.red());
                }
            }
            Err(e) => return Err(e),
        }
    }
}

// Validate input helper functions

/// Validates username input
pub fn validate_input_username(name: &str) -> Result<(), AppError> {
    single_field("username", username_message(name))
}

/// Validates job title input
pub fn validate_input_job_title(job_title: &str) -> Result<(), AppError> {
    single_field("jobTitle", job_title_message(job_title))
}

/// Validates every field of a profile, collecting one message per failing field
pub fn validate_profile(profile: &UserProfile) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    if let Some(message) = username_message(&profile.username) {
        errors.push("username", message);
    }
    if let Some(message) = job_title_message(&profile.job_title) {
        errors.push("jobTitle", message);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Validates the GraphQL endpoint URL
pub fn validate_endpoint(endpoint: &str) -> Result<(), AppError> {
    if !endpoint.validate_url() {
        return Err(AppError::Config(format!("invalid endpoint url: '{endpoint}'")));
    }
    if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
        return Err(AppError::Config(format!(
            "endpoint must use http or https: '{endpoint}'"
        )));
    }
    Ok(())
}

fn username_message(name: &str) -> Option<String> {
    bounded_message(name, "Username", MAX_USERNAME_LENGTH)
}

fn job_title_message(job_title: &str) -> Option<String> {
    bounded_message(job_title, "Job title", MAX_JOB_TITLE_LENGTH)
}

fn bounded_message(value: &str, label: &str, max: u64) -> Option<String> {
    if value.is_empty() {
        Some(format!("{label} is required"))
    } else if !value.validate_length(None, Some(max), None) {
        Some(format!("{label} must be at most {max} characters"))
    } else {
        None
    }
}

fn single_field(field: &'static str, message: Option<String>) -> Result<(), AppError> {
    match message {
        None => Ok(()),
        Some(message) => {
            let mut errors = FieldErrors::new();
            errors.push(field, message);
            Err(AppError::Validation(errors))
        }
    }
}
