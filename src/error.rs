//! Application error type.
//!
//! Every failure aborts the run, so a single error type carrying a process exit
//! code and a human-readable message is enough. Exit codes group failures by
//! where they happen:
//!
//! - `2`: input files (missing/malformed CSV, unknown city names)
//! - `3`: not enough data to build a series (no games, no legs)
//! - `4`: model fitting / forecasting
//! - `5`: writing outputs (directories, CSV/JSON, plots)

pub const EXIT_INPUT: u8 = 2;
pub const EXIT_NO_DATA: u8 = 3;
pub const EXIT_MODEL: u8 = 4;
pub const EXIT_OUTPUT: u8 = 5;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(EXIT_NO_DATA, message)
    }

    pub fn model(message: impl Into<String>) -> Self {
        Self::new(EXIT_MODEL, message)
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::new(EXIT_OUTPUT, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_map_to_exit_codes() {
        assert_eq!(AppError::input("x").exit_code(), EXIT_INPUT);
        assert_eq!(AppError::no_data("x").exit_code(), EXIT_NO_DATA);
        assert_eq!(AppError::model("x").exit_code(), EXIT_MODEL);
        assert_eq!(AppError::output("x").exit_code(), EXIT_OUTPUT);
    }

    #[test]
    fn display_is_the_message() {
        let err = AppError::input("Unknown city 'Gotham'");
        assert_eq!(err.to_string(), "Unknown city 'Gotham'");
    }
}
