//! Application-level error type.
//!
//! Every failure in this crate is a value returned to the caller; nothing
//! aborts the process except `main` translating the final error into an
//! exit code.
//!
//! Exit-code convention:
//! - `2` — bad input (unreadable file, missing columns, invalid flags)
//! - `3` — dataset is empty or unusable after normalization

#[derive(Debug, Clone)]
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

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}
