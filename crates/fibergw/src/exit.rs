use std::fmt;
use std::io;

// The shell exits 0 whenever a response body was written; nonzero codes
// mean the request never produced a body at all.
pub const SUCCESS: i32 = 0;
pub const IO_FAILURE: i32 = 74;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    CliError::new(IO_FAILURE, format!("{context}: {err}"))
}
