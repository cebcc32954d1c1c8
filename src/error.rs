/// Exit code for fatal local failures (configuration, log file, chart artifact).
pub const EXIT_LOCAL: u8 = 2;
/// Exit code for remote fetch failures (transport, timeout, non-200, bad envelope).
pub const EXIT_FETCH: u8 = 4;

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

    pub fn fetch(message: impl Into<String>) -> Self {
        Self::new(EXIT_FETCH, message)
    }

    pub fn local(message: impl Into<String>) -> Self {
        Self::new(EXIT_LOCAL, message)
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
    fn constructors_carry_exit_codes() {
        assert_eq!(AppError::fetch("down").exit_code(), EXIT_FETCH);
        assert_eq!(AppError::local("disk").exit_code(), EXIT_LOCAL);
        assert_eq!(AppError::new(7, "x").to_string(), "x");
    }
}
