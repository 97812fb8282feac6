//! Error handling for the RTT plotter

use thiserror::Error;

/// Custom error types for the RTT plotter
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors (grouping keys, command line flags, etc.)
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors (file operations, directory traversal, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (result lines, command strings, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// A protocol category required for a chart has no data
    #[error("Missing data: {0}")]
    MissingData(String),

    /// Chart rendering errors
    #[error("Render error: {0}")]
    Render(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new missing data error
    pub fn missing_data<S: Into<String>>(message: S) -> Self {
        Self::MissingData(message.into())
    }

    /// Create a new render error
    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::MissingData(_) => "DATA",
            Self::Render(_) => "RENDER",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file or command line arguments.", msg)
            }
            Self::Validation(msg) => {
                format!("Invalid input: {}\n\nSuggestion: Result files must live under a test directory (test1..test8) and record the benchmark command line.", msg)
            }
            Self::Io(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check that the input directories exist and the output directory is writable.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse data: {}\n\nSuggestion: Result files must contain one JSON record per line, starting with a 'cmdline' record.", msg)
            }
            Self::MissingData(msg) => {
                format!("Not enough data: {}\n\nSuggestion: Collect results for UDP, DoH GET and DoH POST, or rerun with --allow-partial.", msg)
            }
            Self::Render(msg) => {
                format!("Chart rendering failed: {}\n\nSuggestion: Check that a system font is installed, or rerun with --no-charts.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,  // Invalid configuration/input
            Self::Io(_) => 5,  // I/O issues
            Self::MissingData(_) => 6,  // Not enough measurements
            Self::Render(_) => 7,  // Chart output issues
            Self::Internal(_) => 99,  // Internal/unexpected errors
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::MissingData(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Io(_) | Self::Render(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<serde_json5::Error> for AppError {
    fn from(error: serde_json5::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<walkdir::Error> for AppError {
    fn from(error: walkdir::Error) -> Self {
        let path = error
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        Self::io(format!("Failed to traverse {}: {}", path, error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(error: std::num::ParseFloatError) -> Self {
        Self::parse(format!("Float parse error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("Boolean parse error: {}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error, keeping its category
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let context = f();
            match e.into() {
                AppError::Config(msg) => AppError::Config(format!("{}: {}", context, msg)),
                AppError::Validation(msg) => AppError::Validation(format!("{}: {}", context, msg)),
                AppError::Io(msg) => AppError::Io(format!("{}: {}", context, msg)),
                AppError::Parse(msg) => AppError::Parse(format!("{}: {}", context, msg)),
                AppError::MissingData(msg) => AppError::MissingData(format!("{}: {}", context, msg)),
                AppError::Render(msg) => AppError::Render(format!("{}: {}", context, msg)),
                AppError::Internal(msg) => AppError::Internal(format!("{}: {}", context, msg)),
            }
        })
    }

    fn context(self, message: &'static str) -> Result<T> {
        self.with_context(|| message.to_string())
    }
}

/// Error reporter for structured error logging and user feedback
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.format_error(error));
    }

    /// Render the report text without printing it
    pub fn format_error(&self, error: &AppError) -> String {
        let mut text = error.format_for_console(self.use_color);
        if self.verbose {
            text.push_str("\n\n");
            text.push_str(&error.user_friendly_message());
        }
        text
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_error = AppError::config("Invalid configuration");
        assert_eq!(config_error.category(), "CONFIG");
        assert_eq!(config_error.exit_code(), 1);

        let data_error = AppError::missing_data("no doh-POST series");
        assert_eq!(data_error.category(), "DATA");
        assert_eq!(data_error.exit_code(), 6);
    }

    #[test]
    fn test_error_display() {
        let error = AppError::validation("no test identifier in path");
        let display = error.to_string();
        assert!(display.contains("Validation error"));
        assert!(display.contains("no test identifier in path"));
    }

    #[test]
    fn test_error_categories() {
        let errors = [
            AppError::config("config"),
            AppError::validation("validation"),
            AppError::io("io"),
            AppError::parse("parse"),
            AppError::missing_data("data"),
            AppError::render("render"),
            AppError::internal("internal"),
        ];

        let expected_categories = ["CONFIG", "VALIDATION", "IO", "PARSE", "DATA", "RENDER", "INTERNAL"];

        for (error, expected) in errors.iter().zip(expected_categories.iter()) {
            assert_eq!(error.category(), *expected);
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::config("test").exit_code(), 1);
        assert_eq!(AppError::parse("test").exit_code(), 1);
        assert_eq!(AppError::io("test").exit_code(), 5);
        assert_eq!(AppError::missing_data("test").exit_code(), 6);
        assert_eq!(AppError::render("test").exit_code(), 7);
        assert_eq!(AppError::internal("test").exit_code(), 99);
    }

    #[test]
    fn test_user_friendly_messages() {
        let error = AppError::missing_data("no doh-POST series");
        let message = error.user_friendly_message();
        assert!(message.contains("Not enough data"));
        assert!(message.contains("--allow-partial"));
        assert!(message.contains("no doh-POST series"));
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert_eq!(app_error.category(), "IO");

        let parse_error = "not_a_number".parse::<u32>().unwrap_err();
        let app_error: AppError = parse_error.into();
        assert_eq!(app_error.category(), "PARSE");

        let json_error = serde_json::from_str::<serde_json::Value>("{broken").unwrap_err();
        let app_error: AppError = json_error.into();
        assert!(app_error.to_string().contains("JSON parse error"));
    }

    #[test]
    fn test_error_context_keeps_category() {
        let result: Result<()> = Err(AppError::parse("unexpected token"));
        let error = result.with_context(|| "results/tests/test1/a.json line 3".to_string()).unwrap_err();

        assert_eq!(error.category(), "PARSE");
        assert!(error.to_string().contains("results/tests/test1/a.json line 3"));
        assert!(error.to_string().contains("unexpected token"));
    }

    #[test]
    fn test_static_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let error = result.context("While writing chart").unwrap_err();
        assert_eq!(error.category(), "IO");
        assert!(error.to_string().contains("While writing chart"));
    }

    #[test]
    fn test_console_formatting() {
        let error = AppError::config("Test error");
        let formatted_no_color = error.format_for_console(false);
        let formatted_color = error.format_for_console(true);

        assert_eq!(formatted_no_color, "[CONFIG] Configuration error: Test error");
        assert!(formatted_color.contains("CONFIG"));
        assert!(formatted_color.contains("Test error"));
    }

    #[test]
    fn test_error_reporter_verbose_includes_suggestion() {
        let reporter = ErrorReporter::new(false, true);
        let text = reporter.format_error(&AppError::render("font not found"));
        assert!(text.starts_with("[RENDER]"));
        assert!(text.contains("--no-charts"));

        let terse = ErrorReporter::new(false, false).format_error(&AppError::render("font not found"));
        assert!(!terse.contains("Suggestion"));
    }

    #[test]
    fn test_error_reporter_default() {
        let reporter = ErrorReporter::default();
        assert!(reporter.use_color);
        assert!(!reporter.verbose);
    }
}
