use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Zip archive error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Manifest parse error: {0}")]
    ManifestError(#[from] toml::de::Error),

    #[error("Download of {url} failed with HTTP status {status}")]
    DownloadError { url: String, status: u16 },

    #[error("Archive from {url} does not contain a '{name}' binary")]
    MissingBinaryError { url: String, name: String },

    #[error("'{program}' exited with status {code:?}")]
    ExecError { program: String, code: Option<i32> },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required input: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Archive,
    Process,
    Io,
    Config,
}

impl ToolkitError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::DownloadError { .. } => ErrorCategory::Network,
            Self::ZipError(_) | Self::MissingBinaryError { .. } => ErrorCategory::Archive,
            Self::ExecError { .. } => ErrorCategory::Process,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Io,
            Self::ManifestError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // Network failures are usually transient; rerunning the job may fix them.
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Archive | ErrorCategory::Process | ErrorCategory::Io => {
                ErrorSeverity::High
            }
            ErrorCategory::Config => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::HttpError(_) => "Check network connectivity from the runner".to_string(),
            Self::DownloadError { url, .. } => {
                format!("Verify the requested version exists; tried to fetch {}", url)
            }
            Self::MissingBinaryError { name, .. } => format!(
                "The release archive layout may have changed; expected a '{}' entry",
                name
            ),
            Self::ExecError { program, .. } => {
                format!("Inspect the {} output above for the underlying failure", program)
            }
            Self::InvalidConfigValueError { field, .. } | Self::MissingConfigError { field } => {
                format!("Fix the '{}' input and rerun", field)
            }
            Self::ManifestError(_) => "Check the tools.toml manifest syntax".to_string(),
            _ => "Rerun the job; report an issue if the failure persists".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Download failed: {}", self),
            ErrorCategory::Archive => format!("Could not unpack release artifact: {}", self),
            ErrorCategory::Process => format!("Tool invocation failed: {}", self),
            ErrorCategory::Io => format!("Filesystem operation failed: {}", self),
            ErrorCategory::Config => format!("{}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolkitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_errors_are_medium_severity() {
        let err = ToolkitError::DownloadError {
            url: "https://example.com/helm.tar.gz".to_string(),
            status: 404,
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.recovery_suggestion().contains("helm.tar.gz"));
    }

    #[test]
    fn config_errors_are_critical() {
        let err = ToolkitError::MissingConfigError {
            field: "command".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("command"));
    }

    #[test]
    fn exec_error_names_the_program() {
        let err = ToolkitError::ExecError {
            program: "kops".to_string(),
            code: Some(2),
        };
        assert!(err.to_string().contains("kops"));
        assert_eq!(err.category(), ErrorCategory::Process);
    }
}
