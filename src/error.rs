use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Could not retrieve events: {0}")]
    Fetch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn invalid_period<S: Into<String>>(msg: S) -> Self {
        Self::InvalidPeriod(msg.into())
    }

    pub fn fetch<S: Into<String>>(msg: S) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn is_invalid_period(&self) -> bool {
        matches!(self, Self::InvalidPeriod(_))
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }

    pub fn is_pii_safe(&self) -> bool {
        match self {
            Self::Io(_) | Self::Json(_) => false,
            Self::InvalidPeriod(_) | Self::Fetch(_) | Self::Config(_) => true,
        }
    }

    /// Message suitable for showing in the calendar view.
    pub fn to_safe_string(&self) -> String {
        if self.is_pii_safe() {
            self.to_string()
        } else {
            match self {
                Self::Io(_) => "Could not read a local file".to_string(),
                Self::Json(_) => "Could not read the configuration file".to_string(),
                _ => self.to_string(),
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(AppError::invalid_period("2024-13").is_invalid_period());
        assert!(!AppError::invalid_period("2024-13").is_fetch());
        assert!(AppError::fetch("HTTP 401").is_fetch());
    }

    #[test]
    fn test_safe_string_hides_io_details() {
        let err = AppError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "/home/someone/.config/planman/config.json",
        ));
        assert!(!err.to_safe_string().contains("/home/someone"));
    }

    #[test]
    fn test_safe_string_keeps_fetch_cause() {
        let err = AppError::fetch("calendar api returned HTTP 503");
        assert_eq!(
            err.to_safe_string(),
            "Could not retrieve events: calendar api returned HTTP 503"
        );
    }
}
