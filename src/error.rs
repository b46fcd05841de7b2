/// Application-level errors
///
/// The taxonomy mirrors how callers are expected to react: `InvalidInput`
/// and `Auth` are caller mistakes rejected before any write, `NotFound` is
/// reserved for lookups of entities the caller named explicitly, `Store`
/// failures abort the current operation with no partial commit visible, and
/// oracle trouble (`Oracle`, `HttpClient`) is recovered locally by the
/// ranking layer and should rarely escape it.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Prediction service error: {0}")]
    Oracle(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_and_auth_render_distinctly() {
        let validation = AppError::InvalidInput("rating must be between 1 and 10".to_string());
        let auth = AppError::Auth("wrong password".to_string());

        assert!(validation.to_string().starts_with("Invalid input"));
        assert!(auth.to_string().starts_with("Authentication failed"));
    }
}
