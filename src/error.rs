use thiserror::Error;

/// Errors raised while talking to the price API or handling attachments.
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("server responded with {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },

    #[error("request rejected: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unsupported file: {0}")]
    UnsupportedFile(String),

    #[error("file selection cancelled")]
    PickCancelled,

    #[error(transparent)]
    Form(#[from] FormError),
}

impl PriceError {
    /// Message the server attached to the failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            PriceError::Server { message, .. } | PriceError::Rejected { message } => message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// Resolves the text shown to the user: the server's own message first,
    /// then the generic message carried by the failure, then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        if let Some(message) = self.server_message() {
            return message.to_string();
        }
        match self {
            PriceError::Server { .. } | PriceError::Rejected { .. } => fallback.to_string(),
            other => {
                let generic = other.to_string();
                if generic.trim().is_empty() {
                    fallback.to_string()
                } else {
                    generic
                }
            }
        }
    }
}

/// Client-side validation failures of the add/edit form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("please select an item")]
    NoSelection,

    #[error("please enter a price")]
    EmptyPrice,

    #[error("item {0} is not in the selection list")]
    UnknownItem(i64),

    #[error("material files can only be attached to pujas")]
    MaterialUnsupported,

    #[error("the form is not open")]
    NotOpen,
}

pub type Result<T> = std::result::Result<T, PriceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_takes_priority() {
        let err = PriceError::Server {
            status: 422,
            message: Some("Invalid price".into()),
        };
        assert_eq!(err.user_message("Failed to add service price"), "Invalid price");
    }

    #[test]
    fn blank_server_message_falls_back() {
        let err = PriceError::Rejected {
            message: Some("   ".into()),
        };
        assert_eq!(err.server_message(), None);
        assert_eq!(err.user_message("Failed to add puja price"), "Failed to add puja price");

        let err = PriceError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Failed to fetch service prices"), "Failed to fetch service prices");
    }

    #[test]
    fn generic_message_used_without_server_message() {
        let err = PriceError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.user_message("fallback"), "file I/O error: gone");
    }
}
