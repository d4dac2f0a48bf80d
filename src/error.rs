use thiserror::Error;

/// Errors raised while turning share links into proxy records and YAML.
///
/// Any of these aborts the whole batch: there is no partial result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Unsupported link: {line}")]
    UnsupportedScheme { line: String },

    #[error("Invalid {scheme} link: {reason}")]
    MalformedUri {
        scheme: &'static str,
        reason: String,
    },

    #[error("Unknown proxy type: {0}")]
    UnknownProxyKind(String),

    #[error("No links to convert")]
    EmptyInput,

    #[error("Invalid proxy records: {0}")]
    InvalidRecords(String),
}

impl ConvertError {
    pub(crate) fn malformed(scheme: &'static str, reason: impl Into<String>) -> Self {
        ConvertError::MalformedUri {
            scheme,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors raised while listing or loading config templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} while fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid template index: {0}")]
    Index(#[from] serde_json::Error),

    #[error("Invalid template source URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Empty template list")]
    EmptyCatalog,

    #[error("Template not found: {0}")]
    UnknownTemplate(String),
}
