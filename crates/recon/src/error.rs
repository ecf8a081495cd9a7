use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ReconError {
    /// A selection references a provider id that is not registered.
    UnknownProvider(String),
    /// Two providers were registered under the same id.
    DuplicateProvider(String),
    /// A provider's search or detail call failed.
    Fetch {
        provider: String,
        external_id: Option<String>,
        message: String,
    },
    /// Query-based lookup found no hit on any provider.
    NoSearchResults(String),
    /// Best-effort load where every selected athlete failed.
    NothingLoaded { failures: usize },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (unknown provider section, bad value, etc.).
    ConfigValidation(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl ReconError {
    pub fn fetch(provider: &str, external_id: Option<&str>, message: impl Into<String>) -> Self {
        Self::Fetch {
            provider: provider.to_string(),
            external_id: external_id.map(str::to_string),
            message: message.into(),
        }
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProvider(id) => write!(f, "provider '{id}' not found"),
            Self::DuplicateProvider(id) => write!(f, "provider '{id}' registered twice"),
            Self::Fetch { provider, external_id: Some(id), message } => {
                write!(f, "provider '{provider}', athlete '{id}': {message}")
            }
            Self::Fetch { provider, external_id: None, message } => {
                write!(f, "provider '{provider}': {message}")
            }
            Self::NoSearchResults(query) => write!(f, "no provider returned results for \"{query}\""),
            Self::NothingLoaded { failures } => {
                write!(f, "all {failures} athlete load(s) failed")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
