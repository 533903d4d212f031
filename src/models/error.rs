/// A single error object from the REData response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFault {
    pub title: String,
    pub detail: String,
}

impl std::fmt::Display for ApiFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.detail)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("widget '{widget}' is not available for category '{category}'")]
    UnsupportedWidget { category: String, widget: String },

    #[error("API error: {}", format_faults(.0))]
    Api(Vec<ApiFault>),

    #[error("navigation failed at route step {step}: key '{key}' not found")]
    MissingKey { step: usize, key: String },

    #[error("navigation failed at route step {step}: expected object or list, found {found}")]
    UnexpectedShape { step: usize, found: &'static str },

    #[error("malformed series: {0}")]
    MalformedSeries(String),

    #[error("duplicate column '{0}' in response")]
    DuplicateColumn(String),

    #[error("rate limited")]
    RateLimited,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),
}

fn format_faults(faults: &[ApiFault]) -> String {
    faults
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
