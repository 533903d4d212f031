use crate::models::{
    error::{ApiFault, Error},
    route::Route,
    table::Table,
};
use crate::services::{assembler, navigator, registry::Registry};
use chrono::NaiveDateTime;
use log::debug;
use serde::Deserialize;
use serde_json::Value;

// CONSTANTS
const BASE_URL: &str = "https://apidatos.ree.es";
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Response locale segment of the REData URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// English
    #[default]
    En,
    /// Spanish
    Es,
}

impl Locale {
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

/// Time aggregation step for the requested series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeTrunc {
    Hour,
    #[default]
    Day,
    Month,
    Year,
}

impl TimeTrunc {
    /// Returns the token used in the `time_trunc` query parameter.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl std::fmt::Display for TimeTrunc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for TimeTrunc {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(Error::Config(format!("Invalid time truncation: {s}"))),
        }
    }
}

/// Geographical aggregation scope, the `geo_trunc` query parameter.
/// The API currently documents a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeoTrunc {
    #[default]
    ElectricSystem,
}

impl GeoTrunc {
    pub const fn code(self) -> &'static str {
        match self {
            Self::ElectricSystem => "electric_system",
        }
    }
}

/// Electrical systems recognized by the `geo_limit` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoLimit {
    /// Peninsular Spain
    Peninsular,
    /// Canary Islands
    Canarias,
    /// Balearic Islands
    Baleares,
    /// Ceuta
    Ceuta,
    /// Melilla
    Melilla,
    /// Autonomous communities
    Ccaa,
}

impl GeoLimit {
    /// Returns the token used in the `geo_limit` query parameter.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Peninsular => "peninsular",
            Self::Canarias => "canarias",
            Self::Baleares => "baleares",
            Self::Ceuta => "ceuta",
            Self::Melilla => "melilla",
            Self::Ccaa => "ccaa",
        }
    }
}

impl std::fmt::Display for GeoLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for GeoLimit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "peninsular" => Ok(Self::Peninsular),
            "canarias" => Ok(Self::Canarias),
            "baleares" => Ok(Self::Baleares),
            "ceuta" => Ok(Self::Ceuta),
            "melilla" => Ok(Self::Melilla),
            "ccaa" => Ok(Self::Ccaa),
            _ => Err(Error::Config(format!("Invalid geo limit: {s}"))),
        }
    }
}

// QUERY PARAMETERS
/// The recognized query parameters of a widget request.
///
/// `start_date`, `end_date` and `time_trunc` are always sent; the three
/// geo parameters are omitted from the query string entirely while unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
    time_trunc: TimeTrunc,
    geo_trunc: Option<GeoTrunc>,
    geo_limit: Option<GeoLimit>,
    geo_ids: Option<u32>,
}

impl QueryParams {
    pub const fn new(
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
        time_trunc: TimeTrunc,
    ) -> Self {
        Self {
            start_date,
            end_date,
            time_trunc,
            geo_trunc: None,
            geo_limit: None,
            geo_ids: None,
        }
    }

    /// Sets the geographical aggregation scope.
    pub const fn geo_trunc(mut self, geo_trunc: GeoTrunc) -> Self {
        self.geo_trunc = Some(geo_trunc);
        self
    }

    /// Restricts the query to one electrical system.
    pub const fn geo_limit(mut self, geo_limit: GeoLimit) -> Self {
        self.geo_limit = Some(geo_limit);
        self
    }

    /// Restricts the query to one geographical id.
    pub const fn geo_ids(mut self, geo_ids: u32) -> Self {
        self.geo_ids = Some(geo_ids);
        self
    }

    /// Serializes to query-string pairs, skipping unset optionals.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("start_date", self.start_date.format(DATE_FORMAT).to_string()),
            ("end_date", self.end_date.format(DATE_FORMAT).to_string()),
            ("time_trunc", self.time_trunc.code().to_string()),
        ];
        if let Some(geo_trunc) = self.geo_trunc {
            pairs.push(("geo_trunc", geo_trunc.code().to_string()));
        }
        if let Some(geo_limit) = self.geo_limit {
            pairs.push(("geo_limit", geo_limit.code().to_string()));
        }
        if let Some(geo_ids) = self.geo_ids {
            pairs.push(("geo_ids", geo_ids.to_string()));
        }
        pairs
    }
}

// API CONFIGURATION
/// Configuration for the REData API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: String,
    locale: Locale,
}

impl ApiConfig {
    /// Creates a builder for constructing an `ApiConfig`.
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::default()
    }

    /// Returns the locale configured for this client.
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Constructs the full URL for a widget path like
    /// `demanda/evolucion`.
    pub fn widget_url(&self, path: &str) -> String {
        format!("{}/{}/datos/{path}", self.base_url, self.locale.code())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfigBuilder::default().build()
    }
}

// API CONFIGURATION BUILDER
/// Builder for constructing an `ApiConfig` with custom settings.
#[derive(Debug, Default)]
pub struct ApiConfigBuilder {
    base_url: Option<String>,
    locale: Option<Locale>,
}

impl ApiConfigBuilder {
    /// Sets a custom base URL (primarily for testing).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the response locale.
    pub const fn locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Builds the `ApiConfig`.
    pub fn build(self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.unwrap_or_else(|| BASE_URL.to_string()),
            locale: self.locale.unwrap_or_default(),
        }
    }
}

// ERROR ENVELOPE
#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    errors: Vec<ApiErrorBody>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    title: String,
    detail: String,
}

impl ErrorEnvelope {
    /// Every reported error is carried, not just the first.
    fn into_error(self) -> Error {
        Error::Api(
            self.errors
                .into_iter()
                .map(|e| ApiFault {
                    title: e.title,
                    detail: e.detail,
                })
                .collect(),
        )
    }
}

// ACTIVE STREAM
#[derive(Debug, Clone)]
struct Stream {
    category: String,
    widget: String,
    url: String,
    route: Route,
}

// REDATA CLIENT
/// Blocking HTTP client for the REData API.
///
/// A client owns one active (category, widget) stream at a time; the URL
/// and extraction route are always replaced together by `switch_stream`.
/// Each query is a fresh request, nothing is cached between calls.
#[derive(Debug)]
pub struct ReDataClient {
    http: reqwest::blocking::Client,
    config: ApiConfig,
    registry: Registry,
    stream: Stream,
}

impl ReDataClient {
    /// Creates a client for the given widget with default configuration
    /// and the built-in widget catalogue.
    pub fn new(category: &str, widget: &str) -> Result<Self, Error> {
        Self::with_config(ApiConfig::default(), category, widget)
    }

    /// Creates a client with the specified configuration.
    pub fn with_config(config: ApiConfig, category: &str, widget: &str) -> Result<Self, Error> {
        Self::with_registry(config, Registry::default(), category, widget)
    }

    /// Creates a client with a custom widget registry.
    pub fn with_registry(
        config: ApiConfig,
        registry: Registry,
        category: &str,
        widget: &str,
    ) -> Result<Self, Error> {
        let http = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {e}")))?;

        let stream = Self::resolve(&config, &registry, category, widget)?;
        Ok(Self {
            http,
            config,
            registry,
            stream,
        })
    }

    /// Returns a reference to the client's configuration.
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The category of the active stream.
    pub fn category(&self) -> &str {
        &self.stream.category
    }

    /// The widget of the active stream.
    pub fn widget(&self) -> &str {
        &self.stream.widget
    }

    /// The full request URL of the active stream.
    pub fn url(&self) -> &str {
        &self.stream.url
    }

    /// Switches to a different (category, widget) stream, replacing URL
    /// and route together. The active stream is untouched when the pair is
    /// not registered.
    pub fn switch_stream(&mut self, category: &str, widget: &str) -> Result<(), Error> {
        self.stream = Self::resolve(&self.config, &self.registry, category, widget)?;
        Ok(())
    }

    /// Queries the active widget and assembles the response into a table.
    pub fn query(&self, params: &QueryParams) -> Result<Table, Error> {
        debug!("GET {} {:?}", self.stream.url, params.to_query());
        let response = self
            .http
            .get(&self.stream.url)
            .query(&params.to_query())
            .send()
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            // Error envelopes arrive with non-2xx statuses too; prefer
            // their title/detail over a bare status line.
            if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
                return Err(envelope.into_error());
            }
            return Err(error_for_status(status, &body));
        }

        let json: Value = response
            .json()
            .map_err(|e| Error::Transport(format!("Failed to parse response: {e}")))?;
        self.parse_response(&json)
    }

    /// Converts an already-fetched response body into a table: checks the
    /// error envelope, then navigates the active route and assembles the
    /// extracted series.
    pub fn parse_response(&self, json: &Value) -> Result<Table, Error> {
        if let Some(errors) = json.get("errors") {
            let envelope = ErrorEnvelope {
                errors: serde_json::from_value(errors.clone())
                    .map_err(|e| Error::Transport(format!("Unrecognized error envelope: {e}")))?,
            };
            return Err(envelope.into_error());
        }

        let terminals = navigator::navigate(json, &self.stream.route)?;
        debug!(
            "extracted {} terminal object(s) from {}/{}",
            terminals.len(),
            self.stream.category,
            self.stream.widget
        );
        assembler::assemble(&terminals)
    }

    fn resolve(
        config: &ApiConfig,
        registry: &Registry,
        category: &str,
        widget: &str,
    ) -> Result<Stream, Error> {
        let spec = registry.lookup(category, widget)?;
        Ok(Stream {
            category: category.to_string(),
            widget: widget.to_string(),
            url: config.widget_url(&spec.path),
            route: spec.route.clone(),
        })
    }
}

/// Converts a reqwest error into an appropriate `Error`.
fn classify_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Transport(format!("Request timeout: {error}"))
    } else if error.is_request() {
        Error::Transport(format!("Request error: {error}"))
    } else {
        Error::Transport(format!("Network error: {error}"))
    }
}

/// Creates an error based on HTTP status code.
fn error_for_status(status: reqwest::StatusCode, body: &str) -> Error {
    match status.as_u16() {
        429 => Error::RateLimited,
        400..=499 => Error::Transport(format!("Client error {status}: {body}")),
        500..=599 => Error::Transport(format!("Server error {status}: {body}")),
        _ => Error::Transport(format!("Unexpected status {status}: {body}")),
    }
}

// CONVENIENCE FUNCTIONS
/// Queries a widget once using default configuration.
pub fn query_widget(category: &str, widget: &str, params: &QueryParams) -> Result<Table, Error> {
    ReDataClient::new(category, widget)?.query(params)
}
