//! # EXANTE Market-Data Client
//!
//! Read-only client for the market-data API. Each lookup issues one `GET`
//! through the shared [`ApiClient`], then pulls a single field out of the
//! parsed body. Nothing is cached and nothing is retried.

use serde_json::Value;
use tracing::debug;

use super::endpoints::{
    Endpoint, Extract, CROSS_RATE_FIELD, MID_PRICE_DURATION_SECS, MID_PRICE_FIELD,
};
use super::error::ExanteError;
use super::ohlc::OhlcBar;
use crate::configs::config_exante::{ExanteConfig, MissingFieldPolicy};
use crate::retrieve::ky_http::ApiClient;

/// Blocking client for the EXANTE market-data API.
#[derive(Debug, Clone)]
pub struct ExanteClient {
    /// HTTP layer bound to `host + api_prefix`, carrying the bearer token.
    api: ApiClient,
    /// What field lookups return when the key is absent.
    missing_field: MissingFieldPolicy,
}

impl ExanteClient {
    /// Builds a client from an explicit configuration.
    pub fn new(config: &ExanteConfig) -> Result<Self, ExanteError> {
        let base_url = config.base_url()?;
        let api = ApiClient::new(base_url.as_str(), Some(config.token.as_str()))?;
        Ok(Self {
            api,
            missing_field: config.missing_field,
        })
    }

    /// Builds a client from `EXANTE_*` environment variables (and `.env`).
    pub fn from_env() -> Result<Self, ExanteError> {
        Self::new(&ExanteConfig::from_env()?)
    }

    /// The policy applied to absent fields.
    pub fn missing_field_policy(&self) -> MissingFieldPolicy {
        self.missing_field
    }

    /// Conversion rate between two currencies (`rate` of `crossrates/{from}/{to}`).
    pub fn cross_rate(&self, from: &str, to: &str) -> Result<Value, ExanteError> {
        self.fetch_field(&Endpoint::CrossRate { from, to }, CROSS_RATE_FIELD)
    }

    /// A property of a symbol group, e.g. `group_field("Si", "name")`.
    pub fn group_field(&self, group: &str, field: &str) -> Result<Value, ExanteError> {
        self.fetch_field(&Endpoint::Group { group }, field)
    }

    /// A property of the group member with the nearest expiration.
    pub fn nearest_group_field(&self, group: &str, field: &str) -> Result<Value, ExanteError> {
        self.fetch_field(&Endpoint::GroupNearest { group }, field)
    }

    /// A field of the latest OHLC bar, normally `open`, `high`, `low`, `close` or `timestamp`.
    pub fn ohlc_field(
        &self,
        symbol: &str,
        duration_secs: u64,
        field: &str,
    ) -> Result<Value, ExanteError> {
        self.fetch_field(&Endpoint::Ohlc { symbol, duration_secs }, field)
    }

    /// A property of a symbol. Specification fields (`leverage`, `lotSize`,
    /// `contractMultiplier`, `priceUnit`, `units`) are read from the
    /// specification resource.
    pub fn symbol_field(&self, symbol: &str, field: &str) -> Result<Value, ExanteError> {
        self.fetch_field(&Endpoint::for_symbol_field(symbol, field), field)
    }

    /// Close of the latest one-minute bar.
    pub fn mid_price(&self, symbol: &str) -> Result<Value, ExanteError> {
        self.ohlc_field(symbol, MID_PRICE_DURATION_SECS, MID_PRICE_FIELD)
    }

    /// The latest OHLC bar as a typed value.
    pub fn ohlc_bar(&self, symbol: &str, duration_secs: u64) -> Result<OhlcBar, ExanteError> {
        let endpoint = Endpoint::Ohlc { symbol, duration_secs };
        let (url, body) = self.fetch_with_url(&endpoint)?;
        let first = first_element(&url, body)?
            .ok_or_else(|| ExanteError::EmptyResult { url: url.clone() })?;
        let raw = first.to_string();
        serde_json::from_value(first).map_err(|source| ExanteError::Parse {
            url,
            body: raw,
            source,
        })
    }

    /// The parsed body of any endpoint, e.g. a whole symbol description.
    pub fn fetch(&self, endpoint: &Endpoint<'_>) -> Result<Value, ExanteError> {
        self.fetch_with_url(endpoint).map(|(_, body)| body)
    }

    fn fetch_with_url(&self, endpoint: &Endpoint<'_>) -> Result<(String, Value), ExanteError> {
        let path = endpoint.path()?;
        let response = self.api.get::<Value>(&path, endpoint.query())?;
        let url = response.url.to_string();

        if !response.success {
            return Err(ExanteError::Status {
                status: response.status,
                url,
                body: response.error_body.unwrap_or_default(),
            });
        }

        // A 2xx response always carries decoded data.
        let body = response.data.unwrap_or(Value::Null);
        Ok((url, body))
    }

    fn fetch_field(&self, endpoint: &Endpoint<'_>, field: &str) -> Result<Value, ExanteError> {
        let (url, body) = self.fetch_with_url(endpoint)?;

        let object = match endpoint.extract() {
            Extract::Object => body,
            Extract::FirstElement => match first_element(&url, body)? {
                Some(first) => first,
                None => {
                    let err = ExanteError::EmptyResult { url: url.clone() };
                    return self.absent(&url, field, err);
                }
            },
        };

        match object.get(field) {
            Some(value) => Ok(value.clone()),
            None => {
                let err = ExanteError::FieldNotFound {
                    field: field.to_string(),
                    url: url.clone(),
                };
                self.absent(&url, field, err)
            }
        }
    }

    /// Applies the missing-field policy.
    fn absent(&self, url: &str, field: &str, err: ExanteError) -> Result<Value, ExanteError> {
        match self.missing_field {
            MissingFieldPolicy::Empty => {
                debug!(%url, field, "no value in response, returning empty");
                Ok(Value::Null)
            }
            MissingFieldPolicy::Error => Err(err),
        }
    }
}

/// First element of an array body; `None` for an empty array.
fn first_element(url: &str, body: Value) -> Result<Option<Value>, ExanteError> {
    match body {
        Value::Array(items) => Ok(items.into_iter().next()),
        _ => Err(ExanteError::UnexpectedShape {
            url: url.to_string(),
            expected: "a JSON array",
        }),
    }
}
