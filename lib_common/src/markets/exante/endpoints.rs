//! # EXANTE Endpoint Descriptors
//!
//! Every resource the client reads is described by an [`Endpoint`]: the
//! relative path (parameter segments percent-encoded), the query pairs and
//! the rule for locating the object that carries the requested field.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::error::ExanteError;

/// Fields served by `/symbols/{symbol}/specification` instead of `/symbols/{symbol}`.
pub const SYMBOL_SPEC_FIELDS: [&str; 5] =
    ["leverage", "lotSize", "contractMultiplier", "priceUnit", "units"];

/// Field returned by the cross-rate lookup.
pub const CROSS_RATE_FIELD: &str = "rate";
/// OHLC field used as the mid price.
pub const MID_PRICE_FIELD: &str = "close";
/// OHLC bar duration, in seconds, used as the mid price.
pub const MID_PRICE_DURATION_SECS: u64 = 60;

/// Characters `encodeURIComponent` leaves alone: alphanumerics and `-_.!~*'()`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes one path segment so reserved characters such as `/` stay inside it.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, COMPONENT).to_string()
}

/// Encodes a path parameter, refusing values that would not stay one segment.
///
/// `.` and `..` are dot segments that URL resolution removes, and an empty
/// value collapses into the parent resource.
fn param(value: &str) -> Result<String, ExanteError> {
    match value {
        "" | "." | ".." => Err(ExanteError::InvalidUrl(format!(
            "path parameter {:?} does not name a resource",
            value
        ))),
        _ => Ok(encode_segment(value)),
    }
}

/// True when `field` lives on the specification endpoint.
pub fn is_spec_field(field: &str) -> bool {
    SYMBOL_SPEC_FIELDS.contains(&field)
}

/// How to find the object holding the field inside a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {
    /// The body itself is the object.
    Object,
    /// The body is an array; use its first element.
    FirstElement,
}

/// One readable resource of the market-data API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `crossrates/{from}/{to}`
    CrossRate { from: &'a str, to: &'a str },
    /// `groups/{group}`
    Group { group: &'a str },
    /// `groups/{group}/nearest`
    GroupNearest { group: &'a str },
    /// `ohlc/{symbol}/{duration}?size=1`
    Ohlc { symbol: &'a str, duration_secs: u64 },
    /// `symbols/{symbol}`
    Symbol { symbol: &'a str },
    /// `symbols/{symbol}/specification`
    SymbolSpecification { symbol: &'a str },
}

impl<'a> Endpoint<'a> {
    /// Picks the symbol endpoint that serves `field`.
    pub fn for_symbol_field(symbol: &'a str, field: &str) -> Self {
        if is_spec_field(field) {
            Endpoint::SymbolSpecification { symbol }
        } else {
            Endpoint::Symbol { symbol }
        }
    }

    /// Relative path below the API prefix, with parameter segments encoded.
    ///
    /// Fails with [`ExanteError::InvalidUrl`] when a parameter is empty, `.` or `..`.
    pub fn path(&self) -> Result<String, ExanteError> {
        let path = match self {
            Endpoint::CrossRate { from, to } => {
                format!("crossrates/{}/{}", param(from)?, param(to)?)
            }
            Endpoint::Group { group } => format!("groups/{}", param(group)?),
            Endpoint::GroupNearest { group } => format!("groups/{}/nearest", param(group)?),
            Endpoint::Ohlc { symbol, duration_secs } => {
                format!("ohlc/{}/{}", param(symbol)?, duration_secs)
            }
            Endpoint::Symbol { symbol } => format!("symbols/{}", param(symbol)?),
            Endpoint::SymbolSpecification { symbol } => {
                format!("symbols/{}/specification", param(symbol)?)
            }
        };
        Ok(path)
    }

    /// Query pairs sent with the request.
    pub fn query(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            // Only the latest bar is ever read.
            Endpoint::Ohlc { .. } => &[("size", "1")],
            _ => &[],
        }
    }

    /// Where the requested field is found in the response.
    pub fn extract(&self) -> Extract {
        match self {
            Endpoint::Ohlc { .. } => Extract::FirstElement,
            _ => Extract::Object,
        }
    }
}
