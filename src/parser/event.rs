//! Tokenizer for `[storagestudy]` trace lines.
//!
//! Lines look like `[storagestudy] <event> <args>`. Anything that does not
//! carry the tag, or whose event is not one we know, is unrecognized and
//! dropped. A recognized event with an undecodable payload is an error: it
//! means the trace is corrupt.

use crate::utils::config::{StudyConfig, TRACE_TAG};
use crate::utils::error::ParseError;

/// One decoded trace line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// `new-ip <ip>`
    NewIp(u64),

    /// `ip-symbol <ip> <raw symbol>`
    IpSymbol { ip: u64, symbol: String },

    /// `era <name>`
    EraMarker(String),

    /// `<kind>[(<weight>)] <json chain>`, chain already stripped
    OperationSample {
        kind: usize,
        weight: u64,
        chain: Vec<u64>,
    },

    Unrecognized,
}

/// Splits tagged lines into events
///
/// **Public** - holds the operation names and chain stripping counts
#[derive(Debug, Clone)]
pub struct EventParser {
    operations: Vec<String>,
    leading_frames: usize,
    trailing_frames: usize,
}

impl EventParser {
    pub fn new(config: &StudyConfig) -> Self {
        Self {
            operations: config.operations.iter().map(|op| op.name.clone()).collect(),
            leading_frames: config.leading_frames,
            trailing_frames: config.trailing_frames,
        }
    }

    /// Decode one line of input
    ///
    /// **Public** - main entry point for parsing
    ///
    /// # Errors
    /// * `ParseError::InvalidJson` - recognized event with a bad JSON payload
    /// * `ParseError::InvalidWeight` - operation weight is not an integer
    /// * `ParseError::InvalidFormat` - `ip-symbol` args without `<ip> <symbol>`
    pub fn parse_line(&self, line: &str) -> Result<TraceEvent, ParseError> {
        let Some((event, args)) = split_tagged(line) else {
            return Ok(TraceEvent::Unrecognized);
        };

        match event {
            "new-ip" => Ok(TraceEvent::NewIp(decode_json(event, args)?)),
            "ip-symbol" => parse_ip_symbol(args),
            "era" => Ok(TraceEvent::EraMarker(args.to_string())),
            _ => self.parse_operation(event, args),
        }
    }

    fn parse_operation(&self, event: &str, args: &str) -> Result<TraceEvent, ParseError> {
        let (name, detail) = split_detail(event);

        let Some(kind) = self.operations.iter().position(|op| op == name) else {
            return Ok(TraceEvent::Unrecognized);
        };

        let weight = match detail {
            None | Some("") => 1,
            Some(detail) => detail.trim().parse::<u64>().map_err(|_| ParseError::InvalidWeight {
                event: event.to_string(),
                detail: detail.to_string(),
            })?,
        };

        let chain: Vec<u64> = decode_json(name, args)?;

        Ok(TraceEvent::OperationSample {
            kind,
            weight,
            chain: self.strip_chain(chain),
        })
    }

    /// Drop scaffolding frames from both ends of a chain
    ///
    /// Chains too short to keep anything come back empty.
    pub fn strip_chain(&self, mut chain: Vec<u64>) -> Vec<u64> {
        let dropped = self.leading_frames.saturating_add(self.trailing_frames);
        if chain.len() <= dropped {
            return Vec::new();
        }
        chain.truncate(chain.len() - self.trailing_frames);
        chain.drain(..self.leading_frames);
        chain
    }
}

/// Split `[storagestudy] <event> <args>` into event and args
///
/// The event is everything up to the first whitespace, which must be a
/// single space.
fn split_tagged(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix(TRACE_TAG)?.strip_prefix(' ')?;
    let end = rest.find(char::is_whitespace)?;
    if end == 0 {
        return None;
    }
    let (event, tail) = rest.split_at(end);
    let args = tail.strip_prefix(' ')?;
    Some((event, args))
}

/// Split `name(detail)` into its parts; events without a trailing
/// parenthesized detail come back whole
fn split_detail(event: &str) -> (&str, Option<&str>) {
    let Some(body) = event.strip_suffix(')') else {
        return (event, None);
    };
    match body.find('(') {
        Some(open) => (&body[..open], Some(&body[open + 1..])),
        None => (event, None),
    }
}

fn parse_ip_symbol(args: &str) -> Result<TraceEvent, ParseError> {
    let malformed = || ParseError::InvalidFormat(format!("ip-symbol expects `<ip> <symbol>`, got `{}`", args));

    let (ip_text, symbol) = args.split_once(' ').ok_or_else(malformed)?;
    if ip_text.is_empty() || !ip_text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let ip = decode_json("ip-symbol", ip_text)?;

    Ok(TraceEvent::IpSymbol {
        ip,
        symbol: symbol.to_string(),
    })
}

fn decode_json<T: serde::de::DeserializeOwned>(event: &str, args: &str) -> Result<T, ParseError> {
    serde_json::from_str(args).map_err(|source| ParseError::InvalidJson {
        event: event.to_string(),
        source,
    })
}
