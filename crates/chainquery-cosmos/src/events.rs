//! Transaction result payload and sender/fee extraction.
//!
//! Tendermint reports per-transaction events in two shapes:
//! - `tx_result.log`: a JSON string holding an array of log entries, each
//!   with `events: [{type, attributes: [{key, value}]}]` in plain text.
//! - `tx_result.events`: a flat event list whose attribute keys and values
//!   are base64-encoded (Tendermint ≤ 0.34).
//!
//! Extraction never fails: a missing sender is `""`, a missing fee is `"0"`.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::Deserialize;
use serde_json::Value;

/// Standard alphabet, padding optional, stray trailing bits tolerated.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// The `tx_result` object of a `/tx` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TxResult {
    #[serde(default)]
    pub log: Option<String>,
    #[serde(default)]
    pub events: Option<Vec<Event>>,
    /// Decimal string on Tendermint, a number on some forks.
    #[serde(default)]
    pub gas_used: Option<Value>,
    #[serde(default)]
    pub gas_wanted: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Event {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub attributes: Option<Vec<Attribute>>,
}

impl Event {
    pub fn attributes(&self) -> &[Attribute] {
        self.attributes.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attribute {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LogEntry {
    #[serde(default)]
    events: Option<Vec<Event>>,
}

/// Decode a base64 string to UTF-8 text. `None` when either step fails.
pub fn decode_base64(encoded: &str) -> Option<String> {
    let bytes = LENIENT.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

/// How a flat-event attribute key matched the wanted name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyMatch {
    /// The key was base64 and decoded to the name.
    Encoded,
    /// The key was the name itself (CometBFT ≥ 0.37 emits plain text).
    Plain,
}

fn match_key(attr: &Attribute, name: &str) -> Option<KeyMatch> {
    let key = attr.key.as_deref()?;
    if decode_base64(key).as_deref() == Some(name) {
        Some(KeyMatch::Encoded)
    } else if key == name {
        Some(KeyMatch::Plain)
    } else {
        None
    }
}

/// The address that signed the transaction, or `""` when none is reported.
///
/// The log is consulted first: the first `message` event of the first log
/// entry, its `sender` attribute, verbatim. Then every `message` event of
/// the flat list in order; the first `sender` attribute with a value wins
/// and is returned decoded (or as-is if it does not decode).
pub fn extract_sender(tx_result: &TxResult) -> String {
    if let Some(sender) = tx_result.log.as_deref().and_then(sender_from_log) {
        return sender;
    }

    for event in tx_result.events.iter().flatten() {
        if event.kind != "message" {
            continue;
        }
        let Some((attr, matched)) = event
            .attributes()
            .iter()
            .find_map(|a| match_key(a, "sender").map(|m| (a, m)))
        else {
            continue;
        };
        let Some(value) = attr.value.as_deref().filter(|v| !v.is_empty()) else {
            continue;
        };
        return match matched {
            KeyMatch::Plain => value.to_string(),
            KeyMatch::Encoded => decode_base64(value).unwrap_or_else(|| value.to_string()),
        };
    }

    String::new()
}

fn sender_from_log(log: &str) -> Option<String> {
    if log.is_empty() {
        return None;
    }
    let entries: Vec<LogEntry> = match serde_json::from_str(log) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse transaction log");
            return None;
        }
    };

    entries
        .first()?
        .events
        .as_deref()?
        .iter()
        .find(|e| e.kind == "message")?
        .attributes()
        .iter()
        .find(|a| a.key.as_deref() == Some("sender"))?
        .value
        .clone()
        .filter(|v| !v.is_empty())
}

/// The fee paid with denomination (e.g. `"5000uatom"`), or `"0"`.
///
/// Only the first `fee` attribute found across `tx` events counts. An absent
/// value, an undecodable value or an empty decoded value all give `"0"`.
pub fn extract_fee(events: Option<&[Event]>) -> String {
    const NONE: &str = "0";

    let found = events.unwrap_or_default().iter().find_map(|event| {
        if event.kind != "tx" {
            return None;
        }
        event
            .attributes()
            .iter()
            .find_map(|a| match_key(a, "fee").map(|m| (a, m)))
    });

    let Some((attr, matched)) = found else {
        return NONE.to_string();
    };
    let Some(value) = attr.value.as_deref().filter(|v| !v.is_empty()) else {
        return NONE.to_string();
    };
    let fee = match matched {
        KeyMatch::Plain => Some(value.to_string()),
        KeyMatch::Encoded => decode_base64(value),
    };
    fee.filter(|f| !f.is_empty())
        .unwrap_or_else(|| NONE.to_string())
}

/// Render a gas quantity (string or number) as a decimal string; `"0"` when absent.
pub fn gas_string(quantity: Option<&Value>) -> String {
    match quantity {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "0".to_string(),
    }
}
