//! Decision service response parsing into typed decisions.
//!
//! The service answers in free text. This module turns that text into a
//! [`Decision`] or a [`TradeAction`] from `wayfarer-types`. Malformed
//! answers never fail: turn decisions fall back to `Rest` and trade
//! decisions fall back to `Reject`.

use tracing::warn;
use wayfarer_types::{Decision, Direction, ProposedOffer, TradeAction};

use crate::error::RunnerError;

const COUNTER_PREFIX: &str = "COUNTER OFFER";

/// Parse a turn decision such as `MOVE NORTHEAST`, `rest` or `TRADE`.
///
/// Anything unrecognised, including a `MOVE` with a bad direction, is
/// treated as `Rest`.
pub fn parse_decision(raw: &str) -> Decision {
    let mut tokens = raw.split_whitespace();
    let verb = tokens.next().map(str::to_ascii_uppercase);
    let argument = tokens.next();
    let extra = tokens.next();

    let decision = match (verb.as_deref(), argument, extra) {
        (Some("MOVE"), Some(direction), None) => Direction::from_token(direction).map(Decision::Move),
        (Some("REST"), None, None) => Some(Decision::Rest),
        (Some("TRADE"), None, None) => Some(Decision::Trade),
        _ => None,
    };

    decision.unwrap_or_else(|| {
        warn!(raw, "Unrecognised decision, resting");
        Decision::Rest
    })
}

/// Parse a trade answer: `ACCEPT`, `REJECT`, or `COUNTER OFFER {json}`.
///
/// A counter whose JSON cannot be found or decoded becomes `Reject`.
/// Amounts are not checked here; the negotiation validates them against
/// the wallet and the trader.
pub fn parse_trade_action(raw: &str) -> TradeAction {
    match try_parse_trade_action(raw) {
        Ok(action) => action,
        Err(e) => {
            warn!(error = %e, raw, "Unparseable trade action, rejecting");
            TradeAction::Reject
        }
    }
}

fn try_parse_trade_action(raw: &str) -> Result<TradeAction, RunnerError> {
    let text = raw.trim();
    if text.eq_ignore_ascii_case("ACCEPT") {
        return Ok(TradeAction::Accept);
    }
    if text.eq_ignore_ascii_case("REJECT") {
        return Ok(TradeAction::Reject);
    }

    let payload = strip_prefix_ignore_case(text, COUNTER_PREFIX)
        .ok_or_else(|| RunnerError::Service(format!("unknown trade action: {text}")))?;
    let json = extract_json_object(payload)
        .ok_or_else(|| RunnerError::Service("counter offer carries no JSON object".to_owned()))?;
    let offer: ProposedOffer = serde_json::from_str(json)?;
    Ok(TradeAction::Counter(offer))
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        text.get(prefix.len()..)
    } else {
        None
    }
}

/// The text from the first `{` to the last `}`, inclusive.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    text.get(start..=end)
}
