//! Pure text classifiers for the negotiation script.
//!
//! Each function takes raw message text (and content where media matters) and returns a closed set
//! of tags. No state, no I/O; the state machine decides what a tag means in the current step.

use once_cell::sync::Lazy;
use regex::Regex;
use relay_core::Content;

/// Link to a saved estimate in the Petrovich cabinet.
static ESTIMATE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)petrovich\.ru/cabinet/estimate/").unwrap());

const ESTIMATE_KEYWORDS: &[&str] = &["смет", "estimate"];

const PRICE_MARKERS: &[&str] = &[
    // currency
    "руб", "₽", "$", "€", "usd", "eur", "доллар", "евро",
    // price / cost / total
    "цена", "цену", "цены", "стоимость", "итого", "price", "cost", "total",
];

/// Why a client message counts as an estimate submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateSignal {
    Link,
    Keyword,
    Attachment,
}

/// Client's answer to the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Decline,
}

/// Commands a client can send to the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    /// Restart the script in a fresh thread.
    Start,
}

/// Trims and lowercases.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Estimate link first, then keyword, then photo/document attachment.
pub fn classify_estimate(text: Option<&str>, content: &Content) -> Option<EstimateSignal> {
    if let Some(text) = text {
        if ESTIMATE_LINK.is_match(text) {
            return Some(EstimateSignal::Link);
        }
        let normalized = normalize(text);
        if ESTIMATE_KEYWORDS.iter().any(|k| normalized.contains(k)) {
            return Some(EstimateSignal::Keyword);
        }
    }
    if content.is_attachment() {
        return Some(EstimateSignal::Attachment);
    }
    None
}

/// `да` / `нет` as the whole answer or as its first word ("да, конечно", "нет!").
pub fn classify_decision(text: Option<&str>) -> Option<Decision> {
    let normalized = normalize(text?);
    let first_word = normalized
        .split_whitespace()
        .next()?
        .trim_end_matches(|c: char| matches!(c, ',' | '.' | '!' | '?'));
    match first_word {
        "да" => Some(Decision::Accept),
        "нет" => Some(Decision::Decline),
        _ => None,
    }
}

/// Case-insensitive search for a currency word/symbol or a price/cost/total word.
pub fn is_price_quote(text: &str) -> bool {
    let normalized = normalize(text);
    PRICE_MARKERS.iter().any(|m| normalized.contains(m))
}

/// `/start`, optionally addressed as `/start@botname` and followed by a payload.
pub fn parse_command(text: Option<&str>) -> Option<ClientCommand> {
    let first = text?.split_whitespace().next()?;
    let command = first.split('@').next().unwrap_or(first);
    match command {
        "/start" => Some(ClientCommand::Start),
        _ => None,
    }
}
