//! The line protocol the recovery engine speaks on stdout.
//!
//! There is no structured contract with the engine — just newline-delimited
//! UTF-8 text where each line is classified by prefix. This module defines
//! the domain records a run produces and the grammar as a tagged [`Line`]
//! enum, so the grammar is testable without running the parser loop.

pub mod parser;

use serde::Serialize;

/// One candidate recovery result emitted by the engine.
///
/// Fields the engine never reported stay as empty strings; `addresses`
/// keeps the order the engine printed them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyVariation {
    pub id: u64,
    pub private_key_hex: String,
    pub wif: String,
    pub seed_phrase: String,
    pub addresses: Vec<AddressBalance>,
}

impl KeyVariation {
    /// A fresh variation with only its id set.
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// An address the engine derived for a variation, with an optional
/// human-readable balance annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBalance {
    pub chain: String,
    pub address: String,
    pub balance: String,
}

/// Summary statistics for an entire engine run. At most one per response.
///
/// `total_variations` is the engine's own count and is deliberately never
/// reconciled with the number of parsed [`KeyVariation`]s — the two are
/// independent signals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryMetadata {
    pub total_variations: u64,
    pub time_elapsed: String,
    pub memory_used: String,
    pub chain_coverage: Vec<String>,
}

/// Everything one engine run produced, in the shape the HTTP caller gets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryResult {
    pub variations: Vec<KeyVariation>,
    pub metadata: Option<RecoveryMetadata>,
}

const VARIATION_TAG: &str = "Key Variation #";
const PRIVATE_KEY_LABEL: &str = "Private Key:";
const WIF_LABEL: &str = "WIF:";
const SEED_PHRASE_LABEL: &str = "Seed Phrase:";
const TOTAL_LABEL: &str = "Total Tested Variations:";
const TIME_LABEL: &str = "Time Elapsed:";
const MEMORY_LABEL: &str = "Memory Used:";
const COVERAGE_LABEL: &str = "Chain Coverage:";

/// One classified line of engine output. Borrows from the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// `Key Variation #<n>` — starts a new variation.
    VariationHeader { id: u64 },
    PrivateKey(&'a str),
    Wif(&'a str),
    SeedPhrase(&'a str),
    /// `<CHAIN>:<address>(<balance>)` where CHAIN is all-uppercase ASCII.
    Address {
        chain: &'a str,
        address: &'a str,
        balance: &'a str,
    },
    /// `Total Tested Variations: <n>` anywhere in the line.
    TotalCount(u64),
    TimeElapsed(&'a str),
    MemoryUsed(&'a str),
    ChainCoverage(&'a str),
    /// Matched a known numeric shape but the number did not parse.
    /// Ignored by the parser, surfaced as a warning.
    Malformed { what: &'static str },
    /// Anything else. Ignored, forward-compatible with engine output we
    /// do not understand.
    Unrecognized,
}

/// Classify one line of engine output.
///
/// The shapes are tested in a fixed precedence order and the first match
/// wins, so e.g. `WIF:` is a WIF line even though it also looks like an
/// address line.
pub fn classify(line: &str) -> Line<'_> {
    if let Some(rest) = line.strip_prefix(VARIATION_TAG) {
        return match rest.trim().parse::<u64>() {
            Ok(id) => Line::VariationHeader { id },
            Err(_) => Line::Malformed {
                what: "variation id",
            },
        };
    }
    if let Some(rest) = line.strip_prefix(PRIVATE_KEY_LABEL) {
        return Line::PrivateKey(rest.trim());
    }
    if let Some(rest) = line.strip_prefix(WIF_LABEL) {
        return Line::Wif(rest.trim());
    }
    if let Some(rest) = line.strip_prefix(SEED_PHRASE_LABEL) {
        return Line::SeedPhrase(rest.trim());
    }
    if let Some((chain, rest)) = line.split_once(':') {
        if !chain.is_empty() && chain.bytes().all(|b| b.is_ascii_uppercase()) {
            let (address, balance) = match rest.split_once('(') {
                Some((addr, bal)) => {
                    let bal = bal.trim_end();
                    (addr.trim(), bal.strip_suffix(')').unwrap_or(bal).trim())
                }
                None => (rest.trim(), ""),
            };
            return Line::Address {
                chain,
                address,
                balance,
            };
        }
    }
    if let Some(rest) = after_label(line, TOTAL_LABEL) {
        return match rest.trim().parse::<u64>() {
            Ok(total) => Line::TotalCount(total),
            Err(_) => Line::Malformed {
                what: "total tested variations",
            },
        };
    }
    if let Some(rest) = after_label(line, TIME_LABEL) {
        return Line::TimeElapsed(rest.trim());
    }
    if let Some(rest) = after_label(line, MEMORY_LABEL) {
        return Line::MemoryUsed(rest.trim());
    }
    if let Some(rest) = after_label(line, COVERAGE_LABEL) {
        return Line::ChainCoverage(rest.trim());
    }
    Line::Unrecognized
}

/// The remainder of `line` after the first occurrence of `label`, or
/// `None` if the label does not appear. Metadata labels may be preceded
/// by arbitrary decoration, so this is a contains-match, not a prefix.
fn after_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    line.find(label).map(|at| &line[at + label.len()..])
}
