//! Incremental parser for the engine's stdout.
//!
//! Pure function of the input lines: all accumulator state lives inside
//! one [`parse`] call, so concurrent requests can parse independently.

use super::{AddressBalance, KeyVariation, Line, RecoveryMetadata, RecoveryResult, classify};

/// What a parse produced: the best-effort result plus any lines that
/// looked like protocol but did not parse. Warnings are diagnostics for
/// server-side logs, never a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub result: RecoveryResult,
    pub warnings: Vec<String>,
}

/// Parse a finite sequence of engine output lines into a [`RecoveryResult`].
///
/// Never fails: unknown lines are skipped, malformed numeric lines are
/// recorded as warnings, and field lines that arrive with no variation
/// open are discarded. Worst case is an empty result.
pub fn parse<'a, I>(lines: I) -> ParseOutcome
where
    I: IntoIterator<Item = &'a str>,
{
    let mut completed: Vec<KeyVariation> = Vec::new();
    let mut current: Option<KeyVariation> = None;
    let mut metadata: Option<RecoveryMetadata> = None;
    let mut warnings: Vec<String> = Vec::new();

    for line in lines {
        match classify(line) {
            Line::VariationHeader { id } => {
                if let Some(done) = current.take() {
                    completed.push(done);
                }
                current = Some(KeyVariation::with_id(id));
            }
            Line::PrivateKey(hex) => {
                if let Some(variation) = current.as_mut() {
                    variation.private_key_hex = hex.to_string();
                }
            }
            Line::Wif(wif) => {
                if let Some(variation) = current.as_mut() {
                    variation.wif = wif.to_string();
                }
            }
            Line::SeedPhrase(phrase) => {
                if let Some(variation) = current.as_mut() {
                    variation.seed_phrase = phrase.to_string();
                }
            }
            Line::Address {
                chain,
                address,
                balance,
            } => {
                if let Some(variation) = current.as_mut() {
                    variation.addresses.push(AddressBalance {
                        chain: chain.to_string(),
                        address: address.to_string(),
                        balance: balance.to_string(),
                    });
                }
            }
            Line::TotalCount(total) => {
                metadata.get_or_insert_with(RecoveryMetadata::default).total_variations = total;
            }
            Line::TimeElapsed(elapsed) => {
                metadata.get_or_insert_with(RecoveryMetadata::default).time_elapsed =
                    elapsed.to_string();
            }
            Line::MemoryUsed(memory) => {
                metadata.get_or_insert_with(RecoveryMetadata::default).memory_used =
                    memory.to_string();
            }
            Line::ChainCoverage(coverage) => {
                metadata.get_or_insert_with(RecoveryMetadata::default).chain_coverage =
                    coverage.split(',').map(|chain| chain.trim().to_string()).collect();
            }
            Line::Malformed { what } => {
                warnings.push(format!("unparseable {what} in line: {line:?}"));
            }
            Line::Unrecognized => {}
        }
    }

    if let Some(done) = current.take() {
        completed.push(done);
    }

    ParseOutcome {
        result: RecoveryResult {
            variations: completed,
            metadata,
        },
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_headers_means_no_variations() {
        let outcome = parse(["some noise", "Time Elapsed: 1.2s", "more noise"]);
        assert!(outcome.result.variations.is_empty());
        let metadata = outcome.result.metadata.unwrap();
        assert_eq!(metadata.time_elapsed, "1.2s");
        assert_eq!(metadata.total_variations, 0);
    }

    #[test]
    fn single_full_variation() {
        let outcome = parse([
            "Key Variation #7",
            "Private Key: deadbeef",
            "WIF: 5Kb8kLf",
            "Seed Phrase: abandon ability able",
            "BTC:1A2b3C(0.5 BTC)",
            "ETH:0xabc",
        ]);
        assert!(outcome.warnings.is_empty());
        let variations = &outcome.result.variations;
        assert_eq!(variations.len(), 1);
        let v = &variations[0];
        assert_eq!(v.id, 7);
        assert_eq!(v.private_key_hex, "deadbeef");
        assert_eq!(v.wif, "5Kb8kLf");
        assert_eq!(v.seed_phrase, "abandon ability able");
        assert_eq!(
            v.addresses,
            vec![
                AddressBalance {
                    chain: "BTC".to_string(),
                    address: "1A2b3C".to_string(),
                    balance: "0.5 BTC".to_string(),
                },
                AddressBalance {
                    chain: "ETH".to_string(),
                    address: "0xabc".to_string(),
                    balance: String::new(),
                },
            ]
        );
    }

    #[test]
    fn consecutive_headers_yield_empty_variations() {
        let outcome = parse(["Key Variation #1", "Key Variation #2"]);
        let variations = &outcome.result.variations;
        assert_eq!(variations.len(), 2);
        for (variation, id) in variations.iter().zip([1, 2]) {
            assert_eq!(variation.id, id);
            assert_eq!(variation.private_key_hex, "");
            assert_eq!(variation.wif, "");
            assert_eq!(variation.seed_phrase, "");
            assert!(variation.addresses.is_empty());
        }
    }

    #[test]
    fn trailing_variation_committed_at_end_of_input() {
        let outcome = parse(["Key Variation #3", "Private Key: aa"]);
        assert_eq!(outcome.result.variations.len(), 1);
        assert_eq!(outcome.result.variations[0].private_key_hex, "aa");
    }

    #[test]
    fn field_lines_before_any_header_are_discarded() {
        let outcome = parse(["Private Key: orphaned", "BTC:1A2b3C", "Key Variation #1"]);
        assert_eq!(outcome.result.variations.len(), 1);
        assert_eq!(outcome.result.variations[0].private_key_hex, "");
        assert!(outcome.result.variations[0].addresses.is_empty());
    }

    #[test]
    fn metadata_fields() {
        let outcome = parse([
            "Total Tested Variations: 128",
            "Time Elapsed: 4.2s",
            "Memory Used: 96 MB",
            "Chain Coverage: BTC, ETH ,SOL",
        ]);
        let metadata = outcome.result.metadata.unwrap();
        assert_eq!(metadata.total_variations, 128);
        assert_eq!(metadata.time_elapsed, "4.2s");
        assert_eq!(metadata.memory_used, "96 MB");
        assert_eq!(metadata.chain_coverage, vec!["BTC", "ETH", "SOL"]);
    }

    #[test]
    fn engine_total_is_not_reconciled_with_parsed_count() {
        let outcome = parse(["Key Variation #1", "Total Tested Variations: 500"]);
        assert_eq!(outcome.result.variations.len(), 1);
        assert_eq!(outcome.result.metadata.unwrap().total_variations, 500);
    }

    #[test]
    fn malformed_numeric_line_warns_but_does_not_abort() {
        let outcome = parse([
            "Key Variation #one",
            "Key Variation #2",
            "Private Key: bb",
        ]);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.result.variations.len(), 1);
        assert_eq!(outcome.result.variations[0].id, 2);
        assert_eq!(outcome.result.variations[0].private_key_hex, "bb");
    }

    #[test]
    fn empty_input_is_empty_result() {
        let lines: [&str; 0] = [];
        let outcome = parse(lines);
        assert_eq!(outcome, ParseOutcome::default());
    }

    #[test]
    fn parse_is_pure() {
        let lines = [
            "Key Variation #1",
            "Private Key: aa",
            "BTC:addr(1 BTC)",
            "Total Tested Variations: 9",
        ];
        assert_eq!(parse(lines), parse(lines));
    }
}
