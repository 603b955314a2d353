//! Series notation codec.
//!
//! Coaches write prescriptions in two notations:
//!
//! - **decorated**: `"50кг×6, 55кг×5×3"`: weight, optional unit, a
//!   multiplication sign, reps and an optional set count, comma separated;
//! - **paste**: `"6,,6,,,,5,4,6*6"`: a row copied out of a spreadsheet,
//!   reps only, `*` for set counts, empty cells between commas.
//!
//! Parsing is best effort: fragments that do not fit the notation are
//! skipped and reported in [`ParsedSeries::skipped`] instead of failing the
//! whole text. The paste notation carries no weight, so every set it
//! produces has `weight == 0`.

use crate::{Result, SeriesSet, Vocabulary};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// ASCII multiplication markers accepted next to the vocabulary's sign
const ASCII_TIMES: [&str; 2] = ["x", "*"];

/// Marker that separates reps from sets in the paste notation
const PASTE_SETS_MARKER: char = '*';

/// Which notation a text was read with
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Notation {
    Decorated,
    Paste,
}

/// Why a fragment was dropped
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Decorated fragment without a `weight × reps` pattern
    NoMatch,
    /// Paste cell that is not `reps` or `reps*sets`
    NotANumber,
    /// Number too large for a rep or set count
    OutOfRange,
}

/// A fragment the parser could not turn into a set
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedFragment {
    pub fragment: String,
    pub reason: SkipReason,
}

/// Result of parsing a series text
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ParsedSeries {
    pub notation: Notation,
    pub sets: Vec<SeriesSet>,
    pub skipped: Vec<SkippedFragment>,
}

impl ParsedSeries {
    fn new(notation: Notation) -> Self {
        Self {
            notation,
            sets: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn skip(&mut self, fragment: &str, reason: SkipReason) {
        tracing::debug!("Skipping series fragment '{}': {:?}", fragment, reason);
        self.skipped.push(SkippedFragment {
            fragment: fragment.to_string(),
            reason,
        });
    }

    /// True if nothing was dropped and every set is valid
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && validate_series(&self.sets)
    }
}

/// Parser and formatter for series notation
#[derive(Clone, Debug)]
pub struct SeriesCodec {
    unit: String,
    times: String,
    fragment: Regex,
}

impl SeriesCodec {
    /// Compile the decorated fragment grammar for a vocabulary
    pub fn new(vocab: &Vocabulary) -> Result<Self> {
        let mut units: Vec<&str> = vocab.unit_tokens().filter(|u| !u.is_empty()).collect();
        // Longest first so a shorter spelling never shadows a longer one
        units.sort_by_key(|u| std::cmp::Reverse(u.chars().count()));
        let units = units
            .iter()
            .map(|u| regex::escape(u))
            .collect::<Vec<_>>()
            .join("|");

        let mut markers = vec![vocab.times.as_str()];
        for marker in ASCII_TIMES {
            if !markers.contains(&marker) {
                markers.push(marker);
            }
        }
        let times = markers
            .iter()
            .map(|m| regex::escape(m))
            .collect::<Vec<_>>()
            .join("|");

        let weight = format!(r"([0-9]+(?:\.[0-9]+)?)\s*(?:{units})?");
        let count = format!(r"\s*(?:{times})\s*([0-9]+)");
        let pattern = format!(r"(?i){weight}{count}(?:{count})?");

        Ok(Self {
            unit: vocab.unit.clone(),
            times: vocab.times.clone(),
            fragment: Regex::new(&pattern)?,
        })
    }

    /// Pick the notation for a text
    ///
    /// A text with a comma and neither the unit nor the multiplication sign
    /// is a spreadsheet paste.
    pub fn detect(&self, text: &str) -> Notation {
        let text = text.trim();
        if text.contains(',') && !text.contains(&self.unit) && !text.contains(&self.times) {
            Notation::Paste
        } else {
            Notation::Decorated
        }
    }

    /// Parse a series text, keeping whatever fragments make sense
    pub fn parse(&self, text: &str) -> ParsedSeries {
        let text = text.trim();
        match self.detect(text) {
            Notation::Paste => parse_paste(text),
            Notation::Decorated => self.parse_decorated(text),
        }
    }

    fn parse_decorated(&self, text: &str) -> ParsedSeries {
        let mut parsed = ParsedSeries::new(Notation::Decorated);

        for fragment in text.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            let Some(caps) = self.fragment.captures(fragment) else {
                parsed.skip(fragment, SkipReason::NoMatch);
                continue;
            };

            let weight = caps[1].parse::<f64>();
            let reps = caps[2].parse::<i32>();
            let sets = caps.get(3).map(|m| m.as_str().parse::<i32>()).transpose();

            match (weight, reps, sets) {
                (Ok(weight), Ok(reps), Ok(sets)) => {
                    parsed.sets.push(SeriesSet { weight, reps, sets })
                }
                _ => parsed.skip(fragment, SkipReason::OutOfRange),
            }
        }

        parsed
    }

    /// Format sets in the decorated notation of this codec's vocabulary
    pub fn format(&self, series: &[SeriesSet]) -> String {
        format_with(series, &self.unit, &self.times)
    }
}

fn parse_paste(text: &str) -> ParsedSeries {
    let mut parsed = ParsedSeries::new(Notation::Paste);

    // Empty cells are "no set" placeholders and carry nothing
    for cell in text.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let set = match cell.split_once(PASTE_SETS_MARKER) {
            Some((reps, sets)) => parse_count(reps).and_then(|reps| {
                parse_count(sets).map(|sets| SeriesSet::with_sets(0.0, reps, sets))
            }),
            None => parse_count(cell).map(|reps| SeriesSet::new(0.0, reps)),
        };

        match set {
            Ok(set) => parsed.sets.push(set),
            Err(reason) => parsed.skip(cell, reason),
        }
    }

    parsed
}

fn parse_count(text: &str) -> std::result::Result<i32, SkipReason> {
    let text = text.trim();
    text.parse::<i32>().map_err(|_| {
        let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            SkipReason::OutOfRange
        } else {
            SkipReason::NotANumber
        }
    })
}

fn format_with(series: &[SeriesSet], unit: &str, times: &str) -> String {
    series
        .iter()
        .map(|s| match s.sets {
            Some(sets) if sets > 1 => {
                format!("{}{unit}{times}{}{times}{}", s.weight, s.reps, sets)
            }
            _ => format!("{}{unit}{times}{}", s.weight, s.reps),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format sets in the decorated notation, e.g. `"50кг×6, 55кг×5×3"`
///
/// A set count of one is omitted, so an absent count survives a round trip.
pub fn format_series(series: &[SeriesSet], vocab: &Vocabulary) -> String {
    format_with(series, &vocab.unit, &vocab.times)
}

/// True iff every set has a non-negative weight and positive reps and sets
pub fn validate_series(series: &[SeriesSet]) -> bool {
    series
        .iter()
        .all(|s| s.weight >= 0.0 && s.reps > 0 && s.sets.map_or(true, |sets| sets > 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> SeriesCodec {
        SeriesCodec::new(&Vocabulary::default()).unwrap()
    }

    #[test]
    fn test_parse_decorated_with_sets() {
        let parsed = codec().parse("50кг×6×6");
        assert_eq!(parsed.notation, Notation::Decorated);
        assert_eq!(parsed.sets, vec![SeriesSet::with_sets(50.0, 6, 6)]);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_parse_decorated_list() {
        let parsed = codec().parse("25кг×6, 32.5кг×6, 50кг×6×6");
        assert_eq!(
            parsed.sets,
            vec![
                SeriesSet::new(25.0, 6),
                SeriesSet::new(32.5, 6),
                SeriesSet::with_sets(50.0, 6, 6),
            ]
        );
    }

    #[test]
    fn test_parse_decorated_marker_variants() {
        let parsed = codec().parse("50 кг x 6");
        assert_eq!(parsed.sets, vec![SeriesSet::new(50.0, 6)]);

        let parsed = codec().parse("50X6X3");
        assert_eq!(parsed.sets, vec![SeriesSet::with_sets(50.0, 6, 3)]);

        let parsed = codec().parse("50*6");
        assert_eq!(parsed.sets, vec![SeriesSet::new(50.0, 6)]);

        let parsed = codec().parse("60KG×5, 70 КГ × 3");
        assert_eq!(
            parsed.sets,
            vec![SeriesSet::new(60.0, 5), SeriesSet::new(70.0, 3)]
        );
    }

    #[test]
    fn test_parse_paste() {
        let parsed = codec().parse("6,,6,,,,5,4,6*6");
        assert_eq!(parsed.notation, Notation::Paste);
        assert_eq!(
            parsed.sets,
            vec![
                SeriesSet::new(0.0, 6),
                SeriesSet::new(0.0, 6),
                SeriesSet::new(0.0, 5),
                SeriesSet::new(0.0, 4),
                SeriesSet::with_sets(0.0, 6, 6),
            ]
        );
        // Empty cells are not diagnostics
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_paste_never_carries_weight() {
        let parsed = codec().parse("8, 8*3, 5");
        assert!(parsed.sets.iter().all(|s| s.weight == 0.0));
        assert_eq!(parsed.sets.len(), 3);
    }

    #[test]
    fn test_paste_skips_noise_with_diagnostics() {
        let parsed = codec().parse("6, abc, 5*, 4");
        assert_eq!(
            parsed.sets,
            vec![SeriesSet::new(0.0, 6), SeriesSet::new(0.0, 4)]
        );
        assert_eq!(
            parsed.skipped,
            vec![
                SkippedFragment {
                    fragment: "abc".into(),
                    reason: SkipReason::NotANumber,
                },
                SkippedFragment {
                    fragment: "5*".into(),
                    reason: SkipReason::NotANumber,
                },
            ]
        );
        assert!(!parsed.is_clean());
    }

    #[test]
    fn test_decorated_skips_unmatched_fragments() {
        let parsed = codec().parse("50кг×6, разминка, 60кг×4");
        assert_eq!(
            parsed.sets,
            vec![SeriesSet::new(50.0, 6), SeriesSet::new(60.0, 4)]
        );
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].fragment, "разминка");
        assert_eq!(parsed.skipped[0].reason, SkipReason::NoMatch);
    }

    #[test]
    fn test_oversized_counts_are_skipped() {
        let parsed = codec().parse("50кг×99999999999");
        assert!(parsed.sets.is_empty());
        assert_eq!(parsed.skipped[0].reason, SkipReason::OutOfRange);

        let parsed = codec().parse("6, 99999999999");
        assert_eq!(parsed.sets.len(), 1);
        assert_eq!(parsed.skipped[0].reason, SkipReason::OutOfRange);
    }

    #[test]
    fn test_empty_text() {
        let parsed = codec().parse("   ");
        assert!(parsed.sets.is_empty());
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_detect_uses_unit_and_sign_only() {
        let codec = codec();
        assert_eq!(codec.detect("6,,6,5"), Notation::Paste);
        assert_eq!(codec.detect("6,6*6"), Notation::Paste);
        assert_eq!(codec.detect("50кг×6, 55кг×5"), Notation::Decorated);
        assert_eq!(codec.detect("50×6, 55×5"), Notation::Decorated);
        assert_eq!(codec.detect("50x6"), Notation::Decorated);
        // Comma without unit or × sign reads as a paste even with ASCII x
        assert_eq!(codec.detect("50x6, 55x5"), Notation::Paste);
    }

    #[test]
    fn test_format_series() {
        let vocab = Vocabulary::default();
        let series = vec![SeriesSet::new(50.0, 6), SeriesSet::with_sets(55.0, 5, 3)];
        assert_eq!(format_series(&series, &vocab), "50кг×6, 55кг×5×3");

        let series = vec![SeriesSet::with_sets(32.5, 8, 1)];
        assert_eq!(format_series(&series, &vocab), "32.5кг×8");

        assert_eq!(format_series(&[], &vocab), "");
    }

    #[test]
    fn test_round_trip() {
        let codec = codec();
        let series = vec![
            SeriesSet::new(50.0, 6),
            SeriesSet::with_sets(55.0, 5, 3),
            SeriesSet::new(57.5, 2),
            SeriesSet::with_sets(0.0, 10, 2),
        ];
        let text = codec.format(&series);
        let parsed = codec.parse(&text);
        assert_eq!(parsed.sets, series);
        assert!(parsed.is_clean());
    }

    #[test]
    fn test_validate_series() {
        assert!(!validate_series(&[SeriesSet::new(-1.0, 5)]));
        assert!(validate_series(&[SeriesSet::with_sets(0.0, 5, 1)]));
        assert!(!validate_series(&[SeriesSet::new(50.0, 0)]));
        assert!(!validate_series(&[SeriesSet::with_sets(50.0, 5, 0)]));
        assert!(validate_series(&[]));
    }

    #[test]
    fn test_custom_vocabulary() {
        let vocab = Vocabulary {
            unit: "lb".into(),
            unit_aliases: vec![],
            ..Vocabulary::default()
        };
        let codec = SeriesCodec::new(&vocab).unwrap();
        let parsed = codec.parse("135lb×5, 185 LB×3×2");
        assert_eq!(
            parsed.sets,
            vec![SeriesSet::new(135.0, 5), SeriesSet::with_sets(185.0, 3, 2)]
        );
        assert_eq!(codec.format(&parsed.sets), "135lb×5, 185lb×3×2");
    }
}
