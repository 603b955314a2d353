//! Localized tokens used by plan documents.
//!
//! The scanner, the series codec and the exporter never hard-code words:
//! they read lift names, markers and the weight unit from a [`Vocabulary`].
//! The standard vocabulary matches the coaching documents in use today and
//! is cached once per process.

use crate::Lift;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Cached standard vocabulary
static STANDARD_VOCABULARY: Lazy<Vocabulary> = Lazy::new(Vocabulary::default);

/// Get a reference to the cached standard vocabulary
pub fn standard() -> &'static Vocabulary {
    &STANDARD_VOCABULARY
}

/// One token per lift
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LiftTokens {
    pub squat: String,
    pub bench: String,
    pub deadlift: String,
}

impl LiftTokens {
    pub fn get(&self, lift: Lift) -> &str {
        match lift {
            Lift::Squat => &self.squat,
            Lift::Bench => &self.bench,
            Lift::Deadlift => &self.deadlift,
        }
    }
}

/// Token table for plan documents
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Vocabulary {
    /// Lift names as written at the start of PM and exercise lines
    pub lifts: LiftTokens,
    /// Exercise catalog category per lift
    pub categories: LiftTokens,
    pub name_marker: String,
    pub pm_marker: String,
    pub week_marker: String,
    pub workout_marker: String,
    /// Suffix of a workout line that marks a test session
    pub test_marker: String,
    pub notes_marker: String,
    /// Weight unit used when formatting
    pub unit: String,
    /// Extra unit spellings accepted when parsing
    pub unit_aliases: Vec<String>,
    /// Multiplication sign used when formatting
    pub times: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            lifts: LiftTokens {
                squat: "Присед".into(),
                bench: "Жим".into(),
                deadlift: "Тяга".into(),
            },
            categories: LiftTokens {
                squat: "Ноги".into(),
                bench: "Грудь".into(),
                deadlift: "Спина".into(),
            },
            name_marker: "Имя:".into(),
            pm_marker: "ПМ".into(),
            week_marker: "Неделя".into(),
            workout_marker: "Тренировка".into(),
            test_marker: "ПРОХОДКА".into(),
            notes_marker: "Примечание:".into(),
            unit: "кг".into(),
            unit_aliases: vec!["kg".into()],
            times: "×".into(),
        }
    }
}

impl Vocabulary {
    /// Canonical name of a lift
    pub fn lift_name(&self, lift: Lift) -> &str {
        self.lifts.get(lift)
    }

    /// Resolve a lift name, ignoring case
    pub fn lift_from_name(&self, name: &str) -> Option<Lift> {
        let wanted = name.trim().to_lowercase();
        Lift::ALL
            .into_iter()
            .find(|lift| self.lifts.get(*lift).to_lowercase() == wanted)
    }

    /// Catalog category of a lift
    pub fn category(&self, lift: Lift) -> &str {
        self.categories.get(lift)
    }

    /// Every accepted unit spelling, canonical first
    pub fn unit_tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.unit.as_str()).chain(self.unit_aliases.iter().map(String::as_str))
    }

    /// Validate the vocabulary for completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for lift in Lift::ALL {
            if self.lifts.get(lift).trim().is_empty() {
                errors.push(format!("Lift {:?} has an empty name", lift));
            }
        }

        for other in Lift::ALL {
            for lift in Lift::ALL {
                if lift < other
                    && self.lifts.get(lift).to_lowercase() == self.lifts.get(other).to_lowercase()
                {
                    errors.push(format!(
                        "Lifts {:?} and {:?} share the name '{}'",
                        lift,
                        other,
                        self.lifts.get(lift)
                    ));
                }
            }
        }

        let markers = [
            ("name_marker", &self.name_marker),
            ("pm_marker", &self.pm_marker),
            ("week_marker", &self.week_marker),
            ("workout_marker", &self.workout_marker),
            ("test_marker", &self.test_marker),
            ("notes_marker", &self.notes_marker),
            ("unit", &self.unit),
            ("times", &self.times),
        ];
        for (key, value) in markers {
            if value.trim().is_empty() {
                errors.push(format!("Vocabulary token '{}' is empty", key));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_vocabulary_validates() {
        let errors = standard().validate();
        assert!(errors.is_empty(), "Standard vocabulary errors: {:?}", errors);
    }

    #[test]
    fn test_lift_lookup_ignores_case() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.lift_from_name("Присед"), Some(Lift::Squat));
        assert_eq!(vocab.lift_from_name("жим"), Some(Lift::Bench));
        assert_eq!(vocab.lift_from_name("ТЯГА"), Some(Lift::Deadlift));
        assert_eq!(vocab.lift_from_name("Выпады"), None);
    }

    #[test]
    fn test_unit_tokens_canonical_first() {
        let vocab = Vocabulary::default();
        let units: Vec<&str> = vocab.unit_tokens().collect();
        assert_eq!(units, vec!["кг", "kg"]);
    }

    #[test]
    fn test_duplicate_lift_names_rejected() {
        let mut vocab = Vocabulary::default();
        vocab.lifts.bench = "присед".into();
        let errors = vocab.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("share the name"));
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let toml_str = r#"
week_marker = "Week"
"#;
        let vocab: Vocabulary = toml::from_str(toml_str).unwrap();
        assert_eq!(vocab.week_marker, "Week");
        assert_eq!(vocab.lifts.squat, "Присед");
    }
}
