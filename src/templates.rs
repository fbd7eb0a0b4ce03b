//! The four fixed reasoning-template skeletons.
//!
//! Templates are selected, never constructed: the selector stage asks the
//! model for a numeral and decodes it here, with the fallback encoded in the
//! default match arm so unparseable model output can never fail the stage.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// One of the four fixed reasoning styles, carrying its skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasoningTemplate {
    Deductive,
    Inductive,
    Abductive,
    Analogical,
}

impl ReasoningTemplate {
    /// All templates in selector-menu order.
    pub const ALL: [ReasoningTemplate; 4] = [
        ReasoningTemplate::Deductive,
        ReasoningTemplate::Inductive,
        ReasoningTemplate::Abductive,
        ReasoningTemplate::Analogical,
    ];

    /// The numeral the selector prompt asks the model to output.
    pub fn code(&self) -> &'static str {
        match self {
            ReasoningTemplate::Deductive => "1",
            ReasoningTemplate::Inductive => "2",
            ReasoningTemplate::Abductive => "3",
            ReasoningTemplate::Analogical => "4",
        }
    }

    /// Human-readable style name.
    pub fn name(&self) -> &'static str {
        match self {
            ReasoningTemplate::Deductive => "Deductive Reasoning",
            ReasoningTemplate::Inductive => "Inductive Reasoning",
            ReasoningTemplate::Abductive => "Abductive Reasoning",
            ReasoningTemplate::Analogical => "Analogical Reasoning",
        }
    }

    /// The skeleton with named placeholders the filler stage completes.
    pub fn skeleton(&self) -> &'static str {
        match self {
            ReasoningTemplate::Deductive => {
                "If {premise1} is true, and {premise2} is true, then {conclusion} must be true."
            }
            ReasoningTemplate::Inductive => {
                "Based on observations {observation1}, {observation2}, and {observation3}, \
                 we can generalize that {generalization}."
            }
            ReasoningTemplate::Abductive => {
                "The best explanation for {phenomenon} is {hypothesis} because {reasoning}."
            }
            ReasoningTemplate::Analogical => {
                "Situation {situationA} is similar to situation {situationB} in ways \
                 {similarity1} and {similarity2}, so we can infer {inference}."
            }
        }
    }

    /// Illustrative example shown in the selector menu.
    pub fn example(&self) -> &'static str {
        match self {
            ReasoningTemplate::Deductive => "If A is true, and B is true, then C must be true.",
            ReasoningTemplate::Inductive => {
                "Based on observations X, Y, and Z, we can generalize that..."
            }
            ReasoningTemplate::Abductive => {
                "The best explanation for phenomenon P is hypothesis H because..."
            }
            ReasoningTemplate::Analogical => {
                "Situation A is similar to situation B in ways X and Y, so we can infer..."
            }
        }
    }

    /// Decode a selector response.
    ///
    /// Any response outside "1".."4" (garbled, verbose, empty) falls back to
    /// deductive. This is a correctness requirement, not an error path: the
    /// selector stage never fails on unparseable model output.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1" => ReasoningTemplate::Deductive,
            "2" => ReasoningTemplate::Inductive,
            "3" => ReasoningTemplate::Abductive,
            "4" => ReasoningTemplate::Analogical,
            _ => ReasoningTemplate::Deductive,
        }
    }

    /// Look up a template by its exact skeleton text.
    pub fn from_skeleton(skeleton: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.skeleton() == skeleton)
    }
}

// The result record stores the raw skeleton string, not the numeric code.
impl Serialize for ReasoningTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.skeleton())
    }
}

impl<'de> Deserialize<'de> for ReasoningTemplate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ReasoningTemplate::from_skeleton(&s)
            .ok_or_else(|| de::Error::custom("not one of the four reasoning template skeletons"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for template in ReasoningTemplate::ALL {
            assert_eq!(ReasoningTemplate::from_code(template.code()), template);
        }
    }

    #[test]
    fn unparseable_codes_fall_back_to_deductive() {
        for garbled in ["", "five", "1.", "Template 2", " 0 ", "42"] {
            assert_eq!(
                ReasoningTemplate::from_code(garbled),
                ReasoningTemplate::Deductive,
                "expected deductive fallback for {garbled:?}"
            );
        }
    }

    #[test]
    fn whitespace_around_valid_code_is_trimmed() {
        assert_eq!(
            ReasoningTemplate::from_code(" 3\n"),
            ReasoningTemplate::Abductive
        );
    }

    #[test]
    fn skeleton_lookup_matches_serialization() {
        for template in ReasoningTemplate::ALL {
            let json = serde_json::to_string(&template).unwrap();
            let back: ReasoningTemplate = serde_json::from_str(&json).unwrap();
            assert_eq!(back, template);
        }
    }

    #[test]
    fn unknown_skeleton_fails_deserialization() {
        let result: Result<ReasoningTemplate, _> =
            serde_json::from_str("\"not a template skeleton\"");
        assert!(result.is_err());
    }
}
