//! crates/essay_review_core/src/essay.rs
//!
//! The static essay definition consumed by the writing UI: an ordered list of
//! paragraphs and a weighted grading rubric.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Rubric weights must add up to exactly this.
pub const TOTAL_CRITERIA_WEIGHT: u32 = 100;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EssayError {
    #[error("Essay '{0}' has no paragraphs")]
    NoParagraphs(String),
    #[error("Essay '{essay}' repeats paragraph id '{paragraph}'")]
    DuplicateParagraph { essay: String, paragraph: String },
    #[error("Paragraph '{paragraph}' in essay '{essay}' has minWords {min} above maxWords {max}")]
    WordBounds {
        essay: String,
        paragraph: String,
        min: u32,
        max: u32,
    },
    #[error("Paragraph '{paragraph}' in essay '{essay}' must allow at least one attempt")]
    NoAttempts { essay: String, paragraph: String },
    #[error("Grading criteria for essay '{essay}' weigh {total}, expected 100")]
    CriteriaWeight { essay: String, total: u32 },
    #[error("Duplicate essay id '{0}'")]
    DuplicateEssay(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphType {
    Introduction,
    Body,
    Conclusion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphSpec {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ParagraphType,
    pub min_words: u32,
    pub max_words: u32,
    pub max_attempts: u32,
    pub points: u32,
    #[serde(default)]
    pub learning_material: String,
    #[serde(default)]
    pub writing_prompt: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub example_quotes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingCriterion {
    pub weight: u32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssayDefinition {
    pub id: String,
    pub title: String,
    pub subject: String,
    /// Target grade or year band, e.g. "Year 9".
    pub year_group: String,
    pub paragraphs: Vec<ParagraphSpec>,
    pub grading_criteria: BTreeMap<String, GradingCriterion>,
}

impl EssayDefinition {
    pub fn validate(&self) -> Result<(), EssayError> {
        if self.paragraphs.is_empty() {
            return Err(EssayError::NoParagraphs(self.id.clone()));
        }

        let mut seen = HashSet::new();
        for paragraph in &self.paragraphs {
            if !seen.insert(paragraph.id.as_str()) {
                return Err(EssayError::DuplicateParagraph {
                    essay: self.id.clone(),
                    paragraph: paragraph.id.clone(),
                });
            }
            if paragraph.min_words > paragraph.max_words {
                return Err(EssayError::WordBounds {
                    essay: self.id.clone(),
                    paragraph: paragraph.id.clone(),
                    min: paragraph.min_words,
                    max: paragraph.max_words,
                });
            }
            if paragraph.max_attempts == 0 {
                return Err(EssayError::NoAttempts {
                    essay: self.id.clone(),
                    paragraph: paragraph.id.clone(),
                });
            }
        }

        let total: u32 = self.grading_criteria.values().map(|c| c.weight).sum();
        if total != TOTAL_CRITERIA_WEIGHT {
            return Err(EssayError::CriteriaWeight {
                essay: self.id.clone(),
                total,
            });
        }
        Ok(())
    }

    pub fn total_points(&self) -> u32 {
        self.paragraphs.iter().map(|p| p.points).sum()
    }
}

/// Validated essay definitions, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct EssayCatalog {
    essays: BTreeMap<String, EssayDefinition>,
}

impl EssayCatalog {
    pub fn new(definitions: impl IntoIterator<Item = EssayDefinition>) -> Result<Self, EssayError> {
        let mut essays = BTreeMap::new();
        for definition in definitions {
            definition.validate()?;
            if essays.contains_key(&definition.id) {
                return Err(EssayError::DuplicateEssay(definition.id));
            }
            essays.insert(definition.id.clone(), definition);
        }
        Ok(Self { essays })
    }

    pub fn get(&self, id: &str) -> Option<&EssayDefinition> {
        self.essays.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EssayDefinition> {
        self.essays.values()
    }

    pub fn len(&self) -> usize {
        self.essays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.essays.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> EssayDefinition {
        serde_json::from_value(json!({
            "id": "persuasive",
            "title": "Should homework be banned?",
            "subject": "English",
            "yearGroup": "Year 8",
            "paragraphs": [
                {"id": "intro", "title": "Introduction", "type": "introduction",
                 "minWords": 60, "maxWords": 120, "maxAttempts": 3, "points": 20},
                {"id": "body-1", "title": "First argument", "type": "body",
                 "minWords": 100, "maxWords": 200, "maxAttempts": 3, "points": 30,
                 "keyPoints": ["Claim", "Evidence"], "exampleQuotes": ["\"Rest matters.\""]},
                {"id": "conclusion", "title": "Conclusion", "type": "conclusion",
                 "minWords": 60, "maxWords": 120, "maxAttempts": 2, "points": 20}
            ],
            "gradingCriteria": {
                "argument": {"weight": 40, "description": "Clear, supported position"},
                "structure": {"weight": 30, "description": "Logical paragraph flow"},
                "language": {"weight": 30, "description": "Accurate, persuasive language"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn sample_definition_is_valid() {
        let essay = sample();
        assert_eq!(essay.validate(), Ok(()));
        assert_eq!(essay.total_points(), 70);
        assert_eq!(essay.paragraphs[1].kind, ParagraphType::Body);
        assert_eq!(essay.paragraphs[1].key_points.len(), 2);
        assert!(essay.paragraphs[0].learning_material.is_empty());
    }

    #[test]
    fn weights_must_sum_to_one_hundred() {
        let mut essay = sample();
        essay.grading_criteria.get_mut("language").unwrap().weight = 20;
        assert_eq!(
            essay.validate(),
            Err(EssayError::CriteriaWeight {
                essay: "persuasive".into(),
                total: 90
            })
        );
    }

    #[test]
    fn rejects_inverted_word_bounds_and_zero_attempts() {
        let mut essay = sample();
        essay.paragraphs[0].min_words = 500;
        assert!(matches!(essay.validate(), Err(EssayError::WordBounds { .. })));

        let mut essay = sample();
        essay.paragraphs[2].max_attempts = 0;
        assert!(matches!(essay.validate(), Err(EssayError::NoAttempts { .. })));
    }

    #[test]
    fn rejects_duplicate_paragraphs_and_empty_essays() {
        let mut essay = sample();
        essay.paragraphs[2].id = "intro".into();
        assert!(matches!(
            essay.validate(),
            Err(EssayError::DuplicateParagraph { .. })
        ));

        let mut essay = sample();
        essay.paragraphs.clear();
        assert_eq!(
            essay.validate(),
            Err(EssayError::NoParagraphs("persuasive".into()))
        );
    }

    #[test]
    fn catalog_rejects_duplicate_ids() {
        let result = EssayCatalog::new([sample(), sample()]);
        assert_eq!(
            result.unwrap_err(),
            EssayError::DuplicateEssay("persuasive".into())
        );

        let catalog = EssayCatalog::new([sample()]).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("persuasive").is_some());
        assert!(catalog.get("narrative").is_none());
    }

    #[test]
    fn serializes_type_field_in_lowercase() {
        let value = serde_json::to_value(&sample().paragraphs[0]).unwrap();
        assert_eq!(value["type"], "introduction");
        assert_eq!(value["minWords"], 60);
    }
}
