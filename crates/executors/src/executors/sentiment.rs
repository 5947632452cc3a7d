//! Lexicon based sentiment analysis.
//!
//! Accepts either a bare string or `{ "text": "...", "extras": { "word": 2 } }`
//! and produces a score, a per-token normalised score and the breakdown of
//! positive and negative words.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use super::{ExecutionUnit, UnitError, afinn};

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\p{L}\p{N}'\-\s]+").unwrap();
}

#[derive(Debug, Deserialize)]
struct SentimentRequest {
    text: String,
    #[serde(default)]
    extras: HashMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct SentimentAnalysis {
    pub score: i64,
    pub comparative: f64,
    pub calculation: Vec<BTreeMap<String, i64>>,
    pub tokens: Vec<String>,
    pub words: Vec<String>,
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Sentiment {
    extras: HashMap<String, i64>,
}

impl Sentiment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or overrides word scores for every analysis run by this unit.
    pub fn with_extras(extras: HashMap<String, i64>) -> Self {
        Self { extras }
    }

    pub fn tokenize(text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        NON_WORD
            .replace_all(&lowered, " ")
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    pub fn analyze(&self, text: &str, extras: &HashMap<String, i64>) -> SentimentAnalysis {
        let tokens = Self::tokenize(text);
        let mut score: i64 = 0;
        let mut calculation = Vec::new();
        let mut words = Vec::new();
        let mut positive = Vec::new();
        let mut negative = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let Some(mut token_score) = extras
                .get(token)
                .or_else(|| self.extras.get(token))
                .copied()
                .or_else(|| afinn::score(token).map(i64::from))
            else {
                continue;
            };

            if i > 0 && afinn::is_negator(&tokens[i - 1]) {
                token_score = token_score.saturating_neg();
            }

            if token_score > 0 {
                positive.push(token.clone());
            } else if token_score < 0 {
                negative.push(token.clone());
            }
            score = score.saturating_add(token_score);
            words.push(token.clone());
            calculation.push(BTreeMap::from([(token.clone(), token_score)]));
        }

        let comparative = if tokens.is_empty() {
            0.0
        } else {
            score as f64 / tokens.len() as f64
        };

        SentimentAnalysis {
            score,
            comparative,
            calculation,
            tokens,
            words,
            positive,
            negative,
        }
    }
}

#[async_trait]
impl ExecutionUnit for Sentiment {
    fn description(&self) -> &str {
        "Scores the sentiment of a text using a word valence lexicon"
    }

    async fn execute(&self, input: Value) -> Result<Value, UnitError> {
        let request = match input {
            Value::String(text) => SentimentRequest {
                text,
                extras: HashMap::new(),
            },
            Value::Object(_) => serde_json::from_value::<SentimentRequest>(input).map_err(|e| {
                UnitError::InvalidInput(format!(
                    "expected a string or an object with a `text` field: {e}"
                ))
            })?,
            other => {
                return Err(UnitError::InvalidInput(format!(
                    "expected a string or an object with a `text` field, got {}",
                    json_type_name(&other)
                )));
            }
        };

        let analysis = self.analyze(&request.text, &request.extras);
        serde_json::to_value(analysis).map_err(|e| UnitError::Failed(e.to_string()))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tokenize_strips_punctuation_and_lowercases() {
        assert_eq!(
            Sentiment::tokenize("Cats are AMAZING!!! Don't you think?"),
            vec!["cats", "are", "amazing", "don't", "you", "think"]
        );
        assert!(Sentiment::tokenize("  ...  ").is_empty());
    }

    #[test]
    fn test_positive_and_negative_words() {
        let analysis = Sentiment::new().analyze("Cats are stupid but amazing", &HashMap::new());
        assert_eq!(analysis.score, 2);
        assert_eq!(analysis.words, vec!["stupid", "amazing"]);
        assert_eq!(analysis.positive, vec!["amazing"]);
        assert_eq!(analysis.negative, vec!["stupid"]);
        assert!((analysis.comparative - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negation_flips_following_word() {
        let analysis = Sentiment::new().analyze("this is not good", &HashMap::new());
        assert_eq!(analysis.score, -3);
        assert_eq!(analysis.negative, vec!["good"]);
        assert!(analysis.positive.is_empty());
    }

    #[test]
    fn test_extras_override_lexicon() {
        let unit = Sentiment::with_extras(HashMap::from([("cats".to_string(), 5)]));
        let request_extras = HashMap::from([("amazing".to_string(), -1)]);
        let analysis = unit.analyze("cats are amazing", &request_extras);
        assert_eq!(analysis.score, 4);
        assert_eq!(
            analysis.calculation,
            vec![
                BTreeMap::from([("cats".to_string(), 5)]),
                BTreeMap::from([("amazing".to_string(), -1)]),
            ]
        );
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let analysis = Sentiment::new().analyze("", &HashMap::new());
        assert_eq!(analysis.score, 0);
        assert_eq!(analysis.comparative, 0.0);
    }

    #[tokio::test]
    async fn test_execute_accepts_string_and_object_input() {
        let unit = Sentiment::new();
        let from_string = unit.execute(json!("I love it")).await.unwrap();
        let from_object = unit.execute(json!({"text": "I love it"})).await.unwrap();
        assert_eq!(from_string, from_object);
        assert_eq!(from_string["score"], json!(3));
        assert_eq!(from_string["positive"], json!(["love"]));
    }

    #[tokio::test]
    async fn test_execute_rejects_other_shapes() {
        let unit = Sentiment::new();
        assert!(matches!(
            unit.execute(json!(42)).await,
            Err(UnitError::InvalidInput(_))
        ));
        assert!(matches!(
            unit.execute(json!({"body": "hello"})).await,
            Err(UnitError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_extreme_extras_saturate_instead_of_overflowing() {
        let negated = Sentiment::new().analyze(
            "not good",
            &HashMap::from([("good".to_string(), i64::MIN)]),
        );
        assert_eq!(negated.score, i64::MAX);

        let summed = Sentiment::new().analyze(
            "great great",
            &HashMap::from([("great".to_string(), i64::MAX)]),
        );
        assert_eq!(summed.score, i64::MAX);
    }

    #[tokio::test]
    async fn test_execute_with_i32_min_extra() {
        let result = Sentiment::new()
            .execute(json!({"text": "not good", "extras": {"good": i32::MIN}}))
            .await
            .unwrap();
        assert_eq!(result["score"], json!(-i64::from(i32::MIN)));
    }
}
