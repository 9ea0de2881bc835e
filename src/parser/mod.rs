//! AI response parsing
//!
//! Chat replies may end with an inline quiz block:
//!
//! ```text
//! Here is a question for you.
//! ~~~json
//! {"question": "2 + 2?", "options": [{"label": "A", "text": "4", "isCorrect": true}]}
//! ~~~
//! ```
//!
//! [`parse_response`] splits such a reply into display text and the parsed
//! block. It never fails: a missing or malformed block leaves the reply as
//! plain text. [`parse_json_payload`] handles the fully structured replies
//! (quiz arrays, report analyses).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use crate::error::{TutorError, Result};
use crate::utils::strip_code_fences;

const BLOCK_OPEN: &str = "~~~json";
const BLOCK_CLOSE: &str = "~~~";

/// Result of splitting an AI chat reply
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    /// Reply with the quiz block removed and trimmed
    pub display_text: String,
    /// The block's JSON as parsed
    pub directive: Option<Value>,
    /// The block normalised to a quiz, if it has quiz shape
    pub quiz: Option<QuizDirective>,
    /// Raw reply
    pub original_text: String,
}

impl ParsedResponse {
    fn plain(raw: &str) -> Self {
        Self {
            display_text: raw.to_string(),
            directive: None,
            quiz: None,
            original_text: raw.to_string(),
        }
    }
}

/// Inline multiple-choice question embedded in an AI message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDirective {
    pub question: String,
    pub options: Vec<QuizOption>,
}

/// One answer option of a [`QuizDirective`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub label: String,
    pub text: String,
    pub is_correct: bool,
}

impl QuizDirective {
    /// Normalise a JSON value into a directive
    ///
    /// Options may be plain strings (correctness taken from `correctIndex`)
    /// or `{label, text, isCorrect}` objects. Returns `None` if there is no
    /// question text or no usable option.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let question = obj.get("question")?.as_str()?.trim();
        if question.is_empty() {
            return None;
        }
        let correct_index = obj
            .get("correctIndex")
            .and_then(Value::as_u64)
            .map(|i| i as usize);

        let options: Vec<QuizOption> = obj
            .get("options")?
            .as_array()?
            .iter()
            .enumerate()
            .filter_map(|(i, opt)| QuizOption::from_value(i, opt, correct_index))
            .collect();

        if options.is_empty() {
            return None;
        }

        Some(Self {
            question: question.to_string(),
            options,
        })
    }

    /// First option flagged correct
    pub fn correct_option(&self) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.is_correct)
    }
}

impl QuizOption {
    fn from_value(index: usize, value: &Value, correct_index: Option<usize>) -> Option<Self> {
        let by_index = correct_index == Some(index);
        match value {
            Value::String(text) => Some(Self {
                label: option_label(index),
                text: text.clone(),
                is_correct: by_index,
            }),
            Value::Object(obj) => {
                let text = obj.get("text").and_then(Value::as_str)?;
                let label = obj
                    .get("label")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| option_label(index));
                let is_correct = obj
                    .get("isCorrect")
                    .and_then(Value::as_bool)
                    .unwrap_or(by_index);
                Some(Self {
                    label,
                    text: text.to_string(),
                    is_correct,
                })
            }
            _ => None,
        }
    }
}

/// `A`, `B`, ... then numbers past `Z`
pub fn option_label(index: usize) -> String {
    if index < 26 {
        char::from(b'A' + index as u8).to_string()
    } else {
        (index + 1).to_string()
    }
}

/// Lenient serde hook for stored directives; unusable shapes read as `None`
pub fn deserialize_directive<'de, D>(deserializer: D) -> std::result::Result<Option<QuizDirective>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(QuizDirective::from_value))
}

/// Split an AI chat reply into display text and an optional trailing quiz block
///
/// The block must close at the end of the reply (trailing whitespace allowed);
/// JSON-looking text earlier in the reply is left alone.
pub fn parse_response(raw: &str) -> ParsedResponse {
    let trimmed = raw.trim_end();
    let Some(before_close) = trimmed.strip_suffix(BLOCK_CLOSE) else {
        return ParsedResponse::plain(raw);
    };
    let Some(open) = before_close.rfind(BLOCK_OPEN) else {
        return ParsedResponse::plain(raw);
    };

    let content = &before_close[open + BLOCK_OPEN.len()..];
    match serde_json::from_str::<Value>(content.trim()) {
        Ok(value) => {
            let quiz = QuizDirective::from_value(&value);
            ParsedResponse {
                display_text: before_close[..open].trim().to_string(),
                directive: Some(value),
                quiz,
                original_text: raw.to_string(),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "malformed quiz block, keeping reply as text");
            ParsedResponse::plain(raw)
        }
    }
}

/// Parse a structured AI reply
///
/// Markdown code fences are stripped first. If the rest is still not valid
/// JSON, the outermost `[...]` and then `{...}` spans are tried.
pub fn parse_json_payload<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let cleaned = strip_code_fences(raw);
    let first_err = match serde_json::from_str(&cleaned) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    for (open, close) in [('[', ']'), ('{', '}')] {
        if let (Some(start), Some(end)) = (cleaned.find(open), cleaned.rfind(close)) {
            if start < end {
                if let Ok(value) = serde_json::from_str(&cleaned[start..=end]) {
                    return Ok(value);
                }
            }
        }
    }

    Err(TutorError::Parse(first_err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trailing_block_is_extracted() {
        let raw = "Hello ~~~json\n{\"a\":1}\n~~~";
        let parsed = parse_response(raw);
        assert_eq!(parsed.display_text, "Hello");
        assert_eq!(parsed.directive, Some(json!({"a": 1})));
        assert!(parsed.quiz.is_none());
        assert_eq!(parsed.original_text, raw);
    }

    #[test]
    fn test_malformed_block_degrades_to_text() {
        let raw = "Hello ~~~json\nNOTJSON\n~~~";
        let parsed = parse_response(raw);
        assert_eq!(parsed.display_text, raw);
        assert!(parsed.directive.is_none());
        assert!(parsed.quiz.is_none());
        assert_eq!(parsed.original_text, raw);
    }

    #[test]
    fn test_block_must_close_at_end() {
        let raw = "Look: ~~~json\n{\"a\":1}\n~~~ and then more text";
        let parsed = parse_response(raw);
        assert_eq!(parsed.display_text, raw);
        assert!(parsed.directive.is_none());
    }

    #[test]
    fn test_trailing_whitespace_tolerated() {
        let parsed = parse_response("Hi\n~~~json\n{\"a\":2}\n~~~\n\n");
        assert_eq!(parsed.display_text, "Hi");
        assert_eq!(parsed.directive, Some(json!({"a": 2})));
    }

    #[test]
    fn test_plain_reply() {
        let parsed = parse_response("Just text");
        assert_eq!(parsed, ParsedResponse::plain("Just text"));
        let parsed = parse_response("");
        assert_eq!(parsed.display_text, "");
    }

    #[test]
    fn test_quiz_block_with_object_options() {
        let raw = r#"Coba jawab ini!
~~~json
{
  "isQuiz": true,
  "question": "Ibukota Indonesia?",
  "options": [
    {"label": "A", "text": "Bandung", "isCorrect": false},
    {"label": "B", "text": "Jakarta", "isCorrect": true}
  ]
}
~~~"#;
        let parsed = parse_response(raw);
        assert_eq!(parsed.display_text, "Coba jawab ini!");
        let quiz = parsed.quiz.unwrap();
        assert_eq!(quiz.question, "Ibukota Indonesia?");
        assert_eq!(quiz.options.len(), 2);
        assert_eq!(quiz.correct_option().unwrap().text, "Jakarta");
    }

    #[test]
    fn test_string_options_normalised() {
        let value = json!({
            "question": "2 + 3?",
            "options": ["4", "5", "6"],
            "correctIndex": 1
        });
        let quiz = QuizDirective::from_value(&value).unwrap();
        let labels: Vec<&str> = quiz.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
        assert!(quiz.options[1].is_correct);
        assert!(!quiz.options[0].is_correct);
    }

    #[test]
    fn test_non_quiz_shapes_rejected() {
        assert!(QuizDirective::from_value(&json!({"a": 1})).is_none());
        assert!(QuizDirective::from_value(&json!({"question": "", "options": ["x"]})).is_none());
        assert!(QuizDirective::from_value(&json!({"question": "Q", "options": []})).is_none());
        assert!(QuizDirective::from_value(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_last_block_wins() {
        let raw = "A ~~~json {\"x\":1} ~~~ B ~~~json\n{\"y\":2}\n~~~";
        let parsed = parse_response(raw);
        assert_eq!(parsed.directive, Some(json!({"y": 2})));
        assert!(parsed.display_text.ends_with("B"));
    }

    #[test]
    fn test_directive_serialized_shape() {
        let quiz = QuizDirective {
            question: "Q".into(),
            options: vec![QuizOption { label: "A".into(), text: "x".into(), is_correct: true }],
        };
        let value = serde_json::to_value(&quiz).unwrap();
        assert_eq!(value["options"][0]["isCorrect"], true);
        assert_eq!(QuizDirective::from_value(&value), Some(quiz));
    }

    #[test]
    fn test_option_labels() {
        assert_eq!(option_label(0), "A");
        assert_eq!(option_label(25), "Z");
        assert_eq!(option_label(26), "27");
    }

    #[test]
    fn test_payload_with_fences() {
        let raw = "```json\n[{\"a\":1}]\n```";
        let value: Vec<Value> = parse_json_payload(raw).unwrap();
        assert_eq!(value.len(), 1);
    }

    #[test]
    fn test_payload_with_surrounding_prose() {
        let raw = "Berikut analisisnya:\n{\"strength\":\"Aljabar\"}\nSemoga membantu.";
        let value: Value = parse_json_payload(raw).unwrap();
        assert_eq!(value["strength"], "Aljabar");
    }

    #[test]
    fn test_payload_unparsable() {
        let result: Result<Value> = parse_json_payload("Maaf, saya tidak bisa.");
        assert!(matches!(result, Err(TutorError::Parse(_))));
    }
}
