//! Quiz operations
//!
//! A quiz is generated by the AI gateway, answered in a transient
//! [`QuizSession`] and recorded in the quiz history when finished.

use std::collections::BTreeMap;
use serde::Serialize;
use serde_json::Value;
use crate::database::{KeyValueStore, Level, QuizResult};
use crate::error::{Result, ValidationError};
use crate::gateway::QuizRequest;
use crate::parser::{parse_json_payload, QuizDirective};
use crate::utils::now;
use super::subjects::SmaTrack;
use super::tutor::Tutor;

/// Generated multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
}

impl QuizQuestion {
    /// Normalise one generated item
    ///
    /// Items with fewer than two options or without a valid correct option
    /// are rejected.
    pub fn from_value(value: &Value) -> Option<Self> {
        let directive = QuizDirective::from_value(value)?;
        if directive.options.len() < 2 {
            return None;
        }
        let correct_index = directive.options.iter().position(|o| o.is_correct)?;
        let explanation = value
            .get("explanation")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Some(Self {
            question: directive.question,
            options: directive.options.into_iter().map(|o| o.text).collect(),
            correct_index,
            explanation,
        })
    }
}

/// Parse a generated quiz; malformed output yields no questions
pub fn parse_quiz_questions(raw: &str) -> Vec<QuizQuestion> {
    let items: Vec<Value> = match parse_json_payload(raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable quiz payload");
            return Vec::new();
        }
    };
    let total = items.len();
    let questions: Vec<QuizQuestion> = items.iter().filter_map(QuizQuestion::from_value).collect();
    if questions.len() < total {
        tracing::warn!(discarded = total - questions.len(), "invalid quiz questions dropped");
    }
    questions
}

/// Quiz in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    subject: String,
    topic: String,
    questions: Vec<QuizQuestion>,
    answers: BTreeMap<usize, usize>,
}

impl QuizSession {
    pub fn new(subject: impl Into<String>, topic: impl Into<String>, questions: Vec<QuizQuestion>) -> Self {
        Self {
            subject: subject.into(),
            topic: topic.into(),
            questions,
            answers: BTreeMap::new(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// True when generation produced nothing; such a session cannot be finished
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Record an answer; a later answer to the same question replaces it
    pub fn answer(&mut self, question_index: usize, option_index: usize) -> Result<()> {
        let question = self
            .questions
            .get(question_index)
            .ok_or(ValidationError::QuestionOutOfRange(question_index))?;
        if option_index >= question.options.len() {
            return Err(ValidationError::OptionOutOfRange(option_index).into());
        }
        self.answers.insert(question_index, option_index);
        Ok(())
    }

    /// Chosen option for a question
    pub fn answer_for(&self, question_index: usize) -> Option<usize> {
        self.answers.get(&question_index).copied()
    }

    /// True once every question has an answer
    pub fn is_complete(&self) -> bool {
        self.answers.len() == self.questions.len()
    }

    pub fn correct_count(&self) -> usize {
        self.questions
            .iter()
            .enumerate()
            .filter(|(i, q)| self.answers.get(i) == Some(&q.correct_index))
            .count()
    }

    /// Rounded percentage of correct answers; unanswered questions count as wrong
    pub fn score(&self) -> u8 {
        if self.questions.is_empty() {
            return 0;
        }
        let pct = 100.0 * self.correct_count() as f64 / self.questions.len() as f64;
        pct.round() as u8
    }
}

impl<S: KeyValueStore> Tutor<S> {
    /// Generate a quiz for the learner's level
    ///
    /// Gateway failures and unusable output produce an empty session, which
    /// the caller should offer to retry.
    pub async fn start_quiz(&self, subject: &str, topic: &str, track: Option<SmaTrack>) -> Result<QuizSession> {
        let profile = self.ensure_profile()?;
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(ValidationError::SubjectRequired.into());
        }
        let topic = topic.trim();

        let generation_topic = match profile.level {
            Level::Sma => format!("{} (Peminatan {})", topic, track.unwrap_or_default()),
            _ => topic.to_string(),
        };
        let request = QuizRequest {
            grade: profile.current_grade,
            level: profile.level,
            subject: subject.to_string(),
            topic: generation_topic,
        };

        tracing::info!(%subject, topic = %request.topic, level = %profile.level, "generating quiz");
        let questions = match self.ai.generate_quiz(&request).await {
            Ok(raw) => parse_quiz_questions(&raw),
            Err(e) => {
                tracing::warn!(error = %e, "quiz generation failed");
                Vec::new()
            }
        };

        Ok(QuizSession::new(subject, topic, questions))
    }

    /// Score a quiz and record it at the front of the history
    pub fn finish_quiz(&mut self, session: QuizSession) -> Result<QuizResult> {
        self.ensure_authenticated()?;
        if session.is_empty() {
            return Err(ValidationError::EmptyQuiz.into());
        }
        let score = session.score();
        let total = session.len() as u32;

        let result = self.with_session(|store| {
            let result = QuizResult {
                id: store.next_id(),
                date: now().into(),
                subject: session.subject,
                topic: session.topic,
                score,
                total,
            };
            store.bundle_mut().quiz_history.insert(0, result.clone());
            Ok(result)
        })?;

        tracing::info!(subject = %result.subject, score, total, "quiz finished");
        Ok(result)
    }

    /// Completed quizzes, newest first
    pub fn quiz_history(&self) -> Result<&[QuizResult]> {
        Ok(&self.session()?.bundle().quiz_history)
    }
}
