//! Report operations
//!
//! Statistics over the quiz history and the AI narrative analysis.

use std::fmt;
use serde::{Deserialize, Deserializer, Serialize};
use crate::database::{KeyValueStore, QuizResult};
use crate::error::{Result, ValidationError};
use crate::gateway::{AnalysisEntry, AnalysisRequest};
use crate::parser::parse_json_payload;
use super::tutor::Tutor;

/// Which part of the history a report covers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubjectFilter {
    #[default]
    All,
    Subject(String),
}

impl SubjectFilter {
    pub fn subject(name: impl Into<String>) -> Self {
        SubjectFilter::Subject(name.into())
    }

    pub fn matches(&self, result: &QuizResult) -> bool {
        match self {
            SubjectFilter::All => true,
            SubjectFilter::Subject(name) => result.subject == *name,
        }
    }
}

impl fmt::Display for SubjectFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectFilter::All => f.write_str("all"),
            SubjectFilter::Subject(name) => f.write_str(name),
        }
    }
}

/// Summary numbers of a filtered history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReportStats {
    /// Rounded mean score
    pub average: u8,
    pub best: u8,
    pub count: usize,
}

/// Entries matching the filter, order preserved
pub fn filter_history(history: &[QuizResult], filter: &SubjectFilter) -> Vec<QuizResult> {
    history.iter().filter(|r| filter.matches(r)).cloned().collect()
}

/// Average, best and count; all zero for an empty history
pub fn stats(filtered: &[QuizResult]) -> ReportStats {
    if filtered.is_empty() {
        return ReportStats::default();
    }
    let sum: u32 = filtered.iter().map(|r| u32::from(r.score)).sum();
    let average = (f64::from(sum) / filtered.len() as f64).round() as u8;
    let best = filtered.iter().map(|r| r.score).max().unwrap_or(0);
    ReportStats { average, best, count: filtered.len() }
}

/// Distinct subjects in first-seen order
pub fn subjects_in_history(history: &[QuizResult]) -> Vec<String> {
    let mut subjects: Vec<String> = Vec::new();
    for result in history {
        if !subjects.contains(&result.subject) {
            subjects.push(result.subject.clone());
        }
    }
    subjects
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrList {
    Text(String),
    List(Vec<String>),
}

fn text_or_list<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<String>, D::Error> {
    Ok(match Option::<TextOrList>::deserialize(deserializer)? {
        Some(TextOrList::Text(text)) if !text.trim().is_empty() => vec![text],
        Some(TextOrList::List(items)) => items.into_iter().filter(|s| !s.trim().is_empty()).collect(),
        _ => Vec::new(),
    })
}

fn joined_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(text_or_list(deserializer)?.join("; "))
}

/// AI narrative analysis of a learner's results in one subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(deserialize_with = "joined_text")]
    pub strength: String,
    #[serde(deserialize_with = "joined_text")]
    pub weakness: String,
    #[serde(default, deserialize_with = "text_or_list")]
    pub advice: Vec<String>,
    #[serde(default, deserialize_with = "joined_text")]
    pub prediction: String,
    #[serde(default, deserialize_with = "joined_text")]
    pub motivational_quote: String,
}

/// Parse an analysis reply; anything unusable is `None`
pub fn parse_analysis(raw: &str) -> Option<Analysis> {
    match parse_json_payload::<Analysis>(raw) {
        Ok(analysis) => Some(analysis),
        Err(e) => {
            tracing::warn!(error = %e, "unreadable analysis payload");
            None
        }
    }
}

impl<S: KeyValueStore> Tutor<S> {
    /// Quiz history matching the filter
    pub fn report_history(&self, filter: &SubjectFilter) -> Result<Vec<QuizResult>> {
        Ok(filter_history(self.quiz_history()?, filter))
    }

    /// Statistics for the filter
    pub fn report_stats(&self, filter: &SubjectFilter) -> Result<ReportStats> {
        Ok(stats(&self.report_history(filter)?))
    }

    /// Subjects the learner has taken quizzes in
    pub fn report_subjects(&self) -> Result<Vec<String>> {
        Ok(subjects_in_history(self.quiz_history()?))
    }

    /// Ask the AI for a narrative analysis of one subject
    ///
    /// Needs a specific subject with at least one result. A failed or
    /// unreadable reply gives `Ok(None)`, meaning "analysis unavailable".
    pub async fn request_analysis(&self, filter: &SubjectFilter) -> Result<Option<Analysis>> {
        let profile = self.ensure_profile()?;
        let SubjectFilter::Subject(subject) = filter else {
            return Err(ValidationError::SubjectRequired.into());
        };
        let history = self.report_history(filter)?;
        if history.is_empty() {
            return Err(ValidationError::NoHistory.into());
        }

        let request = AnalysisRequest {
            student_name: profile.name.clone(),
            grade: profile.current_grade,
            subject: subject.clone(),
            entries: history
                .iter()
                .map(|r| AnalysisEntry { topic: r.topic.clone(), score: r.score })
                .collect(),
        };

        tracing::info!(%subject, entries = request.entries.len(), "requesting analysis");
        match self.ai.analyze_report(&request).await {
            Ok(raw) => Ok(parse_analysis(&raw)),
            Err(e) => {
                tracing::warn!(error = %e, "analysis request failed");
                Ok(None)
            }
        }
    }
}
