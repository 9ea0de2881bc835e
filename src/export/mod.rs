//! Report export for MentorCore
//!
//! This module provides the progress report document model and renders
//! it to PDF with `genpdf`.

use std::path::PathBuf;
use chrono::{DateTime, Utc};
use genpdf::{elements, style, Element as _};
use serde::Serialize;
use crate::business::report::{stats, Analysis, ReportStats, SubjectFilter};
use crate::config::TutorConfig;
use crate::database::{Level, Profile, QuizResult};
use crate::error::{TutorError, Result};
use crate::localization::Translations;
use crate::utils::format_report_date;

/// Everything printed on a progress report
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub student_name: String,
    pub grade: i32,
    pub level: Level,
    /// Subject name, or `None` for all subjects
    pub subject: Option<String>,
    pub stats: ReportStats,
    /// Newest first, as stored
    pub history: Vec<QuizResult>,
    pub analysis: Option<Analysis>,
    pub generated_at: DateTime<Utc>,
    /// Language of the printed labels
    pub language: String,
}

impl ReportDocument {
    /// Build a report from a profile and its already filtered history
    pub fn new(
        profile: &Profile,
        filter: &SubjectFilter,
        history: Vec<QuizResult>,
        analysis: Option<Analysis>,
        language: &str,
    ) -> Self {
        let subject = match filter {
            SubjectFilter::All => None,
            SubjectFilter::Subject(name) => Some(name.clone()),
        };
        Self {
            student_name: profile.name.clone(),
            grade: profile.current_grade,
            level: profile.level,
            subject,
            stats: stats(&history),
            history,
            analysis,
            generated_at: Utc::now(),
            language: language.to_string(),
        }
    }

    /// Subject label for the file name and header
    pub fn subject_label<'a>(&'a self, tr: &'a Translations) -> &'a str {
        self.subject.as_deref().unwrap_or_else(|| tr.get("report_all_subjects"))
    }
}

/// TTF font family used to render the PDF
///
/// `dir` must hold `{family}-Regular.ttf`, `-Bold.ttf`, `-Italic.ttf` and
/// `-BoldItalic.ttf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSource {
    pub dir: PathBuf,
    pub family: String,
}

impl FontSource {
    pub fn new(dir: impl Into<PathBuf>, family: impl Into<String>) -> Self {
        Self { dir: dir.into(), family: family.into() }
    }

    /// Font source from configuration; `None` without a font directory
    pub fn from_config(config: &TutorConfig) -> Option<Self> {
        config
            .font_dir
            .as_ref()
            .map(|dir| Self::new(dir.clone(), config.font_family.clone()))
    }
}

/// Download name of a report PDF
pub fn report_file_name(student_name: &str, subject: &str) -> String {
    format!("Raport-{}-{}.pdf", student_name.trim(), subject.trim())
}

fn export_error(err: genpdf::error::Error) -> TutorError {
    TutorError::ExportError(err.to_string())
}

/// Render a report to PDF bytes
pub fn render_pdf(report: &ReportDocument, fonts: &FontSource) -> Result<Vec<u8>> {
    let tr = Translations::for_language(&report.language)?;

    let family = genpdf::fonts::from_files(&fonts.dir, &fonts.family, None).map_err(export_error)?;
    let mut doc = genpdf::Document::new(family);
    doc.set_title(format!("{} - {}", tr.get("report_title"), report.student_name));
    doc.set_font_size(11);
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(15);
    doc.set_page_decorator(decorator);

    doc.push(
        elements::Paragraph::new(tr.get("app_name"))
            .styled(style::Style::new().bold().with_font_size(20)),
    );
    doc.push(
        elements::Paragraph::new(tr.get("report_title"))
            .styled(style::Style::new().with_font_size(14)),
    );
    doc.push(elements::Break::new(1));

    let header = [
        (tr.get("report_student"), report.student_name.clone()),
        (tr.get("report_grade"), format!("{} ({})", report.grade, report.level)),
        (tr.get("report_subject"), report.subject_label(&tr).to_string()),
        (tr.get("report_date"), format_report_date(&report.generated_at)),
    ];
    for (label, value) in header {
        doc.push(elements::Paragraph::new(format!("{}: {}", label, value)));
    }
    doc.push(elements::Break::new(1));

    let summary = [
        (tr.get("report_average"), report.stats.average.to_string()),
        (tr.get("report_best"), report.stats.best.to_string()),
        (tr.get("report_count"), report.stats.count.to_string()),
    ];
    let mut table = elements::TableLayout::new(vec![1, 1, 1]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
    let mut row = table.row();
    for (label, _) in &summary {
        row.push_element(elements::Paragraph::new(*label).styled(style::Style::new().bold()).padded(1));
    }
    row.push().map_err(export_error)?;
    let mut row = table.row();
    for (_, value) in &summary {
        row.push_element(elements::Paragraph::new(value.as_str()).padded(1));
    }
    row.push().map_err(export_error)?;
    doc.push(table);
    doc.push(elements::Break::new(1));

    doc.push(
        elements::Paragraph::new(tr.get("report_history"))
            .styled(style::Style::new().bold().with_font_size(13)),
    );
    if report.history.is_empty() {
        doc.push(elements::Paragraph::new(tr.get("report_no_history")));
    } else {
        let mut table = elements::TableLayout::new(vec![2, 3, 4, 1]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
        table
            .row()
            .element(elements::Paragraph::new(tr.get("report_date")).styled(style::Style::new().bold()).padded(1))
            .element(elements::Paragraph::new(tr.get("report_subject")).styled(style::Style::new().bold()).padded(1))
            .element(elements::Paragraph::new(tr.get("report_topic")).styled(style::Style::new().bold()).padded(1))
            .element(elements::Paragraph::new(tr.get("report_score")).styled(style::Style::new().bold()).padded(1))
            .push()
            .map_err(export_error)?;
        for result in &report.history {
            table
                .row()
                .element(elements::Paragraph::new(result.date.report_label()).padded(1))
                .element(elements::Paragraph::new(result.subject.as_str()).padded(1))
                .element(elements::Paragraph::new(result.topic.as_str()).padded(1))
                .element(elements::Paragraph::new(result.score.to_string()).padded(1))
                .push()
                .map_err(export_error)?;
        }
        doc.push(table);
    }

    if let Some(analysis) = &report.analysis {
        doc.push(elements::Break::new(1));
        let sections = [
            ("report_strength", &analysis.strength),
            ("report_weakness", &analysis.weakness),
            ("report_prediction", &analysis.prediction),
            ("report_quote", &analysis.motivational_quote),
        ];
        for (key, text) in sections {
            if text.is_empty() {
                continue;
            }
            doc.push(elements::Paragraph::new(tr.get(key)).styled(style::Style::new().bold()));
            doc.push(elements::Paragraph::new(text.as_str()));
        }
        if !analysis.advice.is_empty() {
            doc.push(elements::Paragraph::new(tr.get("report_advice")).styled(style::Style::new().bold()));
            let mut list = elements::UnorderedList::new();
            for item in &analysis.advice {
                list.push(elements::Paragraph::new(item.as_str()));
            }
            doc.push(list);
        }
    }

    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(export_error)?;
    tracing::info!(bytes = buffer.len(), entries = report.history.len(), "report rendered");
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::business::profile::compute_status;
    use crate::database::StoredProfile;

    fn profile() -> Profile {
        let stored = StoredProfile {
            name: "Budi".into(),
            grade: 8,
            registered_at: Utc::now(),
            user_id: "user_1".into(),
            username: "budi".into(),
        };
        compute_status(Some(&stored)).unwrap()
    }

    fn result(subject: &str, score: u8) -> QuizResult {
        QuizResult {
            id: 1,
            date: Utc.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap().into(),
            subject: subject.into(),
            topic: "Sel".into(),
            score,
            total: 5,
        }
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name("Budi", "IPA"), "Raport-Budi-IPA.pdf");
        assert_eq!(report_file_name(" Siti ", "Semua"), "Raport-Siti-Semua.pdf");
    }

    #[test]
    fn test_report_document_new() {
        let history = vec![result("IPA", 80), result("IPA", 60)];
        let report = ReportDocument::new(&profile(), &SubjectFilter::subject("IPA"), history, None, "en");
        assert_eq!(report.student_name, "Budi");
        assert_eq!(report.grade, 8);
        assert_eq!(report.level, Level::Smp);
        assert_eq!(report.stats, ReportStats { average: 70, best: 80, count: 2 });

        let tr = Translations::new().unwrap();
        assert_eq!(report.subject_label(&tr), "IPA");
        let all = ReportDocument::new(&profile(), &SubjectFilter::All, Vec::new(), None, "en");
        assert_eq!(all.subject_label(&tr), "All");
        assert_eq!(all.stats.count, 0);
    }

    #[test]
    fn test_font_source_from_config() {
        let mut config = TutorConfig::default();
        assert!(FontSource::from_config(&config).is_none());
        config.font_dir = Some(PathBuf::from("/usr/share/fonts/liberation"));
        let fonts = FontSource::from_config(&config).unwrap();
        assert_eq!(fonts.family, "LiberationSans");
    }

    #[test]
    fn test_render_pdf_missing_fonts() {
        let dir = tempfile::TempDir::new().unwrap();
        let report = ReportDocument::new(&profile(), &SubjectFilter::All, Vec::new(), None, "en");
        let err = render_pdf(&report, &FontSource::new(dir.path(), "Missing")).unwrap_err();
        assert!(matches!(err, TutorError::ExportError(_)));
    }
}
