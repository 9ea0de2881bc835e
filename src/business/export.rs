//! PDF export functionality

use crate::database::KeyValueStore;
use crate::error::Result;
use crate::export::{render_pdf, FontSource, ReportDocument};
use super::report::{Analysis, SubjectFilter};
use super::tutor::Tutor;

impl<S: KeyValueStore> Tutor<S> {
    /// Assemble the report for the filter from the learner's profile and history
    pub fn report_document(&self, filter: &SubjectFilter, analysis: Option<Analysis>) -> Result<ReportDocument> {
        let profile = self.ensure_profile()?;
        let history = self.report_history(filter)?;
        Ok(ReportDocument::new(
            &profile,
            filter,
            history,
            analysis,
            self.translations.get_language(),
        ))
    }

    /// Export the report as a PDF document.
    ///
    /// Returns the PDF file contents as bytes.
    pub fn export_report_pdf(
        &self,
        filter: &SubjectFilter,
        analysis: Option<Analysis>,
        fonts: &FontSource,
    ) -> Result<Vec<u8>> {
        let report = self.report_document(filter, analysis)?;
        render_pdf(&report, fonts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::business::tutor::tests::{create_test_tutor, create_ready_tutor};
    use crate::error::TutorError;

    #[test]
    fn test_report_document_requires_profile() {
        let (mut tutor, _) = create_test_tutor();
        tutor.register("budi", "secret123", "secret123").unwrap();
        let err = tutor.report_document(&SubjectFilter::All, None).unwrap_err();
        assert!(matches!(err, TutorError::ProfileRequired));
    }

    #[test]
    fn test_report_document_for_learner() {
        let (mut tutor, _) = create_ready_tutor();
        tutor.set_language("id").unwrap();
        let report = tutor.report_document(&SubjectFilter::subject("IPA"), None).unwrap();
        assert_eq!(report.student_name, "Budi");
        assert_eq!(report.subject.as_deref(), Some("IPA"));
        assert_eq!(report.language, "id");
        assert!(report.history.is_empty());
    }
}
