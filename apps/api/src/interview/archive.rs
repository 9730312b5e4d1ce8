//! Session and report persistence over the flat-file store.
//!
//! Identifiers are file names. A report derived from a session shares its timestamp
//! (`interview_session_<ts>.json` → `feedback_report_for_<ts>.json`), so the two are
//! associated by name alone.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::feedback::report::{FeedbackReport, FeedbackReportDocument};
use crate::interview::session::{RecordedAnswer, Session};
use crate::store::naming::{self, REPORT_PREFIX};
use crate::store::FileStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Completed,
    Paused,
}

/// A session as written to disk. Missing keys default on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub total_questions_asked: usize,
    #[serde(default)]
    pub questions_used: Vec<String>,
    #[serde(default)]
    pub recorded_answers: Vec<RecordedAnswer>,
    #[serde(default)]
    pub status: SessionStatus,
}

impl PersistedSession {
    pub fn from_session(session: &Session, at: NaiveDateTime) -> Self {
        Self {
            timestamp: Some(at),
            total_questions_asked: session.answers().len(),
            questions_used: session.questions().to_vec(),
            recorded_answers: session.answers().to_vec(),
            status: if session.is_complete() {
                SessionStatus::Completed
            } else {
                SessionStatus::Paused
            },
        }
    }

    /// Rebuilds the live session, positioned after the last recorded answer.
    ///
    /// Answers stored without a `question_number` or `question` take them from their position
    /// in the log.
    pub fn into_session(self) -> Result<Session, AppError> {
        let answered = self.recorded_answers.len();
        let total = self.questions_used.len();
        let mut answers = self.recorded_answers;
        for (i, answer) in answers.iter_mut().enumerate() {
            if answer.question_number == 0 {
                answer.question_number = i + 1;
            }
            if answer.question.is_empty() {
                if let Some(question) = self.questions_used.get(i) {
                    answer.question = question.clone();
                }
            }
        }
        Session::from_parts(self.questions_used, answers).ok_or_else(|| {
            AppError::Format(format!(
                "recorded answers ({answered}) do not match the question list ({total})"
            ))
        })
    }
}

/// Where a session was saved and the status it was saved with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSession {
    pub session_file: String,
    pub status: SessionStatus,
}

/// Outcome of saving a derived report. The first report saved for a session wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSave {
    Saved(String),
    AlreadyExists(String),
}

impl ReportSave {
    pub fn report_id(&self) -> &str {
        match self {
            ReportSave::Saved(id) | ReportSave::AlreadyExists(id) => id,
        }
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            ReportSave::Saved(_) => "saved",
            ReportSave::AlreadyExists(_) => "already_exists",
        }
    }
}

#[derive(Clone)]
pub struct SessionArchive {
    store: Arc<FileStore>,
}

impl SessionArchive {
    pub fn new(store: Arc<FileStore>) -> Self {
        Self { store }
    }

    /// Persists the session under a name embedding the current wall-clock second.
    pub fn save_session(&self, session: &Session) -> Result<SavedSession, AppError> {
        self.save_session_at(session, Local::now().naive_local())
    }

    pub fn save_session_at(
        &self,
        session: &Session,
        at: NaiveDateTime,
    ) -> Result<SavedSession, AppError> {
        let name = naming::session_file_name(at);
        let document = PersistedSession::from_session(session, at);
        self.store.write_json(&name, &document)?;
        info!(
            "Saved interview session {name} ({}/{} answered, {:?})",
            document.total_questions_asked,
            document.questions_used.len(),
            document.status
        );
        Ok(SavedSession {
            session_file: name,
            status: document.status,
        })
    }

    pub fn load_session(&self, id: &str) -> Result<PersistedSession, AppError> {
        self.store
            .read_json(id)?
            .ok_or_else(|| AppError::NotFound(format!("Interview session {id} not found")))
    }

    /// Names starting with `prefix`, oldest first.
    pub fn list_sessions(&self, prefix: &str) -> Result<Vec<String>, AppError> {
        Ok(self.store.list(prefix)?)
    }

    /// Saves the report derived from `derived_from`, unless one already exists. An existing
    /// report is never overwritten by a later generation run.
    pub fn save_report(
        &self,
        report: &FeedbackReport,
        derived_from: &str,
    ) -> Result<ReportSave, AppError> {
        let name = derived_report_name(derived_from)?;
        let document = FeedbackReportDocument {
            session_file: Some(derived_from.to_string()),
            analysis_timestamp: Some(Local::now().naive_local()),
            feedback_report: report.clone(),
        };

        if self.store.write_json_new(&name, &document)? {
            info!("Saved feedback report {name} for {derived_from}");
            Ok(ReportSave::Saved(name))
        } else {
            info!("Feedback report {name} already exists; keeping the first one");
            Ok(ReportSave::AlreadyExists(name))
        }
    }

    /// Saves a report that is not tied to a stored session.
    pub fn save_standalone_report(&self, report: &FeedbackReport) -> Result<String, AppError> {
        let now = Local::now().naive_local();
        let name = naming::report_file_name(now);
        let document = FeedbackReportDocument {
            session_file: None,
            analysis_timestamp: Some(now),
            feedback_report: report.clone(),
        };
        self.store.write_json(&name, &document)?;
        info!("Saved feedback report {name}");
        Ok(name)
    }

    pub fn load_report(&self, id: &str) -> Result<FeedbackReportDocument, AppError> {
        self.store
            .read_json(id)?
            .ok_or_else(|| AppError::NotFound(format!("Feedback report {id} not found")))
    }

    /// The stored report derived from `session_id`, if there is a readable one.
    /// A corrupt report is treated as absent.
    pub fn find_report_for_session(
        &self,
        session_id: &str,
    ) -> Result<Option<(String, FeedbackReportDocument)>, AppError> {
        let name = derived_report_name(session_id)?;
        match self.load_report(&name) {
            Ok(document) => Ok(Some((name, document))),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(AppError::Format(msg)) => {
                warn!("Ignoring unreadable report {name}: {msg}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Every report, derived or standalone, oldest first by the timestamp in its name.
    pub fn list_reports(&self) -> Result<Vec<String>, AppError> {
        let mut reports = self.store.list(REPORT_PREFIX)?;
        reports.sort_by(|a, b| naming::compare_report_names(a, b));
        Ok(reports)
    }
}

fn derived_report_name(session_id: &str) -> Result<String, AppError> {
    naming::report_name_for_session(session_id).ok_or_else(|| {
        AppError::Validation(format!(
            "'{session_id}' is not an interview session identifier"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    use crate::store::naming::SESSION_PREFIX;

    fn archive() -> (tempfile::TempDir, Arc<FileStore>, SessionArchive) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path()).unwrap());
        (dir, store.clone(), SessionArchive::new(store))
    }

    fn at(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn answered(n_questions: usize, n_answers: usize) -> Session {
        let questions = (1..=n_questions).map(|i| format!("Q{i}?")).collect();
        let mut session = Session::new(questions);
        for i in 0..n_answers {
            session.record_at(&format!("A{i}"), at(27, 10, 0, i as u32)).unwrap();
        }
        session
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let (_dir, _store, archive) = archive();
        let session = answered(3, 3);

        let saved = archive.save_session_at(&session, at(27, 10, 30, 45)).unwrap();
        assert_eq!(saved.session_file, "interview_session_20250627_103045.json");
        assert_eq!(saved.status, SessionStatus::Completed);
        let id = saved.session_file;

        let loaded = archive.load_session(&id).unwrap();
        assert_eq!(loaded.questions_used, session.questions());
        assert_eq!(loaded.recorded_answers, session.answers());
        assert_eq!(loaded.status, SessionStatus::Completed);
        assert_eq!(loaded.total_questions_asked, 3);
    }

    #[test]
    fn test_partial_session_is_saved_as_paused_and_resumable() {
        let (_dir, _store, archive) = archive();
        let session = answered(4, 1);

        let saved = archive.save_session_at(&session, at(27, 11, 0, 0)).unwrap();
        assert_eq!(saved.status, SessionStatus::Paused);
        let loaded = archive.load_session(&saved.session_file).unwrap();
        assert_eq!(loaded.status, SessionStatus::Paused);
        assert_eq!(loaded.total_questions_asked, 1);

        let resumed = loaded.into_session().unwrap();
        assert_eq!(resumed, session);
    }

    #[test]
    fn test_load_missing_session_is_not_found() {
        let (_dir, _store, archive) = archive();
        let err = archive
            .load_session("interview_session_20250101_000000.json")
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_load_malformed_session_is_format_error() {
        let (_dir, store, archive) = archive();
        store
            .write("interview_session_20250101_000000.json", "{\"questions_used\": [")
            .unwrap();
        let err = archive
            .load_session("interview_session_20250101_000000.json")
            .unwrap_err();
        assert!(matches!(err, AppError::Format(_)));
    }

    #[test]
    fn test_load_tolerates_missing_keys() {
        let (_dir, store, archive) = archive();
        store
            .write_json(
                "interview_session_20250101_000000.json",
                &json!({"questions_used": ["Why Rust?"]}),
            )
            .unwrap();
        let loaded = archive
            .load_session("interview_session_20250101_000000.json")
            .unwrap();
        assert_eq!(loaded.questions_used, vec!["Why Rust?".to_string()]);
        assert!(loaded.recorded_answers.is_empty());
        assert_eq!(loaded.status, SessionStatus::Completed);
        assert!(loaded.timestamp.is_none());
    }

    #[test]
    fn test_reads_session_files_written_by_earlier_versions() {
        let (_dir, store, archive) = archive();
        let legacy = r#"{
          "timestamp": "2025-06-27T10:30:45.123456",
          "total_questions_asked": 1,
          "questions_used": ["Tell me about yourself.", "Why us?"],
          "recorded_answers": [
            {
              "question_number": 1,
              "question": "Tell me about yourself.",
              "answer": "I build things.",
              "timestamp": "2025-06-27T10:29:01.000001"
            }
          ],
          "status": "completed"
        }"#;
        store
            .write("interview_session_20250627_103045.json", legacy)
            .unwrap();

        let loaded = archive
            .load_session("interview_session_20250627_103045.json")
            .unwrap();
        assert_eq!(loaded.recorded_answers[0].index(), 0);
        let resumed = loaded.into_session().unwrap();
        assert_eq!(resumed.cursor(), 1);
    }

    #[test]
    fn test_answers_with_missing_keys_load_and_resume() {
        let (_dir, store, archive) = archive();
        store
            .write_json(
                "interview_session_20250101_000000.json",
                &json!({"recorded_answers": [{"question": "Q?", "answer": "A"}]}),
            )
            .unwrap();
        let loaded = archive
            .load_session("interview_session_20250101_000000.json")
            .unwrap();
        assert_eq!(loaded.recorded_answers[0].answer, "A");
        assert_eq!(loaded.recorded_answers[0].question_number, 0);
        assert!(loaded.recorded_answers[0].timestamp.is_none());

        store
            .write_json(
                "interview_session_20250101_000001.json",
                &json!({
                    "questions_used": ["Q1?", "Q2?", "Q3?"],
                    "recorded_answers": [{"question": "Q1?", "answer": "A"}, {"answer": "B"}]
                }),
            )
            .unwrap();
        let resumed = archive
            .load_session("interview_session_20250101_000001.json")
            .unwrap()
            .into_session()
            .unwrap();
        assert_eq!(resumed.cursor(), 2);
        assert_eq!(resumed.answers()[1].question_number, 2);
        assert_eq!(resumed.answers()[1].question, "Q2?");
    }

    #[test]
    fn test_into_session_rejects_inconsistent_log() {
        let persisted = PersistedSession {
            questions_used: vec![],
            ..PersistedSession::from_session(&answered(1, 1), at(1, 0, 0, 0))
        };
        assert!(matches!(persisted.into_session(), Err(AppError::Format(_))));
    }

    #[test]
    fn test_list_sessions_in_timestamp_order() {
        let (_dir, store, archive) = archive();
        let session = answered(1, 1);
        archive.save_session_at(&session, at(28, 9, 0, 0)).unwrap();
        archive.save_session_at(&session, at(27, 23, 59, 59)).unwrap();
        archive.save_session_at(&session, at(28, 8, 59, 59)).unwrap();
        store.write("research_data.json", "{}").unwrap();

        let ids = archive.list_sessions(SESSION_PREFIX).unwrap();
        assert_eq!(
            ids,
            vec![
                "interview_session_20250627_235959.json".to_string(),
                "interview_session_20250628_085959.json".to_string(),
                "interview_session_20250628_090000.json".to_string(),
            ]
        );
    }

    #[test]
    fn test_save_report_twice_keeps_first() {
        let (_dir, _store, archive) = archive();
        let session_id = "interview_session_20250627_103045.json";
        let first = FeedbackReport {
            total_score: "7/10".to_string(),
            ..FeedbackReport::default()
        };
        let second = FeedbackReport {
            total_score: "3/10".to_string(),
            ..FeedbackReport::default()
        };

        let saved = archive.save_report(&first, session_id).unwrap();
        assert_eq!(
            saved,
            ReportSave::Saved("feedback_report_for_20250627_103045.json".to_string())
        );

        let again = archive.save_report(&second, session_id).unwrap();
        assert_eq!(
            again,
            ReportSave::AlreadyExists("feedback_report_for_20250627_103045.json".to_string())
        );

        let stored = archive.load_report(again.report_id()).unwrap();
        assert_eq!(stored.feedback_report.total_score, "7/10");
        assert_eq!(stored.session_file.as_deref(), Some(session_id));
    }

    #[test]
    fn test_save_report_rejects_non_session_identifier() {
        let (_dir, _store, archive) = archive();
        let err = archive
            .save_report(&FeedbackReport::default(), "research_data.json")
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_find_report_for_session() {
        let (_dir, store, archive) = archive();
        let session_id = "interview_session_20250627_103045.json";
        assert!(archive.find_report_for_session(session_id).unwrap().is_none());

        store
            .write("feedback_report_for_20250627_103045.json", "not json")
            .unwrap();
        assert!(archive.find_report_for_session(session_id).unwrap().is_none());
    }

    #[test]
    fn test_reports_listed_by_embedded_timestamp() {
        let (_dir, store, archive) = archive();
        for name in [
            "feedback_report_20250627_120000.json",
            "feedback_report_for_20250627_090000.json",
            "feedback_report_for_20250628_080000.json",
            "feedback_report_20250627_100000.json",
        ] {
            store.write(name, "{}").unwrap();
        }

        assert_eq!(
            archive.list_reports().unwrap(),
            vec![
                "feedback_report_for_20250627_090000.json".to_string(),
                "feedback_report_20250627_100000.json".to_string(),
                "feedback_report_20250627_120000.json".to_string(),
                "feedback_report_for_20250628_080000.json".to_string(),
            ]
        );
    }

    #[test]
    fn test_standalone_report_is_listed() {
        let (_dir, _store, archive) = archive();
        let id = archive
            .save_standalone_report(&FeedbackReport::no_answers())
            .unwrap();
        assert!(id.starts_with("feedback_report_2"));
        assert_eq!(archive.list_reports().unwrap(), vec![id.clone()]);
        assert_eq!(
            archive.load_report(&id).unwrap().feedback_report,
            FeedbackReport::no_answers()
        );
    }
}
