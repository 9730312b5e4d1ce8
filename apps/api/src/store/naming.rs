//! File naming conventions. These names are shared with existing data directories and must
//! stay bit-exact.
//!
//! Timestamps are fixed-width, zero-padded `YYYYMMDD_HHMMSS`, so lexical order of names equals
//! chronological order.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

pub const SESSION_PREFIX: &str = "interview_session";
pub const REPORT_PREFIX: &str = "feedback_report";
const DERIVED_REPORT_PREFIX: &str = "feedback_report_for";
const EXTENSION: &str = ".json";

pub const RESEARCH_FILE: &str = "research_data.json";
pub const QUESTIONS_FILE: &str = "interview_questions.json";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub fn timestamp_token(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// `interview_session_<YYYYMMDD>_<HHMMSS>.json`
pub fn session_file_name(at: NaiveDateTime) -> String {
    format!("{SESSION_PREFIX}_{}{EXTENSION}", timestamp_token(at))
}

/// `feedback_report_<YYYYMMDD>_<HHMMSS>.json`
pub fn report_file_name(at: NaiveDateTime) -> String {
    format!("{REPORT_PREFIX}_{}{EXTENSION}", timestamp_token(at))
}

/// Derives `feedback_report_for_<ts>.json` from `interview_session_<ts>.json`.
/// Returns `None` when `session_file` does not follow the session naming convention.
pub fn report_name_for_session(session_file: &str) -> Option<String> {
    let token = session_timestamp_token(session_file)?;
    Some(format!("{DERIVED_REPORT_PREFIX}_{token}{EXTENSION}"))
}

/// The `<YYYYMMDD>_<HHMMSS>` part of a session file name, if it is well formed.
pub fn session_timestamp_token(session_file: &str) -> Option<&str> {
    let token = session_file
        .strip_prefix(SESSION_PREFIX)?
        .strip_prefix('_')?
        .strip_suffix(EXTENSION)?;
    NaiveDateTime::parse_from_str(token, TIMESTAMP_FORMAT).ok()?;
    Some(token)
}

/// The `<YYYYMMDD>_<HHMMSS>` part of a report file name, derived or standalone.
pub fn report_timestamp_token(report_file: &str) -> Option<&str> {
    let rest = report_file.strip_prefix(REPORT_PREFIX)?.strip_prefix('_')?;
    let rest = rest.strip_prefix("for_").unwrap_or(rest);
    let token = rest.strip_suffix(EXTENSION)?;
    NaiveDateTime::parse_from_str(token, TIMESTAMP_FORMAT).ok()?;
    Some(token)
}

/// Orders report names by the timestamp they embed, whichever naming form they use.
/// Names without a timestamp sort first; ties fall back to the full name.
pub fn compare_report_names(a: &str, b: &str) -> Ordering {
    (report_timestamp_token(a), a).cmp(&(report_timestamp_token(b), b))
}
