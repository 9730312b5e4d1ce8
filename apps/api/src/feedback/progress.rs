//! Progress across stored feedback reports.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::feedback::report::FeedbackReportDocument;
use crate::store::naming::compare_report_names;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressRow {
    pub report_id: String,
    pub session_file: Option<String>,
    pub analysis_timestamp: Option<NaiveDateTime>,
    pub total_score: String,
    pub performance_level: String,
    /// `total_score` on a 10-point scale, when it parses as `N/M`.
    pub normalized_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub total_reports: usize,
    pub scored_reports: usize,
    pub average_score: Option<f64>,
    pub reports: Vec<ProgressRow>,
}

/// Summarizes `(report_id, document)` pairs. Rows come back in creation order, by the
/// timestamp embedded in each identifier.
pub fn summarize(documents: Vec<(String, FeedbackReportDocument)>) -> ProgressSummary {
    let mut reports: Vec<ProgressRow> = documents
        .into_iter()
        .map(|(report_id, document)| {
            let report = document.feedback_report;
            ProgressRow {
                normalized_score: parse_score(&report.total_score),
                report_id,
                session_file: document.session_file,
                analysis_timestamp: document.analysis_timestamp,
                total_score: report.total_score,
                performance_level: report.performance_level,
            }
        })
        .collect();
    reports.sort_by(|a, b| compare_report_names(&a.report_id, &b.report_id));

    let scores: Vec<f64> = reports.iter().filter_map(|r| r.normalized_score).collect();
    let average_score = (!scores.is_empty())
        .then(|| round_tenth(scores.iter().sum::<f64>() / scores.len() as f64));

    ProgressSummary {
        total_reports: reports.len(),
        scored_reports: scores.len(),
        average_score,
        reports,
    }
}

/// `"8.5/10"` → 8.5, `"4/5"` → 8.0. Anything else (`"N/A"`, `"Error"`) → `None`.
fn parse_score(score: &str) -> Option<f64> {
    let (value, scale) = score.split_once('/')?;
    let value: f64 = value.trim().parse().ok()?;
    let scale: f64 = scale.trim().parse().ok()?;
    if !value.is_finite() || !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    Some(round_tenth(value / scale * 10.0))
}

fn round_tenth(n: f64) -> f64 {
    (n * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::report::FeedbackReport;

    fn doc(total_score: &str) -> FeedbackReportDocument {
        FeedbackReportDocument {
            session_file: None,
            analysis_timestamp: None,
            feedback_report: FeedbackReport {
                total_score: total_score.to_string(),
                ..FeedbackReport::default()
            },
        }
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("8.5/10"), Some(8.5));
        assert_eq!(parse_score("4/5"), Some(8.0));
        assert_eq!(parse_score(" 7 / 10 "), Some(7.0));
        assert_eq!(parse_score("N/A"), None);
        assert_eq!(parse_score("Error"), None);
        assert_eq!(parse_score("3/0"), None);
    }

    #[test]
    fn test_summary_averages_only_parseable_scores() {
        let summary = summarize(vec![
            ("feedback_report_for_20250628_090000.json".to_string(), doc("6/10")),
            ("feedback_report_20250627_090000.json".to_string(), doc("Error")),
            ("feedback_report_for_20250627_100000.json".to_string(), doc("9/10")),
        ]);

        assert_eq!(summary.total_reports, 3);
        assert_eq!(summary.scored_reports, 2);
        assert_eq!(summary.average_score, Some(7.5));
        assert_eq!(
            summary.reports[0].report_id,
            "feedback_report_20250627_090000.json"
        );
        assert_eq!(summary.reports[0].normalized_score, None);
    }

    #[test]
    fn test_rows_follow_timestamps_across_naming_forms() {
        let summary = summarize(vec![
            ("feedback_report_20250627_110000.json".to_string(), doc("5/10")),
            ("feedback_report_for_20250627_080000.json".to_string(), doc("7/10")),
        ]);
        let ids: Vec<&str> = summary.reports.iter().map(|r| r.report_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "feedback_report_for_20250627_080000.json",
                "feedback_report_20250627_110000.json"
            ]
        );
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize(Vec::new());
        assert_eq!(summary.total_reports, 0);
        assert_eq!(summary.average_score, None);
    }
}
