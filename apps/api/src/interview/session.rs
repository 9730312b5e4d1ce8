//! Interview session state machine.
//!
//! A session is an ordered question list, a cursor into it, and an append-only log of
//! recorded answers. The only mutations are `load` (which also backs `restart`) and `record`,
//! so `answers.len() == cursor <= questions.len()` holds after every call.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("all {total} questions have already been answered")]
    InvalidState { total: usize },
}

/// One recorded answer. Key names match the session files on disk; missing keys default on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedAnswer {
    /// 1-based position of the question in the session. 0 when absent from the file.
    #[serde(default)]
    pub question_number: usize,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

impl RecordedAnswer {
    /// 0-based index of the answered question (the cursor value at record time).
    pub fn index(&self) -> usize {
        self.question_number.saturating_sub(1)
    }
}

/// What the session is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentQuestion<'a> {
    Question { index: usize, text: &'a str },
    /// Every question has been answered. Never a question.
    Complete,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    questions: Vec<String>,
    cursor: usize,
    answers: Vec<RecordedAnswer>,
}

impl Session {
    pub fn new(questions: Vec<String>) -> Self {
        let mut session = Self::default();
        session.load(questions);
        session
    }

    /// Replaces the question list and discards every recorded answer.
    /// An empty list is legal; the session is then immediately complete.
    pub fn load(&mut self, questions: Vec<String>) {
        self.questions = questions;
        self.cursor = 0;
        self.answers.clear();
    }

    /// Starts over with the same question list.
    pub fn restart(&mut self) {
        let questions = std::mem::take(&mut self.questions);
        self.load(questions);
    }

    pub fn current(&self) -> CurrentQuestion<'_> {
        match self.questions.get(self.cursor) {
            Some(text) => CurrentQuestion::Question {
                index: self.cursor,
                text,
            },
            None => CurrentQuestion::Complete,
        }
    }

    /// Records an answer to the current question and advances the cursor.
    pub fn record(&mut self, answer: &str) -> Result<&RecordedAnswer, SessionError> {
        self.record_at(answer, Local::now().naive_local())
    }

    pub fn record_at(
        &mut self,
        answer: &str,
        timestamp: NaiveDateTime,
    ) -> Result<&RecordedAnswer, SessionError> {
        let Some(question) = self.questions.get(self.cursor) else {
            return Err(SessionError::InvalidState {
                total: self.questions.len(),
            });
        };

        self.answers.push(RecordedAnswer {
            question_number: self.cursor + 1,
            question: question.clone(),
            answer: answer.to_string(),
            timestamp: Some(timestamp),
        });
        self.cursor += 1;

        Ok(&self.answers[self.answers.len() - 1])
    }

    pub fn is_complete(&self) -> bool {
        self.cursor == self.questions.len()
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn answers(&self) -> &[RecordedAnswer] {
        &self.answers
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Rebuilds a session from a persisted question list and answer log, positioned after the
    /// last recorded answer. Returns `None` if the log cannot belong to the list.
    pub(crate) fn from_parts(questions: Vec<String>, answers: Vec<RecordedAnswer>) -> Option<Self> {
        if answers.len() > questions.len() {
            return None;
        }
        let consistent = answers
            .iter()
            .enumerate()
            .all(|(i, a)| a.index() == i && a.question == questions[i]);
        if !consistent {
            return None;
        }
        Some(Self {
            cursor: answers.len(),
            questions,
            answers,
        })
    }
}
