// SPDX-License-Identifier: MIT

//! Evaluation session state
//!
//! [`EvalSession`] owns everything the user has assembled for one screening
//! run: the résumé files, the keyword list, the latest results and the
//! status banners. Mutations are small synchronous methods; [`EvalSession::submit`]
//! is the one async operation and never returns an error, all failure ends
//! up in the status fields.

use tracing::{info, warn};

use crate::client::Evaluator;
use crate::normalize::{normalize, ResultRow};

/// Shown when submitting without any files
pub const MSG_FILES_REQUIRED: &str =
    "Add at least one résumé file (PDF/DOCX/TXT) before submitting.";
/// Shown when submitting without any keywords
pub const MSG_KEYWORDS_REQUIRED: &str = "Add at least one keyword before submitting.";
/// Shown after a successful evaluation
pub const MSG_SUCCESS: &str = "Evaluation completed successfully.";

/// One résumé pending submission: a filename plus opaque bytes
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// User-visible status of the session
#[derive(Debug, Clone, Default)]
pub struct ViewStatus {
    /// A submission is in flight
    pub loading: bool,
    /// Error banner; mutually exclusive with `success_msg`
    pub error_msg: String,
    /// Success banner; mutually exclusive with `error_msg`
    pub success_msg: String,
    /// At least one submission has been attempted since the last file reset
    pub has_run: bool,
}

impl ViewStatus {
    fn set_error(&mut self, msg: impl Into<String>) {
        self.error_msg = msg.into();
        self.success_msg.clear();
    }

    fn set_success(&mut self, msg: impl Into<String>) {
        self.success_msg = msg.into();
        self.error_msg.clear();
    }
}

/// How a submission attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Rejected before any network call (empty files or keywords)
    Rejected,
    /// A previous submission is still in flight; nothing was changed
    Busy,
    /// Transport, server, or response-shape failure
    Failed,
    /// Results were replaced with a non-empty ranked list
    Succeeded,
}

/// Session state for one screening run
#[derive(Default)]
pub struct EvalSession {
    files: Vec<ResumeFile>,
    keywords: Vec<String>,
    results: Vec<ResultRow>,
    pub status: ViewStatus,
}

impl EvalSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append files to the upload set. Duplicates are allowed; order is
    /// preserved. Adding nothing is a no-op.
    pub fn add_files(&mut self, new_files: Vec<ResumeFile>) {
        if new_files.is_empty() {
            return;
        }
        let count = new_files.len();
        self.files.extend(new_files);
        self.status.set_success(format!("{} file(s) added.", count));
    }

    /// Remove one file by position. Out-of-range indices are ignored.
    pub fn remove_file(&mut self, index: usize) {
        if index < self.files.len() {
            self.files.remove(index);
        }
    }

    /// Clear the upload set, along with prior results and the has-run flag
    pub fn clear_files(&mut self) {
        self.files.clear();
        self.results.clear();
        self.status.has_run = false;
    }

    /// Add a keyword. Input is trimmed; empty or already-present (exact
    /// match) keywords are ignored.
    pub fn add_keyword(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() || self.keywords.iter().any(|k| k == text) {
            return;
        }
        self.keywords.push(text.to_string());
    }

    /// Add a keyword from the suggestion list (no trimming, same dedupe)
    pub fn add_suggestion(&mut self, suggestion: &str) {
        if !self.keywords.iter().any(|k| k == suggestion) {
            self.keywords.push(suggestion.to_string());
        }
    }

    /// Remove one keyword by position. Out-of-range indices are ignored.
    pub fn remove_keyword(&mut self, index: usize) {
        if index < self.keywords.len() {
            self.keywords.remove(index);
        }
    }

    pub fn clear_keywords(&mut self) {
        self.keywords.clear();
    }

    pub fn files(&self) -> &[ResumeFile] {
        &self.files
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn results(&self) -> &[ResultRow] {
        &self.results
    }

    /// Submit the current files and keywords for evaluation.
    ///
    /// Validates non-emptiness before any network call, then delegates to
    /// the evaluator and replaces the result list wholesale. A submission
    /// while one is already in flight is rejected with [`SubmitOutcome::Busy`]
    /// without touching the in-flight attempt's state.
    pub async fn submit(&mut self, evaluator: &dyn Evaluator) -> SubmitOutcome {
        if self.status.loading {
            warn!("Submission rejected: another evaluation is in flight");
            return SubmitOutcome::Busy;
        }

        self.status.error_msg.clear();
        self.status.success_msg.clear();
        self.results.clear();
        self.status.has_run = true;

        if self.files.is_empty() {
            self.status.set_error(MSG_FILES_REQUIRED);
            return SubmitOutcome::Rejected;
        }
        if self.keywords.is_empty() {
            self.status.set_error(MSG_KEYWORDS_REQUIRED);
            return SubmitOutcome::Rejected;
        }

        self.status.loading = true;
        info!(
            "Evaluating {} file(s) against {} keyword(s)",
            self.files.len(),
            self.keywords.len()
        );

        let outcome = evaluator.evaluate(&self.files, &self.keywords).await;
        self.status.loading = false;

        match outcome.and_then(normalize) {
            Ok(rows) => {
                info!("Evaluation produced {} result(s)", rows.len());
                self.results = rows;
                self.status.set_success(MSG_SUCCESS);
                SubmitOutcome::Succeeded
            }
            Err(e) => {
                warn!("Evaluation failed: {}", e);
                self.status.set_error(e.user_message());
                SubmitOutcome::Failed
            }
        }
    }
}
