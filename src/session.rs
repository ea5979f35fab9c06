use std::sync::Arc;

use tracing::{error, info};

use crate::content::{ContentRecord, CreditsRecord, MediaKind};
use crate::error::Result;
use crate::pipeline::{ReentryPolicy, TranslatedRecord, TranslationOrchestrator};
use crate::retrieval::ContentSource;

/// Shown when the user tries to leave while a run is in flight
pub const LEAVE_WARNING: &str = "Translation is in progress. Are you sure you want to leave? \
This will cancel the translation and you may be charged for the API call.";

/// Answer to a request made while a translation is still running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InFlightChoice {
    /// Cancel the running pass and leave the view
    CancelAndLeave,
    /// Supersede the running pass with a fresh one
    Restart,
    /// Keep the running pass
    Continue,
}

/// Outcome of [`DetailSession::leave`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveCheck {
    Clear,
    ConfirmRequired(&'static str),
}

/// State of one detail view: the loaded record and its translation runs
pub struct DetailSession {
    source: Arc<dyn ContentSource>,
    orchestrator: Arc<TranslationOrchestrator>,
    loaded: Option<(ContentRecord, CreditsRecord)>,
    custom_instructions: String,
}

impl DetailSession {
    pub fn new(source: Arc<dyn ContentSource>, orchestrator: Arc<TranslationOrchestrator>) -> Self {
        Self {
            source,
            orchestrator,
            loaded: None,
            custom_instructions: String::new(),
        }
    }

    /// Fetch a record; on failure the view holds no record
    pub async fn load(&mut self, kind: MediaKind, id: u64) -> Result<&ContentRecord> {
        self.loaded = None;
        match self.source.fetch_details(kind, id).await {
            Ok(loaded) => {
                info!("Loaded {} {}", kind, id);
                let (record, _) = self.loaded.insert(loaded);
                Ok(record)
            }
            Err(e) => {
                error!("Error fetching content details: {}", e);
                Err(e)
            }
        }
    }

    pub fn record(&self) -> Option<&ContentRecord> {
        self.loaded.as_ref().map(|(record, _)| record)
    }

    fn credits(&self) -> Option<&CreditsRecord> {
        self.loaded.as_ref().map(|(_, credits)| credits)
    }

    pub fn orchestrator(&self) -> &Arc<TranslationOrchestrator> {
        &self.orchestrator
    }

    pub fn set_custom_instructions(&mut self, instructions: impl Into<String>) {
        self.custom_instructions = instructions.into();
    }

    /// Translate the loaded record
    pub async fn translate(&self, policy: ReentryPolicy) -> Result<TranslatedRecord> {
        let empty = CreditsRecord::default();
        let credits = self.credits().unwrap_or(&empty);
        self.orchestrator
            .run_with(policy, self.record(), credits, &self.custom_instructions)
            .await
    }

    /// Apply the user's answer to a translate request made mid-run.
    ///
    /// Returns `None` when no new pass was started.
    pub async fn resolve_in_flight(&self, choice: InFlightChoice) -> Option<Result<TranslatedRecord>> {
        match choice {
            InFlightChoice::CancelAndLeave => {
                self.orchestrator.cancel();
                None
            }
            InFlightChoice::Restart => Some(self.translate(ReentryPolicy::Restart).await),
            InFlightChoice::Continue => None,
        }
    }

    pub fn leave(&self) -> LeaveCheck {
        if self.orchestrator.in_flight() {
            LeaveCheck::ConfirmRequired(LEAVE_WARNING)
        } else {
            LeaveCheck::Clear
        }
    }
}
