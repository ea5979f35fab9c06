use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::classify::{is_translatable, is_translatable_text};
use super::progress::ProgressTracker;
use super::record::{TranslatedCast, TranslatedCrew, TranslatedRecord};
use super::run::{PipelineRun, RunState};
use crate::config::CancelMode;
use crate::content::{ContentRecord, CreditsRecord, ScalarField};
use crate::error::{Result, TarjomeError, TranslationError};
use crate::translate::Translator;

/// What to do when a run is requested while another is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReentryPolicy {
    /// Supersede the running pass and start over
    Restart,
    /// Reject the request and leave the running pass alone
    Refuse,
}

/// Candidate scalar fields of `record`, in pass order
pub fn candidate_fields(record: &ContentRecord) -> Vec<(ScalarField, Value)> {
    ScalarField::ALL
        .iter()
        .filter_map(|field| field.value_in(record).map(|value| (*field, value)))
        .collect()
}

/// Number of units one pass over `record` will process
pub fn count_units(record: &ContentRecord, credits: &CreditsRecord) -> usize {
    candidate_fields(record).len()
        + credits.cast.len()
        + credits.crew.len()
        + record.genres().len()
        + record.production_companies().len()
        + record.spoken_languages().len()
}

struct ActiveRun {
    id: Uuid,
    token: CancellationToken,
}

/// Frees the active slot when a pass is dropped before it finishes
struct RunGuard<'o> {
    orchestrator: &'o TranslationOrchestrator,
    id: Uuid,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let mut active = self.orchestrator.lock_active();
        if matches!(active.as_ref(), Some(run) if run.id == self.id) {
            *active = None;
            debug!("Translation run {} dropped before finishing", self.id);
            self.orchestrator
                .status
                .send_modify(|snapshot| snapshot.state = RunState::Cancelled);
        }
    }
}

/// Per-pass state owned by the task executing the pass
struct RunContext<'a> {
    id: Uuid,
    token: CancellationToken,
    instructions: &'a str,
    tracker: ProgressTracker,
    failed: usize,
}

impl RunContext<'_> {
    fn style(&self) -> Option<&str> {
        Some(self.instructions).filter(|s| !s.trim().is_empty())
    }
}

/// Runs translation passes over content records, one at a time.
///
/// Units are translated strictly in sequence: scalar fields, cast, crew,
/// genres, production companies, spoken languages. Progress is published on a
/// watch channel after every unit. Starting a run while another is in flight
/// either supersedes it or is refused, depending on the [`ReentryPolicy`].
pub struct TranslationOrchestrator {
    translator: Arc<dyn Translator>,
    temperature: f32,
    cancel_mode: CancelMode,
    active: Mutex<Option<ActiveRun>>,
    status: watch::Sender<PipelineRun>,
}

impl TranslationOrchestrator {
    pub fn new(translator: Arc<dyn Translator>, temperature: f32, cancel_mode: CancelMode) -> Self {
        let (status, _) = watch::channel(PipelineRun::idle());
        Self {
            translator,
            temperature,
            cancel_mode,
            active: Mutex::new(None),
            status,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PipelineRun> {
        self.status.subscribe()
    }

    /// Latest published snapshot
    pub fn progress(&self) -> PipelineRun {
        self.status.borrow().clone()
    }

    pub fn in_flight(&self) -> bool {
        self.lock_active().is_some()
    }

    /// Cancel the run in flight, if any.
    ///
    /// The pass stops at its next unit boundary. In `abort` mode the remote
    /// call in progress is dropped as well.
    pub fn cancel(&self) -> bool {
        let mut active = self.lock_active();
        let Some(run) = active.take() else {
            return false;
        };
        run.token.cancel();
        info!("Cancelled translation run {}", run.id);
        self.status.send_modify(|snapshot| snapshot.state = RunState::Cancelled);
        true
    }

    /// Translate `record`, superseding any run still in flight
    pub async fn run(
        &self,
        record: Option<&ContentRecord>,
        credits: &CreditsRecord,
        custom_instructions: &str,
    ) -> Result<TranslatedRecord> {
        self.run_with(ReentryPolicy::Restart, record, credits, custom_instructions).await
    }

    pub async fn run_with(
        &self,
        policy: ReentryPolicy,
        record: Option<&ContentRecord>,
        credits: &CreditsRecord,
        custom_instructions: &str,
    ) -> Result<TranslatedRecord> {
        let record = match self.check_preconditions(record) {
            Ok(record) => record,
            Err(e) => {
                self.report_failure(&e, custom_instructions);
                return Err(e);
            }
        };

        let fields = candidate_fields(record);
        let total = count_units(record, credits);

        let mut ctx = self.register(policy, total, custom_instructions)?;
        let _release = RunGuard { orchestrator: self, id: ctx.id };
        info!(
            "Starting translation run {} for {} {} ({} units)",
            ctx.id,
            record.kind(),
            record.id(),
            total
        );

        let mut translated = TranslatedRecord::default();
        if total > 0 {
            self.translate_fields(&fields, &mut translated, &mut ctx).await?;
            self.translate_cast(credits, &mut translated, &mut ctx).await?;
            self.translate_crew(credits, &mut translated, &mut ctx).await?;
            let genres: Vec<String> = record.genres().iter().map(|g| g.name.clone()).collect();
            let companies: Vec<String> = record.production_companies().iter().map(|c| c.name.clone()).collect();
            let languages: Vec<String> = record.spoken_languages().iter().map(|l| l.display_name()).collect();
            translated.genres = self.translate_list(genres, "genre", &mut ctx).await?;
            translated.companies = self.translate_list(companies, "company", &mut ctx).await?;
            translated.languages = self.translate_list(languages, "language", &mut ctx).await?;
        }

        self.finish(&ctx)?;
        info!(
            "Translation run {} completed: {} units, {} fell back to the original",
            ctx.id, total, ctx.failed
        );
        Ok(translated)
    }

    fn check_preconditions<'r>(&self, record: Option<&'r ContentRecord>) -> Result<&'r ContentRecord> {
        let record = record.ok_or(TarjomeError::NoContent)?;
        self.translator.ensure_ready()?;
        Ok(record)
    }

    /// Publish a pipeline-level failure unless another run owns the status
    fn report_failure(&self, error: &TarjomeError, custom_instructions: &str) {
        warn!("Translation failed: {}", error);
        let active = self.lock_active();
        if active.is_none() {
            self.status.send_replace(PipelineRun {
                state: RunState::Failed,
                custom_instructions: custom_instructions.to_string(),
                error: Some(error.to_string()),
                ..PipelineRun::idle()
            });
        }
    }

    fn register<'a>(
        &self,
        policy: ReentryPolicy,
        total: usize,
        instructions: &'a str,
    ) -> Result<RunContext<'a>> {
        let mut active = self.lock_active();
        if let Some(previous) = active.as_ref() {
            match policy {
                ReentryPolicy::Refuse => return Err(TarjomeError::RunInFlight),
                ReentryPolicy::Restart => {
                    info!("Superseding translation run {}", previous.id);
                    previous.token.cancel();
                }
            }
        }

        let id = Uuid::new_v4();
        let token = CancellationToken::new();
        *active = Some(ActiveRun { id, token: token.clone() });

        let mut tracker = ProgressTracker::new();
        tracker.begin(total);
        self.status.send_replace(PipelineRun {
            id: Some(id),
            state: RunState::Running,
            completed_units: 0,
            total_units: total,
            failed_units: 0,
            custom_instructions: instructions.to_string(),
            error: None,
        });

        Ok(RunContext { id, token, instructions, tracker, failed: 0 })
    }

    fn finish(&self, ctx: &RunContext<'_>) -> Result<()> {
        let mut active = self.lock_active();
        match active.as_ref() {
            Some(run) if run.id == ctx.id => {
                *active = None;
                self.status.send_modify(|snapshot| {
                    snapshot.state = RunState::Completed;
                    snapshot.completed_units = ctx.tracker.completed();
                    snapshot.failed_units = ctx.failed;
                });
                Ok(())
            }
            _ => Err(TarjomeError::Cancelled),
        }
    }

    /// Stop here if the run was cancelled or superseded
    fn checkpoint(&self, ctx: &RunContext<'_>) -> Result<()> {
        if ctx.token.is_cancelled() {
            debug!("Translation run {} stopped at a unit boundary", ctx.id);
            return Err(TarjomeError::Cancelled);
        }
        Ok(())
    }

    /// Count one finished unit and publish it if the run is still current
    fn advance(&self, ctx: &mut RunContext<'_>) {
        let percent = ctx.tracker.advance();
        let active = self.lock_active();
        if matches!(active.as_ref(), Some(run) if run.id == ctx.id) {
            let (completed, failed) = (ctx.tracker.completed(), ctx.failed);
            self.status.send_modify(|snapshot| {
                snapshot.completed_units = completed;
                snapshot.failed_units = failed;
            });
        }
        debug!("Translation run {} at {:.1}%", ctx.id, percent);
    }

    /// One remote call. The outer error is cancellation, the inner one the call's failure.
    async fn call(
        &self,
        text: &str,
        ctx: &RunContext<'_>,
    ) -> Result<std::result::Result<String, TranslationError>> {
        let request = self.translator.translate(text, ctx.style(), self.temperature);
        match self.cancel_mode {
            CancelMode::Cosmetic => Ok(request.await),
            CancelMode::Abort => tokio::select! {
                _ = ctx.token.cancelled() => {
                    debug!("Dropped in-flight translation call for run {}", ctx.id);
                    Err(TarjomeError::Cancelled)
                }
                result = request => Ok(result),
            },
        }
    }

    /// Translate `text`, keeping it unchanged when ineligible or when the call fails
    async fn translate_or_original(&self, text: &str, what: &str, ctx: &mut RunContext<'_>) -> Result<String> {
        if !is_translatable_text(text) {
            return Ok(text.to_string());
        }
        match self.call(text.trim(), ctx).await? {
            Ok(translation) => Ok(translation),
            Err(e) => {
                ctx.failed += 1;
                warn!("Failed to translate {} '{}': {}", what, text, e);
                Ok(text.to_string())
            }
        }
    }

    async fn translate_fields(
        &self,
        fields: &[(ScalarField, Value)],
        translated: &mut TranslatedRecord,
        ctx: &mut RunContext<'_>,
    ) -> Result<()> {
        for (field, value) in fields {
            self.checkpoint(ctx)?;
            if let Some(text) = value.as_str().filter(|_| is_translatable(Some(value))) {
                match self.call(text.trim(), ctx).await? {
                    Ok(translation) => {
                        translated.fields.insert(field.output_key().to_string(), translation);
                    }
                    Err(e) => {
                        ctx.failed += 1;
                        warn!("Failed to translate field {}: {}", field.output_key(), e);
                    }
                }
            }
            self.advance(ctx);
        }
        Ok(())
    }

    async fn translate_cast(
        &self,
        credits: &CreditsRecord,
        translated: &mut TranslatedRecord,
        ctx: &mut RunContext<'_>,
    ) -> Result<()> {
        for member in &credits.cast {
            self.checkpoint(ctx)?;
            let translated_name = self.translate_or_original(&member.name, "cast name", ctx).await?;
            let translated_character = match member.character.as_deref() {
                Some(character) => Some(self.translate_or_original(character, "character", ctx).await?),
                None => None,
            };
            translated.cast.push(TranslatedCast {
                id: member.id,
                original_name: member.name.clone(),
                translated_name,
                original_character: member.character.clone(),
                translated_character,
                media: member.media_ref(),
            });
            self.advance(ctx);
        }
        Ok(())
    }

    async fn translate_crew(
        &self,
        credits: &CreditsRecord,
        translated: &mut TranslatedRecord,
        ctx: &mut RunContext<'_>,
    ) -> Result<()> {
        for member in &credits.crew {
            self.checkpoint(ctx)?;
            let translated_name = self.translate_or_original(&member.name, "crew name", ctx).await?;
            let translated_job = self.translate_or_original(&member.job, "job", ctx).await?;
            translated.crew.push(TranslatedCrew {
                id: member.id,
                original_name: member.name.clone(),
                translated_name,
                original_job: member.job.clone(),
                translated_job,
            });
            self.advance(ctx);
        }
        Ok(())
    }

    async fn translate_list(&self, names: Vec<String>, what: &str, ctx: &mut RunContext<'_>) -> Result<Vec<String>> {
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            self.checkpoint(ctx)?;
            out.push(self.translate_or_original(&name, what, ctx).await?);
            self.advance(ctx);
        }
        Ok(out)
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<ActiveRun>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{CastMember, CrewMember, Genre, MovieDetails, PersonDetails, ProductionCompany, SpokenLanguage};
    use crate::error::CredentialKind;
    use crate::testing::ScriptedTranslator;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Blocks its first call until released
    struct GatedTranslator {
        gated: AtomicBool,
        started: Notify,
        release: Notify,
        calls: Mutex<Vec<String>>,
    }

    impl GatedTranslator {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                gated: AtomicBool::new(true),
                started: Notify::new(),
                release: Notify::new(),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Translator for GatedTranslator {
        fn ensure_ready(&self) -> Result<()> {
            Ok(())
        }

        async fn translate(
            &self,
            text: &str,
            _style_instructions: Option<&str>,
            _temperature: f32,
        ) -> std::result::Result<String, TranslationError> {
            self.calls.lock().unwrap().push(text.to_string());
            if self.gated.swap(false, Ordering::SeqCst) {
                self.started.notify_one();
                self.release.notified().await;
            }
            Ok(format!("fa:{}", text))
        }
    }

    fn test_film() -> (ContentRecord, CreditsRecord) {
        let record = ContentRecord::Movie(MovieDetails {
            id: 1,
            title: Some("Test Film".to_string()),
            overview: Some("A story.".to_string()),
            genres: vec![Genre { id: 1, name: "Drama".to_string() }],
            ..Default::default()
        });
        let credits = CreditsRecord {
            cast: vec![CastMember {
                id: 7,
                name: "Jane Roe".to_string(),
                character: Some("Lead".to_string()),
                media_type: None,
            }],
            crew: vec![],
        };
        (record, credits)
    }

    fn full_movie() -> (ContentRecord, CreditsRecord) {
        let record = ContentRecord::Movie(MovieDetails {
            id: 2,
            title: Some("Heat".to_string()),
            status: Some("Released".to_string()),
            tagline: Some("Unknown".to_string()),
            budget: Some(60_000_000),
            genres: vec![
                Genre { id: 80, name: "Crime".to_string() },
                Genre { id: 18, name: "Drama".to_string() },
            ],
            production_companies: vec![ProductionCompany {
                id: 508,
                name: "Regency Enterprises".to_string(),
                origin_country: Some("US".to_string()),
            }],
            spoken_languages: vec![SpokenLanguage {
                english_name: Some("English".to_string()),
                iso_639_1: Some("en".to_string()),
                name: Some("English".to_string()),
            }],
            ..Default::default()
        });
        let credits = CreditsRecord {
            cast: vec![
                CastMember { id: 1158, name: "Al Pacino".to_string(), character: Some("Vincent Hanna".to_string()), media_type: None },
                CastMember { id: 380, name: "Robert De Niro".to_string(), character: None, media_type: None },
            ],
            crew: vec![CrewMember {
                id: 638,
                name: "Michael Mann".to_string(),
                job: "Director".to_string(),
                department: Some("Directing".to_string()),
            }],
        };
        (record, credits)
    }

    #[tokio::test]
    async fn test_end_to_end_test_film() {
        let translator = ScriptedTranslator::new(|_| false);
        let orchestrator = TranslationOrchestrator::new(translator.clone(), 0.3, CancelMode::Cosmetic);
        let (record, credits) = test_film();

        assert_eq!(count_units(&record, &credits), 4);
        let out = orchestrator.run(Some(&record), &credits, "").await.unwrap();

        assert_eq!(
            translator.texts(),
            vec!["Test Film", "A story.", "Jane Roe", "Lead", "Drama"]
        );
        assert_eq!(out.field(ScalarField::Title), Some("fa:Test Film"));
        assert_eq!(out.field(ScalarField::Overview), Some("fa:A story."));
        assert_eq!(out.genres, vec!["fa:Drama"]);
        assert_eq!(out.cast[0].translated_name, "fa:Jane Roe");
        assert_eq!(out.cast[0].translated_character.as_deref(), Some("fa:Lead"));

        let snapshot = orchestrator.progress();
        assert_eq!(snapshot.state, RunState::Completed);
        assert_eq!(snapshot.total_units, 4);
        assert_eq!(snapshot.completed_units, 4);
        assert_eq!(snapshot.percent(), 100.0);
        assert!(!orchestrator.in_flight());
    }

    #[tokio::test]
    async fn test_unit_order_and_skipped_fields() {
        let translator = ScriptedTranslator::new(|_| false);
        let orchestrator = TranslationOrchestrator::new(translator.clone(), 0.3, CancelMode::Cosmetic);
        let (record, credits) = full_movie();

        // title, status, tagline, budget + 2 cast + 1 crew + 2 genres + 1 company + 1 language
        assert_eq!(count_units(&record, &credits), 11);
        let out = orchestrator.run(Some(&record), &credits, "").await.unwrap();

        assert_eq!(
            translator.texts(),
            vec![
                "Heat", "Released", "Al Pacino", "Vincent Hanna", "Robert De Niro",
                "Michael Mann", "Director", "Crime", "Drama", "Regency Enterprises", "English",
            ]
        );
        assert_eq!(out.field(ScalarField::Tagline), None);
        assert_eq!(out.field(ScalarField::Budget), None);
        assert_eq!(out.cast[1].translated_character, None);
        assert_eq!(out.crew[0].translated_job, "fa:Director");
        assert_eq!(out.companies, vec!["fa:Regency Enterprises"]);
        assert_eq!(out.languages, vec!["fa:English"]);
        assert_eq!(orchestrator.progress().completed_units, 11);
    }

    #[tokio::test]
    async fn test_every_call_failing_keeps_originals() {
        let translator = ScriptedTranslator::new(|_| true);
        let orchestrator = TranslationOrchestrator::new(translator.clone(), 0.3, CancelMode::Cosmetic);
        let (record, credits) = full_movie();

        let out = orchestrator.run(Some(&record), &credits, "").await.unwrap();

        assert!(out.fields.is_empty());
        assert_eq!(out.genres, vec!["Crime", "Drama"]);
        assert_eq!(out.companies, vec!["Regency Enterprises"]);
        assert_eq!(out.languages, vec!["English"]);
        assert_eq!(out.cast[0].translated_name, "Al Pacino");
        assert_eq!(out.cast[0].translated_character.as_deref(), Some("Vincent Hanna"));
        assert_eq!(out.crew[0].translated_name, "Michael Mann");
        assert_eq!(out.crew[0].translated_job, "Director");

        let snapshot = orchestrator.progress();
        assert_eq!(snapshot.state, RunState::Completed);
        assert_eq!(snapshot.percent(), 100.0);
        assert_eq!(snapshot.failed_units, translator.texts().len());
    }

    #[tokio::test]
    async fn test_cast_sub_calls_fail_independently() {
        let translator = ScriptedTranslator::new(|text| text == "Lead");
        let orchestrator = TranslationOrchestrator::new(translator, 0.3, CancelMode::Cosmetic);
        let (record, credits) = test_film();

        let out = orchestrator.run(Some(&record), &credits, "").await.unwrap();
        assert_eq!(out.cast[0].translated_name, "fa:Jane Roe");
        assert_eq!(out.cast[0].translated_character.as_deref(), Some("Lead"));
    }

    #[tokio::test]
    async fn test_zero_unit_record_completes_immediately() {
        let translator = ScriptedTranslator::new(|_| false);
        let orchestrator = TranslationOrchestrator::new(translator.clone(), 0.3, CancelMode::Cosmetic);
        let record = ContentRecord::Person(PersonDetails { id: 3, ..Default::default() });

        let out = orchestrator.run(Some(&record), &CreditsRecord::default(), "").await.unwrap();

        assert!(out.is_empty());
        assert!(translator.texts().is_empty());
        let snapshot = orchestrator.progress();
        assert_eq!(snapshot.state, RunState::Completed);
        assert_eq!(snapshot.percent(), 100.0);
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_calls() {
        let translator = ScriptedTranslator::without_key();
        let orchestrator = TranslationOrchestrator::new(translator.clone(), 0.3, CancelMode::Cosmetic);
        let (record, credits) = test_film();

        let err = orchestrator.run(Some(&record), &credits, "").await.unwrap_err();
        assert!(matches!(err, TarjomeError::MissingCredential(CredentialKind::Translation)));
        assert!(err.is_precondition());
        assert!(translator.texts().is_empty());

        let snapshot = orchestrator.progress();
        assert_eq!(snapshot.state, RunState::Failed);
        assert!(!snapshot.in_flight());
        assert!(snapshot.error.is_some());
    }

    #[tokio::test]
    async fn test_no_record_is_a_precondition_error() {
        let translator = ScriptedTranslator::new(|_| false);
        let orchestrator = TranslationOrchestrator::new(translator.clone(), 0.3, CancelMode::Cosmetic);

        let err = orchestrator.run(None, &CreditsRecord::default(), "").await.unwrap_err();
        assert!(matches!(err, TarjomeError::NoContent));
        assert!(translator.texts().is_empty());
    }

    #[tokio::test]
    async fn test_instructions_and_temperature_reach_client() {
        let translator = ScriptedTranslator::new(|_| false);
        let orchestrator = TranslationOrchestrator::new(translator.clone(), 0.9, CancelMode::Cosmetic);
        let (record, credits) = test_film();

        orchestrator.run(Some(&record), &credits, "Use formal Persian").await.unwrap();

        let calls = translator.calls.lock().unwrap();
        assert!(calls.iter().all(|(_, style, temp)| {
            style.as_deref() == Some("Use formal Persian") && *temp == 0.9
        }));
        drop(calls);
        assert_eq!(orchestrator.progress().custom_instructions, "Use formal Persian");
    }

    #[tokio::test]
    async fn test_text_is_trimmed_before_sending() {
        let translator = ScriptedTranslator::new(|_| false);
        let orchestrator = TranslationOrchestrator::new(translator.clone(), 0.3, CancelMode::Cosmetic);
        let record = ContentRecord::Movie(MovieDetails {
            id: 4,
            title: Some("  Padded  ".to_string()),
            ..Default::default()
        });

        orchestrator.run(Some(&record), &CreditsRecord::default(), "").await.unwrap();
        assert_eq!(translator.texts(), vec!["Padded"]);
    }

    #[tokio::test]
    async fn test_restart_supersedes_without_interleaving() {
        let translator = GatedTranslator::new();
        let orchestrator = Arc::new(TranslationOrchestrator::new(translator.clone(), 0.3, CancelMode::Cosmetic));
        let (record, credits) = test_film();

        let first = tokio::spawn({
            let orchestrator = orchestrator.clone();
            let (record, credits) = (record.clone(), credits.clone());
            async move { orchestrator.run(Some(&record), &credits, "").await }
        });

        translator.started.notified().await;
        assert!(orchestrator.in_flight());

        let second = orchestrator.run(Some(&record), &credits, "").await.unwrap();
        translator.release.notify_one();
        let first = first.await.unwrap();

        assert!(matches!(first, Err(TarjomeError::Cancelled)));
        // the superseded pass finished its in-flight call and issued nothing more
        assert_eq!(translator.calls.lock().unwrap().len(), 1 + 5);

        let expected = TranslationOrchestrator::new(ScriptedTranslator::new(|_| false), 0.3, CancelMode::Cosmetic)
            .run(Some(&record), &credits, "")
            .await
            .unwrap();
        assert_eq!(second, expected);
        assert_eq!(orchestrator.progress().state, RunState::Completed);
        assert_eq!(orchestrator.progress().completed_units, 4);
        assert!(!orchestrator.in_flight());
    }

    #[tokio::test]
    async fn test_refuse_policy_leaves_running_pass() {
        let translator = GatedTranslator::new();
        let orchestrator = Arc::new(TranslationOrchestrator::new(translator.clone(), 0.3, CancelMode::Cosmetic));
        let (record, credits) = test_film();

        let first = tokio::spawn({
            let orchestrator = orchestrator.clone();
            let (record, credits) = (record.clone(), credits.clone());
            async move { orchestrator.run(Some(&record), &credits, "").await }
        });
        translator.started.notified().await;

        let refused = orchestrator
            .run_with(ReentryPolicy::Refuse, Some(&record), &credits, "")
            .await;
        assert!(matches!(refused, Err(TarjomeError::RunInFlight)));

        translator.release.notify_one();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first.genres, vec!["fa:Drama"]);
        assert_eq!(orchestrator.progress().state, RunState::Completed);
    }

    #[tokio::test]
    async fn test_cosmetic_cancel_waits_for_call() {
        let translator = GatedTranslator::new();
        let orchestrator = Arc::new(TranslationOrchestrator::new(translator.clone(), 0.3, CancelMode::Cosmetic));
        let (record, credits) = test_film();

        let run = tokio::spawn({
            let orchestrator = orchestrator.clone();
            async move { orchestrator.run(Some(&record), &credits, "").await }
        });
        translator.started.notified().await;

        assert!(orchestrator.cancel());
        assert!(!orchestrator.in_flight());
        assert_eq!(orchestrator.progress().state, RunState::Cancelled);

        // still blocked on the remote call
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!run.is_finished());

        translator.release.notify_one();
        assert!(matches!(run.await.unwrap(), Err(TarjomeError::Cancelled)));
        assert_eq!(translator.calls.lock().unwrap().len(), 1);
        assert_eq!(orchestrator.progress().state, RunState::Cancelled);
    }

    #[tokio::test]
    async fn test_abort_cancel_drops_in_flight_call() {
        let translator = GatedTranslator::new();
        let orchestrator = Arc::new(TranslationOrchestrator::new(translator.clone(), 0.3, CancelMode::Abort));
        let (record, credits) = test_film();

        let run = tokio::spawn({
            let orchestrator = orchestrator.clone();
            async move { orchestrator.run(Some(&record), &credits, "").await }
        });
        translator.started.notified().await;
        orchestrator.cancel();

        let result = tokio::time::timeout(Duration::from_secs(2), run)
            .await
            .expect("aborted run should return promptly")
            .unwrap();
        assert!(matches!(result, Err(TarjomeError::Cancelled)));
    }

    #[test]
    fn test_run_future_can_be_spawned() {
        fn assert_send<T: Send>(_: &T) {}

        let orchestrator =
            TranslationOrchestrator::new(ScriptedTranslator::new(|_| false), 0.3, CancelMode::Cosmetic);
        let (record, credits) = test_film();
        let run = orchestrator.run(Some(&record), &credits, "");
        assert_send(&run);
    }

    #[tokio::test]
    async fn test_dropped_run_releases_active_slot() {
        let translator = GatedTranslator::new();
        let orchestrator = TranslationOrchestrator::new(translator.clone(), 0.3, CancelMode::Cosmetic);
        let (record, credits) = test_film();

        let timed_out = tokio::time::timeout(
            Duration::from_millis(50),
            orchestrator.run(Some(&record), &credits, ""),
        )
        .await;
        assert!(timed_out.is_err());

        assert!(!orchestrator.in_flight());
        assert_eq!(orchestrator.progress().state, RunState::Cancelled);

        // only the first call is gated
        let retried = orchestrator
            .run_with(ReentryPolicy::Refuse, Some(&record), &credits, "")
            .await
            .unwrap();
        assert_eq!(retried.genres, vec!["fa:Drama"]);
        assert_eq!(orchestrator.progress().state, RunState::Completed);
    }

    #[tokio::test]
    async fn test_progress_is_published_to_subscribers() {
        let translator = ScriptedTranslator::new(|_| false);
        let orchestrator = TranslationOrchestrator::new(translator, 0.3, CancelMode::Cosmetic);
        let mut rx = orchestrator.subscribe();
        let (record, credits) = test_film();

        orchestrator.run(Some(&record), &credits, "").await.unwrap();

        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.state, RunState::Completed);
        assert_eq!(snapshot.percent(), 100.0);
    }

    #[test]
    fn test_cancel_without_run_is_noop() {
        let orchestrator =
            TranslationOrchestrator::new(ScriptedTranslator::new(|_| false), 0.3, CancelMode::Cosmetic);
        assert!(!orchestrator.cancel());
        assert_eq!(orchestrator.progress().state, RunState::Idle);
    }
}
