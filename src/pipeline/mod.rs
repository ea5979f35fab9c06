// Translation pipeline
//
// - classify: which record values are eligible for translation
// - progress: unit counting and percent reporting
// - record: the translated-record structure handed to the presenter
// - run: the published run snapshot
// - orchestrator: the sequential pass with fallback, restart and cancel

pub mod classify;
pub mod orchestrator;
pub mod progress;
pub mod record;
pub mod run;

pub use classify::{is_translatable, is_translatable_text};
pub use orchestrator::{ReentryPolicy, TranslationOrchestrator, candidate_fields, count_units};
pub use progress::{ProgressTracker, status_message};
pub use record::{TranslatedCast, TranslatedCrew, TranslatedRecord};
pub use run::{PipelineRun, RunState};
