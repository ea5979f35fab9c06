use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Failed,
    Cancelled,
}

/// Snapshot of the current translation run, published after every unit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRun {
    /// Absent until the first run starts
    pub id: Option<Uuid>,
    pub state: RunState,
    pub completed_units: usize,
    pub total_units: usize,
    /// Units whose remote call failed and fell back
    pub failed_units: usize,
    pub custom_instructions: String,
    /// Pipeline-level failure message, set only in the `Failed` state
    pub error: Option<String>,
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::idle()
    }
}

impl PipelineRun {
    pub fn idle() -> Self {
        Self {
            id: None,
            state: RunState::Idle,
            completed_units: 0,
            total_units: 0,
            failed_units: 0,
            custom_instructions: String::new(),
            error: None,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn percent(&self) -> f64 {
        if self.total_units == 0 {
            return match self.state {
                RunState::Idle | RunState::Failed => 0.0,
                _ => 100.0,
            };
        }
        100.0 * self.completed_units as f64 / self.total_units as f64
    }
}
