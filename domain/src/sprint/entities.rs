//! Sprint entities: work items, iteration records, and the sprint itself.

use serde::{Deserialize, Serialize};

use crate::chat::outcome::{ChatOutcome, ChatStatus};
use crate::chat::transcript::Transcript;
use crate::sprint::backlog::Backlog;

/// Lifecycle of a backlog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemStatus {
    Todo,
    InProgress,
    Done,
    /// Permanently out of rotation after exhausting its retry limit
    Blocked,
}

impl WorkItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkItemStatus::Todo => "todo",
            WorkItemStatus::InProgress => "in_progress",
            WorkItemStatus::Done => "done",
            WorkItemStatus::Blocked => "blocked",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkItemStatus::Done | WorkItemStatus::Blocked)
    }
}

impl std::fmt::Display for WorkItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A backlog entry produced and consumed during planning and execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    /// Stable id in `US-<n>` form, assigned by the backlog
    pub id: String,
    pub description: String,
    /// Lower value is scheduled earlier
    pub priority: u8,
    /// Estimate in story points
    pub estimate: u32,
    pub status: WorkItemStatus,
    /// Execution attempts made so far, including the first
    #[serde(default)]
    pub attempts: u32,
}

impl WorkItem {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        priority: u8,
        estimate: u32,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            priority,
            estimate,
            status: WorkItemStatus::Todo,
            attempts: 0,
        }
    }
}

/// Phase an orchestration run served within a sprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintPhase {
    Planning,
    Execution,
    Retrospective,
}

impl SprintPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SprintPhase::Planning => "planning",
            SprintPhase::Execution => "execution",
            SprintPhase::Retrospective => "retrospective",
        }
    }
}

impl std::fmt::Display for SprintPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Record of one orchestration run within a sprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    pub phase: SprintPhase,
    /// The work item an execution run served; `None` for planning and
    /// retrospective runs
    pub item_id: Option<String>,
    pub status: ChatStatus,
    /// Machine-readable reason the run ended
    pub stop_reason: String,
    pub transcript: Transcript,
}

impl IterationRecord {
    pub fn from_outcome(phase: SprintPhase, item_id: Option<String>, outcome: ChatOutcome) -> Self {
        Self {
            phase,
            item_id,
            status: outcome.status,
            stop_reason: outcome.reason_code().to_string(),
            transcript: outcome.transcript,
        }
    }
}

/// Lifecycle of a sprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintStatus {
    Planning,
    Running,
    Completed,
    Aborted,
}

impl SprintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SprintStatus::Planning => "planning",
            SprintStatus::Running => "running",
            SprintStatus::Completed => "completed",
            SprintStatus::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SprintStatus::Completed | SprintStatus::Aborted)
    }
}

impl std::fmt::Display for SprintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bounded development cycle: repeated orchestration runs pursuing one
/// goal (Entity)
///
/// Owned exclusively by the sprint controller; nothing else mutates the
/// backlog or iteration list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprint {
    id: String,
    goal: String,
    backlog: Backlog,
    iterations: Vec<IterationRecord>,
    max_iterations: u32,
    status: SprintStatus,
}

impl Sprint {
    pub fn new(
        id: impl Into<String>,
        goal: impl Into<String>,
        backlog: Backlog,
        max_iterations: u32,
    ) -> Self {
        Self {
            id: id.into(),
            goal: goal.into(),
            backlog,
            iterations: Vec::new(),
            max_iterations,
            status: SprintStatus::Planning,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn backlog(&self) -> &Backlog {
        &self.backlog
    }

    pub fn backlog_mut(&mut self) -> &mut Backlog {
        &mut self.backlog
    }

    pub fn iterations(&self) -> &[IterationRecord] {
        &self.iterations
    }

    pub fn status(&self) -> SprintStatus {
        self.status
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn start_execution(&mut self) {
        self.status = SprintStatus::Running;
    }

    pub fn record_iteration(&mut self, record: IterationRecord) {
        self.iterations.push(record);
    }

    /// Execution runs recorded so far; unit of the `max_iterations` budget
    pub fn execution_iterations(&self) -> u32 {
        self.iterations
            .iter()
            .filter(|r| r.phase == SprintPhase::Execution)
            .count() as u32
    }

    pub fn budget_exhausted(&self) -> bool {
        self.execution_iterations() >= self.max_iterations
    }

    pub fn finish(&mut self, status: SprintStatus) {
        self.status = status;
    }

    /// Freeze into the result handed back to callers
    pub fn into_result(self, retrospective: Option<String>) -> SprintResult {
        let blocked_items = self.backlog.blocked_ids();
        SprintResult {
            sprint_id: self.id,
            goal: self.goal,
            status: self.status,
            iterations: self.iterations,
            backlog_snapshot: self.backlog.into_items(),
            blocked_items,
            retrospective,
        }
    }
}

/// Complete, inspectable result of one sprint.
///
/// Field names are stable: exports serialize this record as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintResult {
    pub sprint_id: String,
    pub goal: String,
    pub status: SprintStatus,
    pub iterations: Vec<IterationRecord>,
    pub backlog_snapshot: Vec<WorkItem>,
    pub blocked_items: Vec<String>,
    pub retrospective: Option<String>,
}
