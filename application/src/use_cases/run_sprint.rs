//! Sprint controller.
//!
//! [`SprintController`] wraps repeated orchestration runs into one bounded,
//! retryable unit of work: a planning run that grows the backlog, one
//! execution run per committed work item, and a closing retrospective run.
//! `max_iterations` is a hard ceiling across execution runs; exhausting it
//! with work remaining aborts the sprint with partial results, never a
//! silent truncation.
//!
//! The controller owns the sprint and its backlog exclusively. A single
//! item's failed run re-queues the item up to its retry limit and then
//! blocks it; it never aborts the whole sprint. Only external cancellation
//! stops everything immediately.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use standup_domain::core::error::DomainError;
use standup_domain::{
    Backlog, ChatOutcome, ChatStatus, IterationRecord, Sprint, SprintPhase, SprintResult,
    SprintStatus, StopReason, Team, TerminationPolicy, Transcript, WorkItemStatus, capabilities,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::TurnParams;
use crate::ports::chat_events::{ChatEvent, ChatEventSink, NoChatEvents};
use crate::ports::human_input::{HumanInput, NoHumanInput};
use crate::ports::inference::InferenceProvider;
use crate::ports::speaker_chooser::SpeakerChooser;
use crate::ports::tool_runner::{NoTools, ToolRunner};
use crate::use_cases::run_chat::GroupChatOrchestrator;

/// A work item recovered from the planning transcript
#[derive(Debug, Clone, PartialEq, Eq)]
struct PlannedItem {
    description: String,
    priority: u8,
    estimate: u32,
}

/// Use case driving one sprint of repeated orchestration runs
pub struct SprintController {
    team: Team,
    params: TurnParams,
    provider: Arc<dyn InferenceProvider>,
    chooser: Option<Arc<dyn SpeakerChooser>>,
    tools: Arc<dyn ToolRunner>,
    human_input: Arc<dyn HumanInput>,
    events: Arc<dyn ChatEventSink>,
    cancellation: Option<CancellationToken>,
    next_sprint: AtomicU32,
}

impl SprintController {
    pub fn new(team: Team, provider: Arc<dyn InferenceProvider>) -> Self {
        Self {
            team,
            params: TurnParams::default(),
            provider,
            chooser: None,
            tools: Arc::new(NoTools),
            human_input: Arc::new(NoHumanInput),
            events: Arc::new(NoChatEvents),
            cancellation: None,
            next_sprint: AtomicU32::new(1),
        }
    }

    pub fn with_chooser(mut self, chooser: Arc<dyn SpeakerChooser>) -> Self {
        self.chooser = Some(chooser);
        self
    }

    pub fn with_tools(mut self, tools: Arc<dyn ToolRunner>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_human_input(mut self, human_input: Arc<dyn HumanInput>) -> Self {
        self.human_input = human_input;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn ChatEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_params(mut self, params: TurnParams) -> Self {
        self.params = params;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Run one sprint toward `goal` starting from an empty backlog.
    pub async fn run(&self, goal: &str) -> Result<SprintResult, DomainError> {
        self.run_with_backlog(goal, Backlog::new()).await
    }

    /// Run one sprint toward `goal`, seeding the product backlog.
    ///
    /// The only errors thrown are configuration errors; every operational
    /// outcome, including a fully failed sprint, comes back as a
    /// [`SprintResult`] with partial results and reasons.
    pub async fn run_with_backlog(
        &self,
        goal: &str,
        backlog: Backlog,
    ) -> Result<SprintResult, DomainError> {
        let config = self.team.sprint.clone();
        let sprint_id = format!("sprint-{}", self.next_sprint.fetch_add(1, Ordering::Relaxed));
        let mut sprint = Sprint::new(&sprint_id, goal, backlog, config.max_iterations);
        info!(sprint = %sprint_id, %goal, team = %self.team.name, "sprint started");
        self.events.log(ChatEvent::new(
            "sprint_started",
            serde_json::json!({ "sprint_id": sprint_id, "goal": goal }),
        ));

        // Phase 1: planning. The run's successful add_work_item invocations
        // grow the backlog; a failed or aborted planning run just leaves
        // the seed backlog as-is.
        let planning_policy = TerminationPolicy::new()
            .with_marker(&config.completion_marker)
            .with_max_rounds(config.planning_rounds);
        let planning_task = format!(
            "Sprint goal: {goal}. Break the goal into user stories, record each \
             one with the add_work_item tool, then confirm the plan."
        );
        let outcome = self
            .orchestrator(planning_policy)
            .run_task(&planning_task)
            .await?;
        let cancelled = was_cancelled(&outcome);
        for item in extract_work_items(&outcome.transcript) {
            let id = sprint
                .backlog_mut()
                .add(item.description, item.priority, item.estimate);
            info!(item = %id, "planned work item");
        }
        sprint.record_iteration(IterationRecord::from_outcome(SprintPhase::Planning, None, outcome));
        if cancelled {
            sprint.finish(SprintStatus::Aborted);
            return Ok(self.finish(sprint, None));
        }

        let committed = sprint.backlog().committable(config.capacity_points);
        info!(
            committed = committed.len(),
            capacity = config.capacity_points,
            "sprint planning committed items"
        );

        // Phase 2: execution, one run per committed item in priority order.
        sprint.start_execution();
        let mut queue: VecDeque<String> = committed.iter().cloned().collect();
        let mut budget_hit = false;
        let mut cancelled = false;
        while let Some(item_id) = queue.pop_front() {
            if self.is_cancelled() {
                cancelled = true;
                break;
            }
            if sprint.budget_exhausted() {
                warn!(
                    item = %item_id,
                    max_iterations = config.max_iterations,
                    "iteration budget exhausted with work remaining"
                );
                budget_hit = true;
                break;
            }

            let attempt = sprint.backlog_mut().begin_attempt(&item_id)?;
            let description = sprint
                .backlog()
                .item(&item_id)
                .map(|i| i.description.clone())
                .unwrap_or_default();
            let task = format!(
                "Work item {item_id}: {description}. Deliver it and announce {} \
                 once it meets its description.",
                config.completion_marker
            );
            let policy = TerminationPolicy::new()
                .with_marker(&config.completion_marker)
                .with_max_rounds(config.execution_rounds);
            let outcome = self.orchestrator(policy).run_task(&task).await?;

            if was_cancelled(&outcome) {
                sprint.backlog_mut().mark(&item_id, WorkItemStatus::Todo)?;
                sprint.record_iteration(IterationRecord::from_outcome(
                    SprintPhase::Execution,
                    Some(item_id),
                    outcome,
                ));
                cancelled = true;
                break;
            }

            if outcome.status == ChatStatus::Completed {
                sprint.backlog_mut().mark(&item_id, WorkItemStatus::Done)?;
                info!(item = %item_id, attempt, "work item done");
            } else if attempt > config.item_retry_limit {
                // The item exhausted its retries; surface it, keep going.
                sprint.backlog_mut().mark(&item_id, WorkItemStatus::Blocked)?;
                warn!(item = %item_id, attempt, "work item permanently blocked");
            } else {
                sprint.backlog_mut().mark(&item_id, WorkItemStatus::Todo)?;
                warn!(item = %item_id, attempt, "work item re-queued");
                queue.push_back(item_id.clone());
            }
            sprint.record_iteration(IterationRecord::from_outcome(
                SprintPhase::Execution,
                Some(item_id),
                outcome,
            ));
        }

        // Phase 3: retrospective. Its failure degrades to an absent
        // summary; it never fails the sprint.
        let retrospective = if cancelled {
            None
        } else {
            self.retrospective(goal, &mut sprint).await?
        };

        let status = if cancelled || budget_hit || !sprint.backlog().all_done(&committed) {
            SprintStatus::Aborted
        } else {
            SprintStatus::Completed
        };
        sprint.finish(status);
        Ok(self.finish(sprint, retrospective))
    }

    async fn retrospective(
        &self,
        goal: &str,
        sprint: &mut Sprint,
    ) -> Result<Option<String>, DomainError> {
        let config = &self.team.sprint;
        let policy = TerminationPolicy::new()
            .with_marker(&config.completion_marker)
            .with_max_rounds(config.retrospective_rounds);
        let task = format!(
            "The sprint for goal '{goal}' is over. Summarize what worked and what \
             to change next time, then announce {}.",
            config.completion_marker
        );
        let outcome = self.orchestrator(policy).run_task(&task).await?;
        let summary = match outcome.status {
            ChatStatus::Failed => None,
            _ if was_cancelled(&outcome) => None,
            _ => outcome
                .transcript
                .last()
                .filter(|m| !m.is_cancellation())
                .map(|m| m.content.clone()),
        };
        if summary.is_none() {
            warn!("retrospective produced no summary");
        }
        sprint.record_iteration(IterationRecord::from_outcome(
            SprintPhase::Retrospective,
            None,
            outcome,
        ));
        Ok(summary)
    }

    fn orchestrator(&self, policy: TerminationPolicy) -> GroupChatOrchestrator {
        let mut orchestrator = GroupChatOrchestrator::new(
            self.team.roster.clone(),
            self.team.chat_config(policy),
            self.provider.clone(),
        )
        .with_tools(self.tools.clone())
        .with_human_input(self.human_input.clone())
        .with_events(self.events.clone())
        .with_params(self.params.clone());
        if let Some(chooser) = &self.chooser {
            orchestrator = orchestrator.with_chooser(chooser.clone());
        }
        if let Some(token) = &self.cancellation {
            orchestrator = orchestrator.with_cancellation(token.clone());
        }
        orchestrator
    }

    fn finish(&self, sprint: Sprint, retrospective: Option<String>) -> SprintResult {
        let result = sprint.into_result(retrospective);
        info!(
            sprint = %result.sprint_id,
            status = %result.status,
            iterations = result.iterations.len(),
            blocked = result.blocked_items.len(),
            "sprint finished"
        );
        self.events.log(ChatEvent::new(
            "sprint_finished",
            serde_json::json!({
                "sprint_id": result.sprint_id,
                "status": result.status.as_str(),
                "blocked_items": result.blocked_items,
            }),
        ));
        result
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}

fn was_cancelled(outcome: &ChatOutcome) -> bool {
    matches!(outcome.stop_reason, Some(StopReason::ExternalCancel))
}

/// Recover work items from a planning transcript.
///
/// Only successful `add_work_item` invocations count; their normalized
/// payloads carry the validated description, priority, and estimate.
fn extract_work_items(transcript: &Transcript) -> Vec<PlannedItem> {
    let mut items = Vec::new();
    for message in transcript.messages() {
        for call in &message.tool_calls {
            if call.name != capabilities::ADD_WORK_ITEM || call.is_failed() {
                continue;
            }
            let Some(payload) = &call.payload else {
                continue;
            };
            let Some(description) = payload.get("description").and_then(|v| v.as_str()) else {
                warn!(sequence = message.sequence_number, "add_work_item payload without description");
                continue;
            };
            let priority = payload.get("priority").and_then(|v| v.as_u64()).unwrap_or(3) as u8;
            let estimate = payload.get("estimate").and_then(|v| v.as_u64()).unwrap_or(3) as u32;
            items.push(PlannedItem {
                description: description.to_string(),
                priority,
                estimate,
            });
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::inference::{ProviderError, ProviderReply, ToolRequest};
    use crate::ports::tool_runner::ToolDescriptor;
    use async_trait::async_trait;
    use standup_domain::{
        Agent, AgentId, GroupChatPattern, Message, SprintConfig, ToolInvocation, ToolOutcome,
    };
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// Provider double with per-agent reply scripts, a plain fallback, and
    /// an optional rule failing every run whose seed task matches a marker
    /// substring.
    struct ScriptedProvider {
        scripts: Mutex<HashMap<String, VecDeque<ProviderReply>>>,
        fallback: String,
        fail_when_task_contains: Option<&'static str>,
    }

    impl ScriptedProvider {
        fn new(fallback: &str) -> Self {
            Self {
                scripts: Mutex::new(HashMap::new()),
                fallback: fallback.to_string(),
                fail_when_task_contains: None,
            }
        }

        fn enqueue(self, agent: &str, reply: ProviderReply) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .entry(agent.to_string())
                .or_default()
                .push_back(reply);
            self
        }

        fn failing_execution_runs(mut self) -> Self {
            self.fail_when_task_contains = Some("Work item");
            self
        }
    }

    #[async_trait]
    impl InferenceProvider for ScriptedProvider {
        async fn generate(
            &self,
            speaker: &AgentId,
            messages: &[Message],
            _role_context: &str,
            _available_tools: &[ToolDescriptor],
        ) -> Result<ProviderReply, ProviderError> {
            if let Some(marker) = self.fail_when_task_contains
                && messages.first().is_some_and(|m| m.content.contains(marker))
            {
                return Err(ProviderError::Failed("provider unavailable".to_string()));
            }
            let scripted = self
                .scripts
                .lock()
                .unwrap()
                .get_mut(speaker.as_str())
                .and_then(VecDeque::pop_front);
            Ok(scripted.unwrap_or_else(|| ProviderReply::text(self.fallback.clone())))
        }
    }

    /// Tool double echoing normalized add_work_item payloads
    struct EchoTools;

    #[async_trait]
    impl ToolRunner for EchoTools {
        fn descriptors(&self) -> Vec<ToolDescriptor> {
            vec![ToolDescriptor::new(
                capabilities::ADD_WORK_ITEM,
                "record a work item",
            )]
        }

        fn has_tool(&self, name: &str) -> bool {
            name == capabilities::ADD_WORK_ITEM
        }

        async fn invoke(
            &self,
            _caller: &AgentId,
            _name: &str,
            arguments: &HashMap<String, serde_json::Value>,
        ) -> ToolOutcome {
            ToolOutcome::ok(serde_json::json!({
                "description": arguments.get("description").cloned().unwrap_or_default(),
                "priority": arguments.get("priority").cloned().unwrap_or(1.into()),
                "estimate": arguments.get("estimate").cloned().unwrap_or(3.into()),
            }))
        }
    }

    fn tight_config() -> SprintConfig {
        let mut config = SprintConfig::default();
        // One round of slack so a marker on the last speaker's turn is
        // seen as completion, not a round budget abort.
        config.planning_rounds = 4;
        config.execution_rounds = 4;
        config.retrospective_rounds = 4;
        config.max_iterations = 3;
        config
    }

    fn small_team(config: SprintConfig) -> Team {
        Team::assemble(
            "test",
            vec![
                Agent::tool_user("po", "product owner", [capabilities::ADD_WORK_ITEM]),
                Agent::responder("dev", "developer"),
                Agent::responder("sm", "scrum master"),
            ],
            GroupChatPattern::RoundRobin,
            "po",
            None,
            config,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_full_sprint_completes_with_planned_item() {
        let provider = ScriptedProvider::new("acknowledged")
            .enqueue(
                "po",
                ProviderReply::text("recording the story").with_tool_requests(vec![
                    ToolRequest::new(capabilities::ADD_WORK_ITEM)
                        .with_arg("description", "login page".into())
                        .with_arg("priority", 1.into())
                        .with_arg("estimate", 3.into()),
                ]),
            )
            .enqueue("sm", ProviderReply::text("plan ready, SPRINT_COMPLETE!"))
            .enqueue("sm", ProviderReply::text("item delivered, SPRINT_COMPLETE!"))
            .enqueue("sm", ProviderReply::text("smooth sprint overall, SPRINT_COMPLETE!"));
        let controller = SprintController::new(small_team(tight_config()), Arc::new(provider))
            .with_tools(Arc::new(EchoTools));

        let result = controller.run("ship the login flow").await.unwrap();

        assert_eq!(result.status, SprintStatus::Completed);
        assert_eq!(result.sprint_id, "sprint-1");
        let phases: Vec<SprintPhase> = result.iterations.iter().map(|i| i.phase).collect();
        assert_eq!(
            phases,
            vec![SprintPhase::Planning, SprintPhase::Execution, SprintPhase::Retrospective]
        );
        assert_eq!(result.backlog_snapshot.len(), 1);
        assert_eq!(result.backlog_snapshot[0].id, "US-001");
        assert_eq!(result.backlog_snapshot[0].status, WorkItemStatus::Done);
        assert!(result.blocked_items.is_empty());
        assert!(result.retrospective.as_deref().unwrap().contains("smooth sprint"));
    }

    #[tokio::test]
    async fn test_always_failing_item_ends_blocked_not_failed() {
        // Scenario: one backlog item whose execution run fails every time.
        // After one retry the item is blocked and the sprint aborts,
        // listing it.
        let provider = ScriptedProvider::new("acknowledged").failing_execution_runs();
        let mut backlog = Backlog::new();
        backlog.add("flaky integration", 1, 3);
        let controller = SprintController::new(small_team(tight_config()), Arc::new(provider));

        let result = controller
            .run_with_backlog("stabilize the build", backlog)
            .await
            .unwrap();

        assert_eq!(result.status, SprintStatus::Aborted);
        assert_eq!(result.blocked_items, vec!["US-001"]);
        assert_eq!(result.backlog_snapshot[0].status, WorkItemStatus::Blocked);
        assert_eq!(result.backlog_snapshot[0].attempts, 2);
        let execution_failures: Vec<_> = result
            .iterations
            .iter()
            .filter(|i| i.phase == SprintPhase::Execution)
            .collect();
        assert_eq!(execution_failures.len(), 2);
        assert!(
            execution_failures
                .iter()
                .all(|i| i.status == ChatStatus::Failed && i.stop_reason == "transient-failure")
        );
    }

    #[tokio::test]
    async fn test_budget_exhaustion_returns_partial_results() {
        // Every run completes on its first round, but only one execution
        // iteration is allowed for two committed items.
        let mut config = tight_config();
        config.max_iterations = 1;
        let provider = ScriptedProvider::new("done here, SPRINT_COMPLETE!");
        let mut backlog = Backlog::new();
        backlog.add("first story", 1, 3);
        backlog.add("second story", 2, 3);
        let controller = SprintController::new(small_team(config), Arc::new(provider));

        let result = controller
            .run_with_backlog("two stories, one slot", backlog)
            .await
            .unwrap();

        assert_eq!(result.status, SprintStatus::Aborted);
        assert_eq!(result.backlog_snapshot[0].status, WorkItemStatus::Done);
        // The second item never ran; it is still open, not blocked.
        assert_eq!(result.backlog_snapshot[1].status, WorkItemStatus::Todo);
        assert!(result.blocked_items.is_empty());
        let executions = result
            .iterations
            .iter()
            .filter(|i| i.phase == SprintPhase::Execution)
            .count();
        assert_eq!(executions, 1);
    }

    #[tokio::test]
    async fn test_cancelled_sprint_aborts_immediately() {
        let token = CancellationToken::new();
        token.cancel();
        let provider = ScriptedProvider::new("acknowledged");
        let controller = SprintController::new(small_team(tight_config()), Arc::new(provider))
            .with_cancellation(token);

        let result = controller.run("never starts").await.unwrap();

        assert_eq!(result.status, SprintStatus::Aborted);
        assert_eq!(result.iterations.len(), 1);
        assert_eq!(result.iterations[0].stop_reason, "external-cancel");
        assert!(result.retrospective.is_none());
    }

    #[tokio::test]
    async fn test_sprint_ids_are_monotonic() {
        let provider = ScriptedProvider::new("wrapping up, SPRINT_COMPLETE!");
        let controller = SprintController::new(small_team(tight_config()), Arc::new(provider));
        let first = controller.run("first goal").await.unwrap();
        let second = controller.run("second goal").await.unwrap();
        assert_eq!(first.sprint_id, "sprint-1");
        assert_eq!(second.sprint_id, "sprint-2");
    }

    #[test]
    fn test_extract_work_items_skips_failed_invocations() {
        let mut transcript = Transcript::new();
        let good = ToolInvocation::from_outcome(
            capabilities::ADD_WORK_ITEM,
            HashMap::new(),
            ToolOutcome::ok(serde_json::json!({
                "description": "login page",
                "priority": 1,
                "estimate": 5,
            })),
        );
        let failed = ToolInvocation::from_outcome(
            capabilities::ADD_WORK_ITEM,
            HashMap::new(),
            ToolOutcome::failed("invalid arguments"),
        );
        let unrelated = ToolInvocation::from_outcome(
            capabilities::MEMORY_PUT,
            HashMap::new(),
            ToolOutcome::ok(serde_json::json!({"stored": true})),
        );
        transcript
            .append(
                Message::new(AgentId::new("po"), "planning", 0)
                    .with_tool_calls(vec![good, failed, unrelated]),
            )
            .unwrap();

        let items = extract_work_items(&transcript);
        assert_eq!(
            items,
            vec![PlannedItem {
                description: "login page".to_string(),
                priority: 1,
                estimate: 5,
            }]
        );
    }

    #[test]
    fn test_extract_work_items_applies_defaults() {
        let mut transcript = Transcript::new();
        let call = ToolInvocation::from_outcome(
            capabilities::ADD_WORK_ITEM,
            HashMap::new(),
            ToolOutcome::ok(serde_json::json!({"description": "cleanup"})),
        );
        transcript
            .append(Message::new(AgentId::new("po"), "planning", 0).with_tool_calls(vec![call]))
            .unwrap();
        let items = extract_work_items(&transcript);
        assert_eq!(items[0].priority, 3);
        assert_eq!(items[0].estimate, 3);
    }
}
