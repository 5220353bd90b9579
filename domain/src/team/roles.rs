//! The six preset agile roles.
//!
//! Role descriptions double as the role context handed to the inference
//! provider, so they are written as working instructions.

use crate::agent::Agent;
use crate::capabilities;

pub const PRODUCT_OWNER: &str = "product_owner";
pub const TECH_ARCHITECT: &str = "tech_architect";
pub const SENIOR_DEVELOPER: &str = "senior_developer";
pub const QA_ENGINEER: &str = "qa_engineer";
pub const DEVOPS_ENGINEER: &str = "devops_engineer";
pub const SCRUM_MASTER: &str = "scrum_master";

/// Product owner: writes and prioritizes work items during planning
pub fn product_owner() -> Agent {
    Agent::tool_user(
        PRODUCT_OWNER,
        "Product owner. Clarifies the sprint goal, breaks it into user stories \
         with a priority (1 is highest) and a story-point estimate, and records \
         each one with the add_work_item tool.",
        [capabilities::ADD_WORK_ITEM],
    )
}

/// Technical architect: shapes the design and flags risks
pub fn tech_architect() -> Agent {
    Agent::responder(
        TECH_ARCHITECT,
        "Technical architect. Shapes the solution design, calls out risks and \
         dependencies early, and keeps technical decisions consistent across the team.",
    )
}

/// Senior developer: implements items, keeps notes in shared memory
pub fn senior_developer() -> Agent {
    Agent::tool_user(
        SENIOR_DEVELOPER,
        "Senior developer. Implements the committed work items, records key \
         decisions to shared memory with memory_put, and reports concrete progress \
         every turn.",
        [capabilities::MEMORY_PUT, capabilities::MEMORY_GET],
    )
}

/// QA engineer: acceptance checks and defect reports
pub fn qa_engineer() -> Agent {
    Agent::responder(
        QA_ENGINEER,
        "QA engineer. Reviews delivered work against the item description, \
         defines acceptance checks, and reports defects with reproduction steps.",
    )
}

/// DevOps engineer: build, deployment and operability concerns
pub fn devops_engineer() -> Agent {
    Agent::responder(
        DEVOPS_ENGINEER,
        "DevOps engineer. Covers build, deployment, and operability concerns for \
         the work under way, and flags anything that would not survive production.",
    )
}

/// Scrum master: facilitates and declares completion via the marker
pub fn scrum_master(completion_marker: &str) -> Agent {
    Agent::responder(
        SCRUM_MASTER,
        format!(
            "Scrum master. Facilitates the conversation, tracks what remains, and \
             announces {completion_marker} in a message once the current goal is met. \
             Never announces it earlier."
        ),
    )
    .declaring_completion_on(completion_marker.to_string())
}

/// All six roles in standard speaking order
pub fn standard_roster(completion_marker: &str) -> Vec<Agent> {
    vec![
        product_owner(),
        tech_architect(),
        senior_developer(),
        qa_engineer(),
        devops_engineer(),
        scrum_master(completion_marker),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentId;
    use crate::chat::Message;
    use crate::termination::DEFAULT_COMPLETION_MARKER;

    #[test]
    fn test_standard_roster_has_six_unique_roles() {
        let agents = standard_roster(DEFAULT_COMPLETION_MARKER);
        assert_eq!(agents.len(), 6);
        let ids: Vec<&str> = agents.iter().map(|a| a.id().as_str()).collect();
        assert_eq!(
            ids,
            vec![
                PRODUCT_OWNER,
                TECH_ARCHITECT,
                SENIOR_DEVELOPER,
                QA_ENGINEER,
                DEVOPS_ENGINEER,
                SCRUM_MASTER
            ]
        );
    }

    #[test]
    fn test_product_owner_carries_add_work_item() {
        assert!(product_owner().has_capability(capabilities::ADD_WORK_ITEM));
        assert!(!qa_engineer().has_capability(capabilities::ADD_WORK_ITEM));
    }

    #[test]
    fn test_scrum_master_declares_on_marker() {
        let sm = scrum_master(DEFAULT_COMPLETION_MARKER);
        let done = Message::new(AgentId::new(SCRUM_MASTER), "sprint_complete! well done", 0);
        assert!(sm.declares_termination(&done));
    }
}
