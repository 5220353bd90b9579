//! Priority-ordered product backlog with capacity-based commitment.

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;
use crate::sprint::entities::{WorkItem, WorkItemStatus};

/// Ordered collection of work items, owner of their `US-<n>` ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backlog {
    items: Vec<WorkItem>,
    next_id: u32,
}

impl Default for Backlog {
    fn default() -> Self {
        Self::new()
    }
}

impl Backlog {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Add a new item, returning its assigned `US-<n>` id
    pub fn add(&mut self, description: impl Into<String>, priority: u8, estimate: u32) -> String {
        let id = format!("US-{:03}", self.next_id);
        self.next_id += 1;
        self.items
            .push(WorkItem::new(id.clone(), description, priority, estimate));
        id
    }

    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<WorkItem> {
        self.items
    }

    pub fn item(&self, id: &str) -> Option<&WorkItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn item_mut(&mut self, id: &str) -> Result<&mut WorkItem, DomainError> {
        self.items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| DomainError::UnknownWorkItem(id.to_string()))
    }

    pub fn mark(&mut self, id: &str, status: WorkItemStatus) -> Result<(), DomainError> {
        self.item_mut(id)?.status = status;
        Ok(())
    }

    /// Move an item to `InProgress` and count the attempt. Returns the
    /// attempt number, starting at 1.
    pub fn begin_attempt(&mut self, id: &str) -> Result<u32, DomainError> {
        let item = self.item_mut(id)?;
        item.status = WorkItemStatus::InProgress;
        item.attempts += 1;
        Ok(item.attempts)
    }

    /// Ids of `Todo` items that fit the capacity, in commitment order.
    ///
    /// Items are taken by ascending priority value (creation order breaks
    /// ties); an item whose estimate does not fit the remaining capacity
    /// is skipped, smaller later items may still be committed.
    pub fn committable(&self, capacity_points: u32) -> Vec<String> {
        let mut todo: Vec<&WorkItem> = self
            .items
            .iter()
            .filter(|i| i.status == WorkItemStatus::Todo)
            .collect();
        todo.sort_by_key(|i| i.priority);

        let mut committed = Vec::new();
        let mut used = 0u32;
        for item in todo {
            if used + item.estimate <= capacity_points {
                used += item.estimate;
                committed.push(item.id.clone());
            }
        }
        committed
    }

    pub fn blocked_ids(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|i| i.status == WorkItemStatus::Blocked)
            .map(|i| i.id.clone())
            .collect()
    }

    /// Whether every one of the given items reached `Done`
    pub fn all_done(&self, ids: &[String]) -> bool {
        ids.iter().all(|id| {
            self.item(id)
                .map(|i| i.status == WorkItemStatus::Done)
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_assigned_in_order() {
        let mut backlog = Backlog::new();
        assert_eq!(backlog.add("first", 1, 3), "US-001");
        assert_eq!(backlog.add("second", 2, 5), "US-002");
        assert_eq!(backlog.add("third", 1, 8), "US-003");
        assert_eq!(backlog.len(), 3);
    }

    #[test]
    fn test_committable_respects_priority_and_capacity() {
        let mut backlog = Backlog::new();
        backlog.add("low priority, small", 5, 2); // US-001
        backlog.add("high priority, big", 1, 8); // US-002
        backlog.add("mid priority", 3, 5); // US-003

        // capacity 10: US-002 (8) fits, US-003 (5) does not, US-001 (2) does
        let committed = backlog.committable(10);
        assert_eq!(committed, vec!["US-002", "US-001"]);
    }

    #[test]
    fn test_committable_tie_breaks_by_creation_order() {
        let mut backlog = Backlog::new();
        backlog.add("a", 1, 3); // US-001
        backlog.add("b", 1, 3); // US-002
        let committed = backlog.committable(40);
        assert_eq!(committed, vec!["US-001", "US-002"]);
    }

    #[test]
    fn test_committable_skips_non_todo_items() {
        let mut backlog = Backlog::new();
        backlog.add("done already", 1, 3);
        backlog.add("open", 2, 3);
        backlog.mark("US-001", WorkItemStatus::Done).unwrap();
        assert_eq!(backlog.committable(40), vec!["US-002"]);
    }

    #[test]
    fn test_begin_attempt_counts_up() {
        let mut backlog = Backlog::new();
        backlog.add("flaky", 1, 3);
        assert_eq!(backlog.begin_attempt("US-001").unwrap(), 1);
        backlog.mark("US-001", WorkItemStatus::Todo).unwrap();
        assert_eq!(backlog.begin_attempt("US-001").unwrap(), 2);
        assert_eq!(
            backlog.item("US-001").unwrap().status,
            WorkItemStatus::InProgress
        );
    }

    #[test]
    fn test_unknown_item_is_an_error() {
        let mut backlog = Backlog::new();
        assert_eq!(
            backlog.mark("US-999", WorkItemStatus::Done),
            Err(DomainError::UnknownWorkItem("US-999".to_string()))
        );
        assert!(backlog.begin_attempt("US-999").is_err());
    }

    #[test]
    fn test_all_done_and_blocked_ids() {
        let mut backlog = Backlog::new();
        backlog.add("a", 1, 1);
        backlog.add("b", 1, 1);
        let ids = vec!["US-001".to_string(), "US-002".to_string()];
        assert!(!backlog.all_done(&ids));
        backlog.mark("US-001", WorkItemStatus::Done).unwrap();
        backlog.mark("US-002", WorkItemStatus::Blocked).unwrap();
        assert!(!backlog.all_done(&ids));
        assert_eq!(backlog.blocked_ids(), vec!["US-002"]);
        backlog.mark("US-002", WorkItemStatus::Done).unwrap();
        assert!(backlog.all_done(&ids));
    }
}
