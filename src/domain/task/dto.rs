use serde::{Deserialize, Serialize};

use super::model::Task;

/// Validated input for creating a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Validated input for updating a task, `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// PUT replaces the task, PATCH only touches the fields it sends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    Full,
    Partial,
}

/// Raw query string of GET /tasks
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTasksParams {
    pub completed: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// Listing filter shared by every repository implementation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub completed: Option<bool>,
    /// Every term must appear in the title, case-insensitively
    pub search_terms: Vec<String>,
}

impl TaskFilter {
    pub fn from_params(params: &ListTasksParams) -> Self {
        Self {
            completed: params.completed.as_deref().and_then(parse_completed_filter),
            search_terms: params
                .search
                .as_deref()
                .map(split_search_terms)
                .unwrap_or_default(),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(completed) = self.completed {
            if task.completed != completed {
                return false;
            }
        }

        let title = task.title.to_lowercase();
        self.search_terms
            .iter()
            .all(|term| title.contains(&term.to_lowercase()))
    }
}

/// Unrecognized values disable the filter instead of failing the request.
fn parse_completed_filter(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn split_search_terms(raw: &str) -> Vec<String> {
    raw.replace('\0', "")
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Response for GET /tasks
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPage {
    pub current_page: u64,
    pub total_pages: u64,
    pub page_size: u64,
    pub tasks: Vec<Task>,
}
