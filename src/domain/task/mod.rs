pub mod dto;
pub mod error;
pub mod model;
pub mod pagination;
pub mod service;
pub mod validation;

pub use dto::{ListTasksParams, NewTask, TaskChanges, TaskFilter, TaskPage, UpdateMode};
pub use error::{task_not_found, TaskServiceError};
pub use model::Task;
pub use pagination::PaginationSettings;
pub use service::{TaskService, TaskServiceApi};
