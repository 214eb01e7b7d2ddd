pub mod in_memory_task_repository;
pub mod task_repository;

pub use in_memory_task_repository::InMemoryTaskRepository;
pub use task_repository::{PgTaskRepository, TaskRepository};
