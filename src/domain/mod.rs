pub mod shared;
pub mod task;
