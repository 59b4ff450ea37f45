pub mod interval;
pub mod task;
