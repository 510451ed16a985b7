pub mod ac;
pub mod activity;
pub mod error;
pub mod flow;
pub mod platform;
pub mod request;
pub mod task;
pub mod workflow;
