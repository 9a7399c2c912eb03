pub mod classes;
pub mod core;
pub mod dashboard;
pub mod profile;
pub mod tasks;
