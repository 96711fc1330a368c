//! BDD step definitions for the hall client

pub mod admin_steps;
