//! Bridge between the controller thread and the worker that talks to the catalog service.

pub mod commands;
pub mod runtime;
