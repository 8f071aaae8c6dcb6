//! Backend bridge: command queue from the UI and the worker that serves it.

pub mod commands;
pub mod runtime;
