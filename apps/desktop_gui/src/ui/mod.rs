//! UI layer for the planner window: app shell and font setup.

pub mod app;
pub mod fonts;

pub use app::PlannerApp;
