//! Payment schedule generation.
//!
//! A booking's schedule is generated once, at sale time, from its total,
//! token and plan type. Afterwards obligations only change through the
//! payment cascade, overdue marking, or waiving.

pub mod error;
pub mod generator;
pub mod lifecycle;
pub mod types;

#[cfg(test)]
mod generator_props;

pub use error::ScheduleError;
pub use generator::{CONSTRUCTION_MILESTONES, ScheduleGenerator, TIME_LINKED_INSTALLMENTS, schedule_code};
pub use lifecycle::{mark_overdue, waive};
pub use types::{GenerateScheduleRequest, PlanType, RoundingPolicy, ScheduleEntry, ScheduleStatus};
