#![forbid(unsafe_code)]
//! Shiftsolve — constraint-based shift rostering for multi-site clinics.
//!
//! - Demand rules per site and weekday, with closures, overrides and an
//!   alternating-Saturday rule.
//! - Per-person eligibility: days off, leave, prohibitions, exclusions.
//! - 0/1 integer model (coverage, caps, split-shift and adjacency shape
//!   constraints) solved through a narrow black-box backend.
//! - Vacancy reporting and per-staff totals; CSV/JSON exports.

pub mod calendar;
pub mod demand;
pub mod eligibility;
pub mod engine;
pub mod io;
pub mod milp;
pub mod model;
pub mod rules;
pub mod schedule;
pub mod storage;

pub use calendar::{CalendarError, Day};
pub use demand::{AlternatingSaturday, DemandTable};
pub use eligibility::Eligibility;
pub use engine::{
    solve_plan, AdjacencyRule, EngineError, GoldenSlot, ObjectiveWeights, SolveConfig,
    SplitShiftMode,
};
pub use milp::{GoodLpBackend, MilpBackend, MilpError, MilpSolution, SolveStatus};
pub use model::{Override, Period, Plan, Prohibition, ShiftKind, Site, SiteId, Staff, StaffId};
pub use schedule::{Schedule, SlotAssignment, Vacancy};
