use crate::calendar::Day;
use crate::demand::DemandTable;
use crate::engine::AssignmentModel;
use crate::milp::SolveStatus;
use crate::model::{ShiftKind, Site, SiteId, Staff, StaffId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One slot of the solved grid: who works (site, date, kind), and how many
/// were required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub date: NaiveDate,
    pub site: SiteId,
    pub kind: ShiftKind,
    pub required: u32,
    pub staff: Vec<StaffId>,
}

/// A slot whose assigned headcount fell short of its resolved demand.
/// Not an error: coverage is best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vacancy {
    pub date: NaiveDate,
    pub site: SiteId,
    pub kind: ShiftKind,
    pub required: u32,
    pub assigned: u32,
    pub shortfall: u32,
}

/// Read-only projection of one solve: grid, vacancies and per-staff totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub status: SolveStatus,
    pub objective: f64,
    pub days: Vec<NaiveDate>,
    /// Day-major slot order: all slots of day 1, then day 2, ...
    pub slots: Vec<SlotAssignment>,
    pub vacancies: Vec<Vacancy>,
    pub totals: BTreeMap<StaffId, u32>,
}

impl Schedule {
    pub fn slot(&self, date: NaiveDate, site: &SiteId, kind: ShiftKind) -> Option<&SlotAssignment> {
        self.slots
            .iter()
            .find(|s| s.date == date && &s.site == site && s.kind == kind)
    }

    /// All assignments of one staff member, as (date, site, kind) tuples.
    pub fn assignments_of(&self, staff: &StaffId) -> Vec<(NaiveDate, SiteId, ShiftKind)> {
        self.slots
            .iter()
            .filter(|s| s.staff.contains(staff))
            .map(|s| (s.date, s.site.clone(), s.kind))
            .collect()
    }
}

/// Read solved variable values back into a schedule grid, vacancy list and
/// per-staff totals. Purely a projection; no decisions are made here.
#[allow(clippy::too_many_arguments)]
pub fn project(
    staff: &[Staff],
    sites: &[Site],
    days: &[Day],
    demand: &DemandTable,
    model: &AssignmentModel,
    status: SolveStatus,
    objective: f64,
    values: &[bool],
) -> Schedule {
    let mut cells: BTreeMap<(usize, usize, ShiftKind), Vec<StaffId>> = BTreeMap::new();
    let mut totals: BTreeMap<StaffId, u32> =
        staff.iter().map(|s| (s.name.clone(), 0)).collect();

    for (var, meta) in &model.assignments {
        if values.get(var.0).copied().unwrap_or(false) {
            cells
                .entry((meta.day, meta.site, meta.kind))
                .or_default()
                .push(staff[meta.staff].name.clone());
            *totals.entry(staff[meta.staff].name.clone()).or_default() += 1;
        }
    }

    let mut slots = Vec::new();
    let mut vacancies = Vec::new();

    for (di, day) in days.iter().enumerate() {
        for (ci, site) in sites.iter().enumerate() {
            for kind in ShiftKind::ALL {
                let required = demand.get(&site.name, day.date, kind);
                let mut assigned = cells.remove(&(di, ci, kind)).unwrap_or_default();
                assigned.sort();
                let count = assigned.len() as u32;
                if required > count {
                    vacancies.push(Vacancy {
                        date: day.date,
                        site: site.name.clone(),
                        kind,
                        required,
                        assigned: count,
                        shortfall: required - count,
                    });
                }
                slots.push(SlotAssignment {
                    date: day.date,
                    site: site.name.clone(),
                    kind,
                    required,
                    staff: assigned,
                });
            }
        }
    }

    Schedule {
        status,
        objective,
        days: days.iter().map(|d| d.date).collect(),
        slots,
        vacancies,
        totals,
    }
}
