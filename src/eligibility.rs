use crate::calendar::Day;
use crate::demand::DemandTable;
use crate::model::{Prohibition, ShiftKind, Site, Staff};
use std::collections::HashSet;

/// Answers "may this staff member take this slot?" for every
/// (staff, day, site, kind) tuple of the period.
pub struct Eligibility<'a> {
    demand: &'a DemandTable,
    prohibited: HashSet<(&'a str, chrono::NaiveDate, &'a str, ShiftKind)>,
}

impl<'a> Eligibility<'a> {
    pub fn new(demand: &'a DemandTable, prohibitions: &'a [Prohibition]) -> Self {
        let prohibited = prohibitions
            .iter()
            .map(|p| (p.staff.as_str(), p.date, p.site.as_str(), p.kind))
            .collect();
        Self { demand, prohibited }
    }

    /// Assignment is forbidden if the slot is not operating, the day matches
    /// a recurring day-off or a leave date, an explicit prohibition matches,
    /// the site is excluded for this person, or the person never works
    /// evenings and the kind is evening.
    pub fn permitted(&self, staff: &Staff, day: &Day, site: &Site, kind: ShiftKind) -> bool {
        if self.demand.get(&site.name, day.date, kind) == 0 {
            return false;
        }
        if staff.weekly_off.contains(&day.weekday) {
            return false;
        }
        if staff.leave_dates.contains(&day.date) {
            return false;
        }
        if self
            .prohibited
            .contains(&(staff.name.as_str(), day.date, site.name.as_str(), kind))
        {
            return false;
        }
        if staff.excluded_sites.contains(&site.name) {
            return false;
        }
        if staff.no_evening && kind == ShiftKind::Evening {
            return false;
        }
        true
    }
}
