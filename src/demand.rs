use crate::calendar::Day;
use crate::model::{Override, ShiftKind, Site, SiteId};
use crate::rules::WeekTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Alternating-Saturday rule: the designated site's Saturday-morning
/// requirement toggles between `first` and `second` across successive
/// Saturdays of the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternatingSaturday {
    pub site: SiteId,
    pub first: u32,
    pub second: u32,
}

/// Authoritative demand for the period: every (site, date, kind) slot mapped
/// to its resolved headcount (zero means "not operating").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemandTable {
    slots: BTreeMap<(SiteId, NaiveDate, ShiftKind), u32>,
}

impl DemandTable {
    pub fn get(&self, site: &SiteId, date: NaiveDate, kind: ShiftKind) -> u32 {
        self.slots
            .get(&(site.clone(), date, kind))
            .copied()
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(SiteId, NaiveDate, ShiftKind), u32)> {
        self.slots.iter().map(|(k, v)| (k, *v))
    }

    pub fn total(&self) -> u32 {
        self.slots.values().sum()
    }
}

/// Resolve the required headcount for every slot of the period.
///
/// Precedence, strongest first: site closure (forces zero, an override on a
/// closed date is a no-op), explicit override, alternating-Saturday rule,
/// base weekly rule.
pub fn resolve(
    sites: &[Site],
    days: &[Day],
    overrides: &[Override],
    alternating: Option<&AlternatingSaturday>,
) -> DemandTable {
    // Rule strings are parsed once per site, not per slot.
    let tables: Vec<WeekTable> = sites.iter().map(|s| WeekTable::parse(&s.weekly_rules)).collect();

    let override_map: HashMap<(&SiteId, NaiveDate, ShiftKind), u32> = overrides
        .iter()
        .map(|o| ((&o.site, o.date, o.kind), o.headcount))
        .collect();

    let mut slots = BTreeMap::new();
    let mut saturdays_seen = 0u32;

    for day in days {
        if day.is_saturday() {
            saturdays_seen += 1;
        }
        for (site, table) in sites.iter().zip(&tables) {
            let closed = site.closed_dates.contains(&day.date);
            for kind in ShiftKind::ALL {
                let required = if closed {
                    0
                } else if let Some(n) = override_map.get(&(&site.name, day.date, kind)) {
                    *n
                } else {
                    let mut base = table.demand(day.weekday, kind);
                    if let Some(alt) = alternating {
                        if alt.site == site.name && day.is_saturday() && kind == ShiftKind::Morning
                        {
                            base = if saturdays_seen % 2 == 1 { alt.first } else { alt.second };
                        }
                    }
                    base
                };
                slots.insert((site.name.clone(), day.date, kind), required);
            }
        }
    }

    let table = DemandTable { slots };
    debug!(slots = table.slots.len(), total = table.total(), "resolved demand table");
    table
}
