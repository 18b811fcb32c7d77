use crate::model::ShiftKind;
use tracing::warn;

/// Headcounts for the three shift kinds of one weekday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayDemand {
    pub morning: u32,
    pub afternoon: u32,
    pub evening: u32,
}

impl DayDemand {
    pub fn get(&self, kind: ShiftKind) -> u32 {
        match kind {
            ShiftKind::Morning => self.morning,
            ShiftKind::Afternoon => self.afternoon,
            ShiftKind::Evening => self.evening,
        }
    }
}

/// Per-weekday demand table for one site, parsed once at configuration load.
/// Index 0=Monday..6=Sunday.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekTable {
    days: [DayDemand; 7],
}

impl WeekTable {
    /// Parse up to 7 rule strings of the form "M2/A1/E1". A malformed or
    /// missing entry falls back to zero for the affected shift kinds; this
    /// never fails.
    pub fn parse(raw: &[String]) -> Self {
        let mut days = [DayDemand::default(); 7];
        for (i, day) in days.iter_mut().enumerate() {
            if let Some(rule) = raw.get(i) {
                *day = parse_rule(rule);
            }
        }
        Self { days }
    }

    pub fn demand(&self, weekday: u8, kind: ShiftKind) -> u32 {
        self.days
            .get(usize::from(weekday))
            .map(|d| d.get(kind))
            .unwrap_or(0)
    }
}

fn parse_rule(rule: &str) -> DayDemand {
    let mut out = DayDemand::default();
    for token in rule.split('/') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let mut chars = token.chars();
        let prefix = chars.next();
        let count = match chars.as_str().parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                warn!(token, rule, "malformed rule token, defaulting to 0");
                continue;
            }
        };
        match prefix {
            Some('M' | 'm') => out.morning = count,
            Some('A' | 'a') => out.afternoon = count,
            Some('E' | 'e') => out.evening = count,
            _ => warn!(token, rule, "unknown shift prefix, ignoring token"),
        }
    }
    out
}
