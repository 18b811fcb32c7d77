use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Strong identifier for a staff member (unique display name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strong identifier for a clinic site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteId(String);

impl SiteId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the three daily shift kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftKind {
    Morning,
    Afternoon,
    Evening,
}

impl ShiftKind {
    pub const ALL: [ShiftKind; 3] = [ShiftKind::Morning, ShiftKind::Afternoon, ShiftKind::Evening];

    pub fn as_str(self) -> &'static str {
        match self {
            ShiftKind::Morning => "morning",
            ShiftKind::Afternoon => "afternoon",
            ShiftKind::Evening => "evening",
        }
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staff member as entered by the roster collaborator. Immutable during a solve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub name: StaffId,
    /// Maximum number of shifts over the whole period.
    pub cap: u32,
    /// Sites this person is never assigned to.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub excluded_sites: BTreeSet<SiteId>,
    /// Single preferred site, rewarded by the objective.
    #[serde(default)]
    pub preferred_site: Option<SiteId>,
    /// Never assign the evening shift.
    #[serde(default)]
    pub no_evening: bool,
    /// Weekly recurring days off, 0=Monday..6=Sunday.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub weekly_off: BTreeSet<u8>,
    /// Specific-date leave days.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub leave_dates: BTreeSet<NaiveDate>,
}

impl Staff {
    pub fn new<S: AsRef<str>>(name: S, cap: u32) -> Self {
        Self {
            name: StaffId::new(name),
            cap,
            excluded_sites: BTreeSet::new(),
            preferred_site: None,
            no_evening: false,
            weekly_off: BTreeSet::new(),
            leave_dates: BTreeSet::new(),
        }
    }
}

/// Clinic site with its weekly base demand rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub name: SiteId,
    /// One rule string per weekday, index 0=Monday, format "M2/A1/E1".
    /// Missing trailing entries mean "not operating".
    pub weekly_rules: Vec<String>,
    /// Dates the site is fully closed (demand forced to zero).
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub closed_dates: BTreeSet<NaiveDate>,
}

impl Site {
    pub fn new<S: AsRef<str>>(name: S, weekly_rules: Vec<String>) -> Self {
        Self {
            name: SiteId::new(name),
            weekly_rules,
            closed_dates: BTreeSet::new(),
        }
    }
}

/// Explicit headcount override for one exact slot. Beats the base rules,
/// loses to a closure on the same date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    pub site: SiteId,
    pub date: NaiveDate,
    pub kind: ShiftKind,
    pub headcount: u32,
}

/// Explicit "never assign" entry for one exact (staff, date, site, kind) tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prohibition {
    pub staff: StaffId,
    pub date: NaiveDate,
    pub site: SiteId,
    pub kind: ShiftKind,
}

/// Planning period: a calendar month or an explicit ordered date list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Period {
    Month { year: i32, month: u32 },
    Dates { dates: Vec<NaiveDate> },
}

/// Complete input snapshot for one solve. Built fresh per invocation;
/// nothing persists across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub period: Period,
    pub staff: Vec<Staff>,
    pub sites: Vec<Site>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<Override>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prohibitions: Vec<Prohibition>,
    #[serde(default)]
    pub config: crate::engine::SolveConfig,
}

impl Plan {
    pub fn validate(&self) -> Result<()> {
        if self.staff.is_empty() {
            bail!("plan must contain at least one staff member");
        }
        if self.sites.is_empty() {
            bail!("plan must contain at least one site");
        }
        let mut staff_names = BTreeSet::new();
        for s in &self.staff {
            if s.name.as_str().trim().is_empty() {
                bail!("staff name cannot be empty");
            }
            if !staff_names.insert(s.name.clone()) {
                bail!("duplicate staff name: {}", s.name);
            }
            if let Some(d) = s.weekly_off.iter().find(|d| **d > 6) {
                bail!("staff {}: weekly_off day {} out of range 0..=6", s.name, d);
            }
        }
        let mut site_names = BTreeSet::new();
        for site in &self.sites {
            if site.name.as_str().trim().is_empty() {
                bail!("site name cannot be empty");
            }
            if !site_names.insert(site.name.clone()) {
                bail!("duplicate site name: {}", site.name);
            }
            if site.weekly_rules.len() > 7 {
                bail!("site {}: more than 7 weekly rule entries", site.name);
            }
        }
        for s in &self.staff {
            for ex in &s.excluded_sites {
                if !site_names.contains(ex) {
                    bail!("staff {}: unknown excluded site {}", s.name, ex);
                }
            }
            if let Some(pref) = &s.preferred_site {
                if !site_names.contains(pref) {
                    bail!("staff {}: unknown preferred site {}", s.name, pref);
                }
            }
        }
        for ov in &self.overrides {
            if !site_names.contains(&ov.site) {
                bail!("override references unknown site {}", ov.site);
            }
        }
        for p in &self.prohibitions {
            if !site_names.contains(&p.site) {
                bail!("prohibition references unknown site {}", p.site);
            }
            if !staff_names.contains(&p.staff) {
                bail!("prohibition references unknown staff {}", p.staff);
            }
        }
        self.config.validate(&site_names, &staff_names)?;
        Ok(())
    }
}
