use crate::model::{Period, Plan, ShiftKind, Site, SiteId, Staff, StaffId};
use crate::schedule::Schedule;
use anyhow::Context;
use chrono::NaiveDate;
use csv::WriterBuilder;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Marker written in grid cells for non-operating slots.
const CLOSED: &str = "closed";
/// Marker for operating slots left entirely unfilled.
const UNFILLED: &str = "---";

/// Load and validate a plan file (JSON).
pub fn load_plan<P: AsRef<Path>>(path: P) -> anyhow::Result<Plan> {
    let data = fs::read(&path)
        .with_context(|| format!("reading plan {}", path.as_ref().display()))?;
    let plan: Plan = serde_json::from_slice(&data)
        .with_context(|| format!("parsing plan {}", path.as_ref().display()))?;
    plan.validate()?;
    Ok(plan)
}

pub fn export_plan_json<P: AsRef<Path>>(path: P, plan: &Plan) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    fs::write(&path, json)
        .with_context(|| format!("writing plan {}", path.as_ref().display()))?;
    Ok(())
}

/// Export the solved grid as one row per day, one column per (site, kind).
/// Closed slots carry a marker; unfilled operating slots carry another.
pub fn export_schedule_csv<P: AsRef<Path>>(path: P, schedule: &Schedule) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(&path)?;

    // Column order follows the slot order of the first day.
    let columns: Vec<(SiteId, ShiftKind)> = schedule
        .days
        .first()
        .map(|first| {
            schedule
                .slots
                .iter()
                .filter(|s| s.date == *first)
                .map(|s| (s.site.clone(), s.kind))
                .collect()
        })
        .unwrap_or_default();

    let mut header = vec![format!("date ({})", schedule.status)];
    header.extend(columns.iter().map(|(site, kind)| format!("{site}-{kind}")));
    w.write_record(&header)?;

    let mut by_key: HashMap<(NaiveDate, &SiteId, ShiftKind), usize> = HashMap::new();
    for (i, slot) in schedule.slots.iter().enumerate() {
        by_key.insert((slot.date, &slot.site, slot.kind), i);
    }

    for date in &schedule.days {
        let mut row = vec![date.to_string()];
        for (site, kind) in &columns {
            let cell = match by_key.get(&(*date, site, *kind)) {
                Some(i) => {
                    let slot = &schedule.slots[*i];
                    if slot.required == 0 {
                        CLOSED.to_string()
                    } else if slot.staff.is_empty() {
                        UNFILLED.to_string()
                    } else {
                        slot.staff
                            .iter()
                            .map(StaffId::as_str)
                            .collect::<Vec<_>>()
                            .join("+")
                    }
                }
                None => CLOSED.to_string(),
            };
            row.push(cell);
        }
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

/// Export vacancies: header `date,site,kind,required,assigned,shortfall`.
pub fn export_vacancies_csv<P: AsRef<Path>>(path: P, schedule: &Schedule) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(&path)?;
    w.write_record(["date", "site", "kind", "required", "assigned", "shortfall"])?;
    for v in &schedule.vacancies {
        w.write_record([
            v.date.to_string().as_str(),
            v.site.as_str(),
            v.kind.as_str(),
            v.required.to_string().as_str(),
            v.assigned.to_string().as_str(),
            v.shortfall.to_string().as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export per-staff totals: header `staff,total_shifts`.
pub fn export_totals_csv<P: AsRef<Path>>(path: P, schedule: &Schedule) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(&path)?;
    w.write_record(["staff", "total_shifts"])?;
    for (name, total) in &schedule.totals {
        w.write_record([name.as_str(), total.to_string().as_str()])?;
    }
    w.flush()?;
    Ok(())
}

/// Small feasible plan skeleton for `init-plan`: two sites, three staff,
/// one explicit week.
pub fn sample_plan() -> Plan {
    let dates: Vec<NaiveDate> = (1..=7)
        .map(|d| NaiveDate::from_ymd_opt(2026, 9, d).expect("valid date"))
        .collect();

    let mut ann = Staff::new("ann", 6);
    ann.preferred_site = Some(SiteId::new("central"));
    let mut bea = Staff::new("bea", 6);
    bea.no_evening = true;
    let mut cho = Staff::new("cho", 5);
    cho.weekly_off.insert(6); // Sundays off

    Plan {
        period: Period::Dates { dates },
        staff: vec![ann, bea, cho],
        sites: vec![
            Site::new(
                "central",
                vec![
                    "M1/A1/E1".into(),
                    "M1/A1/E1".into(),
                    "M1/A1/E1".into(),
                    "M1/A1/E1".into(),
                    "M1/A1/E1".into(),
                    "M1/A1".into(),
                    "M1".into(),
                ],
            ),
            Site::new(
                "riverside",
                vec![
                    "M1/A1".into(),
                    "M1/A1".into(),
                    "M1/A1".into(),
                    "M1/A1".into(),
                    "M1/A1".into(),
                    "M1".into(),
                ],
            ),
        ],
        overrides: Vec::new(),
        prohibitions: Vec::new(),
        config: Default::default(),
    }
}
