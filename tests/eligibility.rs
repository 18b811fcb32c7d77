#![forbid(unsafe_code)]
use chrono::{NaiveDate, Weekday};
use shiftsolve::calendar::{self, Day};
use shiftsolve::demand;
use shiftsolve::eligibility::Eligibility;
use shiftsolve::model::{Period, Prohibition, ShiftKind, Site, SiteId, Staff, StaffId};

const OPEN_ALL_WEEK: &str = "M1/A1/E1";

fn week_site(name: &str) -> Site {
    Site::new(name, vec![OPEN_ALL_WEEK.to_string(); 7])
}

fn week_days() -> Vec<Day> {
    let monday = NaiveDate::from_isoywd_opt(2026, 20, Weekday::Mon).unwrap();
    let dates = (0..7)
        .map(|i| monday + chrono::Duration::days(i))
        .collect();
    calendar::expand(&Period::Dates { dates }).unwrap()
}

#[test]
fn forbidden_reasons_each_block_assignment() {
    let sites = [week_site("central"), week_site("annex")];
    let days = week_days();
    let table = demand::resolve(&sites, &days, &[], None);

    let prohibitions = vec![Prohibition {
        staff: StaffId::new("ann"),
        date: days[2].date,
        site: SiteId::new("central"),
        kind: ShiftKind::Afternoon,
    }];
    let elig = Eligibility::new(&table, &prohibitions);

    let mut ann = Staff::new("ann", 10);
    ann.weekly_off.insert(0); // Mondays
    ann.leave_dates.insert(days[1].date);
    ann.excluded_sites.insert(SiteId::new("annex"));
    ann.no_evening = true;

    // weekly recurring day off
    assert!(!elig.permitted(&ann, &days[0], &sites[0], ShiftKind::Morning));
    // specific-date leave
    assert!(!elig.permitted(&ann, &days[1], &sites[0], ShiftKind::Morning));
    // explicit prohibition, exact tuple only
    assert!(!elig.permitted(&ann, &days[2], &sites[0], ShiftKind::Afternoon));
    assert!(elig.permitted(&ann, &days[2], &sites[0], ShiftKind::Morning));
    // excluded site
    assert!(!elig.permitted(&ann, &days[2], &sites[1], ShiftKind::Morning));
    // no evening shift
    assert!(!elig.permitted(&ann, &days[3], &sites[0], ShiftKind::Evening));
    // everything else is permitted
    assert!(elig.permitted(&ann, &days[3], &sites[0], ShiftKind::Morning));
}

#[test]
fn zero_demand_slot_is_never_eligible() {
    let mut site = week_site("central");
    let days = week_days();
    site.closed_dates.insert(days[4].date);
    let sites = [site];
    let table = demand::resolve(&sites, &days, &[], None);
    let elig = Eligibility::new(&table, &[]);

    let ann = Staff::new("ann", 10);
    assert!(!elig.permitted(&ann, &days[4], &sites[0], ShiftKind::Morning));
    assert!(elig.permitted(&ann, &days[5], &sites[0], ShiftKind::Morning));
}
