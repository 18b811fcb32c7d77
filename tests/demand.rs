#![forbid(unsafe_code)]
use chrono::{NaiveDate, Weekday};
use shiftsolve::calendar::{self, Day};
use shiftsolve::demand::{self, AlternatingSaturday};
use shiftsolve::model::{Override, Period, ShiftKind, Site, SiteId};
use shiftsolve::rules::WeekTable;

fn monday(week: u32) -> NaiveDate {
    NaiveDate::from_isoywd_opt(2026, week, Weekday::Mon).unwrap()
}

fn saturday(week: u32) -> NaiveDate {
    NaiveDate::from_isoywd_opt(2026, week, Weekday::Sat).unwrap()
}

fn days(dates: &[NaiveDate]) -> Vec<Day> {
    calendar::expand(&Period::Dates {
        dates: dates.to_vec(),
    })
    .unwrap()
}

#[test]
fn base_rule_parsing_and_weekday_mapping() {
    let table = WeekTable::parse(&["M2/A1/E1".to_string()]);
    assert_eq!(table.demand(0, ShiftKind::Morning), 2);
    assert_eq!(table.demand(0, ShiftKind::Afternoon), 1);
    assert_eq!(table.demand(0, ShiftKind::Evening), 1);
    // missing weekday entries mean not operating
    assert_eq!(table.demand(1, ShiftKind::Morning), 0);
    assert_eq!(table.demand(6, ShiftKind::Evening), 0);
}

#[test]
fn malformed_rule_tokens_fall_back_to_zero() {
    let table = WeekTable::parse(&["MX/A1/Ztrash".to_string(), "garbage".to_string()]);
    assert_eq!(table.demand(0, ShiftKind::Morning), 0);
    assert_eq!(table.demand(0, ShiftKind::Afternoon), 1);
    assert_eq!(table.demand(0, ShiftKind::Evening), 0);
    assert_eq!(table.demand(1, ShiftKind::Morning), 0);
}

#[test]
fn override_beats_base_rule() {
    let date = monday(10);
    let site = Site::new("central", vec!["M2/A1/E1".into()]);
    let overrides = vec![Override {
        site: SiteId::new("central"),
        date,
        kind: ShiftKind::Morning,
        headcount: 5,
    }];

    let table = demand::resolve(&[site], &days(&[date]), &overrides, None);
    assert_eq!(table.get(&SiteId::new("central"), date, ShiftKind::Morning), 5);
    // untouched kinds keep the base rule
    assert_eq!(table.get(&SiteId::new("central"), date, ShiftKind::Afternoon), 1);
}

#[test]
fn closure_beats_override() {
    let date = monday(10);
    let mut site = Site::new("central", vec!["M2/A1/E1".into()]);
    site.closed_dates.insert(date);
    let overrides = vec![Override {
        site: SiteId::new("central"),
        date,
        kind: ShiftKind::Morning,
        headcount: 5,
    }];

    let table = demand::resolve(&[site], &days(&[date]), &overrides, None);
    for kind in ShiftKind::ALL {
        assert_eq!(table.get(&SiteId::new("central"), date, kind), 0);
    }
}

#[test]
fn alternating_saturdays_toggle_morning_requirement() {
    let dates = [saturday(10), saturday(11), saturday(12)];
    // base Saturday rule says 9, the alternating rule replaces it
    let rules = vec![
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        "M9/A3".to_string(),
    ];
    let site = Site::new("central", rules);
    let alt = AlternatingSaturday {
        site: SiteId::new("central"),
        first: 1,
        second: 2,
    };

    let table = demand::resolve(&[site], &days(&dates), &[], Some(&alt));
    let id = SiteId::new("central");
    assert_eq!(table.get(&id, dates[0], ShiftKind::Morning), 1);
    assert_eq!(table.get(&id, dates[1], ShiftKind::Morning), 2);
    assert_eq!(table.get(&id, dates[2], ShiftKind::Morning), 1);
    // afternoons keep the base rule
    assert_eq!(table.get(&id, dates[0], ShiftKind::Afternoon), 3);
}

#[test]
fn override_beats_alternating_rule() {
    let dates = [saturday(10), saturday(11)];
    let rules = vec![
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        "M9".to_string(),
    ];
    let site = Site::new("central", rules);
    let alt = AlternatingSaturday {
        site: SiteId::new("central"),
        first: 1,
        second: 2,
    };
    let overrides = vec![Override {
        site: SiteId::new("central"),
        date: dates[1],
        kind: ShiftKind::Morning,
        headcount: 7,
    }];

    let table = demand::resolve(&[site], &days(&dates), &overrides, Some(&alt));
    let id = SiteId::new("central");
    assert_eq!(table.get(&id, dates[0], ShiftKind::Morning), 1);
    assert_eq!(table.get(&id, dates[1], ShiftKind::Morning), 7);
}

#[test]
fn invalid_month_is_a_configuration_error() {
    let err = calendar::expand(&Period::Month {
        year: 2026,
        month: 13,
    })
    .unwrap_err();
    assert_eq!(
        err,
        shiftsolve::CalendarError::InvalidMonth {
            year: 2026,
            month: 13
        }
    );

    let err = calendar::expand(&Period::Dates { dates: vec![] }).unwrap_err();
    assert_eq!(err, shiftsolve::CalendarError::EmptyPeriod);
}

#[test]
fn month_expansion_covers_every_day_in_order() {
    let days = calendar::expand(&Period::Month {
        year: 2026,
        month: 2,
    })
    .unwrap();
    assert_eq!(days.len(), 28);
    assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    assert_eq!(days[27].date, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    for (day, next) in days.iter().zip(days.iter().skip(1)) {
        assert_eq!(day.date.succ_opt().unwrap(), next.date);
    }
}
