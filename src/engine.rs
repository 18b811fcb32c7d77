use crate::calendar::{self, CalendarError, Day};
use crate::demand::{self, AlternatingSaturday, DemandTable};
use crate::eligibility::Eligibility;
use crate::milp::{LinExpr, MilpBackend, MilpError, MilpModel, SolveStatus, VarId};
use crate::model::{Plan, ShiftKind, Site, SiteId, Staff, StaffId};
use crate::schedule::{self, Schedule};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Split-shift handling: `Hard` forbids morning+evening without the
/// connecting afternoon outright, `Soft` charges `weights.split_penalty`
/// per occurrence instead. One mode per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitShiftMode {
    Hard,
    Soft,
}

/// Objective weights; higher weight means higher priority.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveWeights {
    /// Reward per fulfilled assignment (primary term).
    pub coverage: f64,
    /// Bonus per assignment at the staff member's preferred site.
    pub preference: f64,
    /// Penalty per triggered split-shift indicator (soft mode only).
    pub split_penalty: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            coverage: 100.0,
            preference: 1.0,
            split_penalty: 5.0,
        }
    }
}

/// Geographic incompatibility: an afternoon shift at `afternoon_site` and an
/// evening shift at any of `evening_sites` cannot be held by the same person
/// on the same day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyRule {
    pub afternoon_site: SiteId,
    pub evening_sites: Vec<SiteId>,
}

/// Named bonus for a specific (staff, weekday, site, kind) combination.
/// Configuration data, not logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenSlot {
    pub staff: StaffId,
    /// 0=Monday..6=Sunday.
    pub weekday: u8,
    pub site: SiteId,
    pub kind: ShiftKind,
    pub bonus: f64,
}

/// Immutable per-solve configuration record. Everything the entry
/// collaborator can toggle lives here, not in the builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveConfig {
    /// Maximum shift kinds one person may hold per day (legacy deployments
    /// allow 2).
    pub daily_shift_cap: u32,
    pub split_shift: SplitShiftMode,
    pub alternating_saturday: Option<AlternatingSaturday>,
    pub adjacency_exclusions: Vec<AdjacencyRule>,
    pub golden_slots: Vec<GoldenSlot>,
    pub weights: ObjectiveWeights,
    pub time_budget_secs: u64,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            daily_shift_cap: 1,
            split_shift: SplitShiftMode::Hard,
            alternating_saturday: None,
            adjacency_exclusions: Vec::new(),
            golden_slots: Vec::new(),
            weights: ObjectiveWeights::default(),
            time_budget_secs: 30,
        }
    }
}

impl SolveConfig {
    pub fn validate(
        &self,
        site_names: &BTreeSet<SiteId>,
        staff_names: &BTreeSet<StaffId>,
    ) -> Result<()> {
        if self.daily_shift_cap == 0 {
            bail!("daily_shift_cap must be at least 1");
        }
        if let Some(alt) = &self.alternating_saturday {
            if !site_names.contains(&alt.site) {
                bail!("alternating_saturday references unknown site {}", alt.site);
            }
        }
        for rule in &self.adjacency_exclusions {
            if !site_names.contains(&rule.afternoon_site) {
                bail!("adjacency rule references unknown site {}", rule.afternoon_site);
            }
            for s in &rule.evening_sites {
                if !site_names.contains(s) {
                    bail!("adjacency rule references unknown site {}", s);
                }
            }
        }
        for g in &self.golden_slots {
            if !staff_names.contains(&g.staff) {
                bail!("golden slot references unknown staff {}", g.staff);
            }
            if !site_names.contains(&g.site) {
                bail!("golden slot references unknown site {}", g.site);
            }
            if g.weekday > 6 {
                bail!("golden slot weekday {} out of range 0..=6", g.weekday);
            }
        }
        Ok(())
    }
}

/// Metadata for one instantiated decision variable: indices into the staff,
/// site and day slices.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentVar {
    pub staff: usize,
    pub site: usize,
    pub day: usize,
    pub kind: ShiftKind,
}

/// Built model plus the mapping from decision variables back to assignments.
/// Soft split-shift indicator variables live in the model but not in
/// `assignments`.
pub struct AssignmentModel {
    pub milp: MilpModel,
    pub assignments: Vec<(VarId, AssignmentVar)>,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error(transparent)]
    Solver(#[from] MilpError),
    #[error("no schedule possible: hard constraints are contradictory")]
    Infeasible,
}

/// Encode demand, eligibility, caps and shape constraints into a 0/1 model.
/// Forbidden combinations are never instantiated, keeping the model small.
pub fn build_model(
    staff: &[Staff],
    sites: &[Site],
    days: &[Day],
    demand: &DemandTable,
    eligibility: &Eligibility<'_>,
    config: &SolveConfig,
) -> AssignmentModel {
    let mut milp = MilpModel::new();
    let mut assignments = Vec::new();
    // (staff, site, day, kind) -> var, for grouped constraint emission.
    let mut lookup: HashMap<(usize, usize, usize, ShiftKind), VarId> = HashMap::new();

    for (ni, person) in staff.iter().enumerate() {
        for (di, day) in days.iter().enumerate() {
            for (ci, site) in sites.iter().enumerate() {
                for kind in ShiftKind::ALL {
                    if eligibility.permitted(person, day, site, kind) {
                        let var = milp.add_var();
                        lookup.insert((ni, ci, di, kind), var);
                        assignments.push((
                            var,
                            AssignmentVar {
                                staff: ni,
                                site: ci,
                                day: di,
                                kind,
                            },
                        ));
                    }
                }
            }
        }
    }

    // Demand ceiling: per slot, assigned staff never exceed the requirement.
    // Under-fill stays feasible and becomes a vacancy.
    for (ci, site) in sites.iter().enumerate() {
        for (di, day) in days.iter().enumerate() {
            for kind in ShiftKind::ALL {
                let required = demand.get(&site.name, day.date, kind);
                if required == 0 {
                    continue;
                }
                let vars: Vec<VarId> = (0..staff.len())
                    .filter_map(|ni| lookup.get(&(ni, ci, di, kind)).copied())
                    .collect();
                if !vars.is_empty() {
                    milp.add_le(LinExpr::sum(vars), f64::from(required));
                }
            }
        }
    }

    let site_vars = |ni: usize, di: usize, kind: ShiftKind| -> Vec<VarId> {
        (0..sites.len())
            .filter_map(|ci| lookup.get(&(ni, ci, di, kind)).copied())
            .collect()
    };

    for (ni, person) in staff.iter().enumerate() {
        let mut period_vars = Vec::new();

        for di in 0..days.len() {
            let mut day_vars = Vec::new();

            // One site at a time within a shift kind.
            for kind in ShiftKind::ALL {
                let vars = site_vars(ni, di, kind);
                if vars.len() > 1 {
                    milp.add_le(LinExpr::sum(vars.iter().copied()), 1.0);
                }
                day_vars.extend(vars);
            }

            // Daily shift-count cap.
            if day_vars.len() > usize::try_from(config.daily_shift_cap).unwrap_or(usize::MAX) {
                milp.add_le(
                    LinExpr::sum(day_vars.iter().copied()),
                    f64::from(config.daily_shift_cap),
                );
            }

            // Split-shift pattern: morning + evening - afternoon <= 1.
            let morning = site_vars(ni, di, ShiftKind::Morning);
            let afternoon = site_vars(ni, di, ShiftKind::Afternoon);
            let evening = site_vars(ni, di, ShiftKind::Evening);
            if !morning.is_empty() && !evening.is_empty() {
                let mut expr = LinExpr::new();
                for v in morning.iter().chain(&evening) {
                    expr.push(*v, 1.0);
                }
                for v in &afternoon {
                    expr.push(*v, -1.0);
                }
                match config.split_shift {
                    SplitShiftMode::Hard => milp.add_le(expr, 1.0),
                    SplitShiftMode::Soft => {
                        let indicator = milp.add_var();
                        expr.push(indicator, -1.0);
                        milp.add_le(expr, 1.0);
                        milp.objective
                            .push(indicator, -config.weights.split_penalty);
                    }
                }
            }

            // Cross-site adjacency exclusivity (travel infeasibility).
            for rule in &config.adjacency_exclusions {
                let Some(xc) = sites.iter().position(|s| s.name == rule.afternoon_site) else {
                    continue;
                };
                let Some(a_var) = lookup.get(&(ni, xc, di, ShiftKind::Afternoon)) else {
                    continue;
                };
                for other in &rule.evening_sites {
                    let Some(yc) = sites.iter().position(|s| s.name == *other) else {
                        continue;
                    };
                    if let Some(e_var) = lookup.get(&(ni, yc, di, ShiftKind::Evening)) {
                        let mut expr = LinExpr::new();
                        expr.push(*a_var, 1.0);
                        expr.push(*e_var, 1.0);
                        milp.add_le(expr, 1.0);
                    }
                }
            }

            period_vars.extend(day_vars);
        }

        // Period cap.
        if !period_vars.is_empty() {
            milp.add_le(LinExpr::sum(period_vars), f64::from(person.cap));
        }
    }

    // Objective: coverage first, then preference and golden-slot bonuses.
    for (var, meta) in &assignments {
        let person = &staff[meta.staff];
        let site = &sites[meta.site];
        let day = &days[meta.day];
        let mut coef = config.weights.coverage;
        if person.preferred_site.as_ref() == Some(&site.name) {
            coef += config.weights.preference;
        }
        for g in &config.golden_slots {
            if g.staff == person.name
                && g.weekday == day.weekday
                && g.site == site.name
                && g.kind == meta.kind
            {
                coef += g.bonus;
            }
        }
        milp.objective.push(*var, coef);
    }

    AssignmentModel { milp, assignments }
}

/// Run one complete solve: calendar -> demand -> eligibility -> model ->
/// solver -> projection. Each invocation builds an independent model from a
/// fresh snapshot of the plan.
pub fn solve_plan(
    plan: &Plan,
    config: &SolveConfig,
    backend: &dyn MilpBackend,
) -> Result<Schedule, EngineError> {
    let days = calendar::expand(&plan.period)?;
    let demand = demand::resolve(
        &plan.sites,
        &days,
        &plan.overrides,
        config.alternating_saturday.as_ref(),
    );
    let eligibility = Eligibility::new(&demand, &plan.prohibitions);
    let model = build_model(&plan.staff, &plan.sites, &days, &demand, &eligibility, config);

    info!(
        days = days.len(),
        vars = model.milp.num_vars(),
        constraints = model.milp.constraints.len(),
        total_demand = demand.total(),
        "model built, invoking solver"
    );

    let budget = Duration::from_secs(config.time_budget_secs);
    let solution = backend.solve(&model.milp, budget)?;

    if solution.status == SolveStatus::Infeasible {
        return Err(EngineError::Infeasible);
    }
    let values = solution.values.as_deref().ok_or_else(|| {
        EngineError::Solver(MilpError::Backend(
            "feasible status reported without variable values".to_string(),
        ))
    })?;

    info!(status = %solution.status, objective = solution.objective, "solver finished");

    Ok(schedule::project(
        &plan.staff,
        &plan.sites,
        &days,
        &demand,
        &model,
        solution.status,
        solution.objective.unwrap_or(0.0),
        values,
    ))
}
