//! Narrow interface to the black-box 0/1 integer solver.
//!
//! The engine builds a [`MilpModel`] (binary variables, linear constraints,
//! linear objective to maximize) and hands it to a [`MilpBackend`] together
//! with a wall-clock budget. The default backend wraps `good_lp` over the
//! pure-Rust `microlp` solver.

use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Index of a binary decision variable inside a [`MilpModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub usize);

/// Linear expression over decision variables.
#[derive(Debug, Clone, Default)]
pub struct LinExpr {
    pub terms: Vec<(VarId, f64)>,
}

impl LinExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, var: VarId, coef: f64) {
        self.terms.push((var, coef));
    }

    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Le,
    Eq,
}

#[derive(Debug, Clone)]
pub struct LinConstraint {
    pub expr: LinExpr,
    pub op: CmpOp,
    pub rhs: f64,
}

/// A complete 0/1 optimization model: maximize `objective` subject to
/// `constraints`, all variables binary.
#[derive(Debug, Clone, Default)]
pub struct MilpModel {
    num_vars: usize,
    pub constraints: Vec<LinConstraint>,
    pub objective: LinExpr,
}

impl MilpModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_var(&mut self) -> VarId {
        let id = VarId(self.num_vars);
        self.num_vars += 1;
        id
    }

    pub fn add_le(&mut self, expr: LinExpr, rhs: f64) {
        self.constraints.push(LinConstraint {
            expr,
            op: CmpOp::Le,
            rhs,
        });
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }
}

/// Outcome classification of one solver invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// Proven optimal.
    Optimal,
    /// Budget expired with a feasible but not proven-optimal incumbent.
    /// Usable, but must never be labeled as optimal.
    TimeLimitFeasible,
    /// No assignment satisfies the hard constraints.
    Infeasible,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::TimeLimitFeasible => "TIME_LIMIT_FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
        };
        f.write_str(s)
    }
}

/// Solver answer. `values` is present iff a feasible solution was found.
#[derive(Debug, Clone)]
pub struct MilpSolution {
    pub status: SolveStatus,
    pub values: Option<Vec<bool>>,
    pub objective: Option<f64>,
}

#[derive(Error, Debug)]
pub enum MilpError {
    #[error("model is unbounded")]
    Unbounded,
    #[error("solver backend error: {0}")]
    Backend(String),
}

/// Black-box solver contract. Implementations must treat the model as
/// read-only and return within a best effort of `budget`.
pub trait MilpBackend {
    fn solve(&self, model: &MilpModel, budget: Duration) -> Result<MilpSolution, MilpError>;
}

/// Default backend: `good_lp` with the pure-Rust `microlp` solver.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoodLpBackend;

impl MilpBackend for GoodLpBackend {
    fn solve(&self, model: &MilpModel, budget: Duration) -> Result<MilpSolution, MilpError> {
        // microlp runs branch-and-bound to proven optimality and has no
        // deadline hook; the budget is honored by backends that support one.
        let _ = budget;

        if model.num_vars() == 0 {
            return Ok(MilpSolution {
                status: SolveStatus::Optimal,
                values: Some(Vec::new()),
                objective: Some(0.0),
            });
        }

        let mut pvars = ProblemVariables::new();
        let vars: Vec<Variable> = (0..model.num_vars())
            .map(|_| pvars.add(variable().binary()))
            .collect();

        let objective = to_expression(&model.objective, &vars);
        let mut problem = pvars.maximise(objective.clone()).using(default_solver);
        for c in &model.constraints {
            let lhs = to_expression(&c.expr, &vars);
            let built = match c.op {
                CmpOp::Le => constraint::leq(lhs, c.rhs),
                CmpOp::Eq => constraint::eq(lhs, c.rhs),
            };
            problem = problem.with(built);
        }

        debug!(
            vars = model.num_vars(),
            constraints = model.constraints.len(),
            "submitting model to solver"
        );

        match problem.solve() {
            Ok(sol) => {
                let values = vars.iter().map(|v| sol.value(*v) > 0.5).collect();
                let objective = sol.eval(objective);
                Ok(MilpSolution {
                    status: SolveStatus::Optimal,
                    values: Some(values),
                    objective: Some(objective),
                })
            }
            Err(ResolutionError::Infeasible) => Ok(MilpSolution {
                status: SolveStatus::Infeasible,
                values: None,
                objective: None,
            }),
            Err(ResolutionError::Unbounded) => Err(MilpError::Unbounded),
            Err(e) => Err(MilpError::Backend(e.to_string())),
        }
    }
}

fn to_expression(expr: &LinExpr, vars: &[Variable]) -> Expression {
    let mut out = Expression::from(0.0);
    for (VarId(i), coef) in &expr.terms {
        out += *coef * vars[*i];
    }
    out
}
