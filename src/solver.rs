//! The crop-planning linear program and the oracles that solve it.

use std::fmt;

use good_lp::{
    constraint, default_solver, variable, ProblemVariables, ResolutionError, Solution,
    SolverModel,
};
use serde::{Deserialize, Serialize};

use crate::{geometry::constraint_intersection, params::Parameters};

/// Numerical slack when checking corner points against the constraints.
const FEASIBILITY_EPS: f64 = 1e-9;

/// `maximize wheat_profit*x + barley_profit*y` subject to `x + y <= land`,
/// `x + 2y <= labor` and `x, y >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropProblem {
    pub land: f64,
    pub labor: f64,
    pub wheat_profit: f64,
    pub barley_profit: f64,
}

impl CropProblem {
    pub fn objective(&self, wheat_acres: f64, barley_acres: f64) -> f64 {
        self.wheat_profit * wheat_acres + self.barley_profit * barley_acres
    }

    pub fn is_feasible(&self, wheat_acres: f64, barley_acres: f64) -> bool {
        wheat_acres >= -FEASIBILITY_EPS
            && barley_acres >= -FEASIBILITY_EPS
            && wheat_acres + barley_acres <= self.land + FEASIBILITY_EPS
            && wheat_acres + 2.0 * barley_acres <= self.labor + FEASIBILITY_EPS
    }
}

impl From<&Parameters> for CropProblem {
    fn from(params: &Parameters) -> Self {
        Self {
            land: params.land,
            labor: params.labor,
            wheat_profit: params.wheat_profit,
            barley_profit: params.barley_profit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolveResult {
    Optimal {
        wheat_acres: f64,
        barley_acres: f64,
        profit: f64,
    },
    NoOptimal,
}

impl SolveResult {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveResult::Optimal { .. })
    }

    /// Result panel text, one entry per line.
    pub fn lines(&self) -> Vec<String> {
        match self {
            SolveResult::Optimal {
                wheat_acres,
                barley_acres,
                profit,
            } => vec![
                "Optimal solution found!".to_string(),
                format!("Wheat to plant: {wheat_acres:.2} acres"),
                format!("Barley to plant: {barley_acres:.2} acres"),
                format!("Total profit: ${profit:.2}"),
            ],
            SolveResult::NoOptimal => vec!["No optimal solution found.".to_string()],
        }
    }
}

impl fmt::Display for SolveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

/// Anything that can solve a [`CropProblem`]. Implementations must always
/// terminate and never panic; failure is reported as
/// [`SolveResult::NoOptimal`].
pub trait LpOracle {
    fn name(&self) -> &str;
    fn solve(&self, problem: &CropProblem) -> SolveResult;
}

/// Selects an oracle implementation from configuration or the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    #[default]
    GoodLp,
    Vertex,
}

impl SolverKind {
    pub fn build(self) -> Box<dyn LpOracle + Send> {
        match self {
            SolverKind::GoodLp => Box::new(GoodLpOracle::new()),
            SolverKind::Vertex => Box::new(VertexOracle::new()),
        }
    }
}

/// Delegates to `good_lp` and its pure-Rust simplex backend.
pub struct GoodLpOracle;

impl GoodLpOracle {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GoodLpOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl LpOracle for GoodLpOracle {
    fn name(&self) -> &str {
        "good_lp"
    }

    fn solve(&self, problem: &CropProblem) -> SolveResult {
        let mut vars = ProblemVariables::new();
        let wheat = vars.add(variable().min(0.0));
        let barley = vars.add(variable().min(0.0));
        let objective = problem.wheat_profit * wheat + problem.barley_profit * barley;

        let outcome = vars
            .maximise(objective)
            .using(default_solver)
            .with(constraint!(wheat + barley <= problem.land))
            .with(constraint!(wheat + 2.0 * barley <= problem.labor))
            .solve();

        match outcome {
            Ok(solution) => {
                let wheat_acres = solution.value(wheat);
                let barley_acres = solution.value(barley);
                SolveResult::Optimal {
                    wheat_acres,
                    barley_acres,
                    profit: problem.objective(wheat_acres, barley_acres),
                }
            }
            Err(err) => {
                match err {
                    ResolutionError::Infeasible | ResolutionError::Unbounded => {
                        tracing::info!(solver = self.name(), %err, "no optimal solution");
                    }
                    other => {
                        tracing::warn!(solver = self.name(), err = %other, "solver failed");
                    }
                }
                SolveResult::NoOptimal
            }
        }
    }
}

/// Exact solver for this two-variable program: the optimum of a bounded
/// linear program sits on a corner of its feasible polygon, so it evaluates
/// the objective on every candidate corner.
pub struct VertexOracle;

impl VertexOracle {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VertexOracle {
    fn default() -> Self {
        Self::new()
    }
}

/// Corners of the feasible polygon, in counter-clockwise order starting at
/// the origin. Returns an empty list when a bound is negative or not finite.
pub fn feasible_vertices(problem: &CropProblem) -> Vec<(f64, f64)> {
    if !(problem.land.is_finite() && problem.labor.is_finite())
        || problem.land < 0.0
        || problem.labor < 0.0
    {
        return Vec::new();
    }
    let crossing = constraint_intersection(problem.land, problem.labor);
    let candidates = [
        (0.0, 0.0),
        (problem.land.min(problem.labor), 0.0),
        (crossing.x, crossing.y),
        (0.0, problem.land.min(problem.labor / 2.0)),
    ];

    let mut vertices: Vec<(f64, f64)> = Vec::with_capacity(candidates.len());
    for (x, y) in candidates {
        if !problem.is_feasible(x, y) {
            continue;
        }
        let duplicate = vertices
            .iter()
            .any(|&(vx, vy)| (vx - x).abs() <= FEASIBILITY_EPS && (vy - y).abs() <= FEASIBILITY_EPS);
        if !duplicate {
            vertices.push((x, y));
        }
    }
    vertices
}

impl LpOracle for VertexOracle {
    fn name(&self) -> &str {
        "vertex"
    }

    fn solve(&self, problem: &CropProblem) -> SolveResult {
        let best = feasible_vertices(problem)
            .into_iter()
            .map(|(x, y)| (x, y, problem.objective(x, y)))
            .filter(|(_, _, profit)| profit.is_finite())
            .fold(None, |best: Option<(f64, f64, f64)>, candidate| match best {
                Some(current) if current.2 >= candidate.2 => Some(current),
                _ => Some(candidate),
            });

        match best {
            Some((wheat_acres, barley_acres, profit)) => SolveResult::Optimal {
                wheat_acres,
                barley_acres,
                profit,
            },
            None => {
                tracing::info!(solver = self.name(), "no feasible corner");
                SolveResult::NoOptimal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(land: f64, labor: f64, wheat_profit: f64, barley_profit: f64) -> CropProblem {
        CropProblem {
            land,
            labor,
            wheat_profit,
            barley_profit,
        }
    }

    #[test]
    fn result_text_matches_panel() {
        let result = SolveResult::Optimal {
            wheat_acres: 5.0,
            barley_acres: 5.0,
            profit: 35.0,
        };
        assert_eq!(
            result.lines(),
            vec![
                "Optimal solution found!",
                "Wheat to plant: 5.00 acres",
                "Barley to plant: 5.00 acres",
                "Total profit: $35.00",
            ]
        );
        assert_eq!(SolveResult::NoOptimal.to_string(), "No optimal solution found.");
    }

    #[test]
    fn vertices_of_crossing_constraints() {
        let vertices = feasible_vertices(&problem(10.0, 15.0, 0.0, 0.0));
        assert_eq!(vertices, vec![(0.0, 0.0), (10.0, 0.0), (5.0, 5.0), (0.0, 7.5)]);
    }

    #[test]
    fn vertices_when_labor_binds_everywhere() {
        // land 14, labor 10: the labor line lies entirely inside the land line
        let vertices = feasible_vertices(&problem(14.0, 10.0, 0.0, 0.0));
        assert_eq!(vertices, vec![(0.0, 0.0), (10.0, 0.0), (0.0, 5.0)]);
    }

    #[test]
    fn vertices_collapse_to_origin() {
        assert_eq!(feasible_vertices(&problem(0.0, 0.0, 1.0, 1.0)), vec![(0.0, 0.0)]);
        assert!(feasible_vertices(&problem(-1.0, 3.0, 1.0, 1.0)).is_empty());
    }

    #[test]
    fn vertex_oracle_finds_crossing_optimum() {
        let result = VertexOracle::new().solve(&problem(10.0, 15.0, 3.0, 4.0));
        assert_eq!(
            result,
            SolveResult::Optimal {
                wheat_acres: 5.0,
                barley_acres: 5.0,
                profit: 35.0
            }
        );
    }

    #[test]
    fn vertex_oracle_reports_infeasible_bounds() {
        let result = VertexOracle::new().solve(&problem(-2.0, 4.0, 1.0, 1.0));
        assert_eq!(result, SolveResult::NoOptimal);
    }
}
