//! Optimal matcher — exact minimum-cost rectangular assignment.
//!
//! Wraps the Kuhn–Munkres solver from `pathfinding`, which needs at least as
//! many columns as rows; taller matrices are solved transposed and mapped
//! back. The result always has `min(rows, columns)` pairs with every row and
//! column used at most once.

use berthplan_state::{ApplicationId, BerthId};
use pathfinding::kuhn_munkres::kuhn_munkres_min;
use pathfinding::matrix::Matrix;

use crate::cost::{CostMatrix, CostModel};
use crate::error::{PlannerError, PlannerResult};

/// Optimal pairs in index space, sorted by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub pairs: Vec<(usize, usize)>,
    pub total_cost: i64,
}

/// Solve the assignment problem over `matrix`.
pub fn solve(matrix: &CostMatrix) -> PlannerResult<Assignment> {
    if matrix.is_empty() {
        return Ok(Assignment {
            pairs: Vec::new(),
            total_cost: 0,
        });
    }

    let (rows, columns) = (matrix.rows(), matrix.columns());
    let mut pairs: Vec<(usize, usize)> = if rows <= columns {
        let weights = Matrix::from_vec(rows, columns, matrix.cells().to_vec())
            .map_err(|e| PlannerError::Solver(format!("invalid cost matrix: {e:?}")))?;
        let (_, column_of_row) = kuhn_munkres_min(&weights);
        column_of_row.into_iter().enumerate().collect()
    } else {
        let weights = Matrix::from_vec(columns, rows, matrix.transposed_cells())
            .map_err(|e| PlannerError::Solver(format!("invalid cost matrix: {e:?}")))?;
        let (_, row_of_column) = kuhn_munkres_min(&weights);
        row_of_column
            .into_iter()
            .enumerate()
            .map(|(column, row)| (row, column))
            .collect()
    };
    pairs.sort_unstable();

    let total_cost = pairs
        .iter()
        .map(|&(row, column)| matrix.get(row, column))
        .sum();

    Ok(Assignment { pairs, total_cost })
}

/// Optimal pairs mapped back onto ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching {
    pub pairs: Vec<MatchedPair>,
    pub total_cost: i64,
}

/// One application → berth pair with the cost it contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPair {
    pub application_id: ApplicationId,
    pub berth_id: BerthId,
    pub cost: i64,
}

impl MatchedPair {
    /// True when the berth was not among the application's candidates.
    pub fn is_unpreferred(&self) -> bool {
        self.cost >= 0
    }
}

/// Solve the model and translate row/column indices back to ids.
pub fn match_candidates(model: &CostModel) -> PlannerResult<Matching> {
    if model.application_ids.len() != model.matrix.rows()
        || model.berth_ids.len() != model.matrix.columns()
    {
        return Err(PlannerError::Solver(format!(
            "lookup sizes {}x{} do not match cost matrix {}x{}",
            model.application_ids.len(),
            model.berth_ids.len(),
            model.matrix.rows(),
            model.matrix.columns()
        )));
    }

    let assignment = solve(&model.matrix)?;
    let pairs = assignment
        .pairs
        .iter()
        .map(|&(row, column)| MatchedPair {
            application_id: model.application_ids[row].clone(),
            berth_id: model.berth_ids[column].clone(),
            cost: model.matrix.get(row, column),
        })
        .collect();

    Ok(Matching {
        pairs,
        total_cost: assignment.total_cost,
    })
}
