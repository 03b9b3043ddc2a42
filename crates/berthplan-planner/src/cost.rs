//! Cost model — ranked preferences as a minimization problem.
//!
//! Rows are applications, columns are every berth that appears in any
//! candidate row. A stated preference costs `priority - (max_priority + 1)`,
//! so the 1..=10 form maps to -10..=-1 and anything expressed beats the
//! neutral 0 of an unstated pair. Zero cells are still usable by the solver:
//! they mean "no preference", not "forbidden".

use std::collections::HashMap;

use berthplan_state::{ApplicationId, BerthId};

use crate::error::{PlannerError, PlannerResult};
use crate::gather::CandidateRow;

/// Cost of pairing an application with a berth it did not ask for.
pub const NEUTRAL_COST: i64 = 0;

/// Map a priority onto a strictly negative cost. Lower priority numbers
/// (stronger preferences) give more negative costs.
pub fn scale_priority(priority: u16, max_priority: u16) -> i64 {
    i64::from(priority) - (i64::from(max_priority) + 1)
}

/// Dense row-major cost matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    rows: usize,
    columns: usize,
    cells: Vec<i64>,
}

impl CostMatrix {
    /// A `rows × columns` matrix filled with [`NEUTRAL_COST`].
    pub fn neutral(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![NEUTRAL_COST; rows * columns],
        }
    }

    /// Build from explicit rows. Fails if the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> PlannerResult<Self> {
        let columns = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(rows.len() * columns);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns {
                return Err(PlannerError::Solver(format!(
                    "ragged cost matrix: row {index} has {} columns, expected {columns}",
                    row.len()
                )));
            }
            cells.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            columns,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }

    pub fn get(&self, row: usize, column: usize) -> i64 {
        self.cells[row * self.columns + column]
    }

    fn set(&mut self, row: usize, column: usize, cost: i64) {
        self.cells[row * self.columns + column] = cost;
    }

    /// Row-major cell values.
    pub fn cells(&self) -> &[i64] {
        &self.cells
    }

    /// Column-major copy, i.e. the cells of the transposed matrix.
    pub fn transposed_cells(&self) -> Vec<i64> {
        let mut cells = Vec::with_capacity(self.cells.len());
        for column in 0..self.columns {
            for row in 0..self.rows {
                cells.push(self.get(row, column));
            }
        }
        cells
    }
}

/// The cost matrix together with the ids behind its rows and columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostModel {
    pub matrix: CostMatrix,
    /// Row index → application id.
    pub application_ids: Vec<ApplicationId>,
    /// Column index → berth id.
    pub berth_ids: Vec<BerthId>,
    /// Priority ceiling the costs were scaled against.
    pub max_priority: u16,
}

impl CostModel {
    /// Build the model from gathered rows.
    ///
    /// `priority_ceiling` is the configured lowest preference; if a row
    /// carries a larger priority the scale widens to keep every stated
    /// preference below zero.
    pub fn build(rows: &[CandidateRow], priority_ceiling: u16) -> PlannerResult<Self> {
        for row in rows {
            if row.berth_ids.len() != row.priorities.len() {
                return Err(PlannerError::Solver(format!(
                    "candidate row for {} has {} berths but {} priorities",
                    row.application_id,
                    row.berth_ids.len(),
                    row.priorities.len()
                )));
            }
        }

        let max_priority = rows
            .iter()
            .flat_map(|row| row.priorities.iter().copied())
            .max()
            .unwrap_or(0)
            .max(priority_ceiling);

        let application_ids: Vec<ApplicationId> =
            rows.iter().map(|row| row.application_id.clone()).collect();

        // Columns in order of first appearance.
        let mut berth_ids: Vec<BerthId> = Vec::new();
        let mut column_of: HashMap<&str, usize> = HashMap::new();
        for row in rows {
            for berth_id in &row.berth_ids {
                column_of.entry(berth_id.as_str()).or_insert_with(|| {
                    berth_ids.push(berth_id.clone());
                    berth_ids.len() - 1
                });
            }
        }

        let mut matrix = CostMatrix::neutral(application_ids.len(), berth_ids.len());
        for (row_index, row) in rows.iter().enumerate() {
            for (berth_id, priority) in row.candidates() {
                let column = column_of[berth_id];
                let cost = scale_priority(priority, max_priority);
                // A berth reached through two choices keeps the stronger one.
                if cost < matrix.get(row_index, column) {
                    matrix.set(row_index, column, cost);
                }
            }
        }

        Ok(Self {
            matrix,
            application_ids,
            berth_ids,
            max_priority,
        })
    }
}
