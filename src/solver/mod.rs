//! Exact search engines for the 0/1 knapsack problem.
//!
//! Integer instances whose table fits the configured ceiling are solved by
//! dynamic programming; real-valued or oversize instances go through
//! branch-and-bound with a fractional-relaxation bound.

mod branch_bound;
mod dynamic;

use std::time::{Duration, Instant};

use tracing::debug;

use crate::{Instance, Num, Solution, SolveStatus};

/// Ceiling on `(capacity + 1) * (items + 1)` table cells before an integer
/// instance is routed to branch-and-bound instead.
pub const DEFAULT_MAX_DP_CELLS: usize = 1 << 24;

/// Search budget and sizing knobs, passed explicitly into [`solve`].
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Wall-clock budget for branch-and-bound. Exhaustion yields the
    /// incumbent with [`SolveStatus::FeasibleUnproven`].
    pub time_limit: Option<Duration>,
    /// Node-expansion budget for branch-and-bound.
    pub node_limit: Option<u64>,
    /// Dynamic-programming table ceiling, in cells.
    pub max_dp_cells: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            time_limit: None,
            node_limit: None,
            max_dp_cells: DEFAULT_MAX_DP_CELLS,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the node-expansion budget.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }
}

/// Integer view of an instance: available only when capacity and every
/// item value sit in the non-negative integer domain.
struct IntInstance {
    capacity: u64,
    profits: Vec<u64>,
    weights: Vec<u64>,
}

impl IntInstance {
    fn of(instance: &Instance) -> Option<IntInstance> {
        let capacity = int_value(instance.capacity())?;
        let mut profits = Vec::with_capacity(instance.len());
        let mut weights = Vec::with_capacity(instance.len());
        for item in instance.items() {
            profits.push(int_value(item.profit)?);
            weights.push(int_value(item.weight)?);
        }
        Some(IntInstance {
            capacity,
            profits,
            weights,
        })
    }

    fn table_cells(&self) -> Option<usize> {
        let width = usize::try_from(self.capacity).ok()?.checked_add(1)?;
        width.checked_mul(self.profits.len() + 1)
    }
}

fn int_value(value: Num) -> Option<u64> {
    match value {
        Num::Int(int) => u64::try_from(int).ok(),
        Num::Real(_) => None,
    }
}

/// Solves the instance, proving optimality whenever the budget allows.
///
/// Pure apart from time measurement: a fixed instance and configuration
/// always produce the same selection.
pub fn solve(instance: &Instance, config: &SolverConfig) -> Solution {
    let started = Instant::now();

    if instance.capacity().is_negative() {
        return Solution {
            status: SolveStatus::Infeasible,
            selected: Vec::new(),
            objective_value: zero(instance),
            weight_used: zero(instance),
            elapsed: started.elapsed(),
        };
    }

    let (selected, proven) = match IntInstance::of(instance) {
        Some(view)
            if view
                .table_cells()
                .is_some_and(|cells| cells <= config.max_dp_cells) =>
        {
            let selected = dynamic::solve(&view);
            debug!(engine = "dynamic", items = instance.len(), "search finished");
            (selected, true)
        }
        _ => {
            let outcome = branch_bound::solve(instance, config, started);
            debug!(
                engine = "branch_bound",
                nodes = outcome.nodes,
                proven = outcome.proven,
                "search finished"
            );
            (outcome.selected, outcome.proven)
        }
    };

    let objective_value = sum(instance, selected.iter().map(|&i| instance.items()[i].profit));
    let weight_used = sum(instance, selected.iter().map(|&i| instance.items()[i].weight));

    Solution {
        status: if proven {
            SolveStatus::Optimal
        } else {
            SolveStatus::FeasibleUnproven
        },
        selected,
        objective_value,
        weight_used,
        elapsed: started.elapsed(),
    }
}

fn zero(instance: &Instance) -> Num {
    if instance.is_integral() {
        Num::Int(0)
    } else {
        Num::Real(0.0)
    }
}

fn sum(instance: &Instance, values: impl Iterator<Item = Num>) -> Num {
    values.fold(zero(instance), |acc, value| acc + value)
}
