use std::cmp::Ordering;
use std::time::Instant;

use super::SolverConfig;
use crate::Instance;

// Elapsed time is polled once per this many node expansions.
const BUDGET_POLL_MASK: u64 = 1023;

pub struct SearchOutcome {
    pub selected: Vec<usize>,
    /// False when a budget ran out before the search space was exhausted.
    pub proven: bool,
    pub nodes: u64,
}

struct OrderedItem {
    index: usize,
    profit: f64,
    weight: f64,
}

fn ratio(item: &OrderedItem) -> f64 {
    if item.weight > 0.0 {
        item.profit / item.weight
    } else if item.profit > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Items by profit/weight ratio, best first. Zero-weight items with
/// positive profit rank ahead of everything; ratio ties fall back to the
/// lower original index so the traversal order is reproducible.
fn efficiency_ordering(instance: &Instance) -> Vec<OrderedItem> {
    let mut ordered: Vec<OrderedItem> = instance
        .items()
        .iter()
        .map(|item| OrderedItem {
            index: item.id,
            profit: item.profit.as_f64(),
            weight: item.weight.as_f64(),
        })
        .collect();

    ordered.sort_unstable_by(|a, b| {
        ratio(b)
            .partial_cmp(&ratio(a))
            .unwrap_or(Ordering::Equal)
            .then(a.index.cmp(&b.index))
    });
    ordered
}

struct Search<'a> {
    items: &'a [OrderedItem],
    config: &'a SolverConfig,
    started: Instant,
    taken: Vec<bool>,
    best_taken: Vec<bool>,
    best_profit: f64,
    nodes: u64,
    exhausted: bool,
}

impl Search<'_> {
    /// Fractional-relaxation bound: the profit so far plus a greedy fill
    /// of the remaining room, allowing one partial item.
    fn bound(&self, from: usize, profit: f64, mut room: f64) -> f64 {
        let mut bound = profit;
        for item in &self.items[from..] {
            if item.weight <= room {
                bound += item.profit;
                room -= item.weight;
            } else {
                if room > 0.0 {
                    bound += item.profit * room / item.weight;
                }
                break;
            }
        }
        bound
    }

    fn budget_exhausted(&mut self) -> bool {
        if self.exhausted {
            return true;
        }
        if let Some(limit) = self.config.node_limit {
            if self.nodes >= limit {
                self.exhausted = true;
                return true;
            }
        }
        if self.nodes & BUDGET_POLL_MASK == 0 {
            if let Some(limit) = self.config.time_limit {
                if self.started.elapsed() >= limit {
                    self.exhausted = true;
                    return true;
                }
            }
        }
        false
    }

    fn dfs(&mut self, position: usize, profit: f64, room: f64) {
        self.nodes += 1;
        if self.budget_exhausted() {
            return;
        }

        if position == self.items.len() {
            // Strict improvement only, so the first selection found among
            // co-optimal ones is kept.
            if profit > self.best_profit {
                self.best_profit = profit;
                self.best_taken.copy_from_slice(&self.taken);
            }
            return;
        }

        // Prune branches whose relaxation cannot beat the incumbent.
        if self.bound(position, profit, room) <= self.best_profit {
            return;
        }

        let item = &self.items[position];
        if item.weight <= room {
            self.taken[position] = true;
            self.dfs(position + 1, profit + item.profit, room - item.weight);
            self.taken[position] = false;
        }
        self.dfs(position + 1, profit, room);
    }
}

pub fn solve(instance: &Instance, config: &SolverConfig, started: Instant) -> SearchOutcome {
    let ordered = efficiency_ordering(instance);

    let mut search = Search {
        items: &ordered,
        config,
        started,
        taken: vec![false; ordered.len()],
        best_taken: vec![false; ordered.len()],
        best_profit: 0.0,
        nodes: 0,
        exhausted: false,
    };
    search.dfs(0, 0.0, instance.capacity().as_f64());

    let mut selected: Vec<usize> = ordered
        .iter()
        .zip(&search.best_taken)
        .filter(|&(_, &taken)| taken)
        .map(|(item, _)| item.index)
        .collect();
    selected.sort_unstable();

    SearchOutcome {
        selected,
        proven: !search.exhausted,
        nodes: search.nodes,
    }
}
