//! Exact solver for 0/1 knapsack datasets.
//!
//! An [`Instance`] is parsed from the `.kna` text format by [`reader`],
//! solved by [`solver::solve`], and summarized for export by [`report`].

use std::fmt;
use std::ops::Add;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod reader;
pub mod report;
pub mod solver;

pub use reader::DatasetError;
pub use report::{ReportError, SolveRecord};
pub use solver::{SolverConfig, solve};

/// A value drawn from the instance's numeric domain.
///
/// Datasets are integer-typical but may carry real capacities or weights.
/// Parsing tries the integer form first and falls back to real.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Num {
    Int(i64),
    Real(f64),
}

impl Num {
    /// Integer-first parse with a real-number fallback.
    pub fn parse(token: &str) -> Option<Num> {
        if let Ok(int) = token.parse::<i64>() {
            return Some(Num::Int(int));
        }
        token.parse::<f64>().ok().map(Num::Real)
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Num::Int(int) => int as f64,
            Num::Real(real) => real,
        }
    }

    pub fn is_int(self) -> bool {
        matches!(self, Num::Int(_))
    }

    pub fn is_negative(self) -> bool {
        self.as_f64() < 0.0
    }

    /// The same value in the real domain.
    pub fn to_real(self) -> Num {
        Num::Real(self.as_f64())
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Num::Int(int) => write!(f, "{int}"),
            // A whole-valued real must keep its decimal point so that
            // re-parsing stays in the real domain.
            Num::Real(real) if real.is_finite() && real == real.trunc() => {
                write!(f, "{real:.1}")
            }
            Num::Real(real) => write!(f, "{real}"),
        }
    }
}

impl Add for Num {
    type Output = Num;

    fn add(self, other: Num) -> Num {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => Num::Int(a + b),
            (a, b) => Num::Real(a.as_f64() + b.as_f64()),
        }
    }
}

/// One dataset item. Immutable once parsed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Item {
    /// Occurrence index in the dataset, 0-based.
    pub id: usize,
    pub profit: Num,
    pub weight: Num,
}

/// A validated problem instance: one capacity and an ordered item list,
/// all drawn from the same numeric domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    capacity: Num,
    items: Vec<Item>,
}

impl Instance {
    /// Builds an instance from `(profit, weight)` pairs, numbering items by
    /// occurrence order. Mixing integer and real values promotes the whole
    /// instance to the real domain.
    pub fn new(capacity: Num, values: Vec<(Num, Num)>) -> Instance {
        let integral =
            capacity.is_int() && values.iter().all(|&(p, w)| p.is_int() && w.is_int());

        let capacity = if integral { capacity } else { capacity.to_real() };
        let items = values
            .into_iter()
            .enumerate()
            .map(|(id, (profit, weight))| {
                if integral {
                    Item { id, profit, weight }
                } else {
                    Item {
                        id,
                        profit: profit.to_real(),
                        weight: weight.to_real(),
                    }
                }
            })
            .collect();

        Instance { capacity, items }
    }

    pub fn capacity(&self) -> Num {
        self.capacity
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when capacity and every item sit in the integer domain.
    pub fn is_integral(&self) -> bool {
        self.capacity.is_int()
            && self
                .items
                .iter()
                .all(|item| item.profit.is_int() && item.weight.is_int())
    }
}

/// Outcome classification of a solve call.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// The selection is optimal and proven so.
    Optimal,
    /// The search budget ran out before optimality was proven.
    FeasibleUnproven,
    /// No feasible selection exists (negative capacity).
    Infeasible,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::FeasibleUnproven => "FEASIBLE_UNPROVEN",
            SolveStatus::Infeasible => "INFEASIBLE",
        };
        f.write_str(name)
    }
}

/// Result of one solve call. Produced once, immutable thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: SolveStatus,
    /// Selected item indices, ascending and pairwise distinct.
    pub selected: Vec<usize>,
    /// Sum of the selected profits.
    pub objective_value: Num,
    /// Sum of the selected weights, never above capacity.
    pub weight_used: Num,
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs::{read_dir, read_to_string};
    use std::path::Path;

    #[test]
    fn num_parses_integer_first() {
        assert_eq!(Num::parse("42"), Some(Num::Int(42)));
        assert_eq!(Num::parse("-7"), Some(Num::Int(-7)));
        assert_eq!(Num::parse("2.5"), Some(Num::Real(2.5)));
        assert_eq!(Num::parse("3.0"), Some(Num::Real(3.0)));
        assert_eq!(Num::parse("banana"), None);
    }

    #[test]
    fn real_display_keeps_decimal_point() {
        assert_eq!(Num::Int(12).to_string(), "12");
        assert_eq!(Num::Real(12.0).to_string(), "12.0");
        assert_eq!(Num::Real(12.25).to_string(), "12.25");
        assert_eq!(Num::parse(&Num::Real(12.0).to_string()), Some(Num::Real(12.0)));
    }

    #[test]
    fn mixed_values_promote_whole_instance() {
        let instance = Instance::new(
            Num::Int(10),
            vec![(Num::Int(3), Num::Real(1.5)), (Num::Int(4), Num::Int(2))],
        );
        assert!(!instance.is_integral());
        assert_eq!(instance.capacity(), Num::Real(10.0));
        assert_eq!(instance.items()[1].profit, Num::Real(4.0));
    }

    #[test]
    fn uniform_integers_stay_integral() {
        let instance = Instance::new(Num::Int(10), vec![(Num::Int(3), Num::Int(2))]);
        assert!(instance.is_integral());
        assert_eq!(instance.items()[0].id, 0);
    }

    #[derive(Debug, Deserialize)]
    struct Expected {
        status: SolveStatus,
        objective_value: Num,
        total_weight: Num,
        selected: Vec<usize>,
    }

    // Helper function to run a test from a dataset file
    fn run_test_file(dataset: &Path) {
        println!("Running test for file: {:?}", dataset);

        let failure_message = format!("Failed to read dataset: {}", dataset.display());
        let instance = Instance::from_path(dataset).expect(&failure_message);

        let expected_path = dataset.with_extension("expected.yaml");
        let failure_message = format!("Failed to read expectation: {}", expected_path.display());
        let yaml = read_to_string(&expected_path).expect(&failure_message);
        let failure_message = format!("Failed to parse expectation: {}", expected_path.display());
        let expected: Expected = serde_yaml::from_str(&yaml).expect(&failure_message);

        let solution = solve(&instance, &SolverConfig::default());

        assert_eq!(expected.status, solution.status, "{}", dataset.display());
        assert_eq!(expected.selected, solution.selected, "{}", dataset.display());
        assert_eq!(
            expected.objective_value,
            solution.objective_value,
            "{}",
            dataset.display()
        );
        assert_eq!(
            expected.total_weight,
            solution.weight_used,
            "{}",
            dataset.display()
        );
    }

    #[test]
    fn run_all_test_files() {
        // Read all datasets from the test_data directory
        let test_data_dir = Path::new("test_data");
        let mut entries: Vec<_> = read_dir(test_data_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| {
                path.is_file() && path.extension().map(|ext| ext == "kna").unwrap_or(false)
            })
            .collect();

        // Sort paths lexically by filename
        entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        // Process each dataset in sorted order
        for path in entries {
            run_test_file(&path);
        }
    }
}
