//! Result-record export and the summary chart.
//!
//! The record is the full contract surface downstream consumers see: the
//! solution fields plus instance-derived counts. The caller owns creating
//! the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Instance, Num, Solution, SolveStatus};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// One solve run, flattened for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveRecord {
    pub dataset: String,
    pub num_items: usize,
    pub capacity: Num,
    pub status: SolveStatus,
    pub objective_value: Num,
    pub total_weight: Num,
    pub num_selected: usize,
    pub selected: Vec<usize>,
    pub elapsed_ms: f64,
}

impl SolveRecord {
    pub fn new(dataset: &str, instance: &Instance, solution: &Solution) -> SolveRecord {
        SolveRecord {
            dataset: dataset.to_string(),
            num_items: instance.len(),
            capacity: instance.capacity(),
            status: solution.status,
            objective_value: solution.objective_value,
            total_weight: solution.weight_used,
            num_selected: solution.selected.len(),
            selected: solution.selected.clone(),
            elapsed_ms: solution.elapsed.as_secs_f64() * 1000.0,
        }
    }

    fn artifact_path(&self, dir: &Path, extension: &str) -> PathBuf {
        let stem = Path::new(&self.dataset)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.dataset.clone());
        dir.join(format!("{stem}_results.{extension}"))
    }
}

/// Writes the record as `<stem>_results.yaml` inside `dir`.
pub fn write_record(record: &SolveRecord, dir: &Path) -> Result<PathBuf, ReportError> {
    let path = record.artifact_path(dir, "yaml");
    fs::write(&path, serde_yaml::to_string(record)?)?;
    Ok(path)
}

/// Writes a bar-chart summary as `<stem>_results.svg` inside `dir`.
pub fn write_chart(record: &SolveRecord, dir: &Path) -> Result<PathBuf, ReportError> {
    let path = record.artifact_path(dir, "svg");
    fs::write(&path, render_chart(record))?;
    Ok(path)
}

const CHART_WIDTH: f64 = 640.0;
const CHART_HEIGHT: f64 = 400.0;
const MARGIN: f64 = 48.0;

fn render_chart(record: &SolveRecord) -> String {
    let bars = [
        ("capacity", record.capacity.as_f64()),
        ("weight used", record.total_weight.as_f64()),
        ("profit", record.objective_value.as_f64()),
        ("items", record.num_items as f64),
        ("selected", record.num_selected as f64),
        ("time (ms)", record.elapsed_ms),
    ];
    let scale = bars.iter().map(|&(_, value)| value).fold(1.0, f64::max);

    let plot_height = CHART_HEIGHT - 2.0 * MARGIN;
    let slot = (CHART_WIDTH - 2.0 * MARGIN) / bars.len() as f64;
    let bar_width = slot * 0.6;
    let baseline = CHART_HEIGHT - MARGIN;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{CHART_WIDTH}\" height=\"{CHART_HEIGHT}\" \
         font-family=\"sans-serif\" font-size=\"12\">\n"
    );
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"24\" text-anchor=\"middle\" font-size=\"16\">Results for {}</text>\n",
        CHART_WIDTH / 2.0,
        escape_xml(&record.dataset)
    ));

    for (i, &(label, value)) in bars.iter().enumerate() {
        let height = plot_height * value.max(0.0) / scale;
        let x = MARGIN + i as f64 * slot + (slot - bar_width) / 2.0;
        let y = baseline - height;
        svg.push_str(&format!(
            "  <rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{bar_width:.1}\" height=\"{height:.1}\" fill=\"skyblue\"/>\n"
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
            x + bar_width / 2.0,
            y - 6.0,
            trim_value(value)
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
            x + bar_width / 2.0,
            baseline + 18.0,
            label
        ));
    }

    svg.push_str(&format!(
        "  <line x1=\"{MARGIN}\" y1=\"{baseline}\" x2=\"{:.1}\" y2=\"{baseline}\" stroke=\"black\"/>\n",
        CHART_WIDTH - MARGIN
    ));
    svg.push_str("</svg>\n");
    svg
}

fn trim_value(value: f64) -> String {
    if value == value.trunc() {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SolverConfig, solve};

    fn record() -> SolveRecord {
        let instance: Instance = "MAX_CAPACITY: 50\nDATA\n0 60 10\n1 100 20\n2 120 30\n"
            .parse()
            .unwrap();
        let solution = solve(&instance, &SolverConfig::default());
        SolveRecord::new("classic.kna", &instance, &solution)
    }

    #[test]
    fn record_flattens_solution_and_counts() {
        let record = record();
        assert_eq!(record.num_items, 3);
        assert_eq!(record.num_selected, 2);
        assert_eq!(record.selected, vec![1, 2]);
        assert_eq!(record.objective_value, Num::Int(220));
        assert_eq!(record.total_weight, Num::Int(50));
        assert_eq!(record.status, SolveStatus::Optimal);
    }

    #[test]
    fn record_round_trips_through_yaml() {
        let record = record();
        let yaml = serde_yaml::to_string(&record).unwrap();
        assert!(yaml.contains("objective_value: 220"));
        assert!(yaml.contains("status: optimal"));
        let parsed: SolveRecord = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn artifacts_are_written_next_to_each_other() {
        let dir = tempfile::tempdir().unwrap();
        let record = record();

        let record_path = write_record(&record, dir.path()).unwrap();
        assert_eq!(record_path, dir.path().join("classic_results.yaml"));
        let written: SolveRecord =
            serde_yaml::from_str(&fs::read_to_string(&record_path).unwrap()).unwrap();
        assert_eq!(written, record);

        let chart_path = write_chart(&record, dir.path()).unwrap();
        assert_eq!(chart_path, dir.path().join("classic_results.svg"));
        let svg = fs::read_to_string(&chart_path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Results for classic.kna"));
        assert!(svg.contains("weight used"));
    }
}
