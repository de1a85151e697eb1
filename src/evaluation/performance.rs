//! Response-time and throughput analysis of the core suite.

use serde::{Deserialize, Serialize};

use crate::evaluation::metrics::AVG_RESPONSE_TIME_METRIC;
use crate::models::CoreReport;
use crate::utils::format_seconds;

const MAX_RESPONSE_TIME_METRIC: &str = "max_command_response_time";
const THROUGHPUT_METRIC: &str = "commands_per_second";

/// A probe whose average is more than this multiple of the overall mean is a bottleneck.
const BOTTLENECK_FACTOR: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseTime {
    pub probe: String,
    pub avg_time: f64,
    pub max_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Throughput {
    pub probe: String,
    pub commands_per_second: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAnalysis {
    pub response_times: Vec<ResponseTime>,
    pub throughput: Vec<Throughput>,
    /// Probes that were much slower than the rest, as `"<probe>: <avg>s"`.
    pub bottlenecks: Vec<String>,
}

impl PerformanceAnalysis {
    pub fn mean_response_time(&self) -> Option<f64> {
        if self.response_times.is_empty() {
            return None;
        }
        let total: f64 = self.response_times.iter().map(|rt| rt.avg_time).sum();
        Some(total / self.response_times.len() as f64)
    }
}

/// Analyze the core suite's probes; an absent suite yields an empty analysis.
pub fn analyze_performance(core: Option<&CoreReport>) -> PerformanceAnalysis {
    let mut analysis = PerformanceAnalysis::default();
    let Some(core) = core else {
        return analysis;
    };

    for record in &core.records {
        if let Some(avg_time) = record.metric(AVG_RESPONSE_TIME_METRIC) {
            analysis.response_times.push(ResponseTime {
                probe: record.name.clone(),
                avg_time,
                max_time: record.metric(MAX_RESPONSE_TIME_METRIC).unwrap_or(0.0),
            });
        }
        if let Some(commands_per_second) = record.metric(THROUGHPUT_METRIC) {
            analysis.throughput.push(Throughput {
                probe: record.name.clone(),
                commands_per_second,
            });
        }
    }

    if let Some(mean) = analysis.mean_response_time() {
        analysis.bottlenecks = analysis
            .response_times
            .iter()
            .filter(|rt| rt.avg_time > mean * BOTTLENECK_FACTOR)
            .map(|rt| format!("{}: {}", rt.probe, format_seconds(rt.avg_time)))
            .collect();
    }

    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeasurementRecord;

    fn timed(name: &str, avg: f64) -> MeasurementRecord {
        MeasurementRecord::new(name, true, avg).with_metric(AVG_RESPONSE_TIME_METRIC, avg)
    }

    #[test]
    fn absent_core_is_empty() {
        assert_eq!(analyze_performance(None), PerformanceAnalysis::default());
    }

    #[test]
    fn collects_response_times_and_throughput() {
        let core = CoreReport {
            records: vec![
                timed("Core Commands", 0.4).with_metric(MAX_RESPONSE_TIME_METRIC, 0.9),
                MeasurementRecord::new("Performance Benchmarks", true, 3.0)
                    .with_metric(THROUGHPUT_METRIC, 12.5),
                MeasurementRecord::new("WIP Limits", true, 1.0),
            ],
            ..CoreReport::default()
        };

        let analysis = analyze_performance(Some(&core));
        assert_eq!(
            analysis.response_times,
            vec![ResponseTime {
                probe: "Core Commands".to_string(),
                avg_time: 0.4,
                max_time: 0.9,
            }]
        );
        assert_eq!(analysis.throughput[0].commands_per_second, 12.5);
        assert!(analysis.bottlenecks.is_empty());
    }

    #[test]
    fn outliers_are_bottlenecks() {
        let core = CoreReport {
            records: vec![
                timed("Core Commands", 0.2),
                timed("Template System", 0.3),
                timed("Status", 0.25),
                timed("Project-Task Workflow", 4.0),
            ],
            ..CoreReport::default()
        };

        let analysis = analyze_performance(Some(&core));
        assert_eq!(analysis.bottlenecks, vec!["Project-Task Workflow: 4.00s"]);
    }
}
