//! Report formatting for evaluation output.

use clap::ValueEnum;

use crate::evaluation::metrics::Metric;
use crate::evaluation::types::EfficiencyReport;
use crate::utils::format_optional_percent;

/// Output format for efficiency reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable console output.
    #[default]
    Pretty,
    /// JSON output.
    Json,
    /// Markdown report.
    Markdown,
    /// Single-line verdict.
    Compact,
}

/// Format a report for output.
pub fn format_report(report: &EfficiencyReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => format_pretty(report),
        OutputFormat::Json => format_json(report),
        OutputFormat::Markdown => format_markdown(report),
        OutputFormat::Compact => format_compact(report),
    }
}

fn format_pretty(report: &EfficiencyReport) -> String {
    let mut output = String::new();
    let summary = &report.executive_summary;

    output.push_str(&"=".repeat(70));
    output.push_str("\nFINAL EFFICIENCY ASSESSMENT\n");
    output.push_str(&"=".repeat(70));
    output.push('\n');

    output.push_str(&format!(
        "Overall Efficiency Score: {}/100\n",
        summary.overall_efficiency_score
    ));
    output.push_str(&format!("System Readiness: {}\n", summary.system_readiness));
    output.push_str(&format!("Critical Issues: {}\n", summary.critical_issues.len()));

    if !summary.critical_issues.is_empty() {
        output.push_str("\nCritical Issues:\n");
        for issue in &summary.critical_issues {
            output.push_str(&format!("  x {}\n", issue));
        }
    }

    output.push_str("\nMetrics:\n");
    for metric in Metric::all() {
        output.push_str(&format!(
            "  {:<22} {}\n",
            format!("{}:", metric.title()),
            format_optional_percent(report.detailed_metrics.get(*metric))
        ));
    }

    output.push_str("\nTop Recommendations:\n");
    if summary.top_recommendations.is_empty() {
        output.push_str("  (none)\n");
    }
    for (i, rec) in summary.top_recommendations.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, rec));
    }

    output.push_str(&format!(
        "\nRisk Score: {}/10\n",
        report.risk_assessment.risk_score
    ));

    if report.passes() {
        output.push_str("\nSystem passes efficiency evaluation\n");
    } else {
        output.push_str("\nSystem needs improvement before production use\n");
    }

    output
}

fn format_json(report: &EfficiencyReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("Error: {}", e))
}

fn format_markdown(report: &EfficiencyReport) -> String {
    let mut output = String::new();
    let summary = &report.executive_summary;

    output.push_str("# Workflow Efficiency Test Report\n\n");
    output.push_str(&format!("**Test Session:** {}\n", report.meta.timestamp));
    output.push_str(&format!("**Duration:** {:.1} seconds\n", report.meta.duration));
    let suites: Vec<&str> = report
        .meta
        .test_suites_run
        .iter()
        .map(|s| s.name())
        .collect();
    output.push_str(&format!(
        "**Suites Run:** {}\n\n",
        if suites.is_empty() {
            "none".to_string()
        } else {
            suites.join(", ")
        }
    ));

    output.push_str("## Executive Summary\n\n");
    output.push_str(&format!(
        "- **Overall Efficiency Score:** {}/100\n",
        summary.overall_efficiency_score
    ));
    output.push_str(&format!("- **System Readiness:** {}\n", summary.system_readiness));
    output.push_str(&format!(
        "- **Critical Issues:** {}\n\n",
        summary.critical_issues.len()
    ));

    if !summary.critical_issues.is_empty() {
        output.push_str("### Critical Issues\n\n");
        for issue in &summary.critical_issues {
            output.push_str(&format!("- {}\n", issue));
        }
        output.push('\n');
    }

    output.push_str("### Top Recommendations\n\n");
    if summary.top_recommendations.is_empty() {
        output.push_str("No recommendations.\n");
    }
    for (i, rec) in summary.top_recommendations.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, rec));
    }
    output.push('\n');

    output.push_str("## Detailed Metrics\n\n| Metric | Value |\n|--------|-------|\n");
    for metric in Metric::all() {
        output.push_str(&format!(
            "| {} | {} |\n",
            metric.title(),
            format_optional_percent(report.detailed_metrics.get(*metric))
        ));
    }
    output.push('\n');

    let risks = &report.risk_assessment;
    output.push_str("## Risk Assessment\n\n");
    output.push_str(&format!("**Risk Score:** {}/10\n\n", risks.risk_score));
    for (title, items) in [
        ("High Risk", &risks.high_risk),
        ("Medium Risk", &risks.medium_risk),
        ("Low Risk", &risks.low_risk),
    ] {
        if items.is_empty() {
            continue;
        }
        output.push_str(&format!("### {}\n\n", title));
        for item in items {
            output.push_str(&format!("- {}\n", item));
        }
        output.push('\n');
    }

    let perf = &report.performance_analysis;
    output.push_str("## Performance Analysis\n\n");
    if perf.bottlenecks.is_empty() {
        output.push_str("No performance bottlenecks detected.\n\n");
    } else {
        output.push_str("### Performance Bottlenecks\n\n");
        for bottleneck in &perf.bottlenecks {
            output.push_str(&format!("- {}\n", bottleneck));
        }
        output.push('\n');
    }

    let benchmarks = &report.benchmarks;
    if !benchmarks.gaps.is_empty() {
        output.push_str("## Benchmark Gaps\n\n");
        for gap in &benchmarks.gaps {
            output.push_str(&format!("- {}\n", gap));
        }
        output.push('\n');
    }

    output.push_str("## Suite Status\n\n| Suite | Status | Detail |\n|-------|--------|--------|\n");
    for entry in &report.suite_status {
        output.push_str(&format!(
            "| {} | {} | {} |\n",
            entry.suite.title(),
            entry.status,
            entry.detail.as_deref().unwrap_or("")
        ));
    }

    output
}

fn format_compact(report: &EfficiencyReport) -> String {
    format!(
        "{} {}/100 {} ({} critical, risk {}/10)",
        if report.passes() { "PASS" } else { "FAIL" },
        report.score(),
        report.readiness(),
        report.critical_issues().len(),
        report.risk_assessment.risk_score
    )
}
