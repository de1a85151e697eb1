/// Placeholder shown for metrics no suite measured.
pub const NOT_MEASURED: &str = "not measured";

/// Format a fraction as a percentage with one decimal, e.g. `0.153` -> `15.3%`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Format an optional fraction, falling back to [`NOT_MEASURED`].
pub fn format_optional_percent(fraction: Option<f64>) -> String {
    fraction
        .map(format_percent)
        .unwrap_or_else(|| NOT_MEASURED.to_string())
}

/// Format seconds with two decimals, e.g. `1.234` -> `1.23s`.
pub fn format_seconds(seconds: f64) -> String {
    format!("{:.2}s", seconds)
}

/// Extract the JSON object from collector output that may carry banner or log text.
///
/// The object starts at the first line beginning with `{` and ends at the last `}`.
pub fn extract_json_object(output: &str) -> Option<&str> {
    let mut offset = 0;
    let mut start = None;
    for line in output.split_inclusive('\n') {
        if line.trim_start().starts_with('{') {
            start = Some(offset + (line.len() - line.trim_start().len()));
            break;
        }
        offset += line.len();
    }
    let start = start?;
    let end = output.rfind('}')?;
    if start <= end {
        Some(output[start..=end].trim())
    } else {
        None
    }
}
