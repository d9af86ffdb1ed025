use crate::domain::model::ResourcePoolState;
use crate::domain::properties::{SystemMetrics, AVAILABLE_MEMORY_KEY, CPU_USAGE_KEY};
use crate::utils::error::{Result, ZoneError};
use std::str::FromStr;

/// How a stored numeric metric that fails to parse is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePolicy {
    /// The value is trusted server data; garbage means a corrupted document.
    Strict,
    /// Garbage reads as if the metric were not there.
    DefaultToZero,
}

/// Memory percentage reads strictly, CPU percentage leniently.
pub const MEMORY_POLICY: ParsePolicy = ParsePolicy::Strict;
pub const CPU_POLICY: ParsePolicy = ParsePolicy::DefaultToZero;

fn read_metric<T>(key: &str, raw: Option<&str>, policy: ParsePolicy) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.parse::<T>() {
        Ok(value) => Ok(Some(value)),
        Err(e) => match policy {
            ParsePolicy::Strict => Err(ZoneError::MalformedStoredMetric {
                key: key.to_string(),
                value: raw.to_string(),
                reason: e.to_string(),
            }),
            ParsePolicy::DefaultToZero => {
                tracing::debug!("Ignoring unparsable {}={}: {}", key, raw, e);
                Ok(None)
            }
        },
    }
}

/// Rounds half-up to two decimals.
pub fn round_percent(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

fn format_percent(value: f64) -> String {
    format!("{:.2}%", round_percent(value))
}

/// Share of `max_memory_bytes` in use, as `"XX.XX%"`.
///
/// A missing `__availableMemory` counts as nothing available. A zero maximum
/// yields `"0.00%"`.
pub fn used_memory_percent(max_memory_bytes: i64, metrics: &SystemMetrics) -> Result<String> {
    let available: i64 = read_metric(
        AVAILABLE_MEMORY_KEY,
        metrics.available_memory.as_deref(),
        MEMORY_POLICY,
    )?
    .unwrap_or(0);

    let used = max_memory_bytes.saturating_sub(available);
    let percent = if max_memory_bytes != 0 {
        used as f64 / max_memory_bytes as f64 * 100.0
    } else {
        0.0
    };
    Ok(format_percent(percent))
}

/// CPU usage as `"XX.XX%"`, or `"0%"` whenever the metric is missing or unreadable.
pub fn used_cpu_percent(metrics: &SystemMetrics) -> String {
    let usage = read_metric::<f64>(CPU_USAGE_KEY, metrics.cpu_usage.as_deref(), CPU_POLICY)
        .ok()
        .flatten()
        .filter(|v| v.is_finite());
    match usage {
        Some(value) => format_percent(value),
        None => "0%".to_string(),
    }
}

impl ResourcePoolState {
    pub fn used_memory_percent(&self) -> Result<String> {
        used_memory_percent(
            self.capacity.max_memory_bytes,
            &self.custom_properties.system,
        )
    }

    pub fn used_cpu_percent(&self) -> String {
        used_cpu_percent(&self.custom_properties.system)
    }
}
