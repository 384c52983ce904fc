use serde::{Deserialize, Serialize};

/// One timestamped observation of the trading book as the orchestrator
/// records it. Every field is optional: history files are appended by
/// external bots and older lines may be missing newer keys.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub total_value_usd: Option<f64>,
    #[serde(default)]
    pub daily_pnl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_positions: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Position {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub entry_price: Option<f64>,
    #[serde(default)]
    pub unrealized_pnl: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradingMetrics {
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub open_positions: Option<u64>,
    #[serde(default)]
    pub total_value_usd: Option<f64>,
    #[serde(default)]
    pub unrealized_pnl: Option<f64>,
    #[serde(default)]
    pub realized_pnl: Option<f64>,
    #[serde(default)]
    pub daily_pnl: Option<f64>,
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(default)]
    pub history: Vec<Snapshot>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueueTotals {
    #[serde(default)]
    pub enqueued: Option<u64>,
    #[serde(default)]
    pub dropped: Option<u64>,
    #[serde(default)]
    pub batches: Option<u64>,
    #[serde(default)]
    pub flushed_events: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueueMetrics {
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub queue_depth: Option<u64>,
    #[serde(default)]
    pub batch_size: Option<u64>,
    #[serde(default)]
    pub totals: QueueTotals,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct StrategyEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub capital: Option<f64>,
    #[serde(default)]
    pub win_rate: Option<f64>,
    #[serde(default)]
    pub daily_pnl: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub memory_ref: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrategyMetrics {
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub strategies: Vec<StrategyEntry>,
    #[serde(default)]
    pub history: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServiceHealth {
    pub name: String,
    pub healthy: bool,
    #[serde(default)]
    pub detail: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct StackStatus {
    #[serde(default)]
    pub services: Vec<ServiceHealth>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProjectFile {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub files: Vec<ProjectFile>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ProjectList {
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemoryWriteRequest {
    pub project_name: String,
    pub file_name: String,
    pub content: String,
}

impl MemoryWriteRequest {
    /// Names the first required field that is empty, if any. Whitespace
    /// counts as a value.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.project_name.is_empty() {
            Some("projectName")
        } else if self.file_name.is_empty() {
            Some("fileName")
        } else if self.content.is_empty() {
            Some("content")
        } else {
            None
        }
    }
}

/// Derived progress toward the compounding goal. All fields are always
/// present and finite; `progress` stays within `[0, 1]`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub start_value: f64,
    pub current_value: f64,
    pub daily_delta: f64,
    pub target_value: f64,
    pub progress: f64,
}

impl ProjectionResult {
    /// Percentage with two decimals; halves round away from zero.
    pub fn progress_percent(&self) -> String {
        let percent = self.progress * 100.0;
        format!("{:.2}", (percent * 100.0).round() / 100.0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompoundingView {
    #[serde(flatten)]
    pub projection: ProjectionResult,
    pub progress_percent: String,
    pub entries: usize,
    pub latest_timestamp: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub status: Option<StackStatus>,
    pub queue: Option<QueueMetrics>,
    pub trading: Option<TradingMetrics>,
    pub strategies: Option<StrategyMetrics>,
    pub compounding: CompoundingView,
    pub recent_pnl: Vec<Snapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_tolerates_missing_fields() {
        let entry: Snapshot = serde_json::from_str(r#"{"daily_pnl": 1.5}"#).expect("json");
        assert_eq!(entry.timestamp, None);
        assert_eq!(entry.total_value_usd, None);
        assert_eq!(entry.daily_pnl, Some(1.5));
    }

    #[test]
    fn trading_metrics_reads_camel_case() {
        let raw = r#"{
            "updatedAt": "2024-01-02T00:00:00Z",
            "openPositions": 2,
            "totalValueUsd": 812.5,
            "dailyPnl": -3.0,
            "positions": [{"symbol": "SOL", "quantity": 1.0}]
        }"#;
        let metrics: TradingMetrics = serde_json::from_str(raw).expect("json");
        assert_eq!(metrics.open_positions, Some(2));
        assert_eq!(metrics.total_value_usd, Some(812.5));
        assert_eq!(metrics.daily_pnl, Some(-3.0));
        assert_eq!(metrics.positions.len(), 1);
        assert!(metrics.history.is_empty());
    }

    #[test]
    fn memory_write_reports_empty_fields() {
        let mut req = MemoryWriteRequest {
            project_name: "alpha".to_string(),
            file_name: "notes.md".to_string(),
            content: "hello".to_string(),
        };
        assert_eq!(req.missing_field(), None);
        req.content = "\n".to_string();
        assert_eq!(req.missing_field(), None);
        req.file_name = String::new();
        assert_eq!(req.missing_field(), Some("fileName"));
    }

    fn with_progress(progress: f64) -> ProjectionResult {
        ProjectionResult {
            start_value: 400.0,
            current_value: 400.0,
            daily_delta: 0.0,
            target_value: 4_000_000.0,
            progress,
        }
    }

    #[test]
    fn progress_percent_rounds_halves_up() {
        assert_eq!(with_progress(0.00125).progress_percent(), "0.13");
        assert_eq!(with_progress(0.12125).progress_percent(), "12.13");
        assert_eq!(with_progress(0.0).progress_percent(), "0.00");
        assert_eq!(with_progress(1.0).progress_percent(), "100.00");
    }

    #[test]
    fn compounding_view_flattens_projection() {
        let view = CompoundingView {
            projection: ProjectionResult {
                start_value: 400.0,
                current_value: 800.0,
                daily_delta: 5.0,
                target_value: 4_000_000.0,
                progress: 0.0001,
            },
            progress_percent: "0.01".to_string(),
            entries: 2,
            latest_timestamp: None,
        };
        let json = serde_json::to_value(&view).expect("json");
        assert_eq!(json["startValue"], 400.0);
        assert_eq!(json["progressPercent"], "0.01");
        assert_eq!(json["entries"], 2);
    }
}
