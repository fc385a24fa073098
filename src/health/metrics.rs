use super::models::{Checks, ProbeStatus};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub timestamp: DateTime<Utc>,
    pub dependency: String,
    pub status: ProbeStatus,
    pub duration_ms: f64,
}

/// Bounded history of probe outcomes, oldest dropped first.
pub struct HealthMetrics {
    snapshots: Arc<RwLock<VecDeque<MetricSnapshot>>>,
    max_snapshots: usize,
}

impl HealthMetrics {
    pub fn new(max_snapshots: usize) -> Self {
        Self {
            snapshots: Arc::new(RwLock::new(VecDeque::new())),
            max_snapshots,
        }
    }

    pub async fn record_checks(&self, checks: &Checks) {
        let timestamp = Utc::now();
        let mut snapshots = self.snapshots.write().await;

        for (dependency, result) in checks {
            snapshots.push_back(MetricSnapshot {
                timestamp,
                dependency: dependency.clone(),
                status: result.status(),
                duration_ms: result.duration_ms(),
            });
        }

        while snapshots.len() > self.max_snapshots {
            snapshots.pop_front();
        }
    }

    pub async fn get_all_stats(&self) -> BTreeMap<String, BTreeMap<String, serde_json::Value>> {
        let snapshots = self.snapshots.read().await;
        let dependencies: BTreeSet<&str> = snapshots
            .iter()
            .map(|snapshot| snapshot.dependency.as_str())
            .collect();

        dependencies
            .into_iter()
            .filter_map(|dependency| {
                dependency_stats(snapshots.iter(), dependency)
                    .map(|stats| (dependency.to_string(), stats))
            })
            .collect()
    }
}

fn dependency_stats<'a>(
    snapshots: impl Iterator<Item = &'a MetricSnapshot>,
    dependency: &str,
) -> Option<BTreeMap<String, serde_json::Value>> {
    let matching: Vec<_> = snapshots
        .filter(|snapshot| snapshot.dependency == dependency)
        .collect();

    if matching.is_empty() {
        return None;
    }

    let total = matching.len();
    let healthy = matching
        .iter()
        .filter(|snapshot| snapshot.status == ProbeStatus::Healthy)
        .count();
    let durations: Vec<f64> = matching.iter().map(|snapshot| snapshot.duration_ms).collect();

    let avg = durations.iter().sum::<f64>() / total as f64;
    let min = durations.iter().copied().fold(f64::INFINITY, f64::min);
    let max = durations.iter().copied().fold(0.0, f64::max);
    let uptime_percentage = (healthy as f64 / total as f64) * 100.0;

    let mut stats = BTreeMap::new();
    stats.insert("total_checks".to_string(), serde_json::json!(total));
    stats.insert("healthy_count".to_string(), serde_json::json!(healthy));
    stats.insert(
        "unhealthy_count".to_string(),
        serde_json::json!(total - healthy),
    );
    stats.insert(
        "uptime_percentage".to_string(),
        serde_json::json!(format!("{:.2}", uptime_percentage)),
    );
    stats.insert("avg_duration_ms".to_string(), serde_json::json!(avg));
    stats.insert("min_duration_ms".to_string(), serde_json::json!(min));
    stats.insert("max_duration_ms".to_string(), serde_json::json!(max));
    if let Some(last) = matching.last() {
        stats.insert("last_checked".to_string(), serde_json::json!(last.timestamp));
    }

    Some(stats)
}
