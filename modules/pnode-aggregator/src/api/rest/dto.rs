use crate::contract::{NodeRecord, NodeStats};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Success envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiEnvelope<T> {
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now(),
        }
    }
}

/// Failure envelope
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct PodsData {
    pub pods: Arc<Vec<NodeRecord>>,
    pub total_count: usize,
}

impl From<Arc<Vec<NodeRecord>>> for PodsData {
    fn from(pods: Arc<Vec<NodeRecord>>) -> Self {
        Self {
            total_count: pods.len(),
            pods,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub stats: NodeStats,
}
