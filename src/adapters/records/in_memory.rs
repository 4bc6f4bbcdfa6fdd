//! In-memory medical record sink.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::assessment::AssessmentResult;
use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::ports::MedicalRecordSink;

/// One stored assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub user_id: UserId,
    pub result: AssessmentResult,
    pub recorded_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryMedicalRecords {
    records: Arc<RwLock<Vec<MedicalRecord>>>,
}

impl InMemoryMedicalRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records_for(&self, user_id: &UserId) -> Vec<MedicalRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl MedicalRecordSink for InMemoryMedicalRecords {
    async fn write_assessment_result(
        &self,
        user_id: &UserId,
        result: &AssessmentResult,
    ) -> Result<(), DomainError> {
        tracing::info!(
            user_id = %user_id,
            symptom = %result.symptom,
            severity = %result.severity,
            "Assessment recorded"
        );
        self.records.write().await.push(MedicalRecord {
            user_id: user_id.clone(),
            result: result.clone(),
            recorded_at: Timestamp::now(),
        });
        Ok(())
    }
}
