//! Medical record sink port.
//!
//! Receives finished assessments. Durable clinical storage lives behind
//! this boundary.

use async_trait::async_trait;

use crate::domain::assessment::AssessmentResult;
use crate::domain::foundation::{DomainError, UserId};

#[async_trait]
pub trait MedicalRecordSink: Send + Sync {
    /// Store one completed assessment for `user_id`.
    async fn write_assessment_result(
        &self,
        user_id: &UserId,
        result: &AssessmentResult,
    ) -> Result<(), DomainError>;
}
