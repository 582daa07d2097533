use crate::domain::model::AuditRecord;
use crate::domain::ports::AuditSink;

/// Emits audit records as structured events on the `audit` target.
#[derive(Debug, Clone, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: AuditRecord) {
        match serde_json::to_string(&record) {
            Ok(payload) => tracing::error!(
                target: "audit",
                source = %record.source,
                correlation_id = %record.correlation_id,
                "{}",
                payload
            ),
            Err(e) => tracing::warn!(target: "audit", "Failed to encode audit record: {}", e),
        }
    }
}
