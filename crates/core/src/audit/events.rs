//! Audit event types.

use serde::{Deserialize, Serialize};

/// Audit event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    // System events
    ServiceStarted {
        version: String,
        config_hash: String,
    },
    ServiceStopped {
        reason: String,
    },

    // Content intake
    TopicsIngested {
        user_id: String,
        brand_id: String,
        topics: u32,
        items_created: u32,
    },

    // Bulk lifecycle operations
    ItemsApproved {
        user_id: String,
        approved: u32,
        skipped: u32,
    },
    ItemsRejected {
        user_id: String,
        rejected: u32,
        skipped: u32,
        reason: Option<String>,
    },
    BatchScheduled {
        user_id: String,
        scheduled: u32,
        scheduled_at: String,
    },
    ItemsQueued {
        user_id: String,
        queued: u32,
        skipped: u32,
    },
    ItemsPublished {
        user_id: String,
        published: u32,
        skipped: u32,
    },
    ItemsReverted {
        user_id: String,
        reverted: u32,
        skipped: u32,
    },
    ItemsRetried {
        user_id: String,
        retried: u32,
        skipped: u32,
    },

    // Generation
    DraftsGenerated {
        brand_id: String,
        generated: u32,
        failed: u32,
        skipped: u32,
    },
    MediaGenerated {
        user_id: String,
        generated: u32,
        failed: u32,
        skipped: u32,
    },

    // Publish bridge
    PublishDispatched {
        user_id: String,
        sent: u32,
        skipped: u32,
    },
    PublishReconciled {
        sent: u32,
        published: u32,
        failed: u32,
        missing_in_response: Vec<String>,
    },

    // Brand profiles
    ProfileScrapeStarted {
        user_id: String,
        brand_id: String,
        website_url: String,
    },
    ProfileScrapeCancelled {
        user_id: String,
        brand_id: String,
    },

    // Platform registry
    PlatformCreated {
        user_id: String,
        platform_id: String,
    },
    PlatformUpdated {
        user_id: String,
        platform_id: String,
    },
}

impl AuditEvent {
    /// Stable event-type string for storage and filtering.
    pub fn event_type(&self) -> &'static str {
        match self {
            AuditEvent::ServiceStarted { .. } => "service_started",
            AuditEvent::ServiceStopped { .. } => "service_stopped",
            AuditEvent::TopicsIngested { .. } => "topics_ingested",
            AuditEvent::ItemsApproved { .. } => "items_approved",
            AuditEvent::ItemsRejected { .. } => "items_rejected",
            AuditEvent::BatchScheduled { .. } => "batch_scheduled",
            AuditEvent::ItemsQueued { .. } => "items_queued",
            AuditEvent::ItemsPublished { .. } => "items_published",
            AuditEvent::ItemsReverted { .. } => "items_reverted",
            AuditEvent::ItemsRetried { .. } => "items_retried",
            AuditEvent::DraftsGenerated { .. } => "drafts_generated",
            AuditEvent::MediaGenerated { .. } => "media_generated",
            AuditEvent::PublishDispatched { .. } => "publish_dispatched",
            AuditEvent::PublishReconciled { .. } => "publish_reconciled",
            AuditEvent::ProfileScrapeStarted { .. } => "profile_scrape_started",
            AuditEvent::ProfileScrapeCancelled { .. } => "profile_scrape_cancelled",
            AuditEvent::PlatformCreated { .. } => "platform_created",
            AuditEvent::PlatformUpdated { .. } => "platform_updated",
        }
    }

    /// Brand the event concerns, when it has one.
    pub fn brand_id(&self) -> Option<&str> {
        match self {
            AuditEvent::TopicsIngested { brand_id, .. }
            | AuditEvent::DraftsGenerated { brand_id, .. }
            | AuditEvent::ProfileScrapeStarted { brand_id, .. }
            | AuditEvent::ProfileScrapeCancelled { brand_id, .. } => Some(brand_id),
            _ => None,
        }
    }

    /// Acting user, when the event was user-initiated.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            AuditEvent::TopicsIngested { user_id, .. }
            | AuditEvent::ItemsApproved { user_id, .. }
            | AuditEvent::ItemsRejected { user_id, .. }
            | AuditEvent::BatchScheduled { user_id, .. }
            | AuditEvent::ItemsQueued { user_id, .. }
            | AuditEvent::ItemsPublished { user_id, .. }
            | AuditEvent::ItemsReverted { user_id, .. }
            | AuditEvent::ItemsRetried { user_id, .. }
            | AuditEvent::MediaGenerated { user_id, .. }
            | AuditEvent::PublishDispatched { user_id, .. }
            | AuditEvent::ProfileScrapeStarted { user_id, .. }
            | AuditEvent::ProfileScrapeCancelled { user_id, .. }
            | AuditEvent::PlatformCreated { user_id, .. }
            | AuditEvent::PlatformUpdated { user_id, .. } => Some(user_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_strings() {
        let event = AuditEvent::ItemsApproved {
            user_id: "alice".to_string(),
            approved: 3,
            skipped: 1,
        };
        assert_eq!(event.event_type(), "items_approved");
        assert_eq!(event.user_id(), Some("alice"));
        assert!(event.brand_id().is_none());
    }

    #[test]
    fn test_brand_extraction() {
        let event = AuditEvent::DraftsGenerated {
            brand_id: "acme".to_string(),
            generated: 5,
            failed: 0,
            skipped: 2,
        };
        assert_eq!(event.brand_id(), Some("acme"));
        assert!(event.user_id().is_none());
    }

    #[test]
    fn test_event_serialization() {
        let event = AuditEvent::PublishReconciled {
            sent: 3,
            published: 2,
            failed: 0,
            missing_in_response: vec!["abc".to_string()],
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"publish_reconciled\""));

        let back: AuditEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.event_type(), "publish_reconciled");
    }
}
