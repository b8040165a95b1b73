//! Mock publish bridge for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::publisher::{OutboundPost, PublishBridge, PublishReceipt, PublisherError};

/// How the mock answers a batch.
enum Behavior {
    /// Receipt with ok=true for every sent item.
    AllOk,
    /// Fixed receipts, whatever was sent.
    Fixed(Vec<PublishReceipt>),
    /// Per-item receipts computed from the sent batch.
    PerItem(Box<dyn Fn(&OutboundPost) -> Option<PublishReceipt> + Send + Sync>),
}

/// Mock implementation of the [`PublishBridge`] trait.
///
/// Records every dispatched batch and answers with configurable receipts:
/// all-ok (default), a fixed receipt list, or a per-item function (return
/// `None` to leave an item out of the response and exercise the
/// `missing_in_response` path).
pub struct MockPublishBridge {
    behavior: Arc<RwLock<Behavior>>,
    batches: Arc<RwLock<Vec<Vec<OutboundPost>>>>,
    next_error: Arc<RwLock<Option<PublisherError>>>,
}

impl Default for MockPublishBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPublishBridge {
    pub fn new() -> Self {
        Self {
            behavior: Arc::new(RwLock::new(Behavior::AllOk)),
            batches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Answer every sent item with ok=true and a derived URL.
    pub async fn set_all_ok(&self) {
        *self.behavior.write().await = Behavior::AllOk;
    }

    /// Answer with exactly these receipts.
    pub async fn set_receipts(&self, receipts: Vec<PublishReceipt>) {
        *self.behavior.write().await = Behavior::Fixed(receipts);
    }

    /// Compute a receipt per sent item; `None` omits the item from the
    /// response.
    pub async fn set_receipt_fn<F>(&self, f: F)
    where
        F: Fn(&OutboundPost) -> Option<PublishReceipt> + Send + Sync + 'static,
    {
        *self.behavior.write().await = Behavior::PerItem(Box::new(f));
    }

    /// Fail the next dispatch before producing any receipts.
    pub async fn set_next_error(&self, error: PublisherError) {
        *self.next_error.write().await = Some(error);
    }

    /// Batches dispatched so far.
    pub async fn dispatched_batches(&self) -> Vec<Vec<OutboundPost>> {
        self.batches.read().await.clone()
    }

    pub async fn dispatch_count(&self) -> usize {
        self.batches.read().await.len()
    }
}

#[async_trait]
impl PublishBridge for MockPublishBridge {
    fn name(&self) -> &str {
        "mock"
    }

    async fn publish_batch(
        &self,
        items: &[OutboundPost],
    ) -> Result<Vec<PublishReceipt>, PublisherError> {
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        self.batches.write().await.push(items.to_vec());

        let behavior = self.behavior.read().await;
        let receipts = match &*behavior {
            Behavior::AllOk => items
                .iter()
                .map(|item| PublishReceipt {
                    content_item_id: item.content_item_id.clone(),
                    ok: true,
                    published_url: Some(format!(
                        "https://{}.example.com/p/{}",
                        item.platform, item.content_item_id
                    )),
                    error: None,
                })
                .collect(),
            Behavior::Fixed(receipts) => receipts.clone(),
            Behavior::PerItem(f) => items.iter().filter_map(f).collect(),
        };

        Ok(receipts)
    }
}
