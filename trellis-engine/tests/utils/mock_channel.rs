use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use trellis_core::TranslateRequest;
use trellis_engine::{TranslateError, TranslationChannel};

/// Mock TranslationChannel that records every request.
pub struct MockTranslationChannel {
    requests: Mutex<Vec<TranslateRequest>>,
}

impl MockTranslationChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
        })
    }

    pub async fn requests(&self) -> Vec<TranslateRequest> {
        self.requests.lock().await.clone()
    }

    /// PCM payloads carried by `Frame` requests, in send order.
    pub async fn frames(&self) -> Vec<Vec<u8>> {
        self.requests
            .lock()
            .await
            .iter()
            .filter_map(|r| match r {
                TranslateRequest::Frame(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn stop_count(&self) -> usize {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| matches!(r, TranslateRequest::Stop))
            .count()
    }
}

#[async_trait]
impl TranslationChannel for MockTranslationChannel {
    async fn send(&self, request: TranslateRequest) -> Result<(), TranslateError> {
        self.requests.lock().await.push(request);
        Ok(())
    }
}
