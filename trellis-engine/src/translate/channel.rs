use crate::error::TranslateError;
use async_trait::async_trait;
use trellis_core::TranslateRequest;

/// Outbound half of the duplex translation channel, implemented by the
/// shell (socket client to the translation collaborator). Inbound
/// `TranslateEvent`s arrive on an mpsc handed to the [`Translator`] at
/// wiring time.
///
/// [`Translator`]: crate::translate::Translator
#[async_trait]
pub trait TranslationChannel: Send + Sync {
    async fn send(&self, request: TranslateRequest) -> Result<(), TranslateError>;
}
