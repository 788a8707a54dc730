//! Notifier contract for out-of-band code delivery

use async_trait::async_trait;

use crate::domain::entities::purpose::CodePurpose;

/// Trait for the out-of-band delivery channel (e-mail, SMS, ...)
///
/// Dispatch is best-effort: the engine fires it without awaiting completion
/// and logs failures instead of propagating them, so issuance latency and
/// outcome never depend on the delivery provider.
#[async_trait]
pub trait NotifierTrait: Send + Sync {
    /// Deliver a plaintext code to a destination
    ///
    /// # Arguments
    /// * `destination` - Channel address (e-mail, phone number)
    /// * `purpose` - What the code is for, for message templating
    /// * `code` - The plaintext code to deliver
    /// * `name` - Recipient display name for the message
    /// * `expiry_minutes` - How long the code stays valid
    async fn dispatch(
        &self,
        destination: &str,
        purpose: CodePurpose,
        code: &str,
        name: &str,
        expiry_minutes: i64,
    ) -> Result<(), String>;
}
