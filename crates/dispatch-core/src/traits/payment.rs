//! Payment capture collaborator.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::DispatchResult;

/// Opaque capture confirmation. The engine stores `reference` and never
/// inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub reference: String,
}

pub trait IPaymentGateway: Send + Sync {
    /// Capture `amount`. Implementations must treat `idempotency_key` as a
    /// de-duplication key: capturing twice with the same key charges once.
    /// Failures surface as `DispatchError::PaymentUnavailable`.
    fn capture(&self, idempotency_key: &str, amount: f64) -> DispatchResult<PaymentReceipt>;
}

impl<T: IPaymentGateway + ?Sized> IPaymentGateway for Arc<T> {
    fn capture(&self, idempotency_key: &str, amount: f64) -> DispatchResult<PaymentReceipt> {
        (**self).capture(idempotency_key, amount)
    }
}
