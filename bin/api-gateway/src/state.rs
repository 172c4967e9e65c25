//! Shared application state.

use std::sync::Arc;
use usergate_identity::TokenValidator;
use usergate_infra::{BrokerClient, CacheClient};
use usergate_user_rpc::UserRpc;

/// Handles every request shares.
///
/// Nothing in here is request-scoped; identity lives in request
/// extensions only.
pub struct AppState {
    pub validator: Arc<dyn TokenValidator>,
    pub users: Arc<dyn UserRpc>,
    pub cache: Option<CacheClient>,
    pub broker: Option<BrokerClient>,
}

impl AppState {
    pub fn new(validator: Arc<dyn TokenValidator>, users: Arc<dyn UserRpc>) -> Self {
        Self {
            validator,
            users,
            cache: None,
            broker: None,
        }
    }

    #[must_use]
    pub fn with_cache(mut self, cache: CacheClient) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub fn with_broker(mut self, broker: BrokerClient) -> Self {
        self.broker = Some(broker);
        self
    }
}
