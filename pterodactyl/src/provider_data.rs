//! Shared state handed to resources and data sources after configuration

use crate::api::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct PterodactylProviderData {
    pub client: Arc<Client>,
}

impl PterodactylProviderData {
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}
