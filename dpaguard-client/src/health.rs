//! Health probe endpoints

use crate::ReviewClient;
use crate::error::Result;
use serde_json::Value as JsonValue;

impl ReviewClient {
    /// Liveness probe of the review API
    pub async fn health_live(&self) -> Result<JsonValue> {
        let response = self.client.get(self.url("/health/live")).send().await?;
        self.handle_response(response).await
    }

    /// Readiness probe of the review API (database, storage, workers)
    pub async fn health_ready(&self) -> Result<JsonValue> {
        let response = self.client.get(self.url("/health/ready")).send().await?;
        self.handle_response(response).await
    }
}
