use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a prepared request. Seam between the catalog client and the network.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
