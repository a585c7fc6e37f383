use crate::client::{ClientError, MarketClient};
use codemarket_core::{ContactPayload, MessageResponse};
use reqwest::Method;

/// Support contact form
#[derive(Clone)]
pub struct SupportApi {
    client: MarketClient,
}

impl SupportApi {
    pub fn new(client: MarketClient) -> Self {
        Self { client }
    }

    pub async fn submit_contact(
        &self,
        payload: &ContactPayload,
    ) -> Result<MessageResponse, ClientError> {
        let request = self
            .client
            .request(Method::POST, "/support/contact")
            .json(payload);
        self.client.execute(request).await
    }
}
