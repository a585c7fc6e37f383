//! File upload service

use crate::client::{ClientError, MarketClient};
use codemarket_core::{FilePayload, UploadedFile};
use reqwest::{
    Method,
    multipart::{Form, Part},
};

/// `POST /upload/file`, one multipart request per file
#[derive(Clone)]
pub struct UploadApi {
    client: MarketClient,
}

impl UploadApi {
    pub fn new(client: MarketClient) -> Self {
        Self { client }
    }

    pub async fn upload_file(&self, file: FilePayload) -> Result<UploadedFile, ClientError> {
        let FilePayload {
            name,
            content_type,
            bytes,
        } = file;

        let mut part = Part::bytes(bytes).file_name(name);
        if let Some(content_type) = content_type {
            part = part.mime_str(&content_type)?;
        }

        let request = self
            .client
            .request(Method::POST, "/upload/file")
            .multipart(Form::new().part("file", part));
        self.client.execute(request).await
    }
}
