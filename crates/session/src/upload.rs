//! Product submission for sellers

use crate::controller::AuthSession;
use crate::error::SessionError;
use crate::notify::{Notification, Route};
use codemarket_core::{FilePayload, ProductDetail, ProductDraft};
use futures::future::try_join_all;
use tracing::{info, warn};

const UPLOAD_SUCCESS: &str = "Product uploaded successfully!";
const UPLOAD_FAILED: &str = "Failed to upload product";
const SELLERS_ONLY: &str = "Only sellers can upload products";

impl AuthSession {
    /// Upload `files` and publish the product described by `draft`
    ///
    /// Files are sent concurrently. The product is only created once every
    /// file has been stored; any failure produces a single error
    /// notification and no product.
    pub async fn submit_product(
        &self,
        draft: &ProductDraft,
        files: Vec<FilePayload>,
    ) -> Result<ProductDetail, SessionError> {
        match self.publish(draft, files).await {
            Ok(product) => {
                info!(product_id = product.summary.id, title = %product.summary.title, "Product published");
                self.notify(Notification::success(UPLOAD_SUCCESS));
                self.navigate(Route::Dashboard);
                Ok(product)
            }
            Err(err) => {
                warn!(error = %err, "Product upload failed");
                self.notify(Notification::error(err.user_message(UPLOAD_FAILED)));
                Err(err)
            }
        }
    }

    async fn publish(
        &self,
        draft: &ProductDraft,
        files: Vec<FilePayload>,
    ) -> Result<ProductDetail, SessionError> {
        let user = self.current_user().ok_or(SessionError::NotAuthenticated)?;
        if !user.role.can_sell() {
            return Err(SessionError::Forbidden(SELLERS_ONLY.to_string()));
        }
        draft.validate_with_files(&files)?;

        let upload = self.client().upload();
        let stored = try_join_all(files.into_iter().map(|file| upload.upload_file(file))).await?;

        let create = draft.to_create(stored.into_iter().map(|file| file.stored_as).collect());
        let product = self.client().products().create(&create).await?;
        self.client().invalidate("/products");
        Ok(product)
    }
}
