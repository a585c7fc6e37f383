use crate::controller::AuthSession;
use crate::error::SessionError;
use crate::notify::Notification;
use codemarket_core::{ContactPayload, MessageResponse, Validate};
use tracing::warn;

const CONTACT_SENT: &str = "Message sent! We will get back to you soon.";
const CONTACT_FAILED: &str = "Unable to send message right now.";

impl AuthSession {
    /// Send the support contact form; works signed in or not
    pub async fn send_contact_message(
        &self,
        payload: &ContactPayload,
    ) -> Result<MessageResponse, SessionError> {
        payload.validate()?;

        match self.client().support().submit_contact(payload).await {
            Ok(response) => {
                self.notify(Notification::success(CONTACT_SENT));
                Ok(response)
            }
            Err(err) => {
                let err = SessionError::from(err);
                warn!(error = %err, "Contact message failed");
                self.notify(Notification::error(err.user_message(CONTACT_FAILED)));
                Err(err)
            }
        }
    }
}
