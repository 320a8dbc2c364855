use async_trait::async_trait;
use tracing::{debug, info};
use voyage_core::notification::{MailError, Mailer};
use voyage_shared::Masked;

/// Mail transport that writes outgoing messages to the log instead of a relay.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_mail(
        &self,
        subject: &str,
        body: &str,
        from: &str,
        to: &[String],
    ) -> Result<(), MailError> {
        if to.is_empty() {
            return Err(MailError("no recipients".to_string()));
        }

        let recipients: Vec<String> = to
            .iter()
            .map(|addr| Masked(addr.clone()).email_hint())
            .collect();
        info!("Mail from {} to {:?}: {}", from, recipients, subject);
        debug!("Mail body:\n{}", body);
        Ok(())
    }
}
