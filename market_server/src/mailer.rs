//! The order notification mailer.
//!
//! Sends the two checkout notifications: a confirmation to the buyer and one notice per shop represented in the
//! order. Delivery goes through an SMTP relay via lettre; when no relay is configured the rendered messages are
//! logged instead, so checkout behaves identically in development. Delivery failures are logged and swallowed —
//! a committed order never fails because of mail problems.

use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport,
    AsyncTransport,
    Message,
    Tokio1Executor,
};
use log::*;
use market_engine::events::{EventHooks, OrderConfirmationEvent, SupplierNoticeEvent};
use thiserror::Error;

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Sends plain-text notification emails, or logs them when SMTP is not configured.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: String,
}

impl Mailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailerError> {
        let transport = match &config.smtp_host {
            Some(host) => {
                let credentials =
                    Credentials::new(config.smtp_username.clone(), config.smtp_password.reveal().clone());
                let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
                    .port(config.smtp_port)
                    .credentials(credentials)
                    .build();
                info!("📧️ Order notifications will be sent through {host}:{}", config.smtp_port);
                Some(transport)
            },
            None => None,
        };
        Ok(Self { transport, from_address: config.from_address.clone() })
    }

    pub async fn send_order_confirmation(&self, event: &OrderConfirmationEvent) {
        let items = event
            .lines
            .iter()
            .map(|l| format!("{} — {} pcs at {}", l.product_name, l.quantity, l.unit_price))
            .collect::<Vec<_>>()
            .join("\n");
        let subject = format!("Order #{} confirmation", event.order.id);
        let body = format!(
            "Order #{} has been created successfully!\n\nItems:\n{items}\n\nTotal: {}\n",
            event.order.id, event.order.total_price
        );
        self.deliver(&event.email, &subject, &body).await;
    }

    pub async fn send_supplier_notices(&self, event: &SupplierNoticeEvent) {
        for notice in &event.notices {
            let items = notice.products.iter().map(|p| format!("- {p}")).collect::<Vec<_>>().join("\n");
            let subject = format!("Order notification: order #{}", event.order_id);
            let body = format!(
                "Dear {},\n\nWe have received an order for:\n{items}\n\nPlease prepare the items for shipment.\n",
                notice.shop
            );
            self.deliver(&notice.email, &subject, &body).await;
        }
    }

    async fn deliver(&self, to: &str, subject: &str, body: &str) {
        match self.send(to, subject, body).await {
            Ok(()) => debug!("📧️ Sent '{subject}' to {to}"),
            Err(e) => error!("📧️ Could not send '{subject}' to {to}: {e}"),
        }
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError> {
        let Some(transport) = &self.transport else {
            info!("📧️ SMTP is not configured. Message for {to}: '{subject}'\n{body}");
            return Ok(());
        };
        let message = Message::builder()
            .from(self.from_address.parse().map_err(|_| MailerError::InvalidAddress(self.from_address.clone()))?)
            .to(to.parse().map_err(|_| MailerError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;
        transport.send(message).await?;
        Ok(())
    }
}

/// Wires the checkout events to the mailer. Handed to [`market_engine::events::EventHandlers`] at startup.
pub fn order_notification_hooks(mailer: Mailer) -> EventHooks {
    let mut hooks = EventHooks::default();
    let confirmation_mailer = mailer.clone();
    hooks.on_order_confirmation(move |event| {
        let mailer = confirmation_mailer.clone();
        Box::pin(async move {
            mailer.send_order_confirmation(&event).await;
        })
    });
    hooks.on_supplier_notice(move |event| {
        let mailer = mailer.clone();
        Box::pin(async move {
            mailer.send_supplier_notices(&event).await;
        })
    });
    hooks
}
