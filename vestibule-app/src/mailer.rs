//! Outgoing mail interface
//!
//! Transport is an external collaborator; the core only needs a sender it
//! can hand a finished message to, fire-and-forget. Failures are not retried
//! here.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::info;
use vestibule_core::VestibuleResult;

/// A finished outgoing message
#[derive(Debug, Clone)]
pub struct Mail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mail sender abstraction
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: Mail) -> VestibuleResult<()>;
}

/// Logs deliveries instead of sending them
///
/// Stands in wherever a real SMTP transport is configured out.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: Mail) -> VestibuleResult<()> {
        info!(to = %mail.to, subject = %mail.subject, "mail delivered to log");
        Ok(())
    }
}

/// Collects sent mail in memory, for tests and development
#[derive(Debug, Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<Mail>>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Mail> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, mail: Mail) -> VestibuleResult<()> {
        self.sent.lock().expect("mailer lock poisoned").push(mail);
        Ok(())
    }
}
