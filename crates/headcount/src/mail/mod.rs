pub mod smtp;

pub use smtp::SmtpMailer;

/// Outbound delivery seam for the rendered report.
///
/// The from-address, recipient list, and any provider header are fixed at
/// construction; a send call carries only the per-report subject and body.
/// Implementations do not retry.
pub trait Mailer {
    fn send(&self, subject: &str, html_body: &str) -> Result<(), SendError>;
}

/// Error enumeration for mail delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// A configured address could not be parsed.
    #[error("invalid mail address: {0}")]
    Address(String),
    /// The message could not be assembled.
    #[error("could not build mail message: {0}")]
    Message(String),
    /// The SMTP session failed.
    #[error("mail transport failed: {0}")]
    Transport(String),
}
