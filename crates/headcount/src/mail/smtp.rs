use lettre::message::header::{ContentType, Header, HeaderName, HeaderValue};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::MailConfig;

use super::{Mailer, SendError};

/// Amazon SES reads this header to route delivery and bounce metrics into
/// the named configuration set.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SesConfigurationSet(String);

impl Header for SesConfigurationSet {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("X-SES-CONFIGURATION-SET")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self(s.to_string()))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.clone())
    }
}

/// Report delivery over authenticated implicit-TLS SMTP.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
    recipients: Vec<Mailbox>,
    configuration_set: Option<String>,
}

impl SmtpMailer {
    /// Build the transport and parse every configured address up front so
    /// a typo fails the run before any snapshot is fetched.
    pub fn new(config: &MailConfig) -> Result<Self, SendError> {
        let from = parse_mailbox(&config.from)?;
        let recipients = config
            .recipients
            .iter()
            .map(|address| parse_mailbox(address))
            .collect::<Result<Vec<_>, _>>()?;

        let transport = SmtpTransport::relay(&config.smtp_host)
            .map_err(|err| SendError::Transport(err.to_string()))?
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from,
            recipients,
            configuration_set: config.ses_configuration_set.clone(),
        })
    }

    fn build_message(&self, subject: &str, html_body: &str) -> Result<Message, SendError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(subject)
            .header(ContentType::TEXT_HTML);

        for recipient in &self.recipients {
            builder = builder.to(recipient.clone());
        }

        if let Some(value) = &self.configuration_set {
            builder = builder.header(SesConfigurationSet(value.clone()));
        }

        builder
            .body(html_body.to_string())
            .map_err(|err| SendError::Message(err.to_string()))
    }
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from", &self.from)
            .field("recipients", &self.recipients)
            .finish_non_exhaustive()
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, subject: &str, html_body: &str) -> Result<(), SendError> {
        let message = self.build_message(subject, html_body)?;
        self.transport
            .send(&message)
            .map_err(|err| SendError::Transport(err.to_string()))?;
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, SendError> {
    address
        .parse::<Mailbox>()
        .map_err(|err| SendError::Address(format!("{address}: {err}")))
}
