//! Mail delivery through `lettre`.
//!
//! Both mailers compose the same MIME message: an HTML body and, when the
//! attachment exists at send time, the workbook as `application/zip`.

use lettre::address::AddressError;
use lettre::message::header::{ContentType, ContentTypeErr};
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::{FileTransport, Message as Email, SmtpTransport, Transport};
use openitems_core::{Mailer, Message, SendError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Error composing or delivering a message.
#[derive(Debug, Error)]
pub enum MailError {
    /// An address could not be parsed.
    #[error("invalid address '{address}': {source}")]
    Address {
        /// The offending address.
        address: String,
        /// Parse failure.
        #[source]
        source: AddressError,
    },
    /// The message could not be assembled.
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    /// The attachment content type was rejected.
    #[error("invalid content type: {0}")]
    ContentType(#[from] ContentTypeErr),
    /// The attachment exists but could not be read.
    #[error("failed to read attachment {}: {source}", .path.display())]
    Attachment {
        /// Attachment path.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The pickup directory could not be created.
    #[error("failed to prepare pickup directory: {0}")]
    Io(#[from] std::io::Error),
    /// The SMTP relay rejected or dropped the message.
    #[error("smtp: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    /// The message could not be written to the pickup directory.
    #[error("pickup: {0}")]
    File(#[from] lettre::transport::file::Error),
}

/// Split a `;`- or `,`-separated recipient list, dropping empty entries.
pub fn parse_address_list(list: &str) -> Vec<String> {
    list.split([';', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.trim().parse().map_err(|source| MailError::Address {
        address: address.to_string(),
        source,
    })
}

fn attachment_part(path: &Path) -> Result<SinglePart, MailError> {
    let bytes = fs::read(path).map_err(|source| MailError::Attachment {
        path: path.to_path_buf(),
        source,
    })?;
    let filename = path
        .file_name()
        .map_or_else(|| "report.zip".to_string(), |n| n.to_string_lossy().into_owned());
    let content_type = ContentType::parse("application/zip")?;
    Ok(Attachment::new(filename).body(bytes, content_type))
}

/// Build the MIME message for `message`, sent from `from`.
fn compose(from: &Mailbox, message: &Message) -> Result<Email, MailError> {
    let mut builder = Email::builder()
        .from(from.clone())
        .subject(message.subject.clone());
    for to in &message.to {
        builder = builder.to(mailbox(to)?);
    }
    for cc in &message.cc {
        builder = builder.cc(mailbox(cc)?);
    }

    let body = SinglePart::html(message.html_body.clone());
    let email = match message.existing_attachment() {
        Some(path) => {
            debug!(path = %path.display(), "Attaching file");
            builder.multipart(
                MultiPart::mixed()
                    .singlepart(body)
                    .singlepart(attachment_part(path)?),
            )?
        }
        None => {
            if let Some(path) = &message.attachment {
                warn!(path = %path.display(), "Attachment not found, sending without it");
            }
            builder.singlepart(body)?
        }
    };
    Ok(email)
}

/// Sends through a plain SMTP relay.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    /// Create a mailer for the relay at `host:port`.
    ///
    /// The connection is unencrypted and unauthenticated, as for an internal
    /// relay.
    pub fn new(host: &str, port: u16, from: &str) -> Result<Self, MailError> {
        Ok(Self {
            transport: SmtpTransport::builder_dangerous(host).port(port).build(),
            from: mailbox(from)?,
        })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, message: &Message) -> Result<(), SendError> {
        let email =
            compose(&self.from, message).map_err(|e| SendError::new(&message.subject, e))?;
        self.transport
            .send(&email)
            .map_err(|e| SendError::new(&message.subject, MailError::from(e)))?;
        info!(
            subject = %message.subject,
            recipients = message.to.len() + message.cc.len(),
            "Mail sent"
        );
        Ok(())
    }
}

/// Writes each message as an `.eml` file into a pickup directory.
pub struct PickupMailer {
    transport: FileTransport,
    directory: PathBuf,
    from: Mailbox,
}

impl PickupMailer {
    /// Create a mailer writing into `directory`, creating it if needed.
    pub fn new(directory: impl Into<PathBuf>, from: &str) -> Result<Self, MailError> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        Ok(Self {
            transport: FileTransport::new(&directory),
            directory,
            from: mailbox(from)?,
        })
    }

    /// The pickup directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl Mailer for PickupMailer {
    fn send(&self, message: &Message) -> Result<(), SendError> {
        let email =
            compose(&self.from, message).map_err(|e| SendError::new(&message.subject, e))?;
        let id = self
            .transport
            .send(&email)
            .map_err(|e| SendError::new(&message.subject, MailError::from(e)))?;
        info!(
            subject = %message.subject,
            id = %id,
            dir = %self.directory.display(),
            "Mail written to pickup directory"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_list() {
        assert_eq!(
            parse_address_list("a@example.com; b@example.com;;c@example.com, "),
            ["a@example.com", "b@example.com", "c@example.com"]
        );
        assert!(parse_address_list("").is_empty());
    }

    #[test]
    fn test_invalid_address() {
        let err = mailbox("not an address").unwrap_err();
        assert!(err.to_string().starts_with("invalid address 'not an address'"));
    }

    #[test]
    fn test_compose_without_recipients_fails() {
        let from = mailbox("noreply@example.com").unwrap();
        let message = Message {
            subject: "Report".to_string(),
            html_body: "<p>hi</p>".to_string(),
            ..Message::default()
        };
        assert!(matches!(compose(&from, &message), Err(MailError::Build(_))));
    }

    #[test]
    fn test_smtp_unreachable_relay_is_send_error() {
        let mailer = SmtpMailer::new("127.0.0.1", 1, "noreply@example.com").unwrap();
        let message = Message {
            to: vec!["a@example.com".to_string()],
            subject: "Report".to_string(),
            html_body: "<p>hi</p>".to_string(),
            ..Message::default()
        };
        let err = mailer.send(&message).unwrap_err();
        assert_eq!(err.subject, "Report");
    }
}
