//! Email service for sending transactional emails.
//!
//! Uses `lettre` for SMTP transport. Bodies are HTML rendered from the
//! `askama` templates under `templates/email`, which escape user input.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::header::ContentType,
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// A contact form to forward to the shop inbox.
#[derive(Debug, Clone)]
pub struct ContactForm<'a> {
    /// Sender name.
    pub name: &'a str,
    /// Sender address; used as Reply-To.
    pub email: &'a str,
    /// Sender phone, if given.
    pub phone: Option<&'a str>,
    /// Free-text message.
    pub message: &'a str,
}

/// Email service for sending transactional emails.
#[derive(Debug, Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Creates an SMTP transport.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let builder = if self.config.tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
                .map_err(|e| EmailError::SendError(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_host)
        };

        let builder = builder.port(self.config.smtp_port);
        let builder = if self.config.smtp_username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            ))
        };

        Ok(builder.build())
    }

    /// Sends the password-reset OTP to an admin.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn send_password_otp(
        &self,
        to_email: &str,
        to_name: &str,
        otp: &str,
    ) -> Result<(), EmailError> {
        let body = otp_body(to_name, otp)?;
        self.send_email(to_email, "Your Password Reset OTP", &body, None)
            .await
    }

    /// Forwards a contact form to the configured inbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn forward_contact_form(&self, form: &ContactForm<'_>) -> Result<(), EmailError> {
        let subject = format!("New enquiry from {}", form.name);
        let body = contact_body(form)?;
        self.send_email(&self.config.inbox, &subject, &body, Some(form.email))
            .await
    }

    /// Sends an HTML email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        html: &str,
        reply_to: Option<&str>,
    ) -> Result<(), EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let mut builder = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML);

        if let Some(reply_to) = reply_to {
            builder = builder.reply_to(
                reply_to
                    .parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            );
        }

        let email = builder
            .body(html.to_string())
            .map_err(|e| EmailError::BuildError(e.to_string()))?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        tracing::debug!(to = %to_email, subject = %subject, "Email sent");
        Ok(())
    }
}

/// Password-reset mail.
#[derive(Template)]
#[template(path = "email/password_otp.html")]
struct PasswordOtpMail<'a> {
    name: &'a str,
    otp: &'a str,
}

/// Forwarded contact form.
#[derive(Template)]
#[template(path = "email/contact_form.html")]
struct ContactFormMail<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    message: &'a str,
}

fn otp_body(name: &str, otp: &str) -> Result<String, EmailError> {
    render(&PasswordOtpMail { name, otp })
}

fn contact_body(form: &ContactForm<'_>) -> Result<String, EmailError> {
    render(&ContactFormMail {
        name: form.name,
        email: form.email,
        phone: form.phone.unwrap_or("-"),
        message: form.message,
    })
}

fn render(mail: &impl Template) -> Result<String, EmailError> {
    mail.render()
        .map_err(|e| EmailError::BuildError(e.to_string()))
}
