//! Email service for staff account notifications

use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    models::user::UserAccount,
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Tell a new staff member how to log in
    pub async fn send_account_activation(
        &self,
        user: &UserAccount,
        password: &str,
        app_name: &str,
    ) -> AppResult<()> {
        let subject = format!("Aktivasi Akun {} - {}", app_name, user.role.display_name());
        let body = activation_body(user, password, app_name);
        self.send_email(&user.email, &subject, &body).await
    }

    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        if !self.config.enabled {
            tracing::info!(to = %to, subject = %subject, "Email delivery disabled, message not sent");
            tracing::debug!(body = %body, "Unsent email body");
            return Ok(());
        }

        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("SIMPANSE");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Validation(format!("Invalid recipient address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><p>{}</p></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        // SMTP transport is blocking
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::Internal(format!("Email task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        tracing::info!(to = %to, "Email sent");
        Ok(())
    }
}

fn activation_body(user: &UserAccount, password: &str, app_name: &str) -> String {
    let facilities: String = user
        .role
        .facilities()
        .iter()
        .map(|f| format!("- {}\n", f))
        .collect();

    format!(
        "Halo {name},\n\n\
         Akun {app} Anda sebagai {role} telah aktif.\n\n\
         Login: {username}\n\
         Password: {password}\n\n\
         Fasilitas akun:\n{facilities}\n\
         Segera ganti password setelah login pertama.\n",
        name = user.name,
        app = app_name,
        role = user.role.display_name(),
        username = user.username,
        password = password,
        facilities = facilities,
    )
}
