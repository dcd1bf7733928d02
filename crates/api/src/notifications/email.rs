//! Outbound verification and password-reset email via SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport. Configuration is
//! loaded from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and the mailer runs disabled:
//! sends become logged no-ops so local development works without a relay.

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@skillhub.local";

/// Configuration for the SMTP email dispatcher.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and sends should be skipped.
    ///
    /// | Variable        | Required | Default                  |
    /// |-----------------|----------|--------------------------|
    /// | `SMTP_HOST`     | yes      | —                        |
    /// | `SMTP_PORT`     | no       | `587`                    |
    /// | `SMTP_FROM`     | no       | `noreply@skillhub.local` |
    /// | `SMTP_USER`     | no       | —                        |
    /// | `SMTP_PASSWORD` | no       | —                        |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Sends account-lifecycle emails (verification, password reset).
///
/// `config == None` means SMTP is not configured; sends succeed as logged
/// no-ops. The registration/forgot-password failure policies only apply
/// to real transport failures.
pub struct Mailer {
    config: Option<EmailConfig>,
}

impl Mailer {
    /// Create a mailer with explicit configuration (or disabled with `None`).
    pub fn new(config: Option<EmailConfig>) -> Self {
        Self { config }
    }

    /// Create a mailer from `SMTP_*` environment variables.
    pub fn from_env() -> Self {
        let config = EmailConfig::from_env();
        if config.is_none() {
            tracing::warn!("SMTP_HOST not set; outbound email is disabled");
        }
        Self { config }
    }

    /// Whether a real SMTP transport is configured.
    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Send the address-verification email issued at registration.
    pub async fn send_verification_email(
        &self,
        to_email: &str,
        token: &str,
        display_name: &str,
    ) -> Result<(), EmailError> {
        let subject = "[SkillHub] Verify your email address";
        let body = format!(
            "Hi {display_name},\n\n\
             Welcome to SkillHub! Confirm your email address by entering this \
             verification code:\n\n{token}\n\n\
             If you did not create an account, you can ignore this message.\n"
        );
        self.deliver(to_email, subject, body).await
    }

    /// Send the password-reset email issued by forgot-password.
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        token: &str,
        display_name: &str,
    ) -> Result<(), EmailError> {
        let subject = "[SkillHub] Password reset requested";
        let body = format!(
            "Hi {display_name},\n\n\
             A password reset was requested for your account. Use this reset \
             code within the next hour:\n\n{token}\n\n\
             If you did not request a reset, no action is needed; your \
             password is unchanged.\n"
        );
        self.deliver(to_email, subject, body).await
    }

    async fn deliver(&self, to_email: &str, subject: &str, body: String) -> Result<(), EmailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let Some(config) = &self.config else {
            tracing::debug!(to = to_email, subject, "Email disabled; skipping send");
            return Ok(());
        };

        let email = Message::builder()
            .from(config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = to_email, subject, "Email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
