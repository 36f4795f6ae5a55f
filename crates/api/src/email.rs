//! Transactional email dispatch
//!
//! Sends password-reset links, password-change notices and inquiry replies
//! via the Resend API. Dispatch is best-effort: failures are logged and never
//! propagate into the write that triggered the email.

/// Email configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Resend API key
    pub resend_api_key: String,
    /// From address for emails
    pub email_from: String,
    /// Dealership name for branding
    pub dealership_name: String,
    /// Public URL the reset links point at
    pub public_url: String,
}

impl EmailConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self {
            resend_api_key: std::env::var("RESEND_API_KEY").unwrap_or_default(),
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "Treadstock <noreply@localhost>".to_string()),
            dealership_name: std::env::var("DEALERSHIP_NAME")
                .unwrap_or_else(|_| "Treadstock".to_string()),
            public_url: std::env::var("PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }

    /// Check if email sending is enabled
    pub fn is_enabled(&self) -> bool {
        !self.resend_api_key.is_empty()
    }
}

/// Transactional email service
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
    client: reqwest::Client,
}

impl EmailService {
    /// Create a new email service
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::new(EmailConfig::from_env())
    }

    /// Check if email sending is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    /// Send an email via Resend API
    async fn send_email(&self, to: &str, subject: &str, html: &str) {
        if !self.config.is_enabled() {
            tracing::warn!("Email not configured, skipping: {}", subject);
            return;
        }

        let body = serde_json::json!({
            "from": self.config.email_from,
            "to": [to],
            "subject": subject,
            "html": html
        });

        let response = self
            .client
            .post("https://api.resend.com/emails")
            .header(
                "Authorization",
                format!("Bearer {}", self.config.resend_api_key),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(to = %to, subject = %subject, "Email sent");
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                tracing::error!(status = %status, body = %body, "Failed to send email");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to send email");
            }
        }
    }

    /// Send a password reset link
    ///
    /// The plaintext token only ever travels in this email; the reset link
    /// is the out-of-band half of the reset protocol.
    pub async fn send_password_reset(&self, to: &str, reset_token: &str) {
        let reset_link = format!(
            "{}/admin/reset-password/{}",
            self.config.public_url, reset_token
        );

        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Password Reset Request</h2>
    <p>Hi there,</p>
    <p>A password reset was requested for your {dealership} admin account. Click the button below to choose a new password. The link expires in one hour.</p>
    <p>
        <a href="{reset_link}" style="display: inline-block; padding: 12px 24px; background-color: #6366f1; color: white; text-decoration: none; border-radius: 6px; font-weight: bold;">
            Reset Password
        </a>
    </p>
    <p style="color: #666; font-size: 14px;">
        If you didn't request this, you can safely ignore this email. Your password will not change.
    </p>
    <hr style="border: none; border-top: 1px solid #eee; margin: 20px 0;">
    <p style="color: #999; font-size: 12px;">{dealership}</p>
</body>
</html>"#,
            dealership = self.config.dealership_name,
            reset_link = reset_link,
        );

        self.send_email(
            to,
            &format!("Password Reset - {}", self.config.dealership_name),
            &html,
        )
        .await;
    }

    /// Send a password changed notification
    pub async fn send_password_changed(&self, to: &str) {
        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2 style="color: #059669;">Password Changed</h2>
    <p>Hi there,</p>
    <p>The password for your {dealership} admin account was just changed.</p>
    <p style="color: #dc2626; font-size: 14px; font-weight: bold;">
        If you didn't make this change, request a new password reset immediately.
    </p>
    <hr style="border: none; border-top: 1px solid #eee; margin: 20px 0;">
    <p style="color: #999; font-size: 12px;">{dealership}</p>
</body>
</html>"#,
            dealership = self.config.dealership_name,
        );

        self.send_email(
            to,
            &format!("Password Changed - {}", self.config.dealership_name),
            &html,
        )
        .await;
    }

    /// Send a reply to a customer inquiry
    pub async fn send_inquiry_reply(&self, to: &str, customer_name: &str, reply: &str) {
        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <p>Hi {customer_name},</p>
    <p>Thank you for getting in touch with {dealership}. Here is our reply to your inquiry:</p>
    <div style="background-color: #f9fafb; border-left: 4px solid #6366f1; padding: 16px; margin: 20px 0; white-space: pre-wrap;">{reply}</div>
    <p>Feel free to answer this email if you have further questions.</p>
    <hr style="border: none; border-top: 1px solid #eee; margin: 20px 0;">
    <p style="color: #999; font-size: 12px;">{dealership}</p>
</body>
</html>"#,
            customer_name = customer_name,
            dealership = self.config.dealership_name,
            reply = reply,
        );

        self.send_email(
            to,
            &format!("Re: Your inquiry - {}", self.config.dealership_name),
            &html,
        )
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_without_api_key() {
        let config = EmailConfig {
            resend_api_key: String::new(),
            email_from: "Treadstock <noreply@localhost>".to_string(),
            dealership_name: "Treadstock".to_string(),
            public_url: "http://localhost:3000".to_string(),
        };
        assert!(!config.is_enabled());
        assert!(!EmailService::new(config).is_enabled());
    }
}
