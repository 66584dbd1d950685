use thiserror::Error;

/// Error for outbound email delivery
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailDeliveryError {
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build email message: {0}")]
    MessageBuildFailed(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

/// Transactional email sent by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailTemplate {
    /// Account activation request sent at registration.
    Confirmation {
        username: String,
        activation_url: String,
    },
}

impl EmailTemplate {
    pub fn id(&self) -> &'static str {
        match self {
            EmailTemplate::Confirmation { .. } => "user_invitation",
        }
    }

    pub fn subject(&self) -> String {
        match self {
            EmailTemplate::Confirmation { .. } => "Finish registration with Feed".to_string(),
        }
    }

    pub fn html_body(&self) -> String {
        match self {
            EmailTemplate::Confirmation {
                username,
                activation_url,
            } => format!(
                "<!doctype html>\n\
                 <html>\n\
                 <body>\n\
                 <p>Hi {username},</p>\n\
                 <p>Thanks for signing up. Confirm your email to activate your account:</p>\n\
                 <p><a href=\"{url}\">{url}</a></p>\n\
                 <p>If you did not sign up, you can ignore this email.</p>\n\
                 </body>\n\
                 </html>\n",
                username = escape_html(username),
                url = escape_html(activation_url),
            ),
        }
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
