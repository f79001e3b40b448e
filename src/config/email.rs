use serde::Deserialize;

/// Email related options of the bug tracker being audited.
///
/// Every field defaults to the value the tracker ships with, which
/// means an untouched installation fails the address checks on purpose.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmailOptions {
    /// Address shown to users as the administrator contact.
    ///
    /// **Environment variables**:
    /// - `TRACKERCHECK_EMAIL_WEBMASTER_EMAIL`
    pub webmaster_email: String,
    /// Address used as the sender of every outgoing notification.
    ///
    /// **Environment variables**:
    /// - `TRACKERCHECK_EMAIL_FROM_EMAIL`
    pub from_email: String,
    /// Address receiving bounced notifications.
    ///
    /// **Environment variables**:
    /// - `TRACKERCHECK_EMAIL_RETURN_PATH_EMAIL`
    pub return_path_email: String,
    /// **Environment variables**:
    /// - `TRACKERCHECK_EMAIL_VALIDATE_EMAIL`
    pub validate_email: bool,
    /// Newly created accounts receive a link to set their password
    /// instead of a generated one.
    ///
    /// **Environment variables**:
    /// - `TRACKERCHECK_EMAIL_SEND_RESET_PASSWORD`
    pub send_reset_password: bool,
    /// **Environment variables**:
    /// - `TRACKERCHECK_EMAIL_ALLOW_BLANK_EMAIL`
    pub allow_blank_email: bool,
    /// **Environment variables**:
    /// - `TRACKERCHECK_EMAIL_ENABLE_EMAIL_NOTIFICATION`
    pub enable_email_notification: bool,
    /// Anonymous users may register their own accounts.
    ///
    /// **Environment variables**:
    /// - `TRACKERCHECK_EMAIL_ALLOW_SIGNUP`
    pub allow_signup: bool,
    /// Two accounts may not share an email address (case-insensitive).
    ///
    /// **Environment variables**:
    /// - `TRACKERCHECK_EMAIL_EMAIL_ENSURE_UNIQUE`
    pub email_ensure_unique: bool,
}

impl EmailOptions {
    /// Option names and values of every configured address, in the
    /// order they get checked.
    pub fn addresses(&self) -> [(&'static str, &str); 3] {
        [
            ("webmaster_email", self.webmaster_email.as_str()),
            ("from_email", self.from_email.as_str()),
            ("return_path_email", self.return_path_email.as_str()),
        ]
    }
}

impl Default for EmailOptions {
    fn default() -> Self {
        Self {
            webmaster_email: "webmaster@example.com".into(),
            from_email: "noreply@example.com".into(),
            return_path_email: "admin@example.com".into(),
            validate_email: true,
            send_reset_password: true,
            allow_blank_email: false,
            enable_email_notification: true,
            allow_signup: true,
            email_ensure_unique: true,
        }
    }
}
