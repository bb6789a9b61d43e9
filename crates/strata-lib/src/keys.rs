//! The closed setting-key registry.
//!
//! Every key the store accepts is declared here with its value kind and
//! section. Free-form keys are rejected at parse time so a typo can
//! never create a stray row.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::SettingsError;
use crate::model::SettingValue;

/// Allowed values for `currency_symbol_position`.
pub const SYMBOL_POSITIONS: &[&str] = &["before", "after"];
/// Allowed values for `mail_encryption`.
pub const MAIL_ENCRYPTIONS: &[&str] = &["none", "ssl", "tls"];
/// Allowed values for `storage_disk`.
pub const STORAGE_DISKS: &[&str] = &["local", "s3"];

/// The shape a key's stored value must conform to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Arbitrary text.
    Text,
    /// Boolean, stored as `"1"` / `"0"`.
    Flag,
    /// Integer, stored in decimal.
    Integer,
    /// One of a fixed set of strings.
    Choice(&'static [&'static str]),
    /// Text that listings mask.
    Secret,
}

impl ValueKind {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Flag => "flag",
            Self::Integer => "integer",
            Self::Choice(_) => "choice",
            Self::Secret => "secret",
        }
    }

    #[must_use]
    pub const fn is_secret(&self) -> bool {
        matches!(self, Self::Secret)
    }
}

/// Settings family a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Currency,
    Email,
    Storage,
    Branding,
    Recaptcha,
    Integrations,
}

impl Section {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Currency => "currency",
            Self::Email => "email",
            Self::Storage => "storage",
            Self::Branding => "branding",
            Self::Recaptcha => "recaptcha",
            Self::Integrations => "integrations",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Section {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "currency" => Ok(Self::Currency),
            "email" => Ok(Self::Email),
            "storage" => Ok(Self::Storage),
            "branding" => Ok(Self::Branding),
            "recaptcha" => Ok(Self::Recaptcha),
            "integrations" => Ok(Self::Integrations),
            other => Err(SettingsError::validation(
                "section",
                format!("unknown section '{other}'"),
            )),
        }
    }
}

/// A known setting key.
///
/// The enum is closed: parsing any string outside the registry fails
/// with `UnknownKey`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingKey {
    // currency
    DecimalFormat,
    DefaultCurrency,
    DecimalSeparator,
    ThousandsSeparator,
    FloatNumber,
    CurrencySymbolSpace,
    CurrencySymbolPosition,
    // email
    MailHost,
    MailPort,
    MailUsername,
    MailPassword,
    MailEncryption,
    MailFromAddress,
    MailFromName,
    // storage
    StorageDisk,
    StorageMaxUploadMb,
    // branding
    BrandTitle,
    BrandLogo,
    BrandFavicon,
    // recaptcha
    RecaptchaEnabled,
    RecaptchaSiteKey,
    RecaptchaSecretKey,
    // integrations
    GoogleCalendarJsonPath,
    GoogleCalendarSync,
    ZoomAccountId,
    ZoomClientId,
    ZoomClientSecret,
    ZoomMeetingTest,
    SlackWebhook,
    TelegramToken,
    TelegramChatId,
}

/// Every key in the registry, in listing order.
pub const ALL_KEYS: &[SettingKey] = &[
    SettingKey::DecimalFormat,
    SettingKey::DefaultCurrency,
    SettingKey::DecimalSeparator,
    SettingKey::ThousandsSeparator,
    SettingKey::FloatNumber,
    SettingKey::CurrencySymbolSpace,
    SettingKey::CurrencySymbolPosition,
    SettingKey::MailHost,
    SettingKey::MailPort,
    SettingKey::MailUsername,
    SettingKey::MailPassword,
    SettingKey::MailEncryption,
    SettingKey::MailFromAddress,
    SettingKey::MailFromName,
    SettingKey::StorageDisk,
    SettingKey::StorageMaxUploadMb,
    SettingKey::BrandTitle,
    SettingKey::BrandLogo,
    SettingKey::BrandFavicon,
    SettingKey::RecaptchaEnabled,
    SettingKey::RecaptchaSiteKey,
    SettingKey::RecaptchaSecretKey,
    SettingKey::GoogleCalendarJsonPath,
    SettingKey::GoogleCalendarSync,
    SettingKey::ZoomAccountId,
    SettingKey::ZoomClientId,
    SettingKey::ZoomClientSecret,
    SettingKey::ZoomMeetingTest,
    SettingKey::SlackWebhook,
    SettingKey::TelegramToken,
    SettingKey::TelegramChatId,
];

impl SettingKey {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DecimalFormat => "decimal_format",
            Self::DefaultCurrency => "default_currency",
            Self::DecimalSeparator => "decimal_separator",
            Self::ThousandsSeparator => "thousands_separator",
            Self::FloatNumber => "float_number",
            Self::CurrencySymbolSpace => "currency_symbol_space",
            Self::CurrencySymbolPosition => "currency_symbol_position",
            Self::MailHost => "mail_host",
            Self::MailPort => "mail_port",
            Self::MailUsername => "mail_username",
            Self::MailPassword => "mail_password",
            Self::MailEncryption => "mail_encryption",
            Self::MailFromAddress => "mail_from_address",
            Self::MailFromName => "mail_from_name",
            Self::StorageDisk => "storage_disk",
            Self::StorageMaxUploadMb => "storage_max_upload_mb",
            Self::BrandTitle => "brand_title",
            Self::BrandLogo => "brand_logo",
            Self::BrandFavicon => "brand_favicon",
            Self::RecaptchaEnabled => "recaptcha_enabled",
            Self::RecaptchaSiteKey => "recaptcha_site_key",
            Self::RecaptchaSecretKey => "recaptcha_secret_key",
            Self::GoogleCalendarJsonPath => "google_calendar_json_path",
            Self::GoogleCalendarSync => "is_googlecalendar_sync",
            Self::ZoomAccountId => "zoom_account_id",
            Self::ZoomClientId => "zoom_client_id",
            Self::ZoomClientSecret => "zoom_client_secret",
            Self::ZoomMeetingTest => "is_zoom_meeting_test",
            Self::SlackWebhook => "slack_webhook",
            Self::TelegramToken => "telegram_token",
            Self::TelegramChatId => "telegram_chat_id",
        }
    }

    #[must_use]
    pub const fn section(&self) -> Section {
        match self {
            Self::DecimalFormat
            | Self::DefaultCurrency
            | Self::DecimalSeparator
            | Self::ThousandsSeparator
            | Self::FloatNumber
            | Self::CurrencySymbolSpace
            | Self::CurrencySymbolPosition => Section::Currency,
            Self::MailHost
            | Self::MailPort
            | Self::MailUsername
            | Self::MailPassword
            | Self::MailEncryption
            | Self::MailFromAddress
            | Self::MailFromName => Section::Email,
            Self::StorageDisk | Self::StorageMaxUploadMb => Section::Storage,
            Self::BrandTitle | Self::BrandLogo | Self::BrandFavicon => Section::Branding,
            Self::RecaptchaEnabled | Self::RecaptchaSiteKey | Self::RecaptchaSecretKey => {
                Section::Recaptcha
            }
            Self::GoogleCalendarJsonPath
            | Self::GoogleCalendarSync
            | Self::ZoomAccountId
            | Self::ZoomClientId
            | Self::ZoomClientSecret
            | Self::ZoomMeetingTest
            | Self::SlackWebhook
            | Self::TelegramToken
            | Self::TelegramChatId => Section::Integrations,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::DecimalFormat | Self::MailPort | Self::StorageMaxUploadMb => ValueKind::Integer,
            Self::FloatNumber
            | Self::CurrencySymbolSpace
            | Self::RecaptchaEnabled
            | Self::GoogleCalendarSync
            | Self::ZoomMeetingTest => ValueKind::Flag,
            Self::CurrencySymbolPosition => ValueKind::Choice(SYMBOL_POSITIONS),
            Self::MailEncryption => ValueKind::Choice(MAIL_ENCRYPTIONS),
            Self::StorageDisk => ValueKind::Choice(STORAGE_DISKS),
            Self::MailPassword
            | Self::RecaptchaSecretKey
            | Self::ZoomClientSecret
            | Self::TelegramToken => ValueKind::Secret,
            Self::DefaultCurrency
            | Self::DecimalSeparator
            | Self::ThousandsSeparator
            | Self::MailHost
            | Self::MailUsername
            | Self::MailFromAddress
            | Self::MailFromName
            | Self::BrandTitle
            | Self::BrandLogo
            | Self::BrandFavicon
            | Self::RecaptchaSiteKey
            | Self::GoogleCalendarJsonPath
            | Self::ZoomAccountId
            | Self::ZoomClientId
            | Self::SlackWebhook
            | Self::TelegramChatId => ValueKind::Text,
        }
    }

    /// Parse a raw string into a typed value according to this key's kind.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` when the raw string does not conform.
    pub fn parse_value(&self, raw: &str) -> crate::error::Result<SettingValue> {
        match self.kind() {
            ValueKind::Text | ValueKind::Secret => Ok(SettingValue::Text(raw.to_string())),
            ValueKind::Flag => match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(SettingValue::Flag(true)),
                "0" | "false" | "no" | "off" => Ok(SettingValue::Flag(false)),
                other => Err(SettingsError::invalid_value(
                    self.as_str(),
                    format!("expected a boolean, got '{other}'"),
                )),
            },
            ValueKind::Integer => raw.trim().parse::<i64>().map(SettingValue::Integer).map_err(
                |_| {
                    SettingsError::invalid_value(
                        self.as_str(),
                        format!("expected an integer, got '{raw}'"),
                    )
                },
            ),
            ValueKind::Choice(allowed) => {
                let lowered = raw.trim().to_lowercase();
                if allowed.contains(&lowered.as_str()) {
                    Ok(SettingValue::Text(lowered))
                } else {
                    Err(SettingsError::invalid_value(
                        self.as_str(),
                        format!("expected one of {allowed:?}, got '{raw}'"),
                    ))
                }
            }
        }
    }

    /// Check that an already-typed value conforms to this key's kind.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` on a kind mismatch or a choice outside the
    /// allowed set.
    pub fn check(&self, value: &SettingValue) -> crate::error::Result<()> {
        match (self.kind(), value) {
            (ValueKind::Flag, SettingValue::Flag(_))
            | (ValueKind::Integer, SettingValue::Integer(_))
            | (ValueKind::Text | ValueKind::Secret, SettingValue::Text(_)) => Ok(()),
            (ValueKind::Choice(allowed), SettingValue::Text(s)) => {
                if allowed.contains(&s.as_str()) {
                    Ok(())
                } else {
                    Err(SettingsError::invalid_value(
                        self.as_str(),
                        format!("expected one of {allowed:?}, got '{s}'"),
                    ))
                }
            }
            (kind, value) => Err(SettingsError::invalid_value(
                self.as_str(),
                format!("expected {}, got {}", kind.name(), value.kind_name()),
            )),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        ALL_KEYS
            .iter()
            .find(|key| key.as_str() == lowered)
            .copied()
            .ok_or(SettingsError::UnknownKey { key: lowered })
    }
}

impl Serialize for SettingKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SettingKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
