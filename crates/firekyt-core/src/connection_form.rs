//! Connection form validation.
//!
//! A [`ConnectionDraft`] is what the user typed. [`ConnectionDraft::validate`]
//! either produces a [`ConnectionRequest`], whose [`PlatformTarget`] carries
//! exactly the fields its platform needs, or a [`FieldErrors`] set listing
//! every violated rule against the field it belongs to.

use std::fmt;

use serde::Serialize;

use crate::model::{AccessToken, Platform};

pub const PLATFORM_REQUIRED: &str = "Platform is required";
pub const ACCESS_TOKEN_REQUIRED: &str = "Access token is required";
pub const BLOG_URL_REQUIRED: &str = "Blog URL is required for this platform";

/// Form fields that carry validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Platform,
    AccessToken,
    BlogUrl,
}

impl Field {
    /// Wire/form name of the field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Platform => "platform",
            Self::AccessToken => "accessToken",
            Self::BlogUrl => "blogUrl",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Every rule the draft violated, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// First message attached to `field`.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Raw connection form input.
#[derive(Debug, Clone, Default)]
pub struct ConnectionDraft {
    pub platform: String,
    pub access_token: String,
    pub platform_username: Option<String>,
    pub platform_user_id: Option<String>,
    pub blog_url: Option<String>,
    pub api_endpoint: Option<String>,
}

/// Where a validated connection publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformTarget {
    /// Self-hosted blog engines addressed by their site URL.
    Site { platform: Platform, blog_url: String },
    /// Hosted networks addressed by the account behind the token.
    Account {
        platform: Platform,
        blog_url: Option<String>,
    },
}

impl PlatformTarget {
    pub const fn platform(&self) -> Platform {
        match self {
            Self::Site { platform, .. } | Self::Account { platform, .. } => *platform,
        }
    }

    pub fn blog_url(&self) -> Option<&str> {
        match self {
            Self::Site { blog_url, .. } => Some(blog_url),
            Self::Account { blog_url, .. } => blog_url.as_deref(),
        }
    }
}

/// A connection form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRequest {
    pub target: PlatformTarget,
    pub access_token: AccessToken,
    pub platform_username: Option<String>,
    pub platform_user_id: Option<String>,
    pub api_endpoint: Option<String>,
}

/// JSON body for creating or updating a connection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionBody<'a> {
    pub platform: Platform,
    pub access_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_user_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<&'a str>,
}

impl ConnectionRequest {
    pub const fn platform(&self) -> Platform {
        self.target.platform()
    }

    pub fn body(&self) -> ConnectionBody<'_> {
        ConnectionBody {
            platform: self.target.platform(),
            access_token: self.access_token.expose(),
            platform_username: self.platform_username.as_deref(),
            platform_user_id: self.platform_user_id.as_deref(),
            blog_url: self.target.blog_url(),
            api_endpoint: self.api_endpoint.as_deref(),
        }
    }
}

/// Blank optional inputs are treated as absent.
fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ConnectionDraft {
    pub fn validate(&self) -> Result<ConnectionRequest, FieldErrors> {
        let mut errors = FieldErrors::default();

        let platform = match self.platform.trim() {
            "" => {
                errors.push(Field::Platform, PLATFORM_REQUIRED);
                None
            }
            raw => match raw.parse::<Platform>() {
                Ok(p) => Some(p),
                Err(e) => {
                    errors.push(Field::Platform, e.to_string());
                    None
                }
            },
        };

        let token = self.access_token.trim();
        if token.is_empty() {
            errors.push(Field::AccessToken, ACCESS_TOKEN_REQUIRED);
        }

        let blog_url = non_blank(self.blog_url.as_ref());
        let target = platform.and_then(|platform| {
            if !platform.requires_blog_url() {
                return Some(PlatformTarget::Account { platform, blog_url });
            }
            if let Some(blog_url) = blog_url {
                Some(PlatformTarget::Site { platform, blog_url })
            } else {
                errors.push(Field::BlogUrl, BLOG_URL_REQUIRED);
                None
            }
        });

        match target {
            Some(target) if errors.is_empty() => Ok(ConnectionRequest {
                target,
                access_token: AccessToken::new(token),
                platform_username: non_blank(self.platform_username.as_ref()),
                platform_user_id: non_blank(self.platform_user_id.as_ref()),
                api_endpoint: non_blank(self.api_endpoint.as_ref()),
            }),
            _ => Err(errors),
        }
    }
}
