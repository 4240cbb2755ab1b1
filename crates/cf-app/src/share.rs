//! # Share intents
//!
//! Builds the links the share buttons open. Platforms without a web intent
//! get a message for the user instead.

use std::fmt;
use std::str::FromStr;

use cf_core::error::{AppError, Result};
use cf_core::models::Short;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Text shared when no particular short is picked.
pub const DEFAULT_SHARE_TEXT: &str = "Check out my new video shorts generated with AI! 🎬✨";

/// Everything except the characters a URI component may carry unescaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SharePlatform {
    Instagram,
    Twitter,
    Facebook,
    YouTube,
    TikTok,
    LinkedIn,
    WhatsApp,
}

impl SharePlatform {
    pub const ALL: [SharePlatform; 7] = [
        SharePlatform::Instagram,
        SharePlatform::Twitter,
        SharePlatform::Facebook,
        SharePlatform::YouTube,
        SharePlatform::TikTok,
        SharePlatform::LinkedIn,
        SharePlatform::WhatsApp,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            SharePlatform::Instagram => "instagram",
            SharePlatform::Twitter => "twitter",
            SharePlatform::Facebook => "facebook",
            SharePlatform::YouTube => "youtube",
            SharePlatform::TikTok => "tiktok",
            SharePlatform::LinkedIn => "linkedin",
            SharePlatform::WhatsApp => "whatsapp",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SharePlatform::Instagram => "Instagram",
            SharePlatform::Twitter => "Twitter",
            SharePlatform::Facebook => "Facebook",
            SharePlatform::YouTube => "YouTube",
            SharePlatform::TikTok => "TikTok",
            SharePlatform::LinkedIn => "LinkedIn",
            SharePlatform::WhatsApp => "WhatsApp",
        }
    }
}

impl fmt::Display for SharePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SharePlatform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        SharePlatform::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::Validation(format!("unknown share platform {s:?}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareIntent {
    /// Open this link in a browser
    Url(String),
    /// Show this to the user; the platform has no web intent
    Message(String),
}

/// Caption followed by the hashtags, or the default blurb.
pub fn share_text(short: Option<&Short>) -> String {
    match short {
        Some(short) => format!("{}\n\n{}", short.caption, short.hashtags.join(" ")),
        None => DEFAULT_SHARE_TEXT.to_string(),
    }
}

/// `page_url` is the address being shared alongside the text (Facebook, LinkedIn).
pub fn share_intent(platform: SharePlatform, short: Option<&Short>, page_url: &str) -> ShareIntent {
    let text = share_text(short);
    let text = encode(&text);
    let page = encode(page_url);

    match platform {
        SharePlatform::Twitter => ShareIntent::Url(format!("https://twitter.com/intent/tweet?text={text}")),
        SharePlatform::Facebook => ShareIntent::Url(format!(
            "https://www.facebook.com/sharer/sharer.php?u={page}&quote={text}"
        )),
        SharePlatform::LinkedIn => {
            ShareIntent::Url(format!("https://www.linkedin.com/sharing/share-offsite/?url={page}"))
        }
        SharePlatform::WhatsApp => ShareIntent::Url(format!("https://wa.me/?text={text}")),
        SharePlatform::Instagram | SharePlatform::TikTok => ShareIntent::Message(format!(
            "{} sharing would open the app with pre-filled content",
            platform.label()
        )),
        SharePlatform::YouTube => ShareIntent::Message(format!(
            "{} sharing would open the platform with pre-filled content",
            platform.label()
        )),
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}
