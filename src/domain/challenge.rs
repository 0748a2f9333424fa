//! Challenge model in its admin editing shape
//!
//! The canonical storage row lives in [`crate::adapter`]; this is the shape the
//! editor validates and mutates.

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Challenge identifier in the admin editing context
pub type ChallengeId = String;

/// A channel through which a participant can submit a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionChannel {
    Text,
    Image,
    Audio,
    Video,
    Shop,
}

impl SubmissionChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Shop => "shop",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "image" | "photo" => Some(Self::Image),
            "audio" => Some(Self::Audio),
            "video" => Some(Self::Video),
            "shop" => Some(Self::Shop),
            _ => None,
        }
    }

    /// All channels, in column order
    pub fn all() -> &'static [SubmissionChannel] {
        &[Self::Text, Self::Image, Self::Audio, Self::Video, Self::Shop]
    }
}

impl fmt::Display for SubmissionChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Points awarded per submission channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointSchedule {
    pub text: u32,
    pub image: u32,
    pub audio: u32,
    pub video: u32,
    pub shop: u32,
}

impl PointSchedule {
    /// The product's standard schedule
    pub const STANDARD: PointSchedule = PointSchedule {
        text: 1,
        image: 3,
        audio: 5,
        video: 10,
        shop: 5,
    };

    pub fn get(&self, channel: SubmissionChannel) -> u32 {
        match channel {
            SubmissionChannel::Text => self.text,
            SubmissionChannel::Image => self.image,
            SubmissionChannel::Audio => self.audio,
            SubmissionChannel::Video => self.video,
            SubmissionChannel::Shop => self.shop,
        }
    }

    pub fn set(&mut self, channel: SubmissionChannel, points: u32) {
        match channel {
            SubmissionChannel::Text => self.text = points,
            SubmissionChannel::Image => self.image = points,
            SubmissionChannel::Audio => self.audio = points,
            SubmissionChannel::Video => self.video = points,
            SubmissionChannel::Shop => self.shop = points,
        }
    }
}

impl Default for PointSchedule {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Which submission channels a challenge accepts
///
/// The shop channel is gated by the shop button, not by this map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionTypes {
    pub text: bool,
    pub image: bool,
    pub audio: bool,
    pub video: bool,
}

impl SubmissionTypes {
    pub fn is_enabled(&self, channel: SubmissionChannel) -> bool {
        match channel {
            SubmissionChannel::Text => self.text,
            SubmissionChannel::Image => self.image,
            SubmissionChannel::Audio => self.audio,
            SubmissionChannel::Video => self.video,
            SubmissionChannel::Shop => false,
        }
    }

    /// Channels that are switched on
    pub fn enabled(&self) -> Vec<SubmissionChannel> {
        SubmissionChannel::all()
            .iter()
            .copied()
            .filter(|c| self.is_enabled(*c))
            .collect()
    }
}

impl Default for SubmissionTypes {
    /// Everything except image
    fn default() -> Self {
        Self {
            text: true,
            image: false,
            audio: true,
            video: true,
        }
    }
}

/// Where the challenge's shop button leads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShopType {
    General,
    Product,
    #[default]
    None,
}

impl ShopType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Product => "product",
            Self::None => "none",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "general" => Some(Self::General),
            "product" => Some(Self::Product),
            "none" | "" => Some(Self::None),
            _ => None,
        }
    }
}

/// A single day's challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub title: String,
    /// Rich text, stored verbatim
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tip: String,
    /// 1-based position within the active set
    pub day_order: u32,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub points: PointSchedule,
    #[serde(default)]
    pub enabled_submission_types: SubmissionTypes,
    #[serde(default)]
    pub show_shop_button: bool,
    #[serde(default)]
    pub shop_type: ShopType,
    #[serde(default)]
    pub shop_product_id: Option<String>,
    #[serde(default)]
    pub shop_url: Option<String>,
    /// Subscription product that unlocks this challenge; absent means public
    #[serde(default)]
    pub subscription_product_id: Option<String>,
    #[serde(default)]
    pub associated_badges: BTreeSet<String>,
    #[serde(default)]
    pub associated_reactions: BTreeSet<String>,
    #[serde(default)]
    pub associated_parent_reactions: BTreeSet<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Challenge {
    /// Whether the shop button should actually be rendered
    pub fn shop_button_visible(&self) -> bool {
        self.show_shop_button && self.shop_type != ShopType::None
    }

    /// Points for a submission on `channel`, or `None` when the channel is gated off.
    ///
    /// The stored value is kept even when gated off.
    pub fn points_for(&self, channel: SubmissionChannel) -> Option<u32> {
        let applicable = match channel {
            SubmissionChannel::Shop => self.shop_button_visible(),
            other => self.enabled_submission_types.is_enabled(other),
        };
        applicable.then(|| self.points.get(channel))
    }

    /// Best reward a participant can earn on this challenge
    pub fn max_points(&self) -> u32 {
        SubmissionChannel::all()
            .iter()
            .filter_map(|c| self.points_for(*c))
            .max()
            .unwrap_or(0)
    }

    /// Public challenges need no subscription
    pub fn is_public(&self) -> bool {
        self.subscription_product_id
            .as_deref()
            .is_none_or(|id| id.trim().is_empty())
    }
}

static YOUTUBE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.|m\.)?(?:youtube\.com/(?:watch\?(?:.*&)?v=|embed/|shorts/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:[?&#].*)?$",
    )
    .expect("valid YouTube regex")
});

/// Extract the 11-character video id from a YouTube link
pub fn youtube_video_id(url: &str) -> Option<&str> {
    YOUTUBE_URL
        .captures(url.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
