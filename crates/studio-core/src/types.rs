//! Domain types shared by the matcher and its callers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub type RecordId = String;

/// Declares a closed label enum: serde, `Display` and `FromStr` all use the
/// label string, and `ALL` lists the variants in their canonical order.
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( #[serde(rename = $label)] $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().eq_ignore_ascii_case(s))
                    .ok_or_else(|| Error::UnknownLabel { kind: $kind, value: s.to_string() })
            }
        }
    };
}

labeled_enum! {
    /// Historical period used to classify records and queries.
    Dynasty, "dynasty" {
        PreQin => "先秦",
        QinHan => "秦汉",
        WeiJinNanbei => "魏晋南北朝",
        SuiTang => "隋唐",
        SongYuan => "宋元",
        MingQing => "明清",
    }
}

labeled_enum! {
    /// Thematic similarity dimension.
    Dimension, "dimension" {
        Power => "权力",
        Fiscal => "财政",
        War => "战争",
        Diplomacy => "外交",
        Livelihood => "民生",
        PublicOpinion => "舆论",
        Institutions => "制度",
        Technology => "技术",
    }
}

labeled_enum! {
    SourceType, "source type" {
        HistoricalSource => "史料",
        Research => "研究",
        Interpretation => "解读",
        News => "新闻",
    }
}

labeled_enum! {
    Credibility, "credibility" {
        High => "高",
        Medium => "中",
        Low => "低",
    }
}

/// Platform a hot topic was collected from. Serialized as lowercase ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Weibo,
    Douyin,
    Wechat,
    Xiaohongshu,
    Bilibili,
}

impl Platform {
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Weibo => "微博",
            Platform::Douyin => "抖音",
            Platform::Wechat => "微信",
            Platform::Xiaohongshu => "小红书",
            Platform::Bilibili => "B站",
        }
    }

    /// Infer the platform from a share URL's host. Unparseable URLs and
    /// unknown hosts yield `None`.
    pub fn from_url(raw: &str) -> Option<Self> {
        let parsed = url::Url::parse(raw.trim()).ok()?;
        let host = parsed.host_str()?.to_lowercase();
        if host.contains("weibo.com") {
            Some(Platform::Weibo)
        } else if host.contains("douyin.com") {
            Some(Platform::Douyin)
        } else if host.contains("mp.weixin.qq.com") {
            Some(Platform::Wechat)
        } else if host.contains("xiaohongshu.com") || host.contains("xhslink.com") {
            Some(Platform::Xiaohongshu)
        } else if host.contains("bilibili.com") {
            Some(Platform::Bilibili)
        } else {
            None
        }
    }
}

/// Bibliographic pointer into a classical work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub work: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
}

/// A curated reference record in the user's library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: RecordId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<Citation>,
    pub source_type: SourceType,
    pub credibility: Credibility,
    #[serde(default)]
    pub dynasties: Vec<Dynasty>,
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Material {
    /// A bare historical-source record of medium credibility.
    pub fn new(id: impl Into<RecordId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: None,
            citation: None,
            source_type: SourceType::HistoricalSource,
            credibility: Credibility::Medium,
            dynasties: Vec::new(),
            people: Vec::new(),
            events: Vec::new(),
            dimensions: Vec::new(),
            excerpt: None,
            notes: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSource {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Mapping from a hot topic to an analogous historical event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareCard {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<RecordId>,
    pub topic_title: String,
    pub event_title: String,
    #[serde(default)]
    pub dynasties: Vec<Dynasty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_conflict: Option<String>,
    #[serde(default)]
    pub key_people: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controversies: Option<String>,
    #[serde(default)]
    pub sources: Vec<CardSource>,
    pub created_at: DateTime<Utc>,
}

impl CompareCard {
    pub fn new(
        id: impl Into<RecordId>,
        topic_title: impl Into<String>,
        event_title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            topic_id: None,
            topic_title: topic_title.into(),
            event_title: event_title.into(),
            dynasties: Vec::new(),
            timeline: None,
            core_conflict: None,
            key_people: Vec::new(),
            outcome: None,
            controversies: None,
            sources: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// A trending item from an external platform. Only `title`, `summary` and
/// `keywords` take part in matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotTopic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl HotTopic {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    /// Explicit platform, else the one inferred from `url`.
    pub fn platform(&self) -> Option<Platform> {
        self.platform
            .or_else(|| self.url.as_deref().and_then(Platform::from_url))
    }
}

/// Input to the matcher: free text or a structured hot topic.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Text(String),
    Topic(HotTopic),
}

impl From<&str> for Query {
    fn from(s: &str) -> Self {
        Query::Text(s.to_string())
    }
}

impl From<String> for Query {
    fn from(s: String) -> Self {
        Query::Text(s)
    }
}

impl From<HotTopic> for Query {
    fn from(topic: HotTopic) -> Self {
        Query::Topic(topic)
    }
}

/// Why a record matched: the query tokens found in its text plus the
/// dimensions and eras it shares with the query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchReason {
    pub tokens: Vec<String>,
    pub dimensions: Vec<Dimension>,
    pub dynasties: Vec<Dynasty>,
}

/// A ranked candidate. `record` borrows the caller's record; `score` is
/// positive and rounded to one decimal.
#[derive(Debug, Clone, Serialize)]
pub struct Match<'a, R> {
    pub record: &'a R,
    pub score: f64,
    pub reason: MatchReason,
}

pub type MaterialMatch<'a> = Match<'a, Material>;
pub type CompareMatch<'a> = Match<'a, CompareCard>;
