//! Article entity and related types

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Display format for article timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Publication status of an article
///
/// Stored as an integer code. Codes other than 0 and 1, and a missing code,
/// map to `Unknown` and keep the raw value so it survives a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum ArticleStatus {
    Draft,
    #[default]
    Published,
    Unknown(Option<i64>),
}

impl ArticleStatus {
    pub const DRAFT_CODE: i64 = 0;
    pub const PUBLISHED_CODE: i64 = 1;

    /// Map a stored code to a status
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(Self::DRAFT_CODE) => Self::Draft,
            Some(Self::PUBLISHED_CODE) => Self::Published,
            other => Self::Unknown(other),
        }
    }

    /// The stored code for this status
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Draft => Some(Self::DRAFT_CODE),
            Self::Published => Some(Self::PUBLISHED_CODE),
            Self::Unknown(code) => *code,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Published => "Published",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Parse a status name (`draft`, `published`) or a numeric code
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            _ => s.parse::<i64>().ok().map(|code| Self::from_code(Some(code))),
        }
    }
}

impl From<Option<i64>> for ArticleStatus {
    fn from(code: Option<i64>) -> Self {
        Self::from_code(code)
    }
}

impl From<ArticleStatus> for Option<i64> {
    fn from(status: ArticleStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A stored article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub status: ArticleStatus,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: NaiveDateTime,
}

/// Input for creating an article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub status: Option<ArticleStatus>,
    #[serde(default, with = "optional_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "optional_timestamp")]
    pub updated_at: Option<NaiveDateTime>,
}

impl NewArticle {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: ArticleStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_updated_at(mut self, updated_at: NaiveDateTime) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Reject blank title or content
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("Title must not be blank".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(Error::Validation("Content must not be blank".to_string()));
        }
        Ok(())
    }

    /// Resolve defaults ahead of persistence
    ///
    /// Without `created_at`, both timestamps become `now`. With `created_at`,
    /// `updated_at` mirrors it.
    pub fn prepare(self, now: NaiveDateTime) -> PreparedArticle {
        let (created_at, updated_at) = match self.created_at {
            Some(created_at) => (created_at, created_at),
            None => (now, now),
        };
        PreparedArticle {
            title: self.title,
            content: self.content,
            status: self.status.unwrap_or_default(),
            created_at,
            updated_at,
        }
    }
}

/// An article ready to be inserted, with every default resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedArticle {
    pub title: String,
    pub content: String,
    pub status: ArticleStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PreparedArticle {
    /// Attach the id assigned by the store
    pub fn into_article(self, id: i64) -> Article {
        Article {
            id,
            title: self.title,
            content: self.content,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Partial update of an article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub status: Option<ArticleStatus>,
}

impl ArticleUpdate {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_status(mut self, status: ArticleStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether the update changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.status.is_none()
    }

    /// Reject empty updates and blank replacement fields
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::Validation("Update changes no fields".to_string()));
        }
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(Error::Validation("Title must not be blank".to_string()));
        }
        if self.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(Error::Validation("Content must not be blank".to_string()));
        }
        Ok(())
    }

    /// Apply the changes onto an existing article
    pub fn apply(&self, article: &mut Article, updated_at: NaiveDateTime) {
        if let Some(title) = &self.title {
            article.title = title.clone();
        }
        if let Some(content) = &self.content {
            article.content = content.clone();
        }
        if let Some(status) = self.status {
            article.status = status;
        }
        article.updated_at = updated_at;
    }
}

/// Article as presented to callers, with the derived status label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub status: ArticleStatus,
    pub status_name: &'static str,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: NaiveDateTime,
}

impl From<Article> for ArticleView {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            title: article.title,
            content: article.content,
            status_name: article.status.label(),
            status: article.status,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

/// Parse `yyyy-MM-dd HH:mm:ss`, ISO `yyyy-MM-ddTHH:mm:ss`, or a bare date (midnight)
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&value.format(super::TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

mod optional_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.collect_str(&v.format(super::TIMESTAMP_FORMAT)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) => super::parse_timestamp(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}"))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn test_status_codes_and_labels() {
        assert_eq!(ArticleStatus::from_code(Some(0)), ArticleStatus::Draft);
        assert_eq!(ArticleStatus::from_code(Some(1)), ArticleStatus::Published);
        assert_eq!(ArticleStatus::from_code(Some(7)), ArticleStatus::Unknown(Some(7)));
        assert_eq!(ArticleStatus::from_code(None), ArticleStatus::Unknown(None));

        assert_eq!(ArticleStatus::Draft.label(), "Draft");
        assert_eq!(ArticleStatus::Published.label(), "Published");
        assert_eq!(ArticleStatus::Unknown(Some(7)).label(), "Unknown");
        assert_eq!(ArticleStatus::Unknown(None).label(), "Unknown");

        assert_eq!(ArticleStatus::Unknown(Some(7)).code(), Some(7));
        assert_eq!(ArticleStatus::Unknown(None).code(), None);
        assert_eq!(ArticleStatus::default(), ArticleStatus::Published);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ArticleStatus::parse("Draft"), Some(ArticleStatus::Draft));
        assert_eq!(ArticleStatus::parse(" published "), Some(ArticleStatus::Published));
        assert_eq!(ArticleStatus::parse("0"), Some(ArticleStatus::Draft));
        assert_eq!(ArticleStatus::parse("9"), Some(ArticleStatus::Unknown(Some(9))));
        assert_eq!(ArticleStatus::parse("archived"), None);
    }

    #[test]
    fn test_status_serializes_as_code() {
        assert_eq!(serde_json::to_string(&ArticleStatus::Draft).unwrap(), "0");
        assert_eq!(serde_json::to_string(&ArticleStatus::Unknown(None)).unwrap(), "null");
        let parsed: ArticleStatus = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, ArticleStatus::Published);
    }

    #[test]
    fn test_prepare_without_timestamps_uses_now() {
        let now = ts("2025-10-08 12:00:00");
        let prepared = NewArticle::new("Title", "Body").prepare(now);
        assert_eq!(prepared.created_at, now);
        assert_eq!(prepared.updated_at, now);
        assert_eq!(prepared.status, ArticleStatus::Published);
    }

    #[test]
    fn test_prepare_mirrors_created_at() {
        let now = ts("2025-10-08 12:00:00");
        let created = ts("2024-01-01 08:30:00");
        let prepared = NewArticle::new("Title", "Body")
            .with_created_at(created)
            .with_updated_at(ts("2024-06-01 00:00:00"))
            .with_status(ArticleStatus::Draft)
            .prepare(now);
        assert_eq!(prepared.created_at, created);
        assert_eq!(prepared.updated_at, created);
        assert_eq!(prepared.status, ArticleStatus::Draft);

        let article = prepared.into_article(9);
        assert_eq!(article.id, 9);
        assert_eq!(article.title, "Title");
    }

    #[test]
    fn test_new_article_validation() {
        assert!(NewArticle::new("Title", "Body").validate().is_ok());
        assert!(matches!(
            NewArticle::new("  ", "Body").validate(),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            NewArticle::new("Title", "").validate(),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_update_validation_and_apply() {
        assert!(ArticleUpdate::default().validate().is_err());
        assert!(ArticleUpdate::default().with_title(" ").validate().is_err());

        let update = ArticleUpdate::default()
            .with_content("New body")
            .with_status(ArticleStatus::Draft);
        assert!(update.validate().is_ok());

        let mut article = NewArticle::new("Title", "Old body")
            .prepare(ts("2025-01-01 00:00:00"))
            .into_article(1);
        let later = ts("2025-02-01 00:00:00");
        update.apply(&mut article, later);

        assert_eq!(article.title, "Title");
        assert_eq!(article.content, "New body");
        assert_eq!(article.status, ArticleStatus::Draft);
        assert_eq!(article.updated_at, later);
        assert_eq!(article.created_at, ts("2025-01-01 00:00:00"));
    }

    #[test]
    fn test_view_json_shape() {
        let article = NewArticle::new("Hello", "World")
            .with_created_at(ts("2025-10-08 09:15:00"))
            .prepare(ts("2025-10-09 00:00:00"))
            .into_article(5);
        let json = serde_json::to_value(ArticleView::from(article)).unwrap();

        assert_eq!(json["id"], 5);
        assert_eq!(json["status"], 1);
        assert_eq!(json["statusName"], "Published");
        assert_eq!(json["createdAt"], "2025-10-08 09:15:00");
        assert_eq!(json["updatedAt"], "2025-10-08 09:15:00");
    }

    #[test]
    fn test_new_article_from_json_with_date_only() {
        let new: NewArticle = serde_json::from_str(
            r#"{"title":"My first post","content":"Testing upload","createdAt":"2025-10-08"}"#,
        )
        .unwrap();
        assert_eq!(new.created_at, Some(ts("2025-10-08 00:00:00")));
        assert_eq!(new.status, None);
        assert_eq!(new.updated_at, None);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2025-10-08 10:11:12").is_some());
        assert!(parse_timestamp("2025-10-08T10:11:12").is_some());
        assert!(parse_timestamp("2025-10-08").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
