use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use bistro_core::{DomainError, DomainResult, Entity, RecordId, UserId};

use crate::stream::Stream;

/// Submission form. `stream` arrives as text and is checked against [`Stream`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResource {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub stream: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewResource {
    id: RecordId,
    title: String,
    url: String,
    stream: Stream,
    created_at: DateTime<Utc>,
    added_by: Option<UserId>,
}

impl InterviewResource {
    pub fn create(
        id: RecordId,
        input: NewResource,
        added_by: Option<UserId>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let title = input.title.trim();
        let url = input.url.trim();
        let stream = input.stream.trim();
        if title.is_empty() || url.is_empty() || stream.is_empty() {
            return Err(DomainError::validation("title, url and stream are required"));
        }
        if !is_http_url(url) {
            return Err(DomainError::validation("url must start with http:// or https://"));
        }
        let stream = stream
            .parse::<Stream>()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        Ok(Self {
            id,
            title: title.to_string(),
            url: url.to_string(),
            stream,
            created_at,
            added_by,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn stream(&self) -> Stream {
        self.stream
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn added_by(&self) -> Option<UserId> {
        self.added_by
    }
}

impl Entity for InterviewResource {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn is_http_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, url: &str, stream: &str) -> NewResource {
        NewResource {
            title: title.to_string(),
            url: url.to_string(),
            stream: stream.to_string(),
        }
    }

    #[test]
    fn creates_with_trimmed_fields() {
        let by = UserId::new();
        let r = InterviewResource::create(
            RecordId::new(),
            input("  SQL window functions ", "https://example.com/sql", "SQL"),
            Some(by),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(r.title(), "SQL window functions");
        assert_eq!(r.stream(), Stream::Sql);
        assert_eq!(r.added_by(), Some(by));
    }

    #[test]
    fn all_fields_are_required() {
        for (t, u, s) in [
            ("", "https://a.io", "SQL"),
            ("T", "", "SQL"),
            ("T", "https://a.io", ""),
        ] {
            let err = InterviewResource::create(RecordId::new(), input(t, u, s), None, Utc::now())
                .unwrap_err();
            assert_eq!(err, DomainError::validation("title, url and stream are required"));
        }
    }

    #[test]
    fn url_must_be_http() {
        for bad in ["ftp://a.io", "example.com", "https://", "https://a b.io"] {
            assert!(
                InterviewResource::create(RecordId::new(), input("T", bad, "SQL"), None, Utc::now())
                    .is_err(),
                "{bad} should be rejected"
            );
        }
        assert!(
            InterviewResource::create(RecordId::new(), input("T", "http://a.io", "Other"), None, Utc::now())
                .is_ok()
        );
    }

    #[test]
    fn url_needs_a_host() {
        for bad in ["http://?q=1", "https://#frag", "https://:443/path", "mailto:someone@a.io"] {
            let err = InterviewResource::create(RecordId::new(), input("T", bad, "SQL"), None, Utc::now())
                .unwrap_err();
            assert_eq!(
                err,
                DomainError::validation("url must start with http:// or https://"),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn unknown_stream_is_a_validation_error() {
        let err = InterviewResource::create(
            RecordId::new(),
            input("T", "https://a.io", "Cobol"),
            None,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
