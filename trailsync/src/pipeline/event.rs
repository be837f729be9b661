//! Inbound publish events and publisher authorization.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use super::error::PipelineError;
use crate::client::{Collaborator, ContentRepository};
use crate::model::UserKind;

/// A record was published in the content repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishEvent {
    /// Id of the published record
    pub id: String,
    /// Id of the user who published it, absent for API-driven publishes
    pub published_by: Option<String>,
}

/// Malformed webhook payload.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("invalid webhook payload: {0}")]
    Invalid(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct WebhookPayload {
    data: WebhookRecord,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookRecord {
    id: String,
    #[serde(default)]
    published_by: Option<Reference>,
}

#[derive(Deserialize)]
struct Reference {
    id: String,
}

impl PublishEvent {
    pub fn new(id: impl Into<String>, published_by: Option<String>) -> Self {
        Self {
            id: id.into(),
            published_by,
        }
    }

    /// Parses a content repository webhook body `{ data: { id, publishedBy: { id } } }`.
    pub fn from_webhook(body: &str) -> Result<Self, EventError> {
        let payload: WebhookPayload = serde_json::from_str(body)?;
        Ok(Self {
            id: payload.data.id,
            published_by: payload.data.published_by.map(|user| user.id),
        })
    }
}

/// Why an event was deliberately not processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The event names no publishing user
    NoPublisher,
    /// The publisher is not a project member
    NotMember(UserKind),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoPublisher => write!(f, "event has no publishing user"),
            SkipReason::NotMember(kind) => write!(f, "publisher is not a member ({:?})", kind),
        }
    }
}

/// Resolves the publisher and decides whether the event may be processed.
///
/// Returns `Ok(Some(reason))` when processing must be skipped. Only a
/// member-kind user is allowed through.
pub async fn authorize<R: ContentRepository>(
    content: &R,
    published_by: Option<&str>,
) -> Result<Option<SkipReason>, PipelineError> {
    let Some(user_id) = published_by else {
        info!("Skipping event without publisher");
        return Ok(Some(SkipReason::NoPublisher));
    };

    let user = content
        .get_user(user_id)
        .await
        .map_err(|e| PipelineError::remote(Collaborator::ContentRepository, "get_user", e))?;
    if !user.is_member() {
        info!(user = user_id, kind = ?user.kind, "Skipping event from non-member");
        return Ok(Some(SkipReason::NotMember(user.kind)));
    }

    debug!(user = user_id, "Publisher authorized");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fakes::{ContentCall, FakeContentRepository};

    #[test]
    fn test_from_webhook() {
        let event = PublishEvent::from_webhook(
            r#"{ "operation": "publish", "data": { "id": "c1", "publishedBy": { "id": "u1" }, "stage": "PUBLISHED" } }"#,
        )
        .unwrap();
        assert_eq!(event, PublishEvent::new("c1", Some("u1".to_string())));
    }

    #[test]
    fn test_from_webhook_without_publisher() {
        let event =
            PublishEvent::from_webhook(r#"{ "data": { "id": "c1", "publishedBy": null } }"#).unwrap();
        assert_eq!(event.published_by, None);
    }

    #[test]
    fn test_from_webhook_rejects_missing_id() {
        assert!(PublishEvent::from_webhook(r#"{ "data": {} }"#).is_err());
    }

    #[tokio::test]
    async fn test_no_publisher_skips_without_remote_calls() {
        let content = FakeContentRepository::new();

        let skip = authorize(&content, None).await.unwrap();

        assert_eq!(skip, Some(SkipReason::NoPublisher));
        assert!(content.calls().is_empty());
    }

    #[tokio::test]
    async fn test_only_members_pass() {
        let content = FakeContentRepository::new()
            .with_user("member", UserKind::Member)
            .with_user("token", UserKind::Pat);

        assert_eq!(authorize(&content, Some("member")).await.unwrap(), None);
        assert_eq!(
            authorize(&content, Some("token")).await.unwrap(),
            Some(SkipReason::NotMember(UserKind::Pat))
        );
        assert_eq!(
            content.calls(),
            vec![
                ContentCall::GetUser("member".into()),
                ContentCall::GetUser("token".into())
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_user_is_a_remote_failure() {
        let content = FakeContentRepository::new();

        let err = authorize(&content, Some("ghost")).await.unwrap_err();
        assert_eq!(err.collaborator(), Some(Collaborator::ContentRepository));
    }
}
