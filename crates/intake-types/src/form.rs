//! Wire shapes for the form HTTP contract.
//!
//! ```text
//! GET    /forms        -> [FormListItem]
//! GET    /form/{uuid}  -> FormPayload            (404 when unknown)
//! POST   /form         <- SaveFormRequest -> SaveFormResponse
//! DELETE /form/{uuid}  -> DeleteFormResponse     (404 when unknown)
//! ```
//!
//! Field names (`uuid`, `data`) are fixed by existing clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::answer::Answers;
use crate::session::{SessionId, SessionRecord};

/// One stored form as returned by `GET /form/{uuid}`.
///
/// `updated_at` is optional so servers that only send `{uuid, data}` still
/// parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormPayload {
    pub uuid: SessionId,
    pub data: Answers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Listing entry returned by `GET /forms`. Same optional timestamp as
/// [`FormPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormListItem {
    pub uuid: SessionId,
    pub data: Answers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /form`. A missing `uuid` creates a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFormRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<SessionId>,
    pub data: Answers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFormResponse {
    pub uuid: SessionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFormResponse {
    pub message: String,
}

impl From<SessionRecord> for FormPayload {
    fn from(record: SessionRecord) -> Self {
        Self {
            uuid: record.id,
            data: record.answers,
            updated_at: record.updated_at,
        }
    }
}

impl From<SessionRecord> for FormListItem {
    fn from(record: SessionRecord) -> Self {
        Self {
            uuid: record.id,
            data: record.answers,
            updated_at: record.updated_at,
        }
    }
}

impl From<FormListItem> for SessionRecord {
    fn from(item: FormListItem) -> Self {
        Self {
            id: item.uuid,
            answers: item.data,
            updated_at: item.updated_at,
        }
    }
}
