//! HTTP session store.
//!
//! Implements `SessionStore` against a remote form server:
//!
//! - `GET /forms`, `GET /form/{uuid}`, `POST /form`, `DELETE /form/{uuid}`
//!
//! A 404 maps to `StoreError::NotFound`; connection failures and any other
//! non-success status map to `StoreError::Transport`. Timeouts are left to the
//! client configuration.

use reqwest::{Client, Response, StatusCode, Url};

use intake_core::gateway::SessionStore;
use intake_types::answer::Answers;
use intake_types::error::StoreError;
use intake_types::form::{FormListItem, FormPayload, SaveFormRequest, SaveFormResponse};
use intake_types::session::{SessionId, SessionRecord};

pub struct HttpSessionStore {
    client: Client,
    base_url: Url,
}

impl HttpSessionStore {
    /// Create a store talking to the server at `base_url` (e.g. `http://localhost:3005`).
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StoreError::Transport(format!("invalid server URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Transport(format!("invalid server URL '{base_url}'")));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn transport(e: reqwest::Error) -> StoreError {
    StoreError::Transport(e.to_string())
}

/// Map non-success statuses; 404 is the only one with domain meaning.
fn check_status(response: Response) -> Result<Response, StoreError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(StoreError::NotFound),
        status => Err(StoreError::Transport(format!(
            "{} returned {status}",
            response.url()
        ))),
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    response
        .json::<T>()
        .await
        .map_err(|e| StoreError::Corrupt(format!("unexpected response body: {e}")))
}

impl SessionStore for HttpSessionStore {
    async fn list(&self) -> Result<Vec<SessionRecord>, StoreError> {
        let response = self
            .client
            .get(self.endpoint(&["forms"]))
            .send()
            .await
            .map_err(transport)?;
        let items: Vec<FormListItem> = decode(check_status(response)?).await?;
        Ok(items.into_iter().map(SessionRecord::from).collect())
    }

    async fn create_or_update(
        &self,
        id: Option<&SessionId>,
        answers: &Answers,
    ) -> Result<SessionId, StoreError> {
        let body = SaveFormRequest {
            uuid: id.cloned(),
            data: answers.clone(),
        };
        let response = self
            .client
            .post(self.endpoint(&["form"]))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let saved: SaveFormResponse = decode(check_status(response)?).await?;
        Ok(saved.uuid)
    }

    async fn fetch(&self, id: &SessionId) -> Result<SessionRecord, StoreError> {
        let response = self
            .client
            .get(self.endpoint(&["form", id.as_str()]))
            .send()
            .await
            .map_err(transport)?;
        let payload: FormPayload = decode(check_status(response)?).await?;
        Ok(SessionRecord {
            id: payload.uuid,
            answers: payload.data,
            updated_at: payload.updated_at,
        })
    }

    async fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.endpoint(&["form", id.as_str()]))
            .send()
            .await
            .map_err(transport)?;
        check_status(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_segments() {
        let store = HttpSessionStore::new("http://localhost:3005").unwrap();
        assert_eq!(store.endpoint(&["forms"]).as_str(), "http://localhost:3005/forms");
        assert_eq!(
            store.endpoint(&["form", "abc-123"]).as_str(),
            "http://localhost:3005/form/abc-123"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_and_encodes_ids() {
        let store = HttpSessionStore::new("http://example.com/intake/").unwrap();
        assert_eq!(
            store.endpoint(&["form", "a b/c"]).as_str(),
            "http://example.com/intake/form/a%20b%2Fc"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            HttpSessionStore::new("not a url"),
            Err(StoreError::Transport(_))
        ));
        assert!(HttpSessionStore::new("mailto:someone@example.com").is_err());
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_failure() {
        // Port 9 (discard) on localhost is not expected to run an HTTP server.
        let store = HttpSessionStore::new("http://127.0.0.1:9").unwrap();
        assert!(matches!(store.list().await, Err(StoreError::Transport(_))));
        assert!(matches!(
            store.fetch(&SessionId::from("abc-123")).await,
            Err(StoreError::Transport(_))
        ));
    }
}
