//! Remote store speaking the PostgREST `forms` resource convention.

use async_trait::async_trait;
use reqwest::{header, Response};
use serde_json::Value;

use super::FormStore;
use crate::config::RemoteCredentials;
use crate::errors::AppError;
use crate::models::{sort_by_updated_desc, FormSchema};

/// REST path of the forms resource under the project URL.
const FORMS_PATH: &str = "/rest/v1/forms";

/// Upsert by primary key and echo the stored row back.
const UPSERT_PREFERENCE: &str = "resolution=merge-duplicates,return=representation";

pub struct RemoteFormStore {
    client: reqwest::Client,
    credentials: RemoteCredentials,
}

impl RemoteFormStore {
    pub fn new(client: reqwest::Client, credentials: RemoteCredentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.credentials.base_url, FORMS_PATH)
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.endpoint())
            .header("apikey", &self.credentials.key)
            .bearer_auth(&self.credentials.key)
    }
}

/// Turn a non-success response into a backend error carrying the response text.
async fn check(response: Response, operation: &str) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(%status, "Remote {} failed: {}", operation, body);
    let message = if body.trim().is_empty() {
        format!("Remote {} failed with status {}", operation, status.as_u16())
    } else {
        format!("Remote {} failed: {}", operation, body.trim())
    };
    Err(AppError::Backend {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl FormStore for RemoteFormStore {
    fn backend(&self) -> &'static str {
        "remote"
    }

    async fn list(&self) -> Result<Vec<FormSchema>, AppError> {
        let response = self
            .request(reqwest::Method::GET)
            .query(&[("select", "*")])
            .send()
            .await?;
        let response = check(response, "list").await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        let entries = match serde_json::from_str::<Value>(&body) {
            Ok(Value::Array(entries)) => entries,
            Ok(Value::Null) => Vec::new(),
            Ok(_) | Err(_) => {
                return Err(AppError::Backend {
                    status,
                    message: "Remote list returned an unexpected body".to_string(),
                })
            }
        };

        let total = entries.len();
        let mut forms: Vec<FormSchema> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(form) => Some(form),
                Err(e) => {
                    tracing::warn!("Skipping malformed remote form record: {}", e);
                    None
                }
            })
            .collect();
        if forms.len() != total {
            tracing::warn!("Skipped {} of {} remote form record(s)", total - forms.len(), total);
        }
        sort_by_updated_desc(&mut forms);
        Ok(forms)
    }

    async fn upsert(&self, form: &FormSchema) -> Result<FormSchema, AppError> {
        let response = self
            .request(reqwest::Method::POST)
            .header("Prefer", UPSERT_PREFERENCE)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&[form])
            .send()
            .await?;
        let response = check(response, "upsert").await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(form.clone());
        }
        let stored: Vec<FormSchema> = serde_json::from_str(&body).map_err(|e| {
            AppError::Backend {
                status,
                message: format!("Remote upsert returned an unexpected body: {}", e),
            }
        })?;

        tracing::debug!(id = %form.id, "Saved form remotely");
        Ok(stored.into_iter().next().unwrap_or_else(|| form.clone()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let filter = format!("eq.{}", id);
        let response = self
            .request(reqwest::Method::DELETE)
            .query(&[("id", filter.as_str())])
            .send()
            .await?;
        check(response, "delete").await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fake::{FakeRemote, API_KEY};
    use super::*;
    use crate::models::create_field;
    use chrono::{Duration, Utc};

    fn store(base_url: String, key: &str) -> RemoteFormStore {
        RemoteFormStore::new(
            reqwest::Client::new(),
            RemoteCredentials {
                base_url,
                key: key.to_string(),
            },
        )
    }

    fn form(id: &str, name: &str) -> FormSchema {
        FormSchema {
            id: id.to_string(),
            name: name.to_string(),
            fields: vec![create_field("email"), create_field("select")],
            updated_at: Some(Utc::now() - Duration::days(1)),
        }
    }

    #[tokio::test]
    async fn test_round_trip_uses_server_timestamp() {
        let fake = FakeRemote::default();
        let store = store(fake.spawn().await, API_KEY);
        let saved = form("a", "Contact");

        let stored = store.upsert(&saved).await.unwrap();
        assert!(stored.updated_at > saved.updated_at);

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, saved.id);
        assert_eq!(listed[0].name, saved.name);
        assert_eq!(listed[0].fields, saved.fields);
    }

    #[tokio::test]
    async fn test_list_sorted_client_side() {
        let fake = FakeRemote::default();
        let store = store(fake.spawn().await, API_KEY);
        store.upsert(&form("a", "Older")).await.unwrap();
        store.upsert(&form("b", "Newer")).await.unwrap();

        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, ["Newer", "Older"]);
    }

    #[tokio::test]
    async fn test_delete_filters_by_id() {
        let fake = FakeRemote::default();
        let store = store(fake.spawn().await, API_KEY);
        store.upsert(&form("a", "A")).await.unwrap();
        store.upsert(&form("b", "B")).await.unwrap();

        store.delete("a").await.unwrap();
        store.delete("does-not-exist").await.unwrap();

        let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, ["b"]);
    }

    #[tokio::test]
    async fn test_http_error_carries_body() {
        let fake = FakeRemote::default();
        let store = store(fake.spawn().await, "wrong-key");

        let err = store.list().await.unwrap_err();
        match err {
            AppError::Backend { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("Invalid API key"));
            }
            other => panic!("expected backend error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store = store(format!("http://{}", addr), API_KEY);
        assert!(matches!(
            store.delete("x").await,
            Err(AppError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_list_keeps_well_formed_rows() {
        let fake = FakeRemote::default();
        *fake.list_body.lock().await = Some(serde_json::json!([
            {"id": "a", "name": "Current", "fields": [], "updated_at": "2024-05-01T10:00:00+00:00"},
            {"id": "b", "name": "Legacy", "fields": null, "updated_at": null},
            {"name": "No id"}
        ]));
        let store = store(fake.spawn().await, API_KEY);

        let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[tokio::test]
    async fn test_undecodable_list_is_backend_error() {
        let fake = FakeRemote::default();
        *fake.list_body.lock().await = Some(serde_json::json!({"message": "not a list"}));
        let store = store(fake.spawn().await, API_KEY);

        assert!(matches!(
            store.list().await,
            Err(AppError::Backend { status: 200, .. })
        ));
    }

    #[tokio::test]
    async fn test_unexpected_upsert_body_keeps_status() {
        let fake = FakeRemote::default();
        *fake.upsert_body.lock().await = Some(serde_json::json!({"ok": true}));
        let store = store(fake.spawn().await, API_KEY);

        match store.upsert(&form("a", "A")).await {
            Err(AppError::Backend { status, message }) => {
                assert_eq!(status, 201);
                assert!(message.contains("unexpected body"));
            }
            other => panic!("expected backend error, got {:?}", other),
        }
    }
}
