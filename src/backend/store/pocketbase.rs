/**
 * PocketBase Record Store
 *
 * reqwest-backed client for the PocketBase REST API. The adapter owns the
 * transport details only: URL building, the `Authorization` header, JSON
 * decoding and the mapping of error responses into `StoreError`.
 *
 * # Endpoints
 *
 * - `GET    /api/collections/{c}/records`              - list (first item)
 * - `POST   /api/collections/{c}/records`              - create
 * - `PATCH  /api/collections/{c}/records/{id}`         - update
 * - `POST   /api/collections/{c}/auth-with-password`   - password exchange
 * - `POST   /api/admins/auth-with-password`            - legacy elevated login
 * - `GET/POST/PATCH /api/collections[/{name}]`         - schema management
 *
 * # Error Bodies
 *
 * PocketBase answers failures with `{ "status", "message", "data" }` where
 * `data` maps field names to `{ "code", "message" }`. A uniqueness failure
 * carries the `validation_not_unique` code.
 */
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{
    Access, AuthSession, CollectionInfo, CollectionRules, CollectionSchema, Filter, RecordStore,
    StoreError,
};
use crate::shared::Record;

const NOT_UNIQUE_CODE: &str = "validation_not_unique";
const DUPLICATE_HINTS: [&str; 3] = ["already exists", "unique", "taken"];

/// PocketBase list response (only the part we read)
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    items: Vec<Record>,
}

/// PocketBase error response
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Value,
}

/// Record store backed by a remote PocketBase instance
#[derive(Debug, Clone)]
pub struct PocketBaseStore {
    client: Client,
    base: Url,
}

impl PocketBaseStore {
    /// Build a client with an explicit request timeout
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base))
    }

    /// Build around an existing reqwest client
    pub fn with_client(client: Client, mut base: Url) -> Self {
        // Url::join replaces the last segment unless the path ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { client, base }
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, StoreError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| StoreError::transport(format!("invalid backend URL {path}: {e}")))?;
        Ok(self.client.request(method, url))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        access: Access<'_>,
        intent: Intent,
    ) -> Result<T, StoreError> {
        let request = match access {
            Access::Anonymous => request,
            Access::Token(token) => request.header(AUTHORIZATION, token),
        };

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;

        if !status.is_success() {
            let error = map_status_error(status, body.as_ref(), intent);
            tracing::debug!(status = status.as_u16(), error = %error, "PocketBase request failed");
            return Err(error);
        }

        serde_json::from_slice(body.as_ref()).map_err(|e| StoreError::Upstream {
            status: status.as_u16(),
            message: format!("invalid PocketBase payload: {e}"),
        })
    }
}

#[async_trait]
impl RecordStore for PocketBaseStore {
    fn name(&self) -> &'static str {
        "pocketbase"
    }

    async fn first_list_item(
        &self,
        collection: &str,
        filter: &Filter,
        access: Access<'_>,
    ) -> Result<Record, StoreError> {
        let expression = filter.render();
        tracing::debug!(collection, filter = %expression, "PocketBase first list item");

        let request = self
            .request(Method::GET, &format!("api/collections/{collection}/records"))?
            .query(&[
                ("page", "1"),
                ("perPage", "1"),
                ("skipTotal", "1"),
                ("filter", expression.as_str()),
            ]);

        let list: ListResponse = self.send(request, access, Intent::Read).await?;
        list.items
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found("The requested resource wasn't found."))
    }

    async fn create_record(
        &self,
        collection: &str,
        body: &Value,
        access: Access<'_>,
    ) -> Result<Record, StoreError> {
        let request = self
            .request(Method::POST, &format!("api/collections/{collection}/records"))?
            .json(body);
        self.send(request, access, Intent::Write).await
    }

    async fn update_record(
        &self,
        collection: &str,
        id: &str,
        body: &Value,
        access: Access<'_>,
    ) -> Result<Record, StoreError> {
        let request = self
            .request(
                Method::PATCH,
                &format!("api/collections/{collection}/records/{id}"),
            )?
            .json(body);
        self.send(request, access, Intent::Write).await
    }

    async fn auth_with_password(
        &self,
        collection: &str,
        identity: &str,
        password: &str,
    ) -> Result<AuthSession, StoreError> {
        let request = self
            .request(
                Method::POST,
                &format!("api/collections/{collection}/auth-with-password"),
            )?
            .json(&json!({ "identity": identity, "password": password }));
        self.send(request, Access::Anonymous, Intent::Read).await
    }

    async fn legacy_admin_auth(
        &self,
        identity: &str,
        password: &str,
    ) -> Result<AuthSession, StoreError> {
        let request = self
            .request(Method::POST, "api/admins/auth-with-password")?
            .json(&json!({ "identity": identity, "password": password }));
        self.send(request, Access::Anonymous, Intent::Read).await
    }

    async fn find_collection(
        &self,
        name: &str,
        access: Access<'_>,
    ) -> Result<Option<CollectionInfo>, StoreError> {
        let request = self.request(Method::GET, &format!("api/collections/{name}"))?;
        match self.send(request, access, Intent::Read).await {
            Ok(info) => Ok(Some(info)),
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_collection(
        &self,
        schema: &CollectionSchema,
        access: Access<'_>,
    ) -> Result<CollectionInfo, StoreError> {
        let request = self.request(Method::POST, "api/collections")?.json(schema);
        self.send(request, access, Intent::Write).await
    }

    async fn update_collection_rules(
        &self,
        id: &str,
        rules: &CollectionRules,
        access: Access<'_>,
    ) -> Result<CollectionInfo, StoreError> {
        let request = self
            .request(Method::PATCH, &format!("api/collections/{id}"))?
            .json(rules);
        self.send(request, access, Intent::Write).await
    }
}

fn map_transport_error(error: reqwest::Error) -> StoreError {
    if error.is_timeout() {
        StoreError::transport(format!("PocketBase request timed out: {error}"))
    } else {
        StoreError::transport(error.to_string())
    }
}

/// Whether a request reads or writes
///
/// Only writes can fail on a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Read,
    Write,
}

fn map_status_error(status: StatusCode, body: &[u8], intent: Intent) -> StoreError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let message = if parsed.message.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        parsed.message.clone()
    };

    match status {
        StatusCode::NOT_FOUND => StoreError::not_found(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            StoreError::forbidden(status.as_u16(), message)
        }
        StatusCode::BAD_REQUEST => match intent {
            Intent::Write => match duplicate_message(&parsed) {
                Some(detail) => StoreError::duplicate(detail),
                None => StoreError::invalid(message),
            },
            Intent::Read => StoreError::invalid(message),
        },
        _ => StoreError::Upstream {
            status: status.as_u16(),
            message,
        },
    }
}

/// Detect a uniqueness failure in a 400 body
///
/// Prefers the structured field code; bodies without field codes fall back to
/// the human-readable wording older servers use.
fn duplicate_message(body: &ErrorBody) -> Option<String> {
    if let Value::Object(fields) = &body.data {
        for (field, detail) in fields {
            if detail.get("code").and_then(Value::as_str) == Some(NOT_UNIQUE_CODE) {
                let reason = detail
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("Value must be unique.");
                return Some(format!("{field}: {reason}"));
            }
        }
        if fields.values().any(|d| d.get("code").is_some()) {
            return None;
        }
    }

    let haystack = format!("{} {}", body.message, body.data).to_lowercase();
    DUPLICATE_HINTS
        .iter()
        .any(|hint| haystack.contains(hint))
        .then(|| body.message.clone())
}
