use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;

use super::{EntityPath, KonnectSdk, ListFilter, RemoteEntity, SdkError};

/// HTTP client for the Konnect API.
#[derive(Debug, Clone)]
pub struct KonnectClient {
    base_url: String,
    http: HttpClient,
    token: String,
    organization_id: Arc<OnceCell<String>>,
}

#[derive(Deserialize)]
struct Page {
    #[serde(default)]
    data: Vec<RemoteEntity>,
}

#[derive(Deserialize)]
struct Organization {
    id: String,
}

impl KonnectClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SdkError> {
        let base_url = base_url.into();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(SdkError::Transport(format!(
                "server URL must start with http:// or https://, got: {base_url}"
            )));
        }

        let http = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            token: token.into(),
            organization_id: Arc::new(OnceCell::new()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.token)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, SdkError> {
        let response = self.with_auth(builder).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(SdkError::from_status(status.as_u16(), body))
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, SdkError> {
        Ok(self.send(builder).await?.json::<T>().await?)
    }
}

#[async_trait]
impl KonnectSdk for KonnectClient {
    async fn create(&self, path: &EntityPath, body: Value) -> Result<RemoteEntity, SdkError> {
        let url = self.url(&path.collection_path());
        debug!(%url, "creating entity");
        self.json(self.http.post(&url).json(&body)).await
    }

    async fn upsert(
        &self,
        path: &EntityPath,
        id: &str,
        body: Value,
    ) -> Result<RemoteEntity, SdkError> {
        let url = self.url(&path.entity_path(id));
        debug!(%url, "updating entity");
        // control planes only support partial updates
        let builder = match path {
            EntityPath::Global { .. } => self.http.patch(&url),
            _ => self.http.put(&url),
        };
        self.json(builder.json(&body)).await
    }

    async fn delete(&self, path: &EntityPath, id: &str) -> Result<(), SdkError> {
        let url = self.url(&path.entity_path(id));
        debug!(%url, "deleting entity");
        self.send(self.http.delete(&url)).await.map(|_| ())
    }

    async fn list(
        &self,
        path: &EntityPath,
        filter: &ListFilter,
    ) -> Result<Vec<RemoteEntity>, SdkError> {
        let url = self.url(&path.collection_path());
        let (key, value) = filter.query();
        let page: Page = self.json(self.http.get(&url).query(&[(key, value)])).await?;
        Ok(page.data)
    }

    fn server_url(&self) -> String {
        self.base_url.clone()
    }

    async fn organization_id(&self) -> Result<String, SdkError> {
        let id = self
            .organization_id
            .get_or_try_init(|| async {
                let url = self.url("/v3/organizations/me");
                let org: Organization = self.json(self.http.get(&url)).await?;
                Ok::<_, SdkError>(org.id)
            })
            .await?;
        Ok(id.clone())
    }
}
