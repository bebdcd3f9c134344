use std::time::Duration;

use futures_util::StreamExt;
use reports_logging::{report_debug, report_info};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::{
    Credentials, FailureKind, Registration, ReportRecord, RequestFailed, TenantRecord, UserRecord,
};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Report generation can take minutes; no overall timeout unless set.
    pub request_timeout: Option<Duration>,
    pub max_download_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5555".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            max_download_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Issues exactly one generation request per call. No retries.
#[async_trait::async_trait]
pub trait ReportClient: Send + Sync {
    async fn request_report(&self, tenant_id: &str) -> Result<ReportRecord, RequestFailed>;
}

#[async_trait::async_trait]
pub trait TenantDirectory: Send + Sync {
    async fn list_tenants(&self) -> Result<Vec<TenantRecord>, RequestFailed>;
}

#[async_trait::async_trait]
pub trait SessionApi: Send + Sync {
    /// `Ok(None)` when nobody is signed in.
    async fn current_user(&self) -> Result<Option<UserRecord>, RequestFailed>;
    async fn login(&self, credentials: &Credentials) -> Result<UserRecord, RequestFailed>;
    async fn register(&self, registration: &Registration) -> Result<UserRecord, RequestFailed>;
    async fn logout(&self) -> Result<(), RequestFailed>;
}

#[async_trait::async_trait]
pub trait ReportDownloader: Send + Sync {
    async fn fetch_report(&self, download: &str) -> Result<Vec<u8>, RequestFailed>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(serde::Serialize)]
struct GenerateRequest<'a> {
    domain: &'a str,
}

/// Backend client. One cookie store is shared by every call so the session
/// established by login travels with report requests.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    settings: ClientSettings,
    base: Url,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(settings: ClientSettings) -> Result<Self, RequestFailed> {
        let base = normalized_base(&settings.base_url)?;

        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| RequestFailed::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolves a reference handed out by the service (relative or absolute).
    pub fn resolve(&self, reference: &str) -> Result<Url, RequestFailed> {
        join(&self.base, reference)
    }

    fn endpoint(&self, path: &str) -> Result<Url, RequestFailed> {
        self.resolve(path.trim_start_matches('/'))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, RequestFailed>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_json(check_status(response).await?).await
    }
}

#[async_trait::async_trait]
impl ReportClient for HttpBackend {
    async fn request_report(&self, tenant_id: &str) -> Result<ReportRecord, RequestFailed> {
        report_debug!("POST generate-report domain={}", tenant_id);
        let record: ReportRecord = self
            .post_json("api/generate-report", &GenerateRequest { domain: tenant_id })
            .await?;
        report_info!("Report ready domain={} name={}", record.domain, record.name);
        Ok(record)
    }
}

#[async_trait::async_trait]
impl TenantDirectory for HttpBackend {
    async fn list_tenants(&self) -> Result<Vec<TenantRecord>, RequestFailed> {
        let url = self.endpoint("api/tenants")?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        decode_json(check_status(response).await?).await
    }
}

#[async_trait::async_trait]
impl SessionApi for HttpBackend {
    async fn current_user(&self) -> Result<Option<UserRecord>, RequestFailed> {
        let url = self.endpoint("api/me")?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        decode_json(check_status(response).await?).await.map(Some)
    }

    async fn login(&self, credentials: &Credentials) -> Result<UserRecord, RequestFailed> {
        self.post_json("api/login", credentials).await
    }

    async fn register(&self, registration: &Registration) -> Result<UserRecord, RequestFailed> {
        self.post_json("api/register", registration).await
    }

    async fn logout(&self) -> Result<(), RequestFailed> {
        let url = self.endpoint("api/logout")?;
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(response).await.map(|_| ())
    }
}

#[async_trait::async_trait]
impl ReportDownloader for HttpBackend {
    async fn fetch_report(&self, download: &str) -> Result<Vec<u8>, RequestFailed> {
        let url = self.resolve(download)?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let response = check_status(response).await?;

        let max_bytes = self.settings.max_download_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

/// Resolves `reference` the way a browser on `base_url` would.
pub fn resolve_reference(base_url: &str, reference: &str) -> Result<Url, RequestFailed> {
    join(&normalized_base(base_url)?, reference)
}

fn normalized_base(base_url: &str) -> Result<Url, RequestFailed> {
    let mut base = Url::parse(base_url)
        .map_err(|err| RequestFailed::new(FailureKind::InvalidUrl, err.to_string()))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

fn join(base: &Url, reference: &str) -> Result<Url, RequestFailed> {
    base.join(reference)
        .map_err(|err| RequestFailed::new(FailureKind::InvalidUrl, err.to_string()))
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RequestFailed> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    // The service reports failures as `{"error": "..."}` when it can.
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|body| body.error)
        .unwrap_or_else(|_| status.to_string());
    Err(RequestFailed::new(
        FailureKind::HttpStatus(status.as_u16()),
        message,
    ))
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RequestFailed> {
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body)
        .map_err(|err| RequestFailed::new(FailureKind::Decode, err.to_string()))
}

fn too_large(max_bytes: u64, actual: u64) -> RequestFailed {
    RequestFailed::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "report too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> RequestFailed {
    if err.is_timeout() {
        return RequestFailed::new(FailureKind::Timeout, err.to_string());
    }
    RequestFailed::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{resolve_reference, ClientSettings, HttpBackend};

    fn backend(base_url: &str) -> HttpBackend {
        HttpBackend::new(ClientSettings {
            base_url: base_url.to_string(),
            ..ClientSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn endpoints_keep_base_path_prefix() {
        let backend = backend("http://reports.local/app");
        assert_eq!(
            backend.endpoint("/api/tenants").unwrap().as_str(),
            "http://reports.local/app/api/tenants"
        );
    }

    #[test]
    fn absolute_path_references_resolve_against_host() {
        let backend = backend("http://reports.local/app/");
        assert_eq!(
            backend.resolve("/output/a.com.pdf").unwrap().as_str(),
            "http://reports.local/output/a.com.pdf"
        );
        assert_eq!(
            backend.resolve("https://cdn.local/a.pdf").unwrap().as_str(),
            "https://cdn.local/a.pdf"
        );
    }

    #[test]
    fn free_resolver_matches_backend() {
        assert_eq!(
            resolve_reference("http://localhost:5555", "/output/a.com.pdf")
                .unwrap()
                .as_str(),
            "http://localhost:5555/output/a.com.pdf"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = HttpBackend::new(ClientSettings {
            base_url: "not a url".to_string(),
            ..ClientSettings::default()
        })
        .unwrap_err();
        assert_eq!(err.kind, crate::FailureKind::InvalidUrl);
    }
}
