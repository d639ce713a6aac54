//! Backlog API connector.
//!
//! The connector is the single place where requests leave the crate. It
//! injects the API key into every query string, dispatches one of the HTTP
//! verbs, and turns whatever comes back into either a decoded JSON value,
//! a [`RawResponse`], or a [`BacklogError`].
//!
//! Only `get` and `get_file` reject non-200 statuses. The other verbs decode
//! whatever body the service returns, including error documents, and leave
//! status interpretation to the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use url::Url;

use crate::credential::Credential;
use crate::error::{BacklogError, Result};
use crate::params::{Headers, Multipart, Params, PartBody};
use crate::response::RawResponse;

/// Query parameter carrying the API key.
pub const API_KEY_PARAM: &str = "apiKey";

const USER_AGENT: &str = concat!("backlog-api/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(300);

/// Verb-oriented interface every resource client talks to.
///
/// `path` is relative to the API root (`issues`, `projects/DEMO/statuses/3`).
/// `form` becomes a URL-encoded body, `query` is appended to the URL and
/// `headers` are sent as given. Implementations add authentication; callers
/// never put credentials in any of these maps.
#[async_trait]
pub trait Connector: Send + Sync {
    /// GET and decode JSON. Fails on any status other than 200.
    async fn get(&self, path: &str, form: &Params, query: &Params, headers: &Headers)
        -> Result<Value>;

    /// POST a form and decode JSON. The status is not checked.
    async fn post(
        &self,
        path: &str,
        form: &Params,
        query: &Params,
        headers: &Headers,
    ) -> Result<Value>;

    /// PUT a form and decode JSON. The status is not checked.
    async fn put(&self, path: &str, form: &Params, query: &Params, headers: &Headers)
        -> Result<Value>;

    /// PATCH a form and decode JSON. The status is not checked.
    async fn patch(
        &self,
        path: &str,
        form: &Params,
        query: &Params,
        headers: &Headers,
    ) -> Result<Value>;

    /// DELETE (optionally with a form) and decode JSON. The status is not checked.
    async fn delete(
        &self,
        path: &str,
        form: &Params,
        query: &Params,
        headers: &Headers,
    ) -> Result<Value>;

    /// POST a multipart/form-data body and decode JSON. The status is not checked.
    async fn post_file(
        &self,
        path: &str,
        multipart: Multipart,
        query: &Params,
        headers: &Headers,
    ) -> Result<Value>;

    /// GET without decoding. Fails on any status other than 200.
    async fn get_file(
        &self,
        path: &str,
        form: &Params,
        query: &Params,
        headers: &Headers,
    ) -> Result<RawResponse>;
}

/// How the request body is encoded.
enum Body<'a> {
    Form(&'a Params),
    Multipart(Multipart),
    /// A file call without a body.
    Download,
}

impl Body<'_> {
    fn is_file_transfer(&self) -> bool {
        matches!(self, Body::Multipart(_) | Body::Download)
    }
}

/// Connector authenticating with an API key query parameter.
///
/// Cheap to clone; clones share the connection pool. Holds no per-call
/// state, so one instance can serve concurrent callers.
///
/// # Example
///
/// ```no_run
/// use backlog_api::{ApiKeyConnector, Connector, Credential, Params};
///
/// # async fn example() -> backlog_api::Result<()> {
/// let connector = ApiKeyConnector::new(Credential::new("my-space", "API-KEY"))?;
/// let projects = connector
///     .get("projects", &Params::new(), &Params::new(), &Params::new())
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiKeyConnector {
    http: Client,
    base_url: Arc<Url>,
    api_key: String,
}

impl std::fmt::Debug for ApiKeyConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyConnector")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiKeyConnector {
    /// Create a connector for the space described by `credential`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(credential: Credential) -> Result<Self> {
        let base_url = credential.base_url()?;
        Self::build(credential.api_key(), base_url)
    }

    /// Create a connector from `BACKLOG_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `BACKLOG_SPACE_ID` or `BACKLOG_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        Self::new(Credential::from_env()?)
    }

    /// Create a connector against an explicit API root.
    ///
    /// Useful for proxies and test servers. A trailing `/` is added if missing
    /// so relative paths stay under the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        Self::build(api_key, Url::parse(&base_url_str)?)
    }

    fn build(api_key: &str, base_url: Url) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(TIMEOUT)
            .build()
            .map_err(BacklogError::transport)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            api_key: api_key.to_string(),
        })
    }

    /// The API root all paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a relative path against the API root.
    ///
    /// The path is not escaped. A leading `/` is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// The API key first, then the caller's parameters in order.
    ///
    /// A caller-supplied `apiKey` never replaces the configured one.
    fn query_pairs<'a>(&'a self, query: &'a Params) -> Vec<(&'a str, &'a str)> {
        let mut pairs = Vec::with_capacity(query.len() + 1);
        pairs.push((API_KEY_PARAM, self.api_key.as_str()));
        for (key, value) in query.iter() {
            if key == API_KEY_PARAM {
                tracing::warn!("ignoring caller-supplied {API_KEY_PARAM} query parameter");
                continue;
            }
            pairs.push((key, value));
        }
        pairs
    }

    #[tracing::instrument(skip(self, body, query, headers))]
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Body<'_>>,
        query: &Params,
        headers: &Headers,
    ) -> Result<Response> {
        let url = self.endpoint(path)?;
        let file_transfer = body.as_ref().is_some_and(Body::is_file_transfer);

        let mut request = self
            .http
            .request(method, url)
            .query(&self.query_pairs(query));

        for (name, value) in headers.iter() {
            if file_transfer && name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()) {
                tracing::debug!(value, "dropping Content-Type override on file request");
                continue;
            }
            request = request.header(name, value);
        }

        // Headers first: the body encoder sets its own Content-Type.
        request = match body {
            Some(Body::Form(form)) if !form.is_empty() => request.form(form),
            Some(Body::Form(_) | Body::Download) | None => request,
            Some(Body::Multipart(parts)) => request.multipart(multipart_form(parts)?),
        };

        let response = Self::execute(request).await?;
        tracing::debug!(status = response.status().as_u16(), "response received");
        Ok(response)
    }

    async fn execute(request: RequestBuilder) -> Result<Response> {
        request.send().await.map_err(|err| {
            tracing::debug!(error = %err, "transport failure");
            BacklogError::transport(err)
        })
    }

    /// Verbs that decode JSON without checking the status.
    async fn send_form(
        &self,
        method: Method,
        path: &str,
        form: &Params,
        query: &Params,
        headers: &Headers,
    ) -> Result<Value> {
        let response = self
            .send(method, path, Some(Body::Form(form)), query, headers)
            .await?;
        decode_json(response).await
    }
}

#[async_trait]
impl Connector for ApiKeyConnector {
    async fn get(
        &self,
        path: &str,
        form: &Params,
        query: &Params,
        headers: &Headers,
    ) -> Result<Value> {
        let response = self
            .send(Method::GET, path, Some(Body::Form(form)), query, headers)
            .await?;
        decode_json(check_status(response)?).await
    }

    async fn post(
        &self,
        path: &str,
        form: &Params,
        query: &Params,
        headers: &Headers,
    ) -> Result<Value> {
        self.send_form(Method::POST, path, form, query, headers).await
    }

    async fn put(
        &self,
        path: &str,
        form: &Params,
        query: &Params,
        headers: &Headers,
    ) -> Result<Value> {
        self.send_form(Method::PUT, path, form, query, headers).await
    }

    async fn patch(
        &self,
        path: &str,
        form: &Params,
        query: &Params,
        headers: &Headers,
    ) -> Result<Value> {
        self.send_form(Method::PATCH, path, form, query, headers).await
    }

    async fn delete(
        &self,
        path: &str,
        form: &Params,
        query: &Params,
        headers: &Headers,
    ) -> Result<Value> {
        self.send_form(Method::DELETE, path, form, query, headers).await
    }

    async fn post_file(
        &self,
        path: &str,
        multipart: Multipart,
        query: &Params,
        headers: &Headers,
    ) -> Result<Value> {
        let response = self
            .send(Method::POST, path, Some(Body::Multipart(multipart)), query, headers)
            .await?;
        decode_json(response).await
    }

    async fn get_file(
        &self,
        path: &str,
        form: &Params,
        query: &Params,
        headers: &Headers,
    ) -> Result<RawResponse> {
        // Downloads never carry a URL-encoded body.
        let body = if form.is_empty() {
            Body::Download
        } else {
            Body::Multipart(Multipart::from(form))
        };
        let response = self
            .send(Method::GET, path, Some(body), query, headers)
            .await?;
        Ok(RawResponse::new(check_status(response)?))
    }
}

/// Reject anything but 200.
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }
    tracing::debug!(status = status.as_u16(), "unexpected status");
    Err(BacklogError::status(status.as_u16()))
}

/// Decode the body as an untyped JSON value.
///
/// An empty body decodes to `null`; some write endpoints answer without one.
async fn decode_json(response: Response) -> Result<Value> {
    let body = response.bytes().await.map_err(BacklogError::transport)?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&body).map_err(BacklogError::decode)
}

fn multipart_form(multipart: Multipart) -> Result<reqwest::multipart::Form> {
    let mut form = reqwest::multipart::Form::new();
    for part in multipart {
        let body = match part.body {
            PartBody::Text(text) => reqwest::multipart::Part::text(text),
            PartBody::File {
                file_name,
                bytes,
                mime,
            } => {
                let file = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
                match mime {
                    Some(mime) => file.mime_str(&mime).map_err(BacklogError::transport)?,
                    None => file,
                }
            }
        };
        form = form.part(part.name, body);
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_debug() {
        let connector = ApiKeyConnector::new(Credential::new("test", "SECRET")).unwrap();
        let debug = format!("{:?}", connector);
        assert!(debug.contains("ApiKeyConnector"));
        assert!(debug.contains("https://test.backlog.jp/api/v2/"));
        assert!(!debug.contains("SECRET"));
    }

    #[test]
    fn test_base_url_from_credential() {
        let jp = ApiKeyConnector::new(Credential::new("test", "KEY")).unwrap();
        let com = ApiKeyConnector::new(Credential::new("test", "KEY").with_domain("com")).unwrap();

        assert_eq!(
            jp.endpoint("issues").unwrap().as_str(),
            "https://test.backlog.jp/api/v2/issues"
        );
        assert_eq!(
            com.endpoint("issues").unwrap().as_str(),
            "https://test.backlog.com/api/v2/issues"
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let a = ApiKeyConnector::with_base_url("KEY", "http://localhost:8080/api/v2").unwrap();
        let b = ApiKeyConnector::with_base_url("KEY", "http://localhost:8080/api/v2/").unwrap();
        assert_eq!(a.base_url().as_str(), b.base_url().as_str());
    }

    #[test]
    fn test_endpoint_keeps_path_unescaped_and_relative() {
        let connector = ApiKeyConnector::new(Credential::new("test", "KEY")).unwrap();
        assert_eq!(
            connector.endpoint("/projects/A/B/statuses").unwrap().as_str(),
            "https://test.backlog.jp/api/v2/projects/A/B/statuses"
        );
    }

    #[test]
    fn test_api_key_comes_first_and_wins() {
        let connector = ApiKeyConnector::new(Credential::new("test", "KEY")).unwrap();
        let query = Params::new().with("apiKey", "EVIL").with("count", 20);

        let pairs = connector.query_pairs(&query);

        assert_eq!(pairs, vec![("apiKey", "KEY"), ("count", "20")]);
    }

    #[test]
    fn test_connector_is_send_sync_clone() {
        fn assert_traits<T: Send + Sync + Clone + 'static>() {}
        assert_traits::<ApiKeyConnector>();
    }
}
