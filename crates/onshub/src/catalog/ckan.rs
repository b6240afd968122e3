//! CKAN action API client.

use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::Url;

use super::*;

/// Client for a live CKAN catalogue.
///
/// Calls `POST <base>/action/<name>` with a JSON body and unwraps CKAN's
/// `{"success": .., "result": .., "error": ..}` envelope.
///
/// # Examples
///
/// ```no_run
/// use onshub::catalog::{CatalogClient, CkanClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = CkanClient::new("https://data.gov.uk/api")?.with_api_key("my-key");
/// let groups = client.group_search("HM Treasury", true).await?;
/// println!("{} matching publishers", groups.count);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CkanClient {
  /// Shared HTTP connection pool
  http:    reqwest::Client,
  /// API base, always ending in `/`
  base:    Url,
  /// Key sent in the `Authorization` header
  api_key: Option<String>,
}

/// The envelope every CKAN action response is wrapped in.
#[derive(Debug, Deserialize)]
struct ActionResponse<T> {
  success: bool,
  result:  Option<T>,
  error:   Option<Value>,
}

impl CkanClient {
  /// Creates a client for the API rooted at `base_url`, e.g. `http://data.gov.uk/api`.
  pub fn new(base_url: &str) -> Result<Self> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
      base.push('/');
    }
    Ok(Self { http: reqwest::Client::new(), base: Url::parse(&base)?, api_key: None })
  }

  /// Sets the API key sent with every request.
  pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
    self.api_key = Some(api_key.into());
    self
  }

  /// The API base URL.
  pub fn base_url(&self) -> &Url { &self.base }

  /// URL of a named action.
  fn action_url(&self, action: &str) -> Result<Url> {
    Ok(self.base.join(&format!("action/{action}"))?)
  }

  /// Calls an action and returns its `result`.
  async fn action<T: DeserializeOwned>(&self, action: &str, params: &Value) -> Result<T> {
    let url = self.action_url(action)?;
    debug!("Calling {} with {}", url, params);

    let mut request = self.http.post(url).json(params);
    if let Some(key) = &self.api_key {
      request = request.header(AUTHORIZATION, key);
    }

    let response = request.send().await?;
    let status = response.status();
    let data = response.bytes().await?;
    trace!("{} response ({}): {}", action, status, String::from_utf8_lossy(&data));

    let envelope: ActionResponse<T> = match serde_json::from_slice(&data) {
      Ok(envelope) => envelope,
      Err(_) if !status.is_success() =>
        return Err(OnsError::Api(format!("{action} returned HTTP {status}"))),
      Err(e) => return Err(e.into()),
    };

    match envelope {
      ActionResponse { success: true, result: Some(result), .. } => Ok(result),
      ActionResponse { success: true, result: None, .. } =>
        Err(OnsError::Api(format!("{action} returned no result"))),
      ActionResponse { error, .. } => Err(OnsError::Api(format!(
        "{action} failed: {}",
        error.map_or_else(|| status.to_string(), |e| e.to_string())
      ))),
    }
  }
}

#[async_trait]
impl CatalogClient for CkanClient {
  async fn group_search(&self, query: &str, exact: bool) -> Result<GroupSearch> {
    self.action("group_search", &json!({ "query": query, "exact": exact })).await
  }

  async fn package_search(&self, query: &str, rows: usize, start: usize) -> Result<PackageSearch> {
    self.action("package_search", &json!({ "q": query, "rows": rows, "start": start })).await
  }

  async fn package_update(&self, package: &Package) -> Result<()> {
    let _: Value = self.action("package_update", &serde_json::to_value(package)?).await?;
    Ok(())
  }
}
