//! GitHub REST API client
//!
//! Only the pieces the registry needs: the contents API and the GitHub App
//! installation token exchange.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use base64::Engine as _;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{REQUEST_TIMEOUT_SECS, RepoError, Result};

/// Public GitHub API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("designate/", env!("CARGO_PKG_VERSION"));

/// A repository in `owner/repo` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoName {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoName {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(RepoError::InvalidRepository {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Kind of a contents API item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// One entry of a directory listing
#[derive(Debug, Clone, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub name: String,
    pub path: String,
}

/// A single file as returned by the contents API
#[derive(Debug, Deserialize)]
struct FileContent {
    path: String,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    content: String,
}

/// Thin GitHub API client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    api_url: Url,
}

impl GithubClient {
    pub fn new(api_url: &str) -> Result<Self> {
        let parsed = Url::parse(api_url).map_err(|e| RepoError::InvalidApiUrl {
            url: api_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(RepoError::InvalidApiUrl {
                url: api_url.to_string(),
                reason: "not a base URL".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| RepoError::NetworkError {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_url: parsed,
        })
    }

    /// Client for api.github.com
    pub fn public() -> Result<Self> {
        Self::new(DEFAULT_API_URL)
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_str()
    }

    /// Join path segments onto the API URL, skipping empty ones
    fn endpoint<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| RepoError::InvalidApiUrl {
                url: self.api_url.to_string(),
                reason: "not a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments.into_iter().filter(|s| !s.is_empty()));
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, bearer: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .bearer_auth(bearer)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, url: &Url) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RepoError::AuthFailed {
                message: format!("{} returned {}", url, status),
            });
        }
        if !status.is_success() {
            return Err(RepoError::HttpError {
                status: status.as_u16(),
                message: format!("Request to {} failed", url),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| RepoError::InvalidResponse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn contents_url(&self, repo: &RepoName, path: &str, branch: &str) -> Result<Url> {
        let mut url = self.endpoint(
            ["repos", repo.owner.as_str(), repo.name.as_str(), "contents"]
                .into_iter()
                .chain(path.split('/')),
        )?;
        url.query_pairs_mut().append_pair("ref", branch);
        Ok(url)
    }

    /// List a directory of `repo` at `branch`. The root is `""`.
    pub async fn list_directory(
        &self,
        repo: &RepoName,
        path: &str,
        branch: &str,
        token: &str,
    ) -> Result<Vec<ContentItem>> {
        let url = self.contents_url(repo, path, branch)?;
        let request = self.request(Method::GET, url.clone(), token);
        self.send_json(request, &url).await
    }

    /// Fetch and decode a file of `repo` at `branch`
    pub async fn file_content(
        &self,
        repo: &RepoName,
        path: &str,
        branch: &str,
        token: &str,
    ) -> Result<String> {
        let url = self.contents_url(repo, path, branch)?;
        let request = self.request(Method::GET, url.clone(), token);
        let file: FileContent = self.send_json(request, &url).await?;
        decode_content(&file)
    }

    /// Installation id of a GitHub App on `repo`, authenticated with the app JWT
    pub async fn installation_id(&self, repo: &RepoName, jwt: &str) -> Result<u64> {
        #[derive(Deserialize)]
        struct Installation {
            id: u64,
        }

        let url = self.endpoint(["repos", repo.owner.as_str(), repo.name.as_str(), "installation"])?;
        let request = self.request(Method::GET, url.clone(), jwt);
        let installation: Installation = self.send_json(request, &url).await?;
        Ok(installation.id)
    }

    /// Exchange the app JWT for an installation access token
    pub async fn installation_token(&self, installation_id: u64, jwt: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct AccessToken {
            token: String,
        }

        let id = installation_id.to_string();
        let url = self.endpoint(["app", "installations", id.as_str(), "access_tokens"])?;
        let request = self.request(Method::POST, url.clone(), jwt);
        let access: AccessToken = self.send_json(request, &url).await?;
        Ok(access.token)
    }
}

fn decode_content(file: &FileContent) -> Result<String> {
    match file.encoding.as_deref() {
        Some("base64") => {}
        other => {
            return Err(RepoError::Decode {
                path: file.path.clone(),
                message: format!("unsupported encoding {:?}", other.unwrap_or("none")),
            });
        }
    }

    let compact: String = file
        .content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| RepoError::Decode {
            path: file.path.clone(),
            message: e.to_string(),
        })?;

    String::from_utf8(bytes).map_err(|e| RepoError::Decode {
        path: file.path.clone(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_name() {
        let repo: RepoName = "acme/registry".parse().unwrap();
        assert_eq!(repo.owner, "acme");
        assert_eq!(repo.name, "registry");
        assert_eq!(repo.to_string(), "acme/registry");

        assert!("registry".parse::<RepoName>().is_err());
        assert!("/registry".parse::<RepoName>().is_err());
        assert!("acme/".parse::<RepoName>().is_err());
        assert!("a/b/c".parse::<RepoName>().is_err());
    }

    #[test]
    fn test_contents_url() {
        let client = GithubClient::new("https://ghe.example.com/api/v3/").unwrap();
        let repo: RepoName = "acme/registry".parse().unwrap();

        let root = client.contents_url(&repo, "", "main").unwrap();
        assert_eq!(
            root.as_str(),
            "https://ghe.example.com/api/v3/repos/acme/registry/contents?ref=main"
        );

        let nested = client.contents_url(&repo, "apps/web api.yaml", "release/1").unwrap();
        assert_eq!(
            nested.as_str(),
            "https://ghe.example.com/api/v3/repos/acme/registry/contents/apps/web%20api.yaml?ref=release%2F1"
        );
    }

    #[test]
    fn test_invalid_api_url() {
        assert!(matches!(
            GithubClient::new("not a url"),
            Err(RepoError::InvalidApiUrl { .. })
        ));
    }

    #[test]
    fn test_decode_content() {
        let file = FileContent {
            path: "apps/svc.yaml".to_string(),
            encoding: Some("base64".to_string()),
            content: "a2luZDog\nYXBw\n".to_string(),
        };
        assert_eq!(decode_content(&file).unwrap(), "kind: app");
    }

    #[test]
    fn test_decode_content_rejects_unknown_encoding() {
        let file = FileContent {
            path: "big.yaml".to_string(),
            encoding: Some("none".to_string()),
            content: String::new(),
        };
        let err = decode_content(&file).unwrap_err();
        assert!(matches!(err, RepoError::Decode { ref path, .. } if path == "big.yaml"));
    }
}
