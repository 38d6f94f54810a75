use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    pub subject: String,
    pub school: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub days: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub registration_number: u32,
    pub code: String,
    #[serde(default)]
    pub instructors: Vec<String>,
    #[serde(default)]
    pub meetings: Vec<Meeting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub term: u32,
    pub subject: String,
    pub school: String,
    pub number: String,
    pub name: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// JSON error body returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub message: String,
}

impl std::fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.error)
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog API returned {status}: {body}")]
    Api { status: StatusCode, body: ApiErrorBody },

    #[error("catalog API returned {status} with unexpected body: {text}")]
    Unexpected { status: StatusCode, text: String },

    #[error("invalid base url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// HTTP status of an API-level failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http(e) => e.status(),
            ClientError::Api { status, .. } | ClientError::Unexpected { status, .. } => Some(*status),
            ClientError::InvalidUrl(_) => None,
        }
    }
}

pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /schools`
    pub async fn schools(&self) -> Result<Vec<String>, ClientError> {
        self.get(&["schools"]).await
    }

    /// `GET /subjects` or `GET /subjects/{school}`
    pub async fn subjects(&self, school: Option<&str>) -> Result<Vec<Subject>, ClientError> {
        match school {
            Some(school) => self.get(&["subjects", school]).await,
            None => self.get(&["subjects"]).await,
        }
    }

    /// `GET /{term}/{school}/{subject}`. The term is passed through unparsed so
    /// callers can exercise server-side validation.
    pub async fn courses(
        &self,
        term: &str,
        school: &str,
        subject: &str,
    ) -> Result<Vec<Course>, ClientError> {
        self.get(&[term, school, subject]).await
    }

    /// Base url followed by `segments`, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let resp = self.client.get(self.endpoint(segments)?).send().await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ApiErrorBody>(&text) {
                Ok(body) => ClientError::Api { status, body },
                Err(_) => ClientError::Unexpected { status, text },
            });
        }

        serde_json::from_str(&text).map_err(|_| ClientError::Unexpected { status, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_each_segment() {
        let client = CatalogClient::new("http://localhost:8080/");
        assert_eq!(
            client.endpoint(&["1194", "ENG", "CS"]).unwrap().as_str(),
            "http://localhost:8080/1194/ENG/CS"
        );
        assert_eq!(
            client.endpoint(&["subjects", "A/B?c#d"]).unwrap().as_str(),
            "http://localhost:8080/subjects/A%2FB%3Fc%23d"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = CatalogClient::new("http://localhost/catalog");
        assert_eq!(
            client.endpoint(&["schools"]).unwrap().as_str(),
            "http://localhost/catalog/schools"
        );
    }

    #[test]
    fn test_bad_base_url() {
        let client = CatalogClient::new("not a url");
        assert!(matches!(client.endpoint(&["schools"]), Err(ClientError::InvalidUrl(_))));
    }
}
