//! Upstream catalog client.
//!
//! Fetches courses from another catalog service that speaks the same
//! `/{term}/{school}/{subject}` JSON contract.
//!
//! # Failure mapping
//! - connect error, timeout, 5xx, undecodable body → `Unavailable`
//! - 404 → empty list
//! - records for a different term/subject → logged and dropped
//! - records with a meeting that does not end after it starts → logged and dropped

use std::time::Duration;

use reqwest::{Client, StatusCode};
use url::Url;

use crate::catalog::CatalogError;
use crate::config::UpstreamConfig;
use crate::model::{Course, SubjectCode, Term};

#[derive(Debug, Clone)]
pub struct RemoteCourses {
    client: Client,
    base_url: Url,
}

impl RemoteCourses {
    pub fn new(config: &UpstreamConfig) -> Result<Self, CatalogError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| CatalogError::Configuration(format!("invalid upstream url: {}", e)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Configuration(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn course_url(&self, term: Term, subject: &SubjectCode) -> Result<Url, CatalogError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::Configuration(format!("{} cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .extend([
                term.id().to_string().as_str(),
                subject.school(),
                subject.subject(),
            ]);
        Ok(url)
    }

    pub async fn select_courses(
        &self,
        term: Term,
        subject: &SubjectCode,
    ) -> Result<Vec<Course>, CatalogError> {
        let url = self.course_url(term, subject)?;
        tracing::debug!(url = %url, "Querying upstream catalog");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Upstream catalog unreachable");
            CatalogError::Unavailable(format!("upstream request failed: {}", e))
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::warn!(url = %url, "Upstream catalog has no entry, returning empty list");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            tracing::error!(url = %url, status = %status, "Upstream catalog returned error status");
            return Err(CatalogError::Unavailable(format!(
                "upstream returned status {}",
                status
            )));
        }

        let courses: Vec<Course> = response.json().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Upstream catalog returned malformed body");
            CatalogError::Unavailable(format!("upstream response could not be decoded: {}", e))
        })?;

        let total = courses.len();
        let matching: Vec<Course> = courses
            .into_iter()
            .filter(|course| {
                if !course.matches(term, subject) {
                    tracing::warn!(
                        expected_term = term.id(),
                        expected_subject = %subject,
                        got_term = course.term.id(),
                        got_subject = %course.subject,
                        number = %course.number,
                        "Dropping upstream course for a different term or subject"
                    );
                    return false;
                }
                if !course.has_consistent_schedule() {
                    tracing::warn!(
                        subject = %course.subject,
                        number = %course.number,
                        "Dropping upstream course with a meeting ending before it starts"
                    );
                    return false;
                }
                true
            })
            .collect();

        if matching.len() != total {
            tracing::warn!(dropped = total - matching.len(), "Upstream response contained rejected courses");
        }

        Ok(matching)
    }
}
