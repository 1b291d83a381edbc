use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::{IssueComment, IssueTracker, RepoRef, TrackerError};

const API_VERSION: &str = "2022-11-28";
const MAX_ERROR_BODY_CHARS: usize = 800;

/// [`IssueTracker`] backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    api_base: String,
}

impl GithubClient {
    pub fn new(api_base: &str, token: &str) -> Result<Self, TrackerError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("codefence/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|e| TrackerError::Client(format!("invalid authorization header: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| TrackerError::Client(e.to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub(crate) fn issue_comments_url(&self, repo: &RepoRef, issue_number: u64) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_base, repo.owner, repo.name, issue_number
        )
    }

    pub(crate) fn comment_url(&self, repo: &RepoRef, comment_id: u64) -> String {
        format!(
            "{}/repos/{}/{}/issues/comments/{}",
            self.api_base, repo.owner, repo.name, comment_id
        )
    }

    pub(crate) fn body_url(&self, repo: &RepoRef, issue_number: u64, is_pull_request: bool) -> String {
        let kind = if is_pull_request { "pulls" } else { "issues" };
        format!(
            "{}/repos/{}/{}/{}/{}",
            self.api_base, repo.owner, repo.name, kind, issue_number
        )
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, TrackerError> {
        let response = request.send().await.map_err(|e| TrackerError::Network {
            operation,
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::Api {
                operation,
                status: status.as_u16(),
                message: truncate_for_error(&body),
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, TrackerError> {
        self.send(operation, request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| TrackerError::Decode {
                operation,
                message: e.to_string(),
            })
    }
}

fn truncate_for_error(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    cut.push_str("...");
    cut
}

#[async_trait]
impl IssueTracker for GithubClient {
    async fn list_comments(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<IssueComment>, TrackerError> {
        let request = self
            .http
            .get(self.issue_comments_url(repo, issue_number))
            .query(&[("per_page", per_page), ("page", page)]);
        self.send_json("list comments", request).await
    }

    async fn update_body(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        is_pull_request: bool,
        body: &str,
    ) -> Result<(), TrackerError> {
        let operation = if is_pull_request {
            "update pull request"
        } else {
            "update issue"
        };
        let request = self
            .http
            .patch(self.body_url(repo, issue_number, is_pull_request))
            .json(&serde_json::json!({ "body": body }));
        self.send(operation, request).await?;
        Ok(())
    }

    async fn create_comment(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        body: &str,
    ) -> Result<IssueComment, TrackerError> {
        let request = self
            .http
            .post(self.issue_comments_url(repo, issue_number))
            .json(&serde_json::json!({ "body": body }));
        self.send_json("create comment", request).await
    }

    async fn update_comment(
        &self,
        repo: &RepoRef,
        comment_id: u64,
        body: &str,
    ) -> Result<(), TrackerError> {
        let request = self
            .http
            .patch(self.comment_url(repo, comment_id))
            .json(&serde_json::json!({ "body": body }));
        self.send("update comment", request).await?;
        Ok(())
    }

    async fn delete_comment(&self, repo: &RepoRef, comment_id: u64) -> Result<(), TrackerError> {
        let request = self.http.delete(self.comment_url(repo, comment_id));
        self.send("delete comment", request).await?;
        Ok(())
    }
}
