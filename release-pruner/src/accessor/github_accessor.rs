/*
 * This file is part of release-pruner, licensed under the MIT License (MIT).
 *
 * Copyright (c) 2024 easybill GmbH
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use std::collections::HashSet;
use std::time::Duration;

use log::{debug, warn};
use octocrab::params::repos::Reference;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use secrecy::ExposeSecret;

use crate::accessor::release_accessor::ReleaseAccessor;
use crate::config::Source;
use crate::entity::release::Release;
use crate::error::PruneError;

/// The amount of releases requested per page, the maximum GitHub allows.
const RELEASES_PAGE_SIZE: u8 = 100;

/// An accessor for the releases of a repository hosted on GitHub, authenticated
/// using the access token from the resource source configuration.
pub struct GitHubAccessor {
    github_client: Octocrab,
    api_url: String,
    owner: String,
    repository: String,
}

impl GitHubAccessor {
    /// Constructs a new GitHub accessor for the repository in the given source configuration.
    ///
    /// # Arguments
    /// * `source` - The source configuration with the target repository and the access token.
    /// * `api_url` - The base url of the GitHub api.
    /// * `connect_timeout` - The maximum time to wait for a connection to be established.
    pub fn new(source: &Source, api_url: &str, connect_timeout: Duration) -> Result<Self, PruneError> {
        let api_url = api_url.trim_end_matches('/').to_string();
        let github_client = Octocrab::builder()
            .base_uri(api_url.as_str())?
            .personal_token(source.access_token.expose_secret().to_string())
            .set_connect_timeout(Some(connect_timeout))
            .add_retry_config(RetryConfig::None)
            .build()?;
        Ok(Self {
            github_client,
            api_url,
            owner: source.owner.clone(),
            repository: source.repository.clone(),
        })
    }
}

impl ReleaseAccessor for GitHubAccessor {
    async fn list(&self) -> Result<Vec<Release>, PruneError> {
        let mut releases = Vec::<Release>::new();
        let mut requested_pages = HashSet::<String>::new();
        let mut next_page = Some(format!(
            "{}/repos/{}/{}/releases?per_page={}",
            self.api_url, self.owner, self.repository, RELEASES_PAGE_SIZE
        ));

        while let Some(page_uri) = next_page.take() {
            // a page we already got means the remote is sending us in circles
            if !requested_pages.insert(page_uri.clone()) {
                warn!("Releases page {} was already requested, stopping", page_uri);
                break;
            }

            debug!("Requesting releases page {}", page_uri);
            let response = self.github_client._get(page_uri.as_str()).await?;
            let response = octocrab::map_github_error(response).await?;
            next_page = response
                .headers()
                .get("link")
                .and_then(|header_value| header_value.to_str().ok())
                .and_then(next_page_link);

            let body = self.github_client.body_to_string(response).await?;
            let page_releases: Vec<Release> =
                serde_json::from_str(&body).map_err(|source| PruneError::Decode {
                    uri: page_uri.clone(),
                    source,
                })?;
            releases.extend(page_releases);
        }

        debug!(
            "Found {} releases in {}/{}",
            releases.len(),
            self.owner,
            self.repository
        );
        Ok(releases)
    }

    async fn delete(&self, release: &Release) -> Result<(), PruneError> {
        let response = self
            .github_client
            ._delete(release.url.as_str(), None::<&()>)
            .await?;
        octocrab::map_github_error(response).await?;
        Ok(())
    }

    async fn delete_tag(&self, release: &Release) -> Result<(), PruneError> {
        self.github_client
            .repos(&self.owner, &self.repository)
            .delete_ref(&Reference::Tag(release.tag.clone()))
            .await?;
        Ok(())
    }
}

/// Extracts the url of the next page from the given value of a link header, for example
/// `<https://api.github.com/repositories/1/releases?page=2>; rel="next"`. Entries that
/// are not in the expected format are ignored, a header without a valid next entry
/// results in `None`.
///
/// # Arguments
/// * `link_header` - The value of the link header returned by GitHub.
pub(crate) fn next_page_link(link_header: &str) -> Option<String> {
    link_header.split(',').find_map(|link| {
        let mut link_parts = link.split(';');
        let target = link_parts.next()?.trim();
        let target = target.strip_prefix('<')?.strip_suffix('>')?.trim();

        let is_next = link_parts.any(|param| match param.trim().split_once('=') {
            Some((name, value)) => {
                name.trim() == "rel"
                    && value
                        .trim()
                        .trim_matches('"')
                        .split_whitespace()
                        .any(|rel| rel == "next")
            }
            None => false,
        });
        if is_next && !target.is_empty() {
            Some(target.to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn source() -> Source {
        Source {
            owner: String::from("rabbitmq"),
            repository: String::from("rabbitmq-server"),
            access_token: SecretString::from(String::from("secret-token")),
        }
    }

    fn accessor(server: &MockServer) -> GitHubAccessor {
        GitHubAccessor::new(&source(), &server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn release_json(server: &MockServer, id: u64, tag: &str) -> serde_json::Value {
        json!({
            "id": id,
            "url": format!("{}/repos/rabbitmq/rabbitmq-server/releases/{}", server.uri(), id),
            "tag_name": tag,
            "draft": false,
            "published_at": "2021-03-01T10:37:58Z"
        })
    }

    fn release(server: &MockServer, id: u64, tag: &str) -> Release {
        serde_json::from_value(release_json(server, id, tag)).unwrap()
    }

    #[test]
    fn parse_next_link() {
        let header = r#"<https://api.github.com/repositories/343344332/releases?per_page=1&page=3>; rel="next", <https://api.github.com/repositories/343344332/releases?per_page=1&page=5>; rel="last""#;
        assert_eq!(
            next_page_link(header).as_deref(),
            Some("https://api.github.com/repositories/343344332/releases?per_page=1&page=3")
        );
    }

    #[test]
    fn parse_next_link_in_any_position() {
        let header = r#"<https://api.github.com/r?page=1>; rel="prev", <https://api.github.com/r?page=3>; rel="next""#;
        assert_eq!(
            next_page_link(header).as_deref(),
            Some("https://api.github.com/r?page=3")
        );
    }

    #[test]
    fn no_next_link_on_last_page() {
        let header = r#"<https://api.github.com/r?page=1>; rel="prev", <https://api.github.com/r?page=1>; rel="first""#;
        assert_eq!(next_page_link(header), None);
    }

    #[test]
    fn malformed_link_header_means_no_more_pages() {
        assert_eq!(next_page_link(""), None);
        assert_eq!(next_page_link("garbage"), None);
        assert_eq!(next_page_link(r#"https://api.github.com/r?page=2; rel="next""#), None);
        assert_eq!(next_page_link(r#"<https://api.github.com/r?page=2>"#), None);
        assert_eq!(next_page_link(r#"<>; rel="next""#), None);
    }

    #[tokio::test]
    async fn list_follows_pagination() {
        let server = MockServer::start().await;
        let second_page = format!("{}/repositories/1/releases?per_page=100&page=2", server.uri());

        Mock::given(method("GET"))
            .and(path("/repos/rabbitmq/rabbitmq-server/releases"))
            .and(header_exists("authorization"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(
                        "link",
                        format!(r#"<{0}>; rel="next", <{0}>; rel="last""#, second_page).as_str(),
                    )
                    .set_body_json(json!([
                        release_json(&server, 3, "v1.0.2"),
                        release_json(&server, 2, "v1.0.1"),
                    ])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repositories/1/releases"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([release_json(&server, 1, "v1.0.0")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let releases = accessor(&server).list().await.unwrap();
        let ids: Vec<u64> = releases.iter().map(|release| release.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(releases[2].tag, "v1.0.0");
    }

    #[tokio::test]
    async fn list_stops_on_malformed_link_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/rabbitmq/rabbitmq-server/releases"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("link", "not a link header")
                    .set_body_json(json!([release_json(&server, 1, "v1.0.0")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let releases = accessor(&server).list().await.unwrap();
        assert_eq!(releases.len(), 1);
    }

    #[tokio::test]
    async fn list_stops_when_next_page_repeats() {
        let server = MockServer::start().await;
        let same_page = format!(
            "{}/repos/rabbitmq/rabbitmq-server/releases?per_page=100",
            server.uri()
        );
        Mock::given(method("GET"))
            .and(path("/repos/rabbitmq/rabbitmq-server/releases"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("link", format!(r#"<{}>; rel="next""#, same_page).as_str())
                    .set_body_json(json!([release_json(&server, 1, "v1.0.0")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let releases = accessor(&server).list().await.unwrap();
        assert_eq!(releases.len(), 1);
    }

    #[tokio::test]
    async fn list_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/rabbitmq/rabbitmq-server/releases"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Bad credentials",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&server)
            .await;

        let result = accessor(&server).list().await;
        assert!(matches!(result, Err(PruneError::Transport(_))));
    }

    #[tokio::test]
    async fn list_fails_when_a_later_page_fails() {
        let server = MockServer::start().await;
        let second_page = format!("{}/repositories/1/releases?page=2", server.uri());
        Mock::given(method("GET"))
            .and(path("/repos/rabbitmq/rabbitmq-server/releases"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("link", format!(r#"<{}>; rel="next""#, second_page).as_str())
                    .set_body_json(json!([release_json(&server, 1, "v1.0.0")])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repositories/1/releases"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&server)
            .await;

        assert!(accessor(&server).list().await.is_err());
    }

    #[tokio::test]
    async fn list_fails_on_undecodable_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/rabbitmq/rabbitmq-server/releases"))
            .respond_with(ResponseTemplate::new(200).set_body_string("this is not json"))
            .mount(&server)
            .await;

        let result = accessor(&server).list().await;
        assert!(matches!(result, Err(PruneError::Decode { .. })));
    }

    #[tokio::test]
    async fn delete_release_by_its_url() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/repos/rabbitmq/rabbitmq-server/releases/5"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let release = release(&server, 5, "v3.9.0-alpha-stream.1");
        accessor(&server).delete(&release).await.unwrap();
    }

    #[tokio::test]
    async fn delete_tag_of_release() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/repos/rabbitmq/rabbitmq-server/git/refs/tags/v3.9.0-alpha-stream.1"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let release = release(&server, 5, "v3.9.0-alpha-stream.1");
        accessor(&server).delete_tag(&release).await.unwrap();
    }

    #[tokio::test]
    async fn delete_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/repos/rabbitmq/rabbitmq-server/releases/5"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&server)
            .await;

        let release = release(&server, 5, "v1.0.0");
        let result = accessor(&server).delete(&release).await;
        assert!(matches!(result, Err(PruneError::Transport(_))));
    }
}
