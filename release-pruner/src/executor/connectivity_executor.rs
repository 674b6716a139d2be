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

use std::time::Duration;

use log::{error, info, warn};
use reqwest::StatusCode;

/// The url that is requested by default to check if outbound connections are possible.
pub(crate) const DEFAULT_CONNECTIVITY_TARGET: &str = "https://www.wikipedia.org/";

/// Checks if the given target can be reached, independent of the GitHub api. Every
/// failure is logged and turned into a `false` result, nothing is propagated.
///
/// # Arguments
/// * `target` - The url to send a single GET request to.
/// * `connect_timeout` - The maximum time to wait for a connection to be established.
///
/// # Returns
/// * `bool` - `true` if the target responded with a 2xx status, `false` otherwise.
pub(crate) async fn check_connectivity(target: &str, connect_timeout: Duration) -> bool {
    warn!("Starting test sequence, trying to reach {}", target);
    match request_status(target, connect_timeout).await {
        Ok(status) if status.is_success() => {
            info!("Response code is {}", status.as_u16());
            true
        }
        Ok(status) => {
            error!("Response code is {}", status.as_u16());
            false
        }
        Err(err) => {
            error!("Error during test sequence: {}", err);
            false
        }
    }
}

async fn request_status(target: &str, connect_timeout: Duration) -> reqwest::Result<StatusCode> {
    let client = reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .build()?;
    let response = client.get(target).send().await?;
    Ok(response.status())
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn reachable_target() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        assert!(check_connectivity(&format!("{}/", server.uri()), TIMEOUT).await);
    }

    #[tokio::test]
    async fn error_status_fails_the_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(!check_connectivity(&server.uri(), TIMEOUT).await);
    }

    #[tokio::test]
    async fn unreachable_target_fails_the_check() {
        assert!(!check_connectivity("http://127.0.0.1:1/", TIMEOUT).await);
    }

    #[tokio::test]
    async fn invalid_target_fails_the_check() {
        assert!(!check_connectivity("not a url", TIMEOUT).await);
    }
}
