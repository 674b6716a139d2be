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
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::error::PruneError;
use crate::executor::release_filter::TagFilter;

/// The request that is passed to the resource on stdin when putting (pruning) releases.
#[derive(Deserialize, Debug)]
pub(crate) struct RetentionRequest {
    /// The repository to prune and the credentials to access it.
    pub source: Source,
    /// The settings which releases should be pruned.
    pub params: Params,
}

/// The repository configuration of the resource.
#[derive(Deserialize, Debug)]
pub(crate) struct Source {
    /// The owner (user or organization) of the repository.
    pub owner: String,
    /// The name of the repository.
    pub repository: String,
    /// The token that is attached to every request made to GitHub.
    #[serde(deserialize_with = "deserialize_secret")]
    pub access_token: SecretString,
}

/// The pruning settings of a single put step.
#[derive(Deserialize, Debug)]
pub(crate) struct Params {
    /// The pattern that the whole tag name of a release must match to be considered.
    pub tag_filter: TagFilter,
    /// The amount of matching releases to keep. Zero or a negative value keeps none.
    pub keep_last_n: i64,
}

impl RetentionRequest {
    /// Parses the request from the given json payload. The tag filter is compiled while
    /// parsing, so that a broken pattern fails before anything is requested from GitHub.
    ///
    /// # Arguments
    /// * `payload` - The raw json payload that was read from stdin.
    pub fn parse(payload: &str) -> Result<Self, PruneError> {
        let request: RetentionRequest = serde_json::from_str(payload)?;
        Ok(request)
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}
