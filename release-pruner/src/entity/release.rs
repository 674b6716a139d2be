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
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

/// A release of a GitHub repository, reduced to the fields needed to decide whether it
/// gets pruned. All other fields of the GitHub representation are ignored.
///
/// Two releases are equal if they have the same id, independent of their other fields.
/// This allows copies of the same release (for example fetched twice) to be treated
/// as the same release.
#[derive(Deserialize, Clone, Debug)]
pub(crate) struct Release {
    /// The unique id of the release.
    pub id: u64,
    /// The api endpoint of the release, used to delete it.
    pub url: String,
    /// The name of the tag associated with the release.
    #[serde(rename = "tag_name")]
    pub tag: String,
    /// The time when the release was published, absent for releases that were never published.
    #[serde(rename = "published_at", default)]
    pub publication_time: Option<DateTime<FixedOffset>>,
}

impl PartialEq for Release {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Release {}

impl Hash for Release {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let publication_time = self
            .publication_time
            .map(|time| time.to_rfc3339())
            .unwrap_or_else(|| String::from("<unpublished>"));
        write!(
            f,
            "release {} (tag: {}, url: {}, published at: {})",
            self.id, self.tag, self.url, publication_time
        )
    }
}
