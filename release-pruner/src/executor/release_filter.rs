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
use regex::Regex;
use serde::Deserialize;

use crate::entity::release::Release;

/// A compiled tag filter. A tag only passes the filter if the pattern matches the
/// whole tag name, a match of only a part of the tag is not enough. Deserializing a
/// filter compiles it, an invalid pattern fails the deserialization.
#[derive(Deserialize, Debug, Clone)]
#[serde(try_from = "String")]
pub(crate) struct TagFilter {
    pattern: String,
    regex: Regex,
}

impl TagFilter {
    /// Compiles the given pattern into a tag filter.
    ///
    /// # Arguments
    /// * `pattern` - The regular expression that tag names must fully match.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Get the pattern this filter was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Checks if the given tag name fully matches this filter.
    pub fn matches(&self, tag: &str) -> bool {
        self.regex.is_match(tag)
    }
}

impl TryFrom<String> for TagFilter {
    type Error = regex::Error;

    fn try_from(pattern: String) -> Result<Self, Self::Error> {
        Self::new(&pattern)
    }
}

/// Keeps the releases whose tag name fully matches the given filter, in input order.
///
/// # Arguments
/// * `releases` - The releases to filter.
/// * `tag_filter` - The filter that the tag of each release must match.
pub(crate) fn filter_by_tag(releases: Vec<Release>, tag_filter: &TagFilter) -> Vec<Release> {
    releases
        .into_iter()
        .filter(|release| tag_filter.matches(&release.tag))
        .collect()
}

/// Sorts the given releases by their publication time, ascending. The sort is stable,
/// releases with the same publication time stay in their current order. Releases that
/// were never published are sorted before all published releases.
pub(crate) fn sort_by_publication_time(releases: &mut [Release]) {
    releases.sort_by_key(|release| release.publication_time);
}

/// Selects the releases that should be deleted to only keep the given amount of the
/// most recently published releases. The given releases don't need to be sorted.
///
/// # Arguments
/// * `releases` - The releases to select from.
/// * `keep_last_n` - The amount of releases to keep. Zero or less keeps no release.
pub(crate) fn filter_for_deletion(releases: &[Release], keep_last_n: i64) -> Vec<Release> {
    if releases.is_empty() {
        return Vec::new();
    }

    // nothing should be kept, delete all
    if keep_last_n <= 0 {
        return releases.to_vec();
    }

    // we want to keep more than we have, nothing to delete
    let keep_count = usize::try_from(keep_last_n).unwrap_or(usize::MAX);
    if keep_count >= releases.len() {
        return Vec::new();
    }

    let mut sorted_releases = releases.to_vec();
    sort_by_publication_time(&mut sorted_releases);
    sorted_releases.truncate(sorted_releases.len() - keep_count);
    sorted_releases
}
