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
use serde::Serialize;

/// The version name that is reported for every get and put. Releases are only
/// ever removed by this resource, so there is no real version to report.
pub(crate) const DELETED_VERSION: &str = "<DELETED>";

/// The result that is written to stdout after a get or put completed.
///
/// The content is always the same, it does not reflect which releases were removed
/// or if removing a release failed. Failures are only reported through the log.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct Acknowledgment {
    version: VersionReference,
    metadata: Vec<serde_json::Value>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
struct VersionReference {
    version: String,
}

impl Acknowledgment {
    /// Creates the acknowledgment for the deleted sentinel version with no metadata.
    pub fn deleted() -> Self {
        Self {
            version: VersionReference {
                version: DELETED_VERSION.to_string(),
            },
            metadata: Vec::new(),
        }
    }

    /// Serializes this acknowledgment into the json format expected by the caller.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
