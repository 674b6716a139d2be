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
use crate::entity::release::Release;
use crate::error::PruneError;

/// Access to the releases of a single repository. Only the operations needed to
/// prune releases are exposed.
pub(crate) trait ReleaseAccessor {
    /// Lists all releases of the repository, following pagination until the last page.
    /// The releases are returned in the order the remote returned them. Fails if any
    /// page cannot be retrieved, a partial listing is never returned.
    async fn list(&self) -> Result<Vec<Release>, PruneError>;

    /// Deletes the given release. The tag of the release is not removed by this call.
    ///
    /// # Arguments
    /// * `release` - The release to delete.
    async fn delete(&self, release: &Release) -> Result<(), PruneError>;

    /// Deletes the tag that is associated with the given release.
    ///
    /// # Arguments
    /// * `release` - The release whose tag should be deleted.
    async fn delete_tag(&self, release: &Release) -> Result<(), PruneError>;
}
