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

use log::{error, info, warn};

use crate::accessor::release_accessor::ReleaseAccessor;
use crate::config::RetentionRequest;
use crate::entity::acknowledgment::{Acknowledgment, DELETED_VERSION};
use crate::entity::release::Release;
use crate::error::PruneError;
use crate::executor::release_filter::{filter_by_tag, filter_for_deletion, sort_by_publication_time};

/// Handles a get of the resource. Releases are never fetched, the deleted sentinel
/// version is returned as is.
pub(crate) fn fetch_deleted_version() -> Acknowledgment {
    info!(
        "Getting special version {} is a no-op; returning it as is",
        DELETED_VERSION
    );
    Acknowledgment::deleted()
}

/// Removes all releases matching the tag filter of the given request, except the most
/// recently published ones that should be kept.
///
/// Failing to list the releases aborts before anything is deleted. A failure while
/// removing a single release is only logged, the remaining releases are still processed
/// and the returned acknowledgment is the same as if everything was removed.
///
/// # Arguments
/// * `accessor` - The accessor for the releases of the target repository.
/// * `request` - The request containing the tag filter and the amount of releases to keep.
pub(crate) async fn prune_releases<A: ReleaseAccessor>(
    accessor: &A,
    request: &RetentionRequest,
) -> Result<Acknowledgment, PruneError> {
    let tag_filter = &request.params.tag_filter;
    let releases = accessor.list().await?;

    let mut matching_releases = filter_by_tag(releases, tag_filter);
    sort_by_publication_time(&mut matching_releases);
    let releases_to_delete: HashSet<Release> =
        filter_for_deletion(&matching_releases, request.params.keep_last_n)
            .into_iter()
            .collect();

    info!("Tag filter: {}", tag_filter.pattern());
    for release in &matching_releases {
        if releases_to_delete.contains(release) {
            warn!("Removing release with tag {}", release.tag);
            if let Err(err) = delete_release_and_tag(accessor, release).await {
                error!("Error while deleting {}: {}", release, err);
            }
        } else {
            info!("Keeping release with tag {}", release.tag);
        }
    }

    Ok(Acknowledgment::deleted())
}

/// Deletes the release and after that its tag, GitHub keeps the tag when deleting a release.
async fn delete_release_and_tag<A: ReleaseAccessor>(
    accessor: &A,
    release: &Release,
) -> Result<(), PruneError> {
    accessor.delete(release).await?;
    accessor.delete_tag(release).await
}
