/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */


use std::path::{Path, PathBuf};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::{fs::{self, File}, io::AsyncWriteExt};
use tracing::{debug, warn};

use terra_common::{fs::is_visible_file, poll::{poll_until, Clock, PollPolicy}};
use crate::{
    errors::{invalid_input, missing_file, Result, TerraLidarError, FILE_NOT_FOUND_AFTER_SAVING, NO_SELECTED_FILE, UNSUPPORTED_FILE_TYPE},
    LAZ_EXTENSION,
};

/// check the client supplied filename before anything is written. Names are used as-is (no
/// sanitizing), hence we reject anything that could address a file outside the storage directory
pub fn validate_filename (filename: &str)->Result<&str> {
    if filename.is_empty() {
        return Err( missing_file( NO_SELECTED_FILE))
    }
    if filename.contains(['/', '\\', '\0']) || filename == "." || filename == ".." {
        return Err( invalid_input( format!("invalid filename: {filename:?}")))
    }
    if !filename.ends_with( LAZ_EXTENSION) {
        return Err( TerraLidarError::UnsupportedTypeError( UNSUPPORTED_FILE_TYPE.to_string()))
    }
    Ok(filename)
}

/// write the chunks to `path`, replacing any previous file of that name. Partially written files
/// are removed if the chunk source fails
pub async fn write_asset<S,E> (path: &Path, chunks: S)->Result<u64>
    where S: Stream<Item=std::result::Result<Bytes,E>>, E: Into<TerraLidarError>
{
    let mut chunks = std::pin::pin!(chunks);
    if let Some(dir) = path.parent() {
        fs::create_dir_all( dir).await?;
    }

    let mut file = File::create( path).await?;
    let mut len: u64 = 0;

    while let Some(res) = chunks.next().await {
        match res {
            Ok(chunk) => {
                if let Err(e) = file.write_all( &chunk).await {
                    discard( path).await;
                    return Err( e.into())
                }
                len += chunk.len() as u64;
            }
            Err(e) => {
                discard( path).await;
                return Err( e.into())
            }
        }
    }

    file.flush().await?;
    file.sync_all().await?;
    debug!("stored {len} bytes in {path:?}");
    Ok(len)
}

async fn discard (path: &Path) {
    if let Err(e) = fs::remove_file( path).await {
        warn!("failed to remove partial upload {path:?}: {e}");
    }
}

/// wait for a stored file to become visible
pub async fn await_visible (path: &Path, policy: &PollPolicy, clock: &dyn Clock)->Result<()> {
    match poll_until( policy, clock, || is_visible_file( path)).await {
        Some(attempt) => {
            if attempt > 1 { debug!("{path:?} visible after {attempt} attempts") }
            Ok(())
        }
        None => Err( TerraLidarError::StorageVisibilityError( FILE_NOT_FOUND_AFTER_SAVING.to_string()))
    }
}
