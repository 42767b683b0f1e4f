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


use std::{io::ErrorKind, path::Path};
use tracing::debug;

use crate::errors::{Result, TerraLidarError};

/// the raw bytes of a converter artifact such as `metadata.json`
pub async fn read_artifact (path: &Path)->Result<Vec<u8>> {
    match tokio::fs::read( path).await {
        Ok(data) => {
            debug!("read {} bytes from {path:?}", data.len());
            Ok(data)
        }
        Err(e) if e.kind() == ErrorKind::NotFound || path.is_dir() => {
            Err( TerraLidarError::NotFoundError( format!("{path:?}")))
        }
        Err(e) => Err( e.into())
    }
}
