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


#![allow(unused)]

//! terra_lidar receives uploaded LiDAR point clouds (`.laz` files), converts them with an external
//! converter executable (PotreeConverter) into a web viewable format within the storage directory,
//! and serves the `metadata.json` produced by the converter.
//!
//! Uploads are processed within the request: the file is stored, checked for visibility, and then
//! converted. Uploads of the same filename are serialized.

use std::{path::PathBuf, time::Duration};
use serde::{Deserialize,Serialize};
use terra_common::{datetime::{deserialize_duration, serialize_duration}, fs::EnvPathBuf, poll::PollPolicy};

terra_build::define_load_config!{}

pub mod errors;
pub use errors::*;

pub mod pipeline;
pub use pipeline::*;

pub mod locks;
pub use locks::*;

pub mod upload;
pub use upload::*;

pub mod convert;
pub use convert::*;

pub mod artifact;
pub use artifact::*;

pub mod service;
pub use service::*;

pub const LAZ_EXTENSION: &str = ".laz";

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct LidarConfig {
    /// where uploads are stored and the converter writes its output
    pub storage_dir: EnvPathBuf,

    /// the converter executable. Plain names are looked up in $PATH
    pub converter: EnvPathBuf,

    /// max time we wait for a conversion to finish before we kill the converter
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub convert_timeout: Duration,

    /// how long we wait for stored uploads to become visible
    #[serde(default)]
    pub visibility: PollPolicy,

    #[serde(default="default_metadata_file")]
    pub metadata_file: String,

    /// max accepted request body size in bytes
    pub max_upload_size: usize,
}

fn default_metadata_file()->String { "metadata.json".to_string() }

impl LidarConfig {
    pub fn metadata_path (&self)->PathBuf {
        self.storage_dir.join( &self.metadata_file)
    }
}
