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

//! terra_gee turns a client supplied GeoJSON region and date range into a Google Earth Engine
//! preview map and a GeoTIFF download URL for the least cloudy image of an imagery collection.
//!
//! Earth Engine is accessed through its REST API (`https://earthengine.googleapis.com/v1`). Requests
//! are encoded as expression graphs (see [`expr`]) and authenticated with OAuth2 access tokens
//! obtained for a service account (see [`auth`]). The [`ImageryCatalog`] trait abstracts the
//! three catalog operations we need so that query logic can be tested without network access.

use std::time::Duration;
use serde::{Deserialize,Serialize};
use terra_common::{datetime::{deserialize_duration, serialize_duration}, fs::EnvPathBuf};

terra_build::define_load_config!{}

pub mod errors;
pub use errors::*;

pub mod region;
pub use region::*;

pub mod expr;

pub mod auth;
pub use auth::*;

pub mod catalog;
pub use catalog::*;

pub mod query;
pub use query::*;

pub mod service;
pub use service::*;

pub const DEFAULT_BASE_URL: &str = "https://earthengine.googleapis.com";
pub const EE_SCOPE: &str = "https://www.googleapis.com/auth/earthengine";

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct GeeConfig {
    /// path of the service account key (JSON) file
    pub credentials: EnvPathBuf,

    /// cloud project to bill. If not set we use the `project_id` of the service account key
    #[serde(default)]
    pub project: Option<String>,

    #[serde(default="default_base_url")]
    pub base_url: String,

    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub request_timeout: Duration,

    pub default_collection: String,
    pub default_start_date: String,
    pub default_end_date: String,

    /// pixel size in meters of GeoTIFF downloads
    pub download_scale: f64,

    #[serde(default)]
    pub preview: PreviewConfig,
}

fn default_base_url()->String { DEFAULT_BASE_URL.to_string() }

/// visualization of preview maps. No bands means Earth Engine defaults
#[derive(Deserialize,Serialize,Debug,Clone,Default,PartialEq)]
pub struct PreviewConfig {
    #[serde(default)]
    pub bands: Vec<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}
