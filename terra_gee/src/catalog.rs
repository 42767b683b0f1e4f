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


use std::sync::Arc;
use async_trait::async_trait;
use reqwest::{header::{HeaderMap, HeaderValue, AUTHORIZATION}, Client};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use terra_common::net::post_json_query;
use crate::{
    auth::{AccessTokenProvider, ServiceAccountKey, ServiceAccountTokenSource},
    errors::{config_error, upstream_error, Result},
    expr::Expression,
    GeeConfig, PreviewConfig,
};

/// a preview map that can be displayed as XYZ tiles
#[derive(Debug,Clone,PartialEq)]
pub struct MapHandle {
    /// `projects/<project>/maps/<id>`
    pub name: String,
    /// always empty for the v1 API, which authenticates tile requests by means of a header
    pub token: String,
}

/// the catalog operations used by imagery queries
#[async_trait]
pub trait ImageryCatalog: Send + Sync {
    /// evaluate an expression and return its (JSON) result
    async fn compute_value (&self, expr: &Expression)->Result<Value>;

    /// create a preview map for an image expression
    async fn create_map (&self, expr: &Expression, preview: &PreviewConfig)->Result<MapHandle>;

    /// create a zipped GeoTIFF thumbnail for an image expression and return its name
    async fn create_thumbnail (&self, expr: &Expression)->Result<String>;

    /// XYZ tile URL template for a preview map
    fn tile_url (&self, map: &MapHandle)->String;

    /// URL to download the pixels of a thumbnail
    fn download_url (&self, thumbnail_name: &str)->String;
}

#[derive(Deserialize,Debug)]
struct NameResponse {
    name: String,
}

#[derive(Deserialize,Debug)]
struct ComputeResponse {
    result: Value,
}

/// an ImageryCatalog that uses the Earth Engine REST API
pub struct GeeCatalog {
    client: Client,
    base_url: String,
    project: String,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl GeeCatalog {
    pub fn new (client: Client, base_url: impl ToString, project: impl ToString, tokens: Arc<dyn AccessTokenProvider>)->Self {
        let base_url = base_url.to_string().trim_end_matches('/').to_string();
        GeeCatalog { client, base_url, project: project.to_string(), tokens }
    }

    /// create a catalog that authenticates with the configured service account key.
    /// This fails if the key cannot be loaded or no project is known
    pub fn from_config (config: &GeeConfig)->Result<Self> {
        let key = ServiceAccountKey::from_file( &config.credentials)?;
        let project = config.project.clone().or( key.project_id.clone())
            .ok_or_else( || config_error("no Earth Engine project configured"))?;

        let client = Client::builder().timeout( config.request_timeout).build()
            .map_err( |e| config_error( format!("failed to create HTTP client: {e}")))?;
        let tokens = ServiceAccountTokenSource::new( key, client.clone())?;
        info!("using Earth Engine project {} with service account {}", project, tokens.service_account());

        Ok( GeeCatalog::new( client, &config.base_url, project, Arc::new(tokens)) )
    }

    pub fn project (&self)->&str { &self.project }

    fn project_url (&self, method: &str)->String {
        format!("{}/v1/projects/{}/{}", self.base_url, self.project, method)
    }

    async fn auth_headers (&self)->Result<HeaderMap> {
        let token = self.tokens.access_token().await?;
        let mut hm = HeaderMap::new();
        let value = HeaderValue::from_str( &format!("Bearer {token}"))
            .map_err( |_| upstream_error("invalid access token"))?;
        hm.insert( AUTHORIZATION, value);
        Ok(hm)
    }

    async fn post<U> (&self, method: &str, body: &Value)->Result<U> where U: for<'a> Deserialize<'a> {
        let url = self.project_url( method);
        debug!("POST {url}");
        let headers = self.auth_headers().await?;
        Ok( post_json_query( &self.client, &url, Some(headers), body).await? )
    }
}

#[async_trait]
impl ImageryCatalog for GeeCatalog {
    async fn compute_value (&self, expr: &Expression)->Result<Value> {
        let response: ComputeResponse = self.post( "value:compute", &json!({ "expression": expr })).await?;
        Ok( response.result )
    }

    async fn create_map (&self, expr: &Expression, preview: &PreviewConfig)->Result<MapHandle> {
        let mut body = json!({
            "expression": expr,
            "fileFormat": "AUTO_JPEG_PNG"
        });
        if !preview.bands.is_empty() {
            body["bandIds"] = json!(preview.bands);
        }
        if let (Some(min),Some(max)) = (preview.min, preview.max) {
            body["visualizationOptions"] = json!({ "ranges": [ { "min": min, "max": max } ] });
        }

        let response: NameResponse = self.post( "maps", &body).await?;
        Ok( MapHandle { name: response.name, token: String::new() } )
    }

    async fn create_thumbnail (&self, expr: &Expression)->Result<String> {
        let body = json!({
            "expression": expr,
            "fileFormat": "ZIPPED_GEO_TIFF"
        });
        let response: NameResponse = self.post( "thumbnails", &body).await?;
        Ok( response.name )
    }

    fn tile_url (&self, map: &MapHandle)->String {
        format!("{}/v1/{}/tiles/{{z}}/{{x}}/{{y}}", self.base_url, map.name)
    }

    fn download_url (&self, thumbnail_name: &str)->String {
        format!("{}/v1/{}:getPixels", self.base_url, thumbnail_name)
    }
}
