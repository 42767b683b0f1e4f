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

use std::net::SocketAddr;
use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;


pub mod errors;
pub use errors::*;

terra_build::define_load_config!{}

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct ServerConfig {
    pub sock_addr: SocketAddr,

    #[serde(default)]
    pub cors: CorsConfig,
}

impl ServerConfig {
    pub fn url(&self) -> String {
        format!("http://{}", self.sock_addr)
    }
}

/// allowed origins for cross-origin requests. An empty list allows any origin
#[derive(Deserialize,Serialize,Debug,Clone,Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allow_origins: Vec<String>,
}

/// bind the configured socket address and serve `router` from a spawned task.
/// Binding happens before spawning so that an unavailable address is reported to the caller
pub async fn spawn_server_task (config: &ServerConfig, router: Router) -> TerraServerResult<JoinHandle<TerraServerResult<()>>> {
    let listener = tokio::net::TcpListener::bind( config.sock_addr).await?;
    let router_svc = router.into_make_service_with_connect_info::<SocketAddr>();
    info!("serving {}", config.url());

    Ok( tokio::spawn( async move {
        axum::serve( listener, router_svc).await?;
        Ok(())
    }))
}

/// this only succeeds if there is no global subscriber set yet. Use RUST_LOG to set the max level
pub fn init_tracing ()->bool {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env())
        .try_init()
        .is_ok()
}

pub fn cors_layer (config: &CorsConfig) -> TerraServerResult<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allow_origins.is_empty() {
        Ok( layer.allow_origin(Any) )
    } else {
        let origins = config.allow_origins.iter()
            .map( |o| HeaderValue::from_str(o).map_err( |_| TerraServerError::InvalidOrigin(o.clone())))
            .collect::<TerraServerResult<Vec<HeaderValue>>>()?;
        Ok( layer.allow_origin(origins) )
    }
}

//--- handler utility functions

/// a JSON `{"error":..[,"details":..]}` response with the given status
pub fn json_error_response (status: StatusCode, error: &str, details: Option<&str>) -> Response {
    let body = match details {
        Some(details) => json!({ "error": error, "details": details }),
        None => json!({ "error": error })
    };
    (status, Json(body)).into_response()
}
