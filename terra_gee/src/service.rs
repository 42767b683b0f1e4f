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
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::{info, warn};

use crate::{
    catalog::ImageryCatalog,
    errors::{invalid_input, Result},
    query::{run_imagery_query, ImageryQuery, ImageryRequest, ImageryResult},
    GeeConfig,
};

pub const DOWNLOAD_IMAGERY_ROUTE: &str = "/api/download_imagery";

#[derive(Clone)]
pub struct GeeService {
    catalog: Arc<dyn ImageryCatalog>,
    config: Arc<GeeConfig>,
}

impl GeeService {
    pub fn new (catalog: Arc<dyn ImageryCatalog>, config: Arc<GeeConfig>)->Self {
        GeeService { catalog, config }
    }

    pub fn router (self)->Router {
        Router::new()
            .route( DOWNLOAD_IMAGERY_ROUTE, post( download_imagery))
            .with_state( self)
    }

    pub async fn query (&self, request: &ImageryRequest)->Result<ImageryResult> {
        let query = ImageryQuery::from_request( request, &self.config)?;
        run_imagery_query( self.catalog.as_ref(), &query, &self.config).await
    }
}

async fn download_imagery (State(service): State<GeeService>, payload: std::result::Result<Json<ImageryRequest>,JsonRejection>)->Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("rejected imagery request: {}", rejection.body_text());
            return invalid_input( rejection.body_text()).into_response()
        }
    };

    match service.query( &request).await {
        Ok(result) => {
            info!("imagery request served: {}", result.url);
            Json(result).into_response()
        }
        Err(e) => {
            warn!("imagery request failed: {e}");
            e.into_response()
        }
    }
}
