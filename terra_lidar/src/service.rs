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
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use futures::Stream;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use terra_common::{if_let, net::mime_type_for_path, poll::{Clock, TokioClock}};
use crate::{
    artifact::read_artifact,
    convert::ConversionInvoker,
    errors::{missing_file, Result, TerraLidarError, NO_FILE_PART},
    locks::FileLocks,
    pipeline::{PipelineState, UploadRun},
    upload::{await_visible, validate_filename, write_asset},
    LidarConfig,
};

pub const UPLOAD_ROUTE: &str = "/api/upload";
pub const FILE_ROUTE: &str = "/api/file";

pub const CONVERSION_SUCCESSFUL: &str = "Conversion successful";
const FILE_FIELD: &str = "file";

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct ConversionResponse {
    pub message: String,
    pub output: String,
}

#[derive(Clone)]
pub struct LidarService {
    config: Arc<LidarConfig>,
    invoker: ConversionInvoker,
    locks: FileLocks,
    clock: Arc<dyn Clock>,
}

impl LidarService {
    pub fn new (config: Arc<LidarConfig>)->Self {
        let invoker = ConversionInvoker::new( config.converter.as_path(), config.convert_timeout);
        LidarService { config, invoker, locks: FileLocks::new(), clock: Arc::new(TokioClock) }
    }

    /// use a different clock for storage visibility polling
    pub fn with_clock (mut self, clock: Arc<dyn Clock>)->Self {
        self.clock = clock;
        self
    }

    pub fn router (self)->Router {
        let body_limit = self.config.max_upload_size;
        Router::new()
            .route( UPLOAD_ROUTE, post( upload))
            .route( FILE_ROUTE, get( file))
            .layer( DefaultBodyLimit::max( body_limit))
            .with_state( self)
    }

    /// store the uploaded chunks under `filename` within the storage directory and convert the stored file.
    /// Returns the converter output. Uploads of the same filename are processed one at a time
    pub async fn process_upload<S,E> (&self, filename: &str, chunks: S)->Result<String>
        where S: Stream<Item=std::result::Result<Bytes,E>>, E: Into<TerraLidarError>
    {
        let filename = validate_filename( filename)?;
        let mut run = UploadRun::new( filename);

        let res = {
            let _guard = self.locks.lock( filename).await;
            self.store_and_convert( &mut run, chunks).await
        };
        self.locks.prune();

        if res.is_err() { run.fail(); }
        res
    }

    async fn store_and_convert<S,E> (&self, run: &mut UploadRun, chunks: S)->Result<String>
        where S: Stream<Item=std::result::Result<Bytes,E>>, E: Into<TerraLidarError>
    {
        let storage_dir = self.config.storage_dir.as_path();
        let path = storage_dir.join( run.filename());

        let len = write_asset( &path, chunks).await?;
        await_visible( &path, &self.config.visibility, self.clock.as_ref()).await?;
        run.advance( PipelineState::Stored);
        info!("stored upload {path:?} ({len} bytes)");

        run.advance( PipelineState::Converting);
        let output = self.invoker.convert( &path, storage_dir).await?;
        run.advance( PipelineState::Succeeded);

        Ok(output)
    }
}

async fn upload (State(service): State<LidarService>, mut multipart: Multipart)->Response {
    match receive_upload( &service, &mut multipart).await {
        Ok(output) => {
            Json( ConversionResponse { message: CONVERSION_SUCCESSFUL.to_string(), output }).into_response()
        }
        Err(e) => {
            warn!("upload failed: {e}");
            e.into_response()
        }
    }
}

/// process the first `file` part that has a filename. Other parts are ignored
async fn receive_upload (service: &LidarService, multipart: &mut Multipart)->Result<String> {
    while let Some(field) = multipart.next_field().await? {
        if_let! {
            Some(FILE_FIELD) = field.name(),
            Some(filename) = field.file_name().map( |s| s.to_string()) => {
                return service.process_upload( &filename, field).await
            }
        }
    }
    Err( missing_file( NO_FILE_PART))
}

async fn file (State(service): State<LidarService>)->Response {
    let path = service.config.metadata_path();

    match read_artifact( &path).await {
        Ok(data) => ([(header::CONTENT_TYPE, mime_type_for_path( &path))], data).into_response(),
        Err(e) => {
            warn!("failed to serve {path:?}: {e}");
            e.into_response()
        }
    }
}
