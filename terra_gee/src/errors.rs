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


use axum::{http::StatusCode, response::{IntoResponse, Response}};
use thiserror::Error;
use terra_common::net::TerraNetError;
use terra_server::json_error_response;

pub type Result<T> = std::result::Result<T, TerraGeeError>;

#[derive(Error,Debug)]
pub enum TerraGeeError {
    /// bad or missing request fields
    #[error("{0}")]
    InvalidInputError(String),

    /// imagery service failure, including empty result sets
    #[error("{0}")]
    UpstreamError(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("build error: {0}")]
    TerraBuildError( #[from] terra_build::TerraBuildError),

    #[error("IO error: {0}")]
    IOError( #[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError( #[from] serde_json::Error),

    #[error("JWT error: {0}")]
    JwtError( #[from] jsonwebtoken::errors::Error),
}

impl TerraGeeError {
    pub fn status (&self)->StatusCode {
        match self {
            TerraGeeError::InvalidInputError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<TerraNetError> for TerraGeeError {
    fn from (e: TerraNetError)->Self {
        match e {
            TerraNetError::OpFailed(msg) => TerraGeeError::UpstreamError(msg),
            other => TerraGeeError::UpstreamError(other.to_string())
        }
    }
}

impl IntoResponse for TerraGeeError {
    fn into_response(self) -> Response {
        json_error_response( self.status(), &self.to_string(), None)
    }
}

pub fn invalid_input (msg: impl ToString)->TerraGeeError {
    TerraGeeError::InvalidInputError(msg.to_string())
}

pub fn upstream_error (msg: impl ToString)->TerraGeeError {
    TerraGeeError::UpstreamError(msg.to_string())
}

pub fn config_error (msg: impl ToString)->TerraGeeError {
    TerraGeeError::ConfigError(msg.to_string())
}
