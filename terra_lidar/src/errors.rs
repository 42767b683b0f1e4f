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


use axum::{extract::multipart::MultipartError, http::StatusCode, response::{IntoResponse, Response}};
use thiserror::Error;
use terra_server::json_error_response;

pub type Result<T> = std::result::Result<T, TerraLidarError>;

pub const NO_FILE_PART: &str = "No file part";
pub const NO_SELECTED_FILE: &str = "No selected file";
pub const UNSUPPORTED_FILE_TYPE: &str = "Unsupported file type. Please upload a .laz file.";
pub const FILE_NOT_FOUND_AFTER_SAVING: &str = "File not found after saving";
pub const CONVERSION_FAILED: &str = "An error occurred during conversion";
pub const FILE_NOT_FOUND: &str = "File not found";

#[derive(Error,Debug)]
pub enum TerraLidarError {
    #[error("{0}")]
    MissingFileError(String),

    #[error("{0}")]
    UnsupportedTypeError(String),

    #[error("{0}")]
    InvalidInputError(String),

    #[error("{0}")]
    StorageVisibilityError(String),

    /// carries the stderr output of the converter
    #[error("conversion failed: {0}")]
    ConversionError(String),

    #[error("{0}")]
    NotFoundError(String),

    #[error("upload error: {0}")]
    MultipartError( #[from] MultipartError),

    #[error("IO error: {0}")]
    IOError( #[from] std::io::Error),
}

impl TerraLidarError {
    pub fn status (&self)->StatusCode {
        match self {
            TerraLidarError::MissingFileError(_) |
            TerraLidarError::UnsupportedTypeError(_) |
            TerraLidarError::InvalidInputError(_) => StatusCode::BAD_REQUEST,
            TerraLidarError::NotFoundError(_) => StatusCode::NOT_FOUND,
            TerraLidarError::MultipartError(e) => e.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for TerraLidarError {
    fn into_response(self) -> Response {
        match &self {
            TerraLidarError::ConversionError(details) => json_error_response( self.status(), CONVERSION_FAILED, Some(details)),
            TerraLidarError::NotFoundError(_) => json_error_response( self.status(), FILE_NOT_FOUND, None),
            TerraLidarError::MultipartError(e) => json_error_response( self.status(), &e.body_text(), None),
            _ => json_error_response( self.status(), &self.to_string(), None)
        }
    }
}

pub fn missing_file (msg: impl ToString)->TerraLidarError {
    TerraLidarError::MissingFileError(msg.to_string())
}

pub fn invalid_input (msg: impl ToString)->TerraLidarError {
    TerraLidarError::InvalidInputError(msg.to_string())
}

pub fn conversion_error (msg: impl ToString)->TerraLidarError {
    TerraLidarError::ConversionError(msg.to_string())
}
