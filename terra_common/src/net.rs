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


//! common utility functions for network operations

use std::{collections::HashMap, path::Path};
use reqwest::{header::{HeaderMap,HeaderValue,CONTENT_TYPE}, Client, StatusCode, Response};
use lazy_static::lazy_static;
use serde::{de::DeserializeOwned,Serialize};
use serde_json::Value;

use crate::{define_error, fs::extension};

define_error!{ pub TerraNetError =
    IOError(#[from] std::io::Error) : "IO error: {0}",
    NotFoundError(String) : "not found {0}",
    HttpError(#[from] reqwest::Error) : "http error: {0}",
    JsonError(#[from] serde_json::Error) : "JSON error: {0}",
    OpFailed(String) : "operation failed: {0}"
}

pub type Result<T> = std::result::Result<T, TerraNetError>;

/// POST `data` as JSON and deserialize the JSON response. Non-success status codes are mapped into
/// `NotFoundError` or `OpFailed` with the error message the server reported (if any)
pub async fn post_json_query<T,U> (client: &Client, url: &str, headers: Option<HeaderMap>, data: &T) -> Result<U>
    where T: Serialize + ?Sized, U: DeserializeOwned
{
    let mut hm = headers.unwrap_or_default();
    hm.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let response = client.post( url).headers( hm).json( data).send().await?;
    json_response( url, response).await
}

/// POST a url-encoded form and deserialize the JSON response
pub async fn post_form_query<T,U> (client: &Client, url: &str, form: &T) -> Result<U>
    where T: Serialize + ?Sized, U: DeserializeOwned
{
    let response = client.post( url).form( form).send().await?;
    json_response( url, response).await
}

async fn json_response<U> (url: &str, response: Response) -> Result<U> where U: DeserializeOwned {
    let status = response.status();
    if status.is_success() {
        let bytes = response.bytes().await?;
        from_json( &bytes)
    } else {
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => Err( TerraNetError::NotFoundError( format!("{url}: {}", error_message( status, &body)))),
            _ => Err( TerraNetError::OpFailed( error_message( status, &body)))
        }
    }
}

/// extract a human readable message from an error response body. This understands the
/// `{"error":{"message":..}}` form of Google APIs and the `{"error_description":..}` form of OAuth2
pub fn error_message (status: StatusCode, body: &str)->String {
    if let Ok(v) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = v.pointer("/error/message").and_then( |m| m.as_str()) {
            return msg.to_string()
        }
        if let Some(msg) = v.get("error_description").and_then( |m| m.as_str()) {
            return msg.to_string()
        }
        if let Some(msg) = v.get("error").and_then( |m| m.as_str()) {
            return msg.to_string()
        }
    }

    if body.is_empty() {
        format!("response status {status}")
    } else {
        format!("response status {status}: {body}")
    }
}

pub fn from_json<T> (bytes: &[u8])->Result<T> where T: DeserializeOwned {
    Ok( serde_json::from_slice(bytes)? )
}

lazy_static! {
    static ref MIME_MAP: HashMap<&'static str,&'static str> = HashMap::from([
        ("json", "application/json"),
        ("geojson", "application/geo+json"),
        ("html", "text/html"),
        ("js", "text/javascript"),
        ("css", "text/css"),
        ("txt", "text/plain"),
        ("png", "image/png"),
        ("jpg", "image/jpeg"),
        ("tif", "image/tiff"),
        ("tiff", "image/tiff"),
        ("bin", "application/octet-stream"),
    ]);
}

/// content type for the extension of `path`, defaulting to `application/octet-stream`
pub fn mime_type_for_path (path: impl AsRef<Path>)->&'static str {
    let path = path.as_ref();
    extension( &path).and_then( |ext| MIME_MAP.get( ext)).copied().unwrap_or("application/octet-stream")
}
