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


//! OAuth2 access tokens for Google service accounts
//!
//! We sign a RS256 JWT assertion with the private key of the service account and exchange it at the
//! `token_uri` of the key file for a bearer token, which is cached until shortly before it expires.

use std::{path::Path, sync::Arc};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use terra_common::{fs::filepath_contents_as_string, net::post_form_query};
use crate::{errors::{config_error, upstream_error, Result}, EE_SCOPE};

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// lifetime of assertions we sign (max allowed by Google)
const ASSERTION_LIFETIME: i64 = 3600;

/// tokens are refreshed if they expire within this time
const REFRESH_MARGIN: i64 = 60;

/// the parts of a Google service account key file we need
#[derive(Deserialize,Debug,Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,

    #[serde(default="default_token_uri")]
    pub token_uri: String,

    #[serde(default)]
    pub project_id: Option<String>,
}

fn default_token_uri()->String { DEFAULT_TOKEN_URI.to_string() }

impl ServiceAccountKey {
    pub fn from_file (path: impl AsRef<Path>)->Result<Self> {
        let path = path.as_ref();
        let json = filepath_contents_as_string( &path)
            .map_err( |e| config_error( format!("failed to read service account key {path:?}: {e}")))?;
        Ok( serde_json::from_str( &json)? )
    }
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new (key: &ServiceAccountKey, scope: &str, now: DateTime<Utc>)->Self {
        let iat = now.timestamp();
        Claims {
            iss: key.client_email.clone(),
            scope: scope.to_string(),
            aud: key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME,
        }
    }
}

/// something that can produce valid bearer tokens for Earth Engine requests
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token (&self)->Result<String>;
}

/// a fixed token (e.g. from `gcloud auth print-access-token`)
pub struct StaticToken(pub String);

#[async_trait]
impl AccessTokenProvider for StaticToken {
    async fn access_token (&self)->Result<String> {
        Ok( self.0.clone() )
    }
}

#[derive(Deserialize,Debug)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug,Clone)]
struct CachedToken {
    token: String,
    expires: DateTime<Utc>,
}

pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scope: String,
    client: Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    /// this fails if the private key of the service account is not a valid RSA PEM key
    pub fn new (key: ServiceAccountKey, client: Client)->Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem( key.private_key.as_bytes())?;
        Ok( ServiceAccountTokenSource { key, encoding_key, scope: EE_SCOPE.to_string(), client, cached: Mutex::new(None) } )
    }

    pub fn service_account (&self)->&str {
        &self.key.client_email
    }

    pub fn assertion (&self, now: DateTime<Utc>)->Result<String> {
        let claims = Claims::new( &self.key, &self.scope, now);
        Ok( encode( &Header::new( Algorithm::RS256), &claims, &self.encoding_key)? )
    }

    async fn request_token (&self)->Result<CachedToken> {
        let now = Utc::now();
        let assertion = self.assertion( now)?;
        let form = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

        let response: TokenResponse = post_form_query( &self.client, &self.key.token_uri, &form).await
            .map_err( |e| upstream_error( format!("failed to obtain access token for {}: {e}", self.key.client_email)))?;

        let expires = TimeDelta::try_seconds( response.expires_in)
            .and_then( |dt| now.checked_add_signed( dt))
            .ok_or_else( || upstream_error( format!("invalid token lifetime: {}s", response.expires_in)))?;

        info!("obtained access token for {} (expires in {}s)", self.key.client_email, response.expires_in);
        Ok( CachedToken { token: response.access_token, expires } )
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountTokenSource {
    async fn access_token (&self)->Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(ct) = cached.as_ref() {
            if ct.expires - TimeDelta::seconds(REFRESH_MARGIN) > Utc::now() {
                return Ok( ct.token.clone() )
            }
            debug!("access token for {} about to expire", self.key.client_email);
        }

        let ct = self.request_token().await?;
        let token = ct.token.clone();
        *cached = Some(ct);
        Ok(token)
    }
}
