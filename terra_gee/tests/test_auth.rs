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

use std::{collections::HashMap, fs, path::PathBuf, sync::{Arc, Mutex}, time::Duration};
use anyhow::Result;
use axum::{extract::State, Form, Json, Router};
use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde_json::{json, Value};

use terra_common::fs::EnvPathBuf;
use terra_gee::{
    AccessTokenProvider, Claims, GeeCatalog, GeeConfig, PreviewConfig, ServiceAccountKey, ServiceAccountTokenSource,
    TerraGeeError, EE_SCOPE, JWT_BEARER_GRANT,
};

// run with "cargo test test_xx -- --nocapture"

const TEST_KEY: &str = include_str!("data/test_key.pem");
const TEST_PUB_KEY: &str = include_str!("data/test_key_pub.pem");

fn key_json (private_key: &str, token_uri: &str, project_id: Option<&str>)->Value {
    let mut v = json!({
        "type": "service_account",
        "client_email": "terra@test-project.iam.gserviceaccount.com",
        "private_key_id": "0123456789abcdef",
        "private_key": private_key,
        "token_uri": token_uri,
    });
    if let Some(id) = project_id { v["project_id"] = json!(id); }
    v
}

fn config_for (credentials: PathBuf, project: Option<&str>)->GeeConfig {
    GeeConfig {
        credentials: EnvPathBuf::from( credentials),
        project: project.map( |p| p.to_string()),
        base_url: "https://earthengine.googleapis.com".to_string(),
        request_timeout: Duration::from_secs(10),
        default_collection: "LANDSAT/LC08/C02/T1_L2".to_string(),
        default_start_date: "2023-01-01".to_string(),
        default_end_date: "2024-12-31".to_string(),
        download_scale: 30.0,
        preview: PreviewConfig::default(),
    }
}

#[test]
fn test_key_file()->Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("key.json");
    fs::write( &path, key_json( TEST_KEY, "https://oauth2.googleapis.com/token", Some("test-project")).to_string())?;

    let key = ServiceAccountKey::from_file( &path)?;
    assert_eq!( key.client_email, "terra@test-project.iam.gserviceaccount.com");
    assert_eq!( key.project_id.as_deref(), Some("test-project"));

    let now = Utc::now();
    let claims = Claims::new( &key, EE_SCOPE, now);
    assert_eq!( claims.aud, "https://oauth2.googleapis.com/token");
    assert_eq!( claims.exp - claims.iat, 3600);
    Ok(())
}

#[test]
fn test_signed_assertion()->Result<()> {
    let key: ServiceAccountKey = serde_json::from_value( key_json( TEST_KEY, "https://oauth2.googleapis.com/token", None))?;
    let source = ServiceAccountTokenSource::new( key, Client::new())?;
    let assertion = source.assertion( Utc::now())?;

    let mut validation = Validation::new( Algorithm::RS256);
    validation.set_audience( &["https://oauth2.googleapis.com/token"]);
    let decoded = decode::<Claims>( &assertion, &DecodingKey::from_rsa_pem( TEST_PUB_KEY.as_bytes())?, &validation)?;
    println!("{:?}", decoded.claims);

    assert_eq!( decoded.claims.iss, "terra@test-project.iam.gserviceaccount.com");
    assert_eq!( decoded.claims.scope, "https://www.googleapis.com/auth/earthengine");
    Ok(())
}

#[test]
fn test_invalid_private_key() {
    let key: ServiceAccountKey = serde_json::from_value( key_json( "not a key", "https://oauth2.googleapis.com/token", None)).unwrap();
    assert!( matches!( ServiceAccountTokenSource::new( key, Client::new()), Err(TerraGeeError::JwtError(_))));
}

async fn fake_token_endpoint (State(log): State<Arc<Mutex<Vec<HashMap<String,String>>>>>, Form(form): Form<HashMap<String,String>>)->Json<Value> {
    log.lock().unwrap().push( form);
    Json( json!({ "access_token": "ya29.test", "expires_in": 3599, "token_type": "Bearer" }))
}

#[tokio::test]
async fn test_token_exchange()->Result<()> {
    let log = Arc::new( Mutex::new( Vec::new()));
    let router = Router::new().route( "/token", axum::routing::post( fake_token_endpoint)).with_state( log.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let token_uri = format!("http://{}/token", listener.local_addr()?);
    tokio::spawn( async move { axum::serve( listener, router).await });

    let key: ServiceAccountKey = serde_json::from_value( key_json( TEST_KEY, &token_uri, None))?;
    let source = ServiceAccountTokenSource::new( key, Client::new())?;

    assert_eq!( source.access_token().await?, "ya29.test");
    assert_eq!( source.access_token().await?, "ya29.test"); // cached

    let log = log.lock().unwrap();
    assert_eq!( log.len(), 1);
    assert_eq!( log[0]["grant_type"], JWT_BEARER_GRANT);
    assert!( log[0]["assertion"].split('.').count() == 3);
    Ok(())
}

async fn bad_lifetime_endpoint ()->Json<Value> {
    Json( json!({ "access_token": "ya29.test", "expires_in": i64::MAX, "token_type": "Bearer" }))
}

#[tokio::test]
async fn test_invalid_token_lifetime()->Result<()> {
    let router = Router::new().route( "/token", axum::routing::post( bad_lifetime_endpoint));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let token_uri = format!("http://{}/token", listener.local_addr()?);
    tokio::spawn( async move { axum::serve( listener, router).await });

    let key: ServiceAccountKey = serde_json::from_value( key_json( TEST_KEY, &token_uri, None))?;
    let source = ServiceAccountTokenSource::new( key, Client::new())?;

    match source.access_token().await {
        Err(TerraGeeError::UpstreamError(msg)) => {
            println!("{msg}");
            assert!( msg.contains("invalid token lifetime"));
        }
        other => panic!("expected UpstreamError, got {other:?}")
    }
    Ok(())
}

#[test]
fn test_catalog_fails_fast() {
    // missing key file
    let res = GeeCatalog::from_config( &config_for( PathBuf::from("/nonexistent/key.json"), Some("p1")));
    assert!( matches!( res, Err(TerraGeeError::ConfigError(_))));

    // no project in config or key
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("key.json");
    fs::write( &path, key_json( TEST_KEY, "https://oauth2.googleapis.com/token", None).to_string()).unwrap();
    let res = GeeCatalog::from_config( &config_for( path.clone(), None));
    assert!( matches!( res, Err(TerraGeeError::ConfigError(_))));

    // project from key file
    fs::write( &path, key_json( TEST_KEY, "https://oauth2.googleapis.com/token", Some("test-project")).to_string()).unwrap();
    let catalog = GeeCatalog::from_config( &config_for( path, None)).unwrap();
    assert_eq!( catalog.project(), "test-project");
}

#[test]
fn test_gee_config()->Result<()> {
    let config: GeeConfig = terra_gee::load_config( "gee.ron")?;
    println!("{config:?}");
    assert_eq!( config.default_collection, "LANDSAT/LC08/C02/T1_L2");
    assert_eq!( config.download_scale, 30.0);
    assert_eq!( config.request_timeout, Duration::from_secs(60));
    assert!( config.credentials.ends_with("configs/terra_gee/service_account.json"));
    Ok(())
}
