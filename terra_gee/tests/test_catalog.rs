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

use std::{net::SocketAddr, path::PathBuf, sync::{Arc, Mutex}, time::Duration};
use anyhow::Result;
use axum::{extract::State, http::{header, HeaderMap, StatusCode, Uri}, response::IntoResponse, Json, Router};
use reqwest::Client;
use serde_json::{json, Value};

use terra_common::fs::EnvPathBuf;
use terra_gee::{
    expr::{self, Expression}, run_imagery_query, GeeCatalog, GeeConfig, ImageryCatalog, ImageryQuery, PreviewConfig,
    Region, StaticToken, TerraGeeError,
};

// run with "cargo test test_xx -- --nocapture"

#[derive(Debug,Clone)]
struct Recorded {
    path: String,
    auth: Option<String>,
    body: Value,
}

type Log = Arc<Mutex<Vec<Recorded>>>;

/// a minimal stand-in for the Earth Engine REST API
async fn fake_ee (State(log): State<Log>, uri: Uri, headers: HeaderMap, Json(body): Json<Value>)->impl IntoResponse {
    let path = uri.path().to_string();
    let auth = headers.get( header::AUTHORIZATION).and_then( |v| v.to_str().ok()).map( |s| s.to_string());
    log.lock().unwrap().push( Recorded { path: path.clone(), auth, body: body.clone() });

    if path.starts_with("/v1/projects/unregistered/") {
        let err = json!({ "error": { "code": 403, "message": "Project 'unregistered' is not registered to use Earth Engine.", "status": "PERMISSION_DENIED" } });
        (StatusCode::FORBIDDEN, Json(err))
    } else if path.ends_with("/value:compute") {
        (StatusCode::OK, Json( json!({ "result": 4 })))
    } else if path.ends_with("/maps") {
        (StatusCode::OK, Json( json!({ "name": "projects/p1/maps/abc123" })))
    } else if path.ends_with("/thumbnails") && body["fileFormat"] == "ZIPPED_GEO_TIFF" {
        (StatusCode::OK, Json( json!({ "name": "projects/p1/thumbnails/def456" })))
    } else {
        (StatusCode::NOT_FOUND, Json( json!({ "error": { "code": 404, "message": "not found" } })))
    }
}

async fn spawn_fake_ee ()->Result<(String,Log)> {
    let log: Log = Arc::new( Mutex::new( Vec::new()));
    let router = Router::new().fallback( fake_ee).with_state( log.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn( async move { axum::serve( listener, router).await });
    Ok( (format!("http://{addr}/"), log) )
}

fn catalog (base_url: &str, project: &str)->GeeCatalog {
    GeeCatalog::new( Client::new(), base_url, project, Arc::new( StaticToken("test-token".to_string())))
}

fn test_config (base_url: &str)->GeeConfig {
    GeeConfig {
        credentials: EnvPathBuf::from( PathBuf::from("/nonexistent/key.json")),
        project: Some("p1".to_string()),
        base_url: base_url.to_string(),
        request_timeout: Duration::from_secs(10),
        default_collection: "LANDSAT/LC08/C02/T1_L2".to_string(),
        default_start_date: "2023-01-01".to_string(),
        default_end_date: "2024-12-31".to_string(),
        download_scale: 30.0,
        preview: PreviewConfig { bands: vec!["SR_B4".into(), "SR_B3".into(), "SR_B2".into()], min: Some(7000.0), max: Some(14000.0) },
    }
}

fn test_query ()->ImageryQuery {
    ImageryQuery {
        region: Region { rings: vec![ vec![ vec![0.0,0.0], vec![1.0,0.0], vec![1.0,1.0], vec![0.0,0.0] ] ] },
        collection: "LANDSAT/LC08/C02/T1_L2".to_string(),
        start_date: "2023-01-01".to_string(),
        end_date: "2024-12-31".to_string(),
    }
}

#[tokio::test]
async fn test_rest_requests()->Result<()> {
    let (base_url, log) = spawn_fake_ee().await?;
    let config = test_config( &base_url);
    let catalog = catalog( &base_url, "p1");

    let result = run_imagery_query( &catalog, &test_query(), &config).await?;
    println!("{result:?}");

    let base = base_url.trim_end_matches('/');
    assert_eq!( result.url, "projects/p1/maps/abc123");
    assert_eq!( result.token, "");
    assert_eq!( result.tile_url, format!("{base}/v1/projects/p1/maps/abc123/tiles/{{z}}/{{x}}/{{y}}"));
    assert_eq!( result.geotiff_url, format!("{base}/v1/projects/p1/thumbnails/def456:getPixels"));

    let log = log.lock().unwrap();
    let paths: Vec<&str> = log.iter().map( |r| r.path.as_str()).collect();
    assert_eq!( paths, vec!["/v1/projects/p1/value:compute", "/v1/projects/p1/maps", "/v1/projects/p1/thumbnails"]);
    assert!( log.iter().all( |r| r.auth.as_deref() == Some("Bearer test-token")));

    let map_request = &log[1].body;
    assert_eq!( map_request["fileFormat"], "AUTO_JPEG_PNG");
    assert_eq!( map_request["bandIds"], json!(["SR_B4", "SR_B3", "SR_B2"]));
    assert_eq!( map_request["visualizationOptions"]["ranges"][0]["max"], 14000.0);
    assert_eq!( map_request["expression"]["result"], "0");
    Ok(())
}

#[tokio::test]
async fn test_upstream_message()->Result<()> {
    let (base_url, _log) = spawn_fake_ee().await?;
    let catalog = catalog( &base_url, "unregistered");

    let expr = Expression::new( expr::size( expr::load_image_collection("LANDSAT/LC08/C02/T1_L2")));
    match catalog.compute_value( &expr).await {
        Err(TerraGeeError::UpstreamError(msg)) => {
            println!("upstream error: {msg}");
            assert_eq!( msg, "Project 'unregistered' is not registered to use Earth Engine.");
        }
        other => panic!("expected upstream error, got {other:?}")
    }
    Ok(())
}

#[tokio::test]
async fn test_unreachable_service()->Result<()> {
    // nothing listens on port 9 (discard)
    let catalog = catalog( "http://127.0.0.1:9", "p1");
    let expr = Expression::new( expr::size( expr::load_image_collection("X")));
    let res = catalog.compute_value( &expr).await;
    assert!( matches!( res, Err(TerraGeeError::UpstreamError(_))));
    Ok(())
}
