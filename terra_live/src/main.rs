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

use std::{path::{Path, PathBuf}, sync::Arc};
use anyhow::Result;
use axum::Router;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::info;

use terra_build::load_config_path;
use terra_server::{cors_layer, init_tracing, spawn_server_task, ServerConfig};
use terra_gee::{GeeCatalog, GeeConfig, GeeService};
use terra_lidar::{LidarConfig, LidarService};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "serve satellite imagery queries and LiDAR point cloud conversion")]
pub struct Args {
    /// server config file (default: lookup of server.ron)
    #[arg(long)]
    pub server_config: Option<PathBuf>,

    /// Earth Engine config file (default: lookup of gee.ron)
    #[arg(long)]
    pub gee_config: Option<PathBuf>,

    /// LiDAR config file (default: lookup of lidar.ron)
    #[arg(long)]
    pub lidar_config: Option<PathBuf>,
}

#[tokio::main]
async fn main()->Result<()> {
    terra_build::set_bin_context!();
    init_tracing();

    let args = Args::parse();

    let server_config: ServerConfig = match &args.server_config {
        Some(path) => load_config_path( path)?,
        None => terra_server::load_config( "server.ron")?
    };
    let gee_config: GeeConfig = match &args.gee_config {
        Some(path) => load_config_path( path)?,
        None => terra_gee::load_config( "gee.ron")?
    };
    let lidar_config: LidarConfig = match &args.lidar_config {
        Some(path) => load_config_path( path)?,
        None => terra_lidar::load_config( "lidar.ron")?
    };

    // no point in starting if we can't talk to Earth Engine
    let catalog = GeeCatalog::from_config( &gee_config)?;
    info!("storing LiDAR uploads in {:?}", lidar_config.storage_dir.as_path());

    let gee = GeeService::new( Arc::new(catalog), Arc::new(gee_config));
    let lidar = LidarService::new( Arc::new(lidar_config));

    let router = Router::new()
        .merge( gee.router())
        .merge( lidar.router())
        .layer( cors_layer( &server_config.cors)?)
        .layer( TraceLayer::new_for_http());

    let server_task = spawn_server_task( &server_config, router).await?;
    Ok( server_task.await?? )
}
