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


use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    catalog::ImageryCatalog,
    errors::{invalid_input, upstream_error, Result},
    expr::{self, Expression},
    region::{Region, INVALID_GEOJSON},
    GeeConfig,
};

/// images are sorted by this property to get the least cloudy one first
pub const CLOUD_COVER: &str = "CLOUD_COVER";

/// the JSON body of a `download_imagery` request. All fields are optional on the wire so that we
/// can report missing or malformed regions ourselves
#[derive(Deserialize,Serialize,Debug,Clone,Default)]
pub struct ImageryRequest {
    #[serde(default)]
    pub geojson: Option<Value>,
    pub collection: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// the response of a successful `download_imagery` request
#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
pub struct ImageryResult {
    /// preview map id
    pub url: String,
    /// preview map token
    pub token: String,
    pub geotiff_url: String,
    pub tile_url: String,
}

/// a validated imagery request
#[derive(Debug,Clone,PartialEq)]
pub struct ImageryQuery {
    pub region: Region,
    pub collection: String,
    pub start_date: String,
    pub end_date: String,
}

impl ImageryQuery {
    pub fn from_request (request: &ImageryRequest, config: &GeeConfig)->Result<Self> {
        let geojson = request.geojson.as_ref().ok_or_else( || invalid_input(INVALID_GEOJSON))?;
        let region = Region::from_feature_container( geojson)?;

        let collection = request.collection.clone().unwrap_or_else( || config.default_collection.clone());
        // dates are passed on as-is, Earth Engine reports the ones it cannot parse
        let start_date = request.start_date.clone().unwrap_or_else( || config.default_start_date.clone());
        let end_date = request.end_date.clone().unwrap_or_else( || config.default_end_date.clone());

        Ok( ImageryQuery { region, collection, start_date, end_date } )
    }

    /// the collection filtered by region and date, sorted by ascending cloud cover
    pub fn collection_node (&self)->expr::ValueNode {
        let geometry = expr::polygon( &self.region);
        let coll = expr::load_image_collection( &self.collection);
        let coll = expr::filter_bounds( coll, geometry);
        let coll = expr::filter_date( coll, &self.start_date, &self.end_date);
        expr::sort_ascending( coll, CLOUD_COVER)
    }

    pub fn size_expr (&self)->Expression {
        Expression::new( expr::size( self.collection_node()))
    }

    pub fn image_node (&self)->expr::ValueNode {
        expr::clip( expr::first( self.collection_node()), expr::polygon( &self.region))
    }

    pub fn image_expr (&self)->Expression {
        Expression::new( self.image_node())
    }

    pub fn download_expr (&self, scale: f64)->Expression {
        Expression::new( expr::clip_to_bounds_and_scale( self.image_node(), expr::polygon( &self.region), scale))
    }
}

/// run a query against the catalog. Empty result sets are upstream errors since there is no image to preview
pub async fn run_imagery_query (catalog: &dyn ImageryCatalog, query: &ImageryQuery, config: &GeeConfig)->Result<ImageryResult> {
    debug!("querying {} from {} to {} for region with {} vertices",
        query.collection, query.start_date, query.end_date, query.region.outer_ring().len());

    let size = catalog.compute_value( &query.size_expr()).await?;
    match size.as_u64() {
        Some(0) => return Err( upstream_error( format!("no images in {} for the given region between {} and {}",
                                                       query.collection, query.start_date, query.end_date))),
        Some(n) => debug!("{n} matching images in {}", query.collection),
        None => return Err( upstream_error( format!("unexpected collection size: {size}")))
    }

    let map = catalog.create_map( &query.image_expr(), &config.preview).await?;
    let thumbnail = catalog.create_thumbnail( &query.download_expr( config.download_scale)).await?;

    info!("created preview map {} for {}", map.name, query.collection);
    Ok( ImageryResult {
        tile_url: catalog.tile_url( &map),
        geotiff_url: catalog.download_url( &thumbnail),
        url: map.name,
        token: map.token,
    })
}
