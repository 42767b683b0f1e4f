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


use geojson::{Geometry, PolygonType, Value as GeoValue};
use serde_json::Value;

use crate::errors::{invalid_input, Result};

pub const INVALID_GEOJSON: &str = "Invalid GeoJSON format";

/// the polygon of a client request, which is only used as a geometry filter
#[derive(Debug,Clone,PartialEq)]
pub struct Region {
    /// outer ring first, followed by optional holes. Positions are `[lon,lat]`
    pub rings: PolygonType,
}

impl Region {
    /// parse the region from the geometry of the first feature of a GeoJSON feature container.
    /// The container only has to be an object with a `features` member, the geometry has to be a
    /// `Polygon` or a `MultiPolygon` (of which we use the first polygon)
    pub fn from_feature_container (geojson: &Value)->Result<Region> {
        let features = geojson.as_object()
            .and_then( |o| o.get("features"))
            .ok_or_else( || invalid_input(INVALID_GEOJSON))?;

        let feature = features.as_array()
            .and_then( |a| a.first())
            .ok_or_else( || invalid_input("GeoJSON has no features"))?;

        let geometry = feature.get("geometry")
            .filter( |g| !g.is_null())
            .ok_or_else( || invalid_input("first GeoJSON feature has no geometry"))?;

        let geometry = Geometry::from_json_value( geometry.clone())
            .map_err( |e| invalid_input( format!("invalid GeoJSON geometry: {e}")))?;

        Self::from_geometry( geometry)
    }

    pub fn from_geometry (geometry: Geometry)->Result<Region> {
        let rings = match geometry.value {
            GeoValue::Polygon(rings) => rings,
            GeoValue::MultiPolygon(polygons) => {
                polygons.into_iter().next().ok_or_else( || invalid_input("GeoJSON MultiPolygon has no polygons"))?
            }
            other => return Err( invalid_input( format!("unsupported GeoJSON geometry type: {}", other.type_name())))
        };

        match rings.first() {
            None => Err( invalid_input("GeoJSON polygon has no rings")),
            Some(outer) if outer.is_empty() => Err( invalid_input("GeoJSON polygon has an empty outer ring")),
            Some(_) => Ok( Region { rings } )
        }
    }

    pub fn outer_ring (&self)->&[Vec<f64>] {
        self.rings.first().map( |r| r.as_slice()).unwrap_or_default()
    }
}
