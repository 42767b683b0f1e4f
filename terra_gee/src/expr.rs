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


//! Earth Engine expression graphs
//!
//! An expression is a map of named value nodes plus the name of the result node. We only use
//! nested (inline) nodes, hence our expressions always have a single value "0". Nodes are either
//! constants or function invocations with named arguments, e.g.
//! ```json
//! {"result":"0","values":{"0":{"functionInvocationValue":{
//!     "functionName":"Collection.first",
//!     "arguments":{"collection":{"functionInvocationValue":{ ... }}}}}}}
//! ```

use std::collections::BTreeMap;
use serde::{Deserialize,Serialize};
use serde_json::{json, Value};

use crate::region::Region;

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(rename_all="camelCase")]
pub enum ValueNode {
    ConstantValue(Value),
    FunctionInvocationValue(FunctionInvocation),
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(rename_all="camelCase")]
pub struct FunctionInvocation {
    pub function_name: String,
    pub arguments: BTreeMap<String,ValueNode>,
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct Expression {
    pub result: String,
    pub values: BTreeMap<String,ValueNode>,
}

impl Expression {
    pub fn new (node: ValueNode)->Self {
        Expression { result: "0".to_string(), values: BTreeMap::from([ ("0".to_string(), node) ]) }
    }
}

pub fn constant (v: impl Into<Value>)->ValueNode {
    ValueNode::ConstantValue( v.into())
}

pub fn invoke<const N: usize> (function_name: &str, args: [(&str,ValueNode); N])->ValueNode {
    let arguments = args.into_iter().map( |(k,v)| (k.to_string(), v)).collect();
    ValueNode::FunctionInvocationValue( FunctionInvocation { function_name: function_name.to_string(), arguments })
}

//--- the building blocks of imagery queries

pub fn polygon (region: &Region)->ValueNode {
    invoke( "GeometryConstructors.Polygon", [
        ("coordinates", constant( json!(region.rings)))
    ])
}

pub fn load_image_collection (id: &str)->ValueNode {
    invoke( "ImageCollection.load", [
        ("id", constant(id))
    ])
}

pub fn filter_bounds (collection: ValueNode, geometry: ValueNode)->ValueNode {
    invoke( "Collection.filter", [
        ("collection", collection),
        ("filter", invoke( "Filter.intersects", [
            ("leftField", constant(".all")),
            ("rightValue", geometry)
        ]))
    ])
}

/// dates are ISO 8601 date or datetime strings. The end date is exclusive
pub fn filter_date (collection: ValueNode, start: &str, end: &str)->ValueNode {
    invoke( "Collection.filter", [
        ("collection", collection),
        ("filter", invoke( "Filter.dateRangeContains", [
            ("leftValue", invoke( "DateRange", [
                ("start", invoke( "Date", [("value", constant(start))])),
                ("end", invoke( "Date", [("value", constant(end))]))
            ])),
            ("rightField", constant("system:time_start"))
        ]))
    ])
}

pub fn sort_ascending (collection: ValueNode, key: &str)->ValueNode {
    invoke( "Collection.limit", [
        ("collection", collection),
        ("key", constant(key)),
        ("ascending", constant(true))
    ])
}

pub fn size (collection: ValueNode)->ValueNode {
    invoke( "Collection.size", [("collection", collection)])
}

pub fn first (collection: ValueNode)->ValueNode {
    invoke( "Collection.first", [("collection", collection)])
}

pub fn clip (image: ValueNode, geometry: ValueNode)->ValueNode {
    invoke( "Image.clip", [
        ("input", image),
        ("geometry", geometry)
    ])
}

pub fn clip_to_bounds_and_scale (image: ValueNode, geometry: ValueNode, scale: f64)->ValueNode {
    invoke( "Image.clipToBoundsAndScale", [
        ("input", image),
        ("geometry", geometry),
        ("scale", constant(scale))
    ])
}
