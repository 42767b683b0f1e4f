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


use std::env;
use regex::{Captures, Regex};
use lazy_static::lazy_static;

lazy_static! {
    // $VAR or ${VAR}
    static ref ENV_VAR_RE: Regex = Regex::new( r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))").unwrap();
}

/// replace `$VAR` and `${VAR}` occurrences in `s` with the values of respective environment variables.
/// `TERRA_ROOT` is always defined (see `terra_build::root_dir()`). Returns the name of the first
/// undefined variable as the error
pub fn env_expand (s: &str)->Result<String,String> {
    let mut undefined: Option<String> = None;

    let res = ENV_VAR_RE.replace_all( s, |caps: &Captures| {
        let name = caps.get(1).or( caps.get(2)).map( |m| m.as_str()).unwrap_or_default();
        match lookup_var( name) {
            Some(val) => val,
            None => {
                if undefined.is_none() { undefined = Some(name.to_string()) }
                String::new()
            }
        }
    });

    match undefined {
        Some(name) => Err(name),
        None => Ok(res.into_owned())
    }
}

fn lookup_var (name: &str)->Option<String> {
    match env::var(name) {
        Ok(val) => Some(val),
        Err(_) if name == "TERRA_ROOT" => terra_build::root_dir().ok().map( |p| p.to_string_lossy().to_string()),
        Err(_) => None
    }
}

