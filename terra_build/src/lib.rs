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

use std::{path::{Path,PathBuf}, sync::OnceLock, env};

mod configs;
pub use configs::*;

mod utils;
pub use utils::*;

mod errors;
pub use errors::*;

pub type TerraBuildResult<T> = errors::Result<T>;

/* #region bin globals *******************************************************************/

#[derive(Debug)]
pub struct BinContext {
    pub bin_name: String,
    pub bin_crate: String,
    pub proc_id: Option<u32>,
}

impl BinContext {
    /// returns false if there already was a context set
    pub fn set (bin_name: &str, bin_crate: &str, proc_id: Option<u32>)->bool {
        BIN_CONTEXT.set( Self{ bin_name: bin_name.to_string(), bin_crate: bin_crate.to_string(), proc_id }).is_ok()
    }
}

pub static BIN_CONTEXT: OnceLock<BinContext> = OnceLock::new();

/// this has to be called (once) from the bin source
#[macro_export]
macro_rules! set_bin_context {
    () => {
        {
            // env! is expanded at compile time of the bin crate
            terra_build::BinContext::set( env!("CARGO_BIN_NAME"),
                env!("CARGO_PKG_NAME"),
                Some(std::process::id()))
        }
    }
}

/// load a RON config from an explicit path (e.g. a command line override)
pub fn load_config_path<C,P> (path: P) -> Result<C> where C: for <'a> serde::Deserialize<'a>, P: AsRef<Path> {
    let data = file_contents_as_bytes(path.as_ref())?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

// the global TERRA dirs, invariant after init
static ROOT_DIR: OnceLock<PathBuf> = OnceLock::new();

/// the global root dir: `TERRA_ROOT`
/// this will try to create the directory if it does not exist
pub fn root_dir()->Result<&'static PathBuf> {
    if let Some(dir) = ROOT_DIR.get() { return Ok(dir) }
    let dir = get_or_create_root_dir()?;
    Ok( ROOT_DIR.get_or_init(|| dir) )
}

/* #endregion bin globals */

/* #region resource lookup ***************************************************************/

/// locate a resource file. Lookup order is
///
/// 1. `$TERRA_HOME/<resource_dir>/..`
/// 2. `<workspace-parent>/<resource_dir>/..`
/// 3. `~/.terra/<resource_dir>/..`
/// 4. `<workspace>/<resource_crate>/<resource_dir>/..` (in-repo defaults)
///
/// external locations are checked for a bin specific override (`<bin_crate>/<bin_name>/<resource_crate>/<filename>`) first
fn find_resource_file (resource_dir: &str, ctx: &Option<&BinContext>, resource_crate: &str, filename: &str) -> Option<PathBuf> {
    if let Ok(terra_home) = env::var("TERRA_HOME") {
        let mut path = Path::new( terra_home.as_str()).to_path_buf();
        if find_external_resource( &mut path, resource_dir, ctx, resource_crate, filename) { return Some(path) }
    }

    if let Some(mut path) = get_workspace_parent() {
        if find_external_resource( &mut path, resource_dir, ctx, resource_crate, filename) { return Some(path) }
    }

    if let Ok(usr_home) = env::var("HOME") {
        let mut path = Path::new(usr_home.as_str()).to_path_buf();
        path.push(".terra");
        if find_external_resource( &mut path, resource_dir, ctx, resource_crate, filename) { return Some(path) }
    }

    if let Some(mut path) = get_workspace_dir() {
        if path_cond!( is_file, &mut path, resource_crate, resource_dir, filename) { return Some(path) }
    }

    None
}

fn find_external_resource (path: &mut PathBuf, resource_dir: &str, bin_ctx: &Option<&BinContext>, resource_crate: &str, filename: &str)->bool {
    if let Some(ctx) = bin_ctx {
        let bin_crate = ctx.bin_crate.as_str();
        let bin_name = ctx.bin_name.as_str();
        if path_cond!( is_file, path, resource_dir, bin_crate, bin_name, resource_crate, filename) { return true }
    }

    path_cond!( is_file, path, resource_dir, resource_crate, filename)
}

/* #endregion resource lookup */
