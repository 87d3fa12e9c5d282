/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “GEOGET” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

#![allow(unused)]

#[doc = include_str!("../doc/geoget_build.md")]

use std::{fs, path::{Path,PathBuf}, sync::OnceLock, env};

mod configs;
pub use configs::*;

mod utils;
pub use utils::*;

mod errors;
pub use errors::*;

/* #region bin globals *******************************************************************/

#[derive(Debug)]
pub struct BinContext {
    pub bin_name: String,
    pub bin_crate: String,
    pub bin_suffix: Option<String>, // optionally set via GEOGET_BIN_SUFFIX at runtime (useful if we run simultaneous instances of this bin)
    pub proc_id: Option<u32>,
}

impl BinContext {
    pub fn set(bin_name: &str,
               bin_crate: &str,
               bin_suffix: Option<String>,
               proc_id: Option<u32>) {
        BIN_CONTEXT.set(Self{ bin_name: bin_name.to_string(),
            bin_crate: bin_crate.to_string(),
            bin_suffix, proc_id } ).expect("Context set twice");
    }
}

pub static BIN_CONTEXT: OnceLock<BinContext> = OnceLock::new();

/// this has to be called (once) from the bin source
#[macro_export]
macro_rules! set_bin_context {
    () => {
        {
            // Note that env! looks up the value at compile time, while env::var
            // looks it up at runtime.
            geoget_build::BinContext::set(env!("CARGO_PKG_NAME"),
                 env!("CARGO_BIN_NAME"),
                 std::env::var("GEOGET_BIN_SUFFIX").ok(),
                 Some(std::process::id()));
        }
    }
}

pub fn get_bin_context()->Option<&'static BinContext> {
    BIN_CONTEXT.get()
}

/// this is mostly for examples within crates that do not have their own define_load_config
pub fn load_config_path<C,P> (path: P) -> Result<C> where C: for <'a> serde::Deserialize<'a>, P: AsRef<Path> {
    let data = file_contents_as_bytes(path.as_ref())?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}


// the global GEOGET dirs of the application, which are invariant after init
// we don't have a global CONFIG_DIR since config files can reside in a number of locations
static ROOT_DIR: OnceLock<PathBuf> = OnceLock::new();
static CACHE_DIR: OnceLock<PathBuf> = OnceLock::new();
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();


/// the global root dir: `GEOGET_ROOT`
/// this will try to create the directory if it does not exist and panics if that fails
pub fn root_dir()->&'static PathBuf {
    ROOT_DIR.get_or_init(|| get_or_create_root_dir().expect("failed to locate GEOGET root"))
}

/// the global data dir: `GEOGET_ROOT/data`
/// this will try to create the directory if it does not exist and panics if that fails
pub fn data_dir()->&'static PathBuf {
    DATA_DIR.get_or_init(|| ensure_existing_path( root_dir().join( Path::new("data"))))
}

/// the global cache dir: `GEOGET_ROOT/cache`
/// this will try to create the directory if it does not exist and panics if that fails
pub fn cache_dir()->&'static PathBuf {
    CACHE_DIR.get_or_init(|| ensure_existing_path( root_dir().join( Path::new("cache"))))
}

pub fn show_root_dir() {
    println!("using GEOGET root dir {}", root_dir().to_str().unwrap_or("<invalid UTF-8>"));
}

/// Note - this panics if the directory does not exist and can't be created
pub fn ensure_dir (dir: PathBuf)->PathBuf {
    if !&dir.is_dir() {
        std::fs::create_dir_all(&dir).unwrap();
    }
    dir
}

/* #endregion bin globals */

/* #region resource lookup ***************************************************************/

/// locate a config file and return its PathBuf
/// note this is called at runtime from load_config so we have to explicitly pass in BinContext
fn find_resource_file (resource_dir: &str, ctx: &Option<&BinContext>, resource_crate: &str, filename: &str) -> Option<PathBuf> {
    // check an explicit GEOGET_HOME first
    if let Ok(geoget_home) = env::var("GEOGET_HOME") {
        let mut path = Path::new( geoget_home.as_str()).to_path_buf();
        if find_external_resource( &mut path, resource_dir, ctx, resource_crate, filename) { return Some(path) }
    }

    // try the parent of the workspace dir next - this is the first dir outside the source repo
    if let Some(mut path) = get_workspace_parent() {
        if find_external_resource( &mut path, resource_dir, ctx, resource_crate, filename) { return Some(path) }
    }

    // as a last resort try an implicit ~/.geoget/CONFIGS
    if let Ok(usr_home) = env::var("HOME") {
        let mut path = Path::new(usr_home.as_str()).to_path_buf();
        path.push(".geoget");
        if find_external_resource( &mut path, resource_dir, ctx, resource_crate, filename) { return Some(path) }
    }

    // try to find the config within the repo
    if let Some(mut path) = get_workspace_dir() {
        if find_internal_resource( &mut path, resource_dir, ctx, resource_crate, filename) { return Some(path) }
    }

    None
}

fn find_external_resource (path: &mut PathBuf, resource_dir: &str, bin_ctx: &Option<&BinContext>, resource_crate: &str, filename: &str)->bool {

    // check bin specific override first
    if let Some(ctx) = bin_ctx {
        let bin_crate = ctx.bin_crate.as_str();
        let bin_name = ctx.bin_name.as_str();
        if path_cond!( is_file, path, resource_dir, bin_crate, bin_name, resource_crate, filename) { return true }
    }

    // now check resource crate global
    if path_cond!( is_file, path, resource_dir, resource_crate, filename) { return true }

    false
}

fn find_internal_resource (path: &mut PathBuf, resource_dir: &str, bin_ctx: &Option<&BinContext>, resource_crate: &str, filename: &str)->bool {
    if let Some(ctx) = bin_ctx {
        let bin_crate = ctx.bin_crate.as_str();
        let bin_name = ctx.bin_name.as_str();
        if path_cond!( is_file, path, bin_crate, resource_dir, bin_name, resource_crate, filename) { return true }
    }

    if path_cond!( is_file, path, resource_crate, resource_dir, filename) { return true }

    false
}

/* #endregion resource lookup */
