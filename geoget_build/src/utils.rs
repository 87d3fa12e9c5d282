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

use std::{io::Read,path::{Path,PathBuf},fs::{self,File},env};
use crate::errors::Result;

pub fn file_contents_as_bytes (path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut contents: Vec<u8> = Vec::with_capacity(len as usize);
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

/// modify path and check if path condition holds. If not revert the path to its previous state
#[macro_export]
macro_rules! path_cond {
    ( $pred:ident, $path_expr:expr, $($e:expr),* ) => {
        {
            let path: &mut PathBuf = $path_expr;
            let n0 = path.components().count();
            $( path.push($e); )*
            if path.$pred() {
                true
            } else {
                // restore path
                let mut n = path.components().count();
                while n > n0 { path.pop(); n -= 1; }
                false
            }
        }
    }
}

#[macro_export]
macro_rules! has_any_path_cond {
    ($pred:ident, $path_expr:expr, $($e:expr),*) => {
        {
            let mut path: &mut PathBuf = $path_expr;
            let mut holds = |e| { path.push(e); let res=path.$pred(); path.pop(); res };
            $( holds($e) || )* false
        }
    }
}

/// this is the highest parent from the current dir that still has a Cargo.toml
pub fn get_workspace_dir()->Option<PathBuf> {
    if let Ok(mut path) = env::current_dir() {
        while path_cond!( is_file, &mut path, "..", "Cargo.toml") {
            path.pop(); // pops Cargo.toml
            path.pop(); // pops ".."
            if !path.pop() { return None } // no parent
        }
        return Some(path)
    }
    None
}

pub fn get_workspace_parent()->Option<PathBuf> {
    get_workspace_dir().map( |mut p| { p.pop(); p})
}

pub fn get_env_geoget_root()->Option<PathBuf> {
    if let Ok(geoget_root) = env::var("GEOGET_ROOT") {
        Some( Path::new(geoget_root.as_str()).to_path_buf() )
    } else { None }
}

pub fn default_geoget_root()->PathBuf {
    let mut path = Path::new( env::var("HOME").unwrap().as_str()).to_path_buf();
        path.push( ".geoget");
        path
}

/// get the GEOGET root dir to use. If this returns Ok the path is guaranteed to exist.
/// Lookup is in the following order:
///
/// 1. use $GEOGET_ROOT if set
/// 2. workspace parent if it has any of the geoget dirs {cache,data,configs}
/// 3. $HOME/.geoget
pub fn get_or_create_root_dir()->Result<PathBuf> {
    let path = if let Some(path) = get_env_geoget_root() {
        path

    } else {
        let computed_path = if let Some(mut path) = get_workspace_parent() {
            if has_any_path_cond!( is_dir, &mut path, "cache", "data", "configs") {
                path
            } else {
                default_geoget_root()
            }
        } else {
            default_geoget_root()
        };
        // automatically set GEOGET_ROOT to the computed path for the current process and its children
        // NOTE - this is not multi-threaded. Caller has to make sure this assumption holds
        unsafe {
            env::set_var("GEOGET_ROOT", &computed_path);
        }

        computed_path
    };

    Ok( ensure_existing_path(path) )
}

pub fn ensure_existing_path<P> (path: P)->P where P: AsRef<Path> {
    let p = path.as_ref();
    if !p.is_dir() {
        fs::create_dir_all(p).expect(&format!("failed to create {:?}", p));
    }
    path
}
