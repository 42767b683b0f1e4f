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


use std::fs::{self,File};
use std::io::{self,Read,ErrorKind};
use std::path::{Path,PathBuf};
use std::env;
use std::fmt::Debug;
use std::ops::Deref;
use std::ffi::OsStr;
use serde::{Serialize,Serializer,Deserialize,Deserializer};

use crate::io_error;
use crate::strings::env_expand;

type Result<T> = std::result::Result<T,std::io::Error>;

pub fn filename<'a,T: AsRef<Path>> (path: &'a T)->Option<&'a str> {
    path.as_ref().file_name().and_then(|ostr| ostr.to_str())
}

pub fn extension<'a,T: AsRef<Path>> (path: &'a T)->Option<&'a str> {
    path.as_ref().extension().and_then(|ostr| ostr.to_str())
}

/// is there a regular file at `path` that can be opened for reading
pub fn is_visible_file <P: AsRef<Path>> (path: P)->bool {
    let path = path.as_ref();
    path.is_file() && File::open(path).is_ok()
}

pub fn file_contents_as_string (file: &mut File) -> Result<String> {
    let len = file.metadata()?.len();
    let mut contents = String::with_capacity(len as usize);
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

pub fn filepath_contents_as_string <P: AsRef<Path>> (path: &P) -> Result<String> {
    let mut file = File::open(path)?;
    file_contents_as_string( &mut file)
}

/// the raw bytes of the file at `path` (which can be empty)
pub fn file_contents <P: AsRef<Path>> (path: &P) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut contents: Vec<u8> = Vec::with_capacity(len as usize);
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

/// expand a leading `~` and `$VAR` / `${VAR}` elements of a path
pub fn replace_env_var_path (path: impl AsRef<Path>)->Result<PathBuf> {
    let path = path.as_ref();
    let mut p = PathBuf::new();

    for (n,c) in path.iter().enumerate() {
        let e = c.to_str().ok_or( io_error!(ErrorKind::InvalidInput, "invalid path: {:?}", path))?;

        if e == "~" && n == 0 {
            p.push( env::var("HOME").map_err( |_| io_error!(ErrorKind::NotFound, "HOME not set"))?)
        } else if e.contains('$') {
            p.push( env_expand(e).map_err( |var| io_error!(ErrorKind::NotFound, "{var} not set"))?)
        } else {
            p.push(e)
        }
    }

    Ok(p)
}

/* #region EnvPathBuf *******************************************************************************/

/// a PathBuf that can use env vars as path elements, which are expanded when deserialized
#[derive(Clone,PartialEq,Eq)]
pub struct EnvPathBuf(PathBuf);

impl Debug for EnvPathBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl Deref for EnvPathBuf {
    type Target = PathBuf;

    fn deref (&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for EnvPathBuf {
    #[inline]
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl AsRef<OsStr> for EnvPathBuf {
    #[inline]
    fn as_ref(&self) -> &OsStr {
        self.0.as_ref()
    }
}

impl From<PathBuf> for EnvPathBuf {
    fn from (path: PathBuf)->Self { EnvPathBuf(path) }
}

// note this serializes the expanded path
impl Serialize for EnvPathBuf {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> where S: Serializer {
        self.0.serialize( serializer)
    }
}

impl<'de> Deserialize<'de> for EnvPathBuf {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error> where D: Deserializer<'de> {
        let s = String::deserialize(deserializer)?;
        let p = replace_env_var_path( &s).map_err(|e| serde::de::Error::custom( format!("failed to expand path {s:?}: {e}")))?;
        Ok( EnvPathBuf(p) )
    }
}

/* #endregion EnvPathBuf */
