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


use std::{path::{Path, PathBuf}, process::Stdio, time::Duration};
use tokio::{process::Command, time::timeout};
use tracing::{debug, info, warn};

use crate::errors::{conversion_error, Result};

/// runs the external point cloud converter as `<converter> <input> -o <output_dir>`.
/// Arguments are passed as a list, i.e. file names are never interpreted by a shell
#[derive(Debug,Clone)]
pub struct ConversionInvoker {
    converter: PathBuf,
    timeout: Duration,
}

impl ConversionInvoker {
    pub fn new (converter: impl Into<PathBuf>, timeout: Duration)->Self {
        ConversionInvoker { converter: converter.into(), timeout }
    }

    pub fn command (&self, input: &Path, output_dir: &Path)->Command {
        let mut cmd = Command::new( &self.converter);
        cmd.arg( input)
            .arg( "-o")
            .arg( output_dir)
            .stdin( Stdio::null())
            .stdout( Stdio::piped())
            .stderr( Stdio::piped())
            .kill_on_drop( true); // kills the converter if the wait future is dropped on timeout
        cmd
    }

    /// run the converter and return its stdout. Non-zero exits are reported as ConversionError with
    /// the verbatim stderr of the converter
    pub async fn convert (&self, input: &Path, output_dir: &Path)->Result<String> {
        let mut cmd = self.command( input, output_dir);
        debug!("executing {cmd:?}");

        let child = cmd.spawn()
            .map_err( |e| conversion_error( format!("failed to run converter {:?}: {e}", self.converter)))?;

        match timeout( self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                if output.status.success() {
                    info!("{:?} converted with status {}", input, output.status);
                    Ok( String::from_utf8_lossy( &output.stdout).into_owned() )
                } else {
                    warn!("{:?} conversion failed with status {}", input, output.status);
                    Err( conversion_error( String::from_utf8_lossy( &output.stderr)))
                }
            }
            Ok(Err(e)) => Err( conversion_error( format!("failed to wait for converter: {e}"))),
            Err(_) => {
                warn!("{:?} conversion timed out after {:?}, converter killed", input, self.timeout);
                Err( conversion_error( format!("converter timed out after {:?}", self.timeout)))
            }
        }
    }
}
