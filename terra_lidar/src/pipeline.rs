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


use std::fmt;
use tracing::{debug, warn};

/// the stages of an upload. Runs only move forward and end in either Succeeded or Failed
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum PipelineState {
    Received,
    Stored,
    Converting,
    Succeeded,
    Failed,
}

impl PipelineState {
    pub fn is_final (&self)->bool {
        matches!( self, PipelineState::Succeeded | PipelineState::Failed)
    }

    pub fn can_advance_to (&self, next: PipelineState)->bool {
        use PipelineState::*;
        match (self, next) {
            (Received, Stored) | (Stored, Converting) | (Converting, Succeeded) => true,
            (s, Failed) => !s.is_final(),
            _ => false
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt( self, f)
    }
}

/// the state record of a single upload
#[derive(Debug)]
pub struct UploadRun {
    filename: String,
    history: Vec<PipelineState>,
}

impl UploadRun {
    pub fn new (filename: impl ToString)->Self {
        let filename = filename.to_string();
        debug!("{filename}: {}", PipelineState::Received);
        UploadRun { filename, history: vec![ PipelineState::Received ] }
    }

    pub fn filename (&self)->&str { &self.filename }

    pub fn state (&self)->PipelineState {
        *self.history.last().unwrap_or( &PipelineState::Received)
    }

    pub fn history (&self)->&[PipelineState] { &self.history }

    /// returns false (and does not change state) if this is not a valid transition
    pub fn advance (&mut self, next: PipelineState)->bool {
        let current = self.state();
        if current.can_advance_to( next) {
            debug!("{}: {current} -> {next}", self.filename);
            self.history.push( next);
            true
        } else {
            warn!("{}: ignoring invalid transition {current} -> {next}", self.filename);
            false
        }
    }

    pub fn fail (&mut self)->bool {
        self.advance( PipelineState::Failed)
    }
}
