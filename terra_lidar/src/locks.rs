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


use std::sync::Arc;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// per-filename locks. Holders of the same name are queued in the order they asked for the lock,
/// holders of different names do not block each other
#[derive(Debug,Clone,Default)]
pub struct FileLocks {
    locks: Arc<DashMap<String,Arc<Mutex<()>>>>,
}

impl FileLocks {
    pub fn new ()->Self { Self::default() }

    pub async fn lock (&self, name: &str)->OwnedMutexGuard<()> {
        let mutex = self.locks.entry( name.to_string()).or_default().clone();
        mutex.lock_owned().await
    }

    /// drop entries that are neither held nor waited for
    pub fn prune (&self) {
        self.locks.retain( |_,m| Arc::strong_count(m) > 1);
    }

    pub fn len (&self)->usize { self.locks.len() }
}
