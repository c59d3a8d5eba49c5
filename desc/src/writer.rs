/*
 * Copyright 2020 Nikhil Marathe <nsm.nikhil@gmail.com>
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::path::{Path, PathBuf};

use ninjagen_metrics::scoped_metric;
use thiserror::Error;

use crate::Descriptor;

/// Where the rendered build file ends up.
pub trait Storage {
    /// Replaces whatever is at `path` with `contents`.
    fn write(&mut self, path: &Path, contents: &[u8]) -> std::io::Result<()>;
}

pub struct FileStorage;

impl Storage for FileStorage {
    fn write(&mut self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
        scoped_metric!("write");
        std::fs::write(path, contents)
    }
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("could not write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders `descriptor` in full, then stores it at `path` in a single write.
pub fn write<S>(descriptor: Descriptor, path: &Path, storage: &mut S) -> Result<(), WriteError>
where
    S: Storage + ?Sized,
{
    let contents = {
        scoped_metric!("render");
        descriptor.to_string()
    };
    storage
        .write(path, contents.as_bytes())
        .map_err(|source| WriteError::Io {
            path: path.to_owned(),
            source,
        })
}

/// Keeps written files in memory.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    pub files: std::collections::HashMap<PathBuf, Vec<u8>>,
}

#[cfg(any(test, feature = "testing"))]
impl MemoryStorage {
    pub fn contents(&self, path: &Path) -> Option<&str> {
        self.files
            .get(path)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }
}

#[cfg(any(test, feature = "testing"))]
impl Storage for MemoryStorage {
    fn write(&mut self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
        self.files.insert(path.to_owned(), contents.to_vec());
        Ok(())
    }
}
