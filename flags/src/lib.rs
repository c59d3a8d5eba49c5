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

//! Discovers the compile and link flags for a list of native libraries.
//!
//! The flags are opaque blobs. They are handed on exactly as the metadata tool printed them,
//! trailing newline included.

use std::{fmt, string::FromUtf8Error};

use ninjagen_metrics::scoped_metric;
use thiserror::Error;

mod pkg_config;
pub use pkg_config::PkgConfig;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    Cflags,
    Libs,
}

impl Query {
    pub fn flag(self) -> &'static str {
        match self {
            Query::Cflags => "--cflags",
            Query::Libs => "--libs",
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_owned(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    match stderr.trim_end() {
        "" => String::new(),
        message => format!(": {}", message),
    }
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("no dependencies to resolve")]
    NoDependencies,
    #[error("could not run '{tool}'")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{tool} {query}' {}{}", describe_exit(.code), describe_stderr(.stderr))]
    Failed {
        tool: String,
        query: Query,
        code: Option<i32>,
        stderr: String,
    },
    #[error("'{tool} {query}' printed invalid utf-8")]
    NotUtf8 {
        tool: String,
        query: Query,
        #[source]
        source: FromUtf8Error,
    },
}

impl ResolveError {
    /// The exit code of the metadata tool, if it ran and failed with one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ResolveError::Failed { code, .. } => *code,
            _ => None,
        }
    }
}

/// An external package metadata service.
pub trait MetadataQuery {
    /// Runs `query` over all of `dependencies`, returning standard output untouched.
    fn query(&mut self, query: Query, dependencies: &[&str]) -> Result<String, ResolveError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    pub compile_flags: String,
    pub link_flags: String,
}

/// Asks `query` for the compile flags, then the link flags, of every dependency in order.
///
/// Duplicates are passed through. The first failure aborts the whole resolution.
pub fn resolve<Q>(query: &mut Q, dependencies: &[&str]) -> Result<FlagSet, ResolveError>
where
    Q: MetadataQuery + ?Sized,
{
    if dependencies.is_empty() {
        return Err(ResolveError::NoDependencies);
    }
    scoped_metric!("resolve");
    let compile_flags = query.query(Query::Cflags, dependencies)?;
    let link_flags = query.query(Query::Libs, dependencies)?;
    Ok(FlagSet {
        compile_flags,
        link_flags,
    })
}
