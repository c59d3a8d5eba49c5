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

//! A scripted stand-in for pkg-config.

use super::{MetadataQuery, Query, ResolveError};

#[derive(Debug, Clone)]
enum Response {
    Print(String),
    Exit(i32, String),
}

#[derive(Debug)]
pub struct FakeQuery {
    cflags: Response,
    libs: Response,
    /// Every query made, with the dependencies it was given.
    pub calls: Vec<(Query, Vec<String>)>,
}

impl FakeQuery {
    pub fn printing(cflags: &str, libs: &str) -> FakeQuery {
        FakeQuery {
            cflags: Response::Print(cflags.to_owned()),
            libs: Response::Print(libs.to_owned()),
            calls: vec![],
        }
    }

    /// Both queries exit with `code`, as pkg-config does for an unknown package.
    pub fn failing(code: i32, stderr: &str) -> FakeQuery {
        FakeQuery {
            cflags: Response::Exit(code, stderr.to_owned()),
            libs: Response::Exit(code, stderr.to_owned()),
            calls: vec![],
        }
    }

    pub fn libs_exit(&mut self, code: i32, stderr: &str) {
        self.libs = Response::Exit(code, stderr.to_owned());
    }
}

impl MetadataQuery for FakeQuery {
    fn query(&mut self, query: Query, dependencies: &[&str]) -> Result<String, ResolveError> {
        self.calls.push((
            query,
            dependencies.iter().map(|d| (*d).to_owned()).collect(),
        ));
        let response = match query {
            Query::Cflags => &self.cflags,
            Query::Libs => &self.libs,
        };
        match response {
            Response::Print(out) => Ok(out.clone()),
            Response::Exit(code, stderr) => Err(ResolveError::Failed {
                tool: "pkg-config".to_owned(),
                query,
                code: Some(*code),
                stderr: stderr.clone(),
            }),
        }
    }
}
