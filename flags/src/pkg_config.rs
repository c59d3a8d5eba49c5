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

use std::process::{Command, Stdio};

use ninjagen_metrics::scoped_metric;

use crate::{MetadataQuery, Query, ResolveError};

/// Runs `<tool> --cflags|--libs <deps...>` and blocks until it exits.
///
/// Anything a successful run prints on stderr is kept in [`PkgConfig::warnings`].
#[derive(Debug, Clone)]
pub struct PkgConfig {
    tool: String,
    warnings: Vec<String>,
}

impl PkgConfig {
    pub fn new() -> PkgConfig {
        PkgConfig::with_tool("pkg-config")
    }

    pub fn with_tool<S: Into<String>>(tool: S) -> PkgConfig {
        PkgConfig {
            tool: tool.into(),
            warnings: vec![],
        }
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl Default for PkgConfig {
    fn default() -> Self {
        PkgConfig::new()
    }
}

impl MetadataQuery for PkgConfig {
    fn query(&mut self, query: Query, dependencies: &[&str]) -> Result<String, ResolveError> {
        scoped_metric!("pkg-config");
        let output = Command::new(&self.tool)
            .arg(query.flag())
            .args(dependencies)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ResolveError::Spawn {
                tool: self.tool.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(ResolveError::Failed {
                tool: self.tool.clone(),
                query,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        let warning = String::from_utf8_lossy(&output.stderr);
        if !warning.trim().is_empty() {
            self.warnings.push(warning.trim_end().to_owned());
        }
        String::from_utf8(output.stdout).map_err(|source| ResolveError::NotUtf8 {
            tool: self.tool.clone(),
            query,
            source,
        })
    }
}

#[cfg(all(test, unix))]
mod test {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    use super::PkgConfig;
    use crate::{MetadataQuery, Query, ResolveError};

    fn script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-pkg-config");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    // Another test thread forking while the script was open for writing
    // makes exec fail with ETXTBSY for a moment.
    fn query_script(
        tool: &mut PkgConfig,
        query: Query,
        deps: &[&str],
    ) -> Result<String, ResolveError> {
        for _ in 0..50 {
            match tool.query(query, deps) {
                Err(ResolveError::Spawn { ref source, .. }) if source.raw_os_error() == Some(26) => {
                    std::thread::sleep(std::time::Duration::from_millis(10));
                }
                result => return result,
            }
        }
        tool.query(query, deps)
    }

    #[test]
    fn stdout_is_returned_untrimmed() {
        // echo stands in for a tool that prints its arguments.
        let mut tool = PkgConfig::with_tool("echo");
        let out = tool.query(Query::Libs, &["gtk+-3.0", "icu-uc"]).unwrap();
        assert_eq!(out, "--libs gtk+-3.0 icu-uc\n");
    }

    #[test]
    fn nonzero_exit_is_a_failure() {
        let mut tool = PkgConfig::with_tool("false");
        let err = tool.query(Query::Cflags, &["glib-2.0"]).unwrap_err();
        assert!(matches!(err, ResolveError::Failed { query: Query::Cflags, .. }));
        assert_eq!(err.exit_code(), Some(1));
    }

    #[test]
    fn missing_tool_cannot_spawn() {
        let mut tool = PkgConfig::with_tool("/nonexistent/ninjagen/pkg-config");
        let err = tool.query(Query::Cflags, &["glib-2.0"]).unwrap_err();
        assert!(matches!(err, ResolveError::Spawn { .. }));
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn default_tool_is_pkg_config() {
        let tool = PkgConfig::default();
        assert_eq!(tool.tool(), "pkg-config");
        assert!(tool.warnings().is_empty());
    }

    #[test]
    fn invalid_utf8_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let mut tool = PkgConfig::with_tool(script(dir.path(), r"printf '\377\n'").to_string_lossy());
        let err = query_script(&mut tool, Query::Libs, &["icu-uc"]).unwrap_err();
        assert!(matches!(err, ResolveError::NotUtf8 { query: Query::Libs, .. }));
        assert!(err.to_string().ends_with("--libs' printed invalid utf-8"));
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn stderr_of_a_successful_run_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let body = "echo 'Package foo has an outdated Requires field' >&2\necho -lfoo";
        let mut tool = PkgConfig::with_tool(script(dir.path(), body).to_string_lossy());
        let out = query_script(&mut tool, Query::Libs, &["foo"]).unwrap();
        assert_eq!(out, "-lfoo\n");
        assert_eq!(
            tool.warnings(),
            &["Package foo has an outdated Requires field".to_owned()]
        );
    }

    #[test]
    fn quiet_runs_leave_no_warnings() {
        let mut tool = PkgConfig::with_tool("echo");
        tool.query(Query::Cflags, &["glib-2.0"]).unwrap();
        tool.query(Query::Libs, &["glib-2.0"]).unwrap();
        assert!(tool.warnings().is_empty());
    }
}
