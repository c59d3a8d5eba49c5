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

use std::path::Path;

use anyhow::{self, Context};
use thiserror::Error;

use ninjagen_desc::{assemble, catalog, graph, write, FileStorage, Storage};
use ninjagen_flags::{resolve, MetadataQuery, PkgConfig, ResolveError};
use ninjagen_metrics::scoped_metric;

pub mod printer;
pub mod project;

pub use printer::Printer;
pub use project::{Project, FONTDEBUG};

/// Same spelling as ninja's own `-d` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugMode {
    List,
    Stats,
    Validate,
}

impl DebugMode {
    pub const ALL: &'static [(&'static str, &'static str)] = &[
        ("stats", "print timing for each stage"),
        ("validate", "check the build graph before writing it"),
    ];
}

#[derive(Error, Debug)]
#[error("Unknown debug setting '{0}'")]
pub struct DebugModeError(String);

impl std::str::FromStr for DebugMode {
    type Err = DebugModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(DebugMode::List),
            "stats" => Ok(DebugMode::Stats),
            "validate" => Ok(DebugMode::Validate),
            e => Err(DebugModeError(e.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub execution_dir: Option<String>,
    pub output: String,
    pub pkg_config: String,
    pub debug_modes: Vec<DebugMode>,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            execution_dir: None,
            output: "build.ninja".to_owned(),
            pkg_config: "pkg-config".to_owned(),
            debug_modes: vec![],
            verbose: false,
        }
    }
}

impl Config {
    fn debug(&self, mode: DebugMode) -> bool {
        self.debug_modes.contains(&mode)
    }
}

/// Resolves `project`'s flags through `query` and stores the build file through `storage`.
///
/// Nothing reaches `storage` unless every earlier step succeeded.
pub fn generate<Q, S>(
    config: &Config,
    project: &Project,
    query: &mut Q,
    storage: &mut S,
) -> anyhow::Result<()>
where
    Q: MetadataQuery + ?Sized,
    S: Storage + ?Sized,
{
    let printer = Printer::new(config.verbose);

    printer.status(format_args!(
        "resolving flags for {}",
        project.dependencies.join(" ")
    ));
    let flags = resolve(query, project.dependencies)?;

    let descriptor = assemble(flags, project.targets(), catalog());
    if config.debug(DebugMode::Validate) {
        let order = graph::validate(&descriptor)?;
        printer.status(format_args!(
            "graph ok: {} sources, {} outputs",
            order.sources.len(),
            order.outputs.len()
        ));
    }

    printer.status(format_args!("writing {}", config.output));
    write(descriptor, Path::new(&config.output), storage)?;
    Ok(())
}

pub fn run(config: Config) -> anyhow::Result<()> {
    if let Some(dir) = &config.execution_dir {
        std::env::set_current_dir(&dir).with_context(|| format!("changing to {} for -C", &dir))?;
    }

    if config.debug(DebugMode::List) {
        println!("debugging modes:");
        for (name, help) in DebugMode::ALL {
            println!("  {:<9} {}", name, help);
        }
        return Ok(());
    }

    let metrics_enabled = config.debug(DebugMode::Stats);
    if metrics_enabled {
        ninjagen_metrics::enable();
    }

    {
        scoped_metric!("total");
        let mut query = PkgConfig::with_tool(config.pkg_config.clone());
        let result = generate(&config, &FONTDEBUG, &mut query, &mut FileStorage);
        let printer = Printer::new(config.verbose);
        for warning in query.warnings() {
            printer.warning(warning);
        }
        result?;
    }

    if metrics_enabled {
        ninjagen_metrics::dump();
    }
    Ok(())
}

/// The process exit code for a failed run.
///
/// A failing pkg-config passes its own code through, anything else is 1.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ResolveError>())
        .and_then(ResolveError::exit_code)
        .unwrap_or(1)
}
