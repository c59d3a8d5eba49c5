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

//! The in-memory build descriptor and everything needed to turn it into a ninja file.
//!
//! A [`Descriptor`] is assembled once from resolved flags, a rule catalog and a target list,
//! then handed to [`write`], which consumes it.

use ninjagen_flags::FlagSet;
use ninjagen_metrics::scoped_metric;

pub mod graph;
mod render;
pub mod rules;
mod writer;

pub use render::escape_path;
pub use rules::{catalog, DepTracking, Rule};
pub use writer::{write, FileStorage, Storage, WriteError};

#[cfg(any(test, feature = "testing"))]
pub use writer::MemoryStorage;

pub const CCFLAGS: &str = "ccflags";
pub const LINKFLAGS: &str = "linkflags";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub value: String,
}

/// One build edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub output: String,
    pub rule: String,
    pub inputs: Vec<String>,
}

impl Target {
    pub fn new<O, R, I, S>(output: O, rule: R, inputs: I) -> Target
    where
        O: Into<String>,
        R: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Target {
            output: output.into(),
            rule: rule.into(),
            inputs: inputs.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    bindings: Vec<Binding>,
    rules: Vec<Rule>,
    targets: Vec<Target>,
}

impl Descriptor {
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn binding(&self, name: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.value.as_str())
    }
}

/// Binds `ccflags` and `linkflags`, then takes the rules and targets as given.
///
/// Nothing is checked here: a target naming a missing rule or input only fails once ninja
/// reads the file. See [`graph::validate`] for an explicit check.
pub fn assemble(flags: FlagSet, targets: Vec<Target>, rules: Vec<Rule>) -> Descriptor {
    scoped_metric!("assemble");
    Descriptor {
        bindings: vec![
            Binding {
                name: CCFLAGS.to_owned(),
                value: flags.compile_flags,
            },
            Binding {
                name: LINKFLAGS.to_owned(),
                value: flags.link_flags,
            },
        ],
        rules,
        targets,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn flags(cc: &str, link: &str) -> FlagSet {
        FlagSet {
            compile_flags: cc.to_owned(),
            link_flags: link.to_owned(),
        }
    }

    #[test]
    fn bindings_come_first_and_verbatim() {
        let desc = assemble(flags(" -Ia  \n", "-la\n"), vec![], catalog());
        assert_eq!(
            desc.bindings(),
            &[
                Binding {
                    name: "ccflags".to_owned(),
                    value: " -Ia  \n".to_owned()
                },
                Binding {
                    name: "linkflags".to_owned(),
                    value: "-la\n".to_owned()
                },
            ]
        );
        assert_eq!(desc.binding(LINKFLAGS), Some("-la\n"));
        assert_eq!(desc.binding("cxx"), None);
    }

    #[test]
    fn rules_and_targets_keep_their_order() {
        let targets = vec![
            Target::new("b.o", "cc", vec!["b.c"]),
            Target::new("a.o", "cc", vec!["a.c"]),
            Target::new("app", "ld", vec!["b.o", "a.o"]),
        ];
        let rules = vec![Rule::new("ld", "ld -o $out $in"), Rule::new("cc", "cc $in")];
        let desc = assemble(flags("", ""), targets.clone(), rules.clone());
        assert_eq!(desc.targets(), targets.as_slice());
        assert_eq!(desc.rules(), rules.as_slice());
    }

    #[test]
    fn dangling_inputs_are_accepted() {
        let targets = vec![Target::new("app", "link", vec!["never-built.o"])];
        let desc = assemble(flags("", ""), targets, catalog());
        assert_eq!(desc.targets().len(), 1);
    }
}
