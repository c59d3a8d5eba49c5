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

//! The recipes every generated build file carries.

pub const EMBED: &str = "embed";
pub const COMPILE: &str = "compile";
pub const LINK: &str = "link";

/// How the build executor learns about a rule's implicit inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepTracking {
    None,
    /// The command writes a gcc-style depfile at this path pattern.
    Depfile(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub command: String,
    pub tracking: DepTracking,
}

impl Rule {
    pub fn new<N: Into<String>, C: Into<String>>(name: N, command: C) -> Rule {
        Rule {
            name: name.into(),
            command: command.into(),
            tracking: DepTracking::None,
        }
    }

    pub fn with_depfile<P: Into<String>>(mut self, pattern: P) -> Rule {
        self.tracking = DepTracking::Depfile(pattern.into());
        self
    }

    pub fn depfile(&self) -> Option<&str> {
        match self.tracking {
            DepTracking::Depfile(ref pattern) => Some(pattern),
            DepTracking::None => None,
        }
    }
}

struct Template {
    name: &'static str,
    command: &'static str,
    depfile: Option<&'static str>,
}

// `$ccflags` and `$linkflags` are the global bindings the assembler emits.
const CATALOG: &[Template] = &[
    Template {
        name: EMBED,
        command: "xxd -i $in $out",
        depfile: None,
    },
    Template {
        name: COMPILE,
        command: "g++ -MD -MF $out.d -c -o $out -O3 $in $ccflags",
        depfile: Some("$out.d"),
    },
    Template {
        name: LINK,
        command: "g++ -o $out $in $linkflags",
        depfile: None,
    },
];

/// `embed`, `compile` and `link`, in that order.
pub fn catalog() -> Vec<Rule> {
    CATALOG
        .iter()
        .map(|t| {
            let rule = Rule::new(t.name, t.command);
            match t.depfile {
                Some(pattern) => rule.with_depfile(pattern),
                None => rule,
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn catalog_order() {
        let names: Vec<String> = catalog().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec![EMBED, COMPILE, LINK]);
    }

    #[test]
    fn only_compile_tracks_dependencies() {
        for rule in catalog() {
            if rule.name == COMPILE {
                assert_eq!(rule.depfile(), Some("$out.d"));
                assert!(rule.command.contains("-MD -MF $out.d"));
            } else {
                assert_eq!(rule.tracking, DepTracking::None);
            }
        }
    }

    #[test]
    fn commands_reference_global_flags() {
        let rules = catalog();
        assert!(rules[1].command.ends_with("$ccflags"));
        assert!(rules[2].command.ends_with("$linkflags"));
    }
}
