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

use std::{
    borrow::Cow,
    fmt::{Display, Formatter, Result},
};

use crate::{Binding, Descriptor, Rule, Target};

const INDENT: &str = "    ";

/// Escapes the characters that end or split a path in a `build` line.
pub fn escape_path(path: &str) -> Cow<'_, str> {
    if !path.contains(|c: char| c == '$' || c == ' ' || c == ':') {
        return Cow::Borrowed(path);
    }
    let mut escaped = String::with_capacity(path.len() + 4);
    for c in path.chars() {
        if c == '$' || c == ' ' || c == ':' {
            escaped.push('$');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

// Values are flag blobs from pkg-config and go out untouched, newline and all.
impl Display for Binding {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "rule {}", self.name)?;
        if let Some(depfile) = self.depfile() {
            writeln!(f, "{}depfile = {}", INDENT, depfile)?;
        }
        writeln!(f, "{}command = {}", INDENT, self.command)
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "build {}: {}", escape_path(&self.output), self.rule)?;
        for input in &self.inputs {
            write!(f, " {}", escape_path(input))?;
        }
        Ok(())
    }
}

impl Display for Descriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for binding in &self.bindings {
            writeln!(f, "{}", binding)?;
        }
        writeln!(f)?;

        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }

        // Runs of targets sharing a rule are kept together.
        let mut previous_rule: Option<&str> = None;
        for target in &self.targets {
            if previous_rule.map_or(false, |rule| rule != target.rule) {
                writeln!(f)?;
            }
            writeln!(f, "{}", target)?;
            previous_rule = Some(&target.rule);
        }
        Ok(())
    }
}
