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

//! What gets built, as plain tables.

use ninjagen_desc::{rules, Target};

/// A binary file compiled into the program through `xxd -i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub input: &'static str,
    /// The generated C++ source, itself compiled like any other source.
    pub embedded: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Project {
    /// pkg-config package names, in the order they are queried.
    pub dependencies: &'static [&'static str],
    pub sources: &'static [&'static str],
    pub resources: &'static [Resource],
    pub out_dir: &'static str,
    pub binary: &'static str,
}

pub const FONTDEBUG: Project = Project {
    dependencies: &[
        "gtkmm-3.0",
        "gtk+-3.0",
        "glibmm-2.4",
        "glib-2.0",
        "icu-uc",
        "freetype2",
    ],
    sources: &["src/drawer.cpp", "src/fontdebug.cpp", "src/properties.cpp"],
    resources: &[Resource {
        input: "resources/app_icon.png",
        embedded: "out/resources/icon_embed.cpp",
    }],
    out_dir: "out",
    binary: "out/fontdebug",
};

impl Project {
    /// Object file for `source`. Sources already under the output directory keep their path.
    pub fn object_for(&self, source: &str) -> String {
        let prefix = format!("{}/", self.out_dir);
        if source.starts_with(&prefix) {
            format!("{}.o", source)
        } else {
            format!("{}{}.o", prefix, source)
        }
    }

    /// Embed edges, then one compile edge per source and per embedded resource, then the link.
    pub fn targets(&self) -> Vec<Target> {
        let mut targets = Vec::with_capacity(2 * self.resources.len() + self.sources.len() + 1);
        for resource in self.resources {
            targets.push(Target::new(
                resource.embedded,
                rules::EMBED,
                vec![resource.input],
            ));
        }

        let compiled = self
            .sources
            .iter()
            .copied()
            .chain(self.resources.iter().map(|r| r.embedded));
        let mut objects = Vec::new();
        for source in compiled {
            let object = self.object_for(source);
            targets.push(Target::new(object.clone(), rules::COMPILE, vec![source]));
            objects.push(object);
        }

        targets.push(Target::new(self.binary, rules::LINK, objects));
        targets
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn object_paths() {
        assert_eq!(FONTDEBUG.object_for("src/drawer.cpp"), "out/src/drawer.cpp.o");
        assert_eq!(
            FONTDEBUG.object_for("out/resources/icon_embed.cpp"),
            "out/resources/icon_embed.cpp.o"
        );
    }

    #[test]
    fn fontdebug_topology() {
        let targets = FONTDEBUG.targets();
        let rules: Vec<&str> = targets.iter().map(|t| t.rule.as_str()).collect();
        assert_eq!(
            rules,
            vec!["embed", "compile", "compile", "compile", "compile", "link"]
        );

        let link = targets.last().expect("link target");
        assert_eq!(link.output, "out/fontdebug");
        assert_eq!(
            link.inputs,
            vec![
                "out/src/drawer.cpp.o",
                "out/src/fontdebug.cpp.o",
                "out/src/properties.cpp.o",
                "out/resources/icon_embed.cpp.o",
            ]
        );
    }

    #[test]
    fn project_without_resources() {
        let project = Project {
            dependencies: &["zlib"],
            sources: &["main.c"],
            resources: &[],
            out_dir: "build",
            binary: "build/app",
        };
        assert_eq!(
            project.targets(),
            vec![
                Target::new("build/main.c.o", "compile", vec!["main.c"]),
                Target::new("build/app", "link", vec!["build/main.c.o"]),
            ]
        );
    }
}
