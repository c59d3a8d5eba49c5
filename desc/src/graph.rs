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

//! Checks a descriptor the way ninja would when loading it, without running anything.

use std::collections::{hash_map::Entry, HashMap, HashSet};

use ninjagen_metrics::scoped_metric;
use petgraph::{
    algo::toposort,
    graph::{DiGraph, NodeIndex},
};
use thiserror::Error;

use crate::Descriptor;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    #[error("build edge for {output} refers to unknown rule: {rule}")]
    UnknownRule { output: String, rule: String },
    #[error("duplicate output: {0}")]
    DuplicateOutput(String),
    #[error("dependency cycle through {0}")]
    Cycle(String),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Order {
    /// Inputs no target produces, sorted.
    pub sources: Vec<String>,
    /// Every target output, each after the outputs it consumes.
    pub outputs: Vec<String>,
}

type ArtifactGraph<'a> = DiGraph<&'a str, ()>;

fn add_or_get_node<'a>(
    map: &mut HashMap<&'a str, NodeIndex>,
    graph: &mut ArtifactGraph<'a>,
    path: &'a str,
) -> NodeIndex {
    match map.entry(path) {
        Entry::Vacant(e) => *e.insert(graph.add_node(path)),
        Entry::Occupied(e) => *e.get(),
    }
}

pub fn validate(descriptor: &Descriptor) -> Result<Order, GraphError> {
    scoped_metric!("validate");
    let rules: HashSet<&str> = descriptor.rules().iter().map(|r| r.name.as_str()).collect();

    // Edges point from an input to the output built from it.
    let mut graph = ArtifactGraph::new();
    let mut nodes = HashMap::new();
    let mut produced = HashSet::new();
    for target in descriptor.targets() {
        if !rules.contains(target.rule.as_str()) {
            return Err(GraphError::UnknownRule {
                output: target.output.clone(),
                rule: target.rule.clone(),
            });
        }
        if !produced.insert(target.output.as_str()) {
            return Err(GraphError::DuplicateOutput(target.output.clone()));
        }
        let output = add_or_get_node(&mut nodes, &mut graph, &target.output);
        for input in &target.inputs {
            let input = add_or_get_node(&mut nodes, &mut graph, input);
            graph.add_edge(input, output, ());
        }
    }

    let sorted = toposort(&graph, None)
        .map_err(|cycle| GraphError::Cycle(graph[cycle.node_id()].to_string()))?;

    let mut order = Order::default();
    for node in sorted {
        let path = graph[node];
        if produced.contains(path) {
            order.outputs.push(path.to_owned());
        } else {
            order.sources.push(path.to_owned());
        }
    }
    order.sources.sort();
    Ok(order)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{assemble, Rule, Target};
    use ninjagen_flags::FlagSet;

    fn desc(targets: Vec<Target>) -> Descriptor {
        assemble(
            FlagSet::default(),
            targets,
            vec![Rule::new("cc", "cc"), Rule::new("ld", "ld")],
        )
    }

    fn position(order: &Order, path: &str) -> usize {
        order
            .outputs
            .iter()
            .position(|p| p == path)
            .expect("output present")
    }

    #[test]
    fn outputs_follow_their_inputs() {
        let order = validate(&desc(vec![
            Target::new("app", "ld", vec!["a.o", "b.o"]),
            Target::new("a.o", "cc", vec!["a.c"]),
            Target::new("b.o", "cc", vec!["b.c", "common.h"]),
        ]))
        .unwrap();
        assert_eq!(order.sources, vec!["a.c", "b.c", "common.h"]);
        assert_eq!(order.outputs.len(), 3);
        assert!(position(&order, "a.o") < position(&order, "app"));
        assert!(position(&order, "b.o") < position(&order, "app"));
    }

    #[test]
    fn unknown_rule() {
        let err = validate(&desc(vec![Target::new("a.o", "baloney", vec!["a.c"])])).unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownRule {
                output: "a.o".to_owned(),
                rule: "baloney".to_owned()
            }
        );
    }

    #[test]
    fn duplicate_output() {
        let err = validate(&desc(vec![
            Target::new("a.o", "cc", vec!["a.c"]),
            Target::new("a.o", "cc", vec!["other.c"]),
        ]))
        .unwrap_err();
        assert_eq!(err, GraphError::DuplicateOutput("a.o".to_owned()));
    }

    #[test]
    fn cycle() {
        let err = validate(&desc(vec![
            Target::new("a.o", "cc", vec!["b.o"]),
            Target::new("b.o", "cc", vec!["a.o"]),
        ]))
        .unwrap_err();
        assert!(matches!(err, GraphError::Cycle(_)));
    }
}
