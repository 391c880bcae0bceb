use std::collections::{BTreeMap, HashMap, HashSet};

use crate::state::State;

/// Graph structure for traversal and analysis.
#[derive(Debug, Clone)]
pub struct Graph {
  /// Adjacency list: state name -> list of successor state names.
  adjacency: HashMap<String, Vec<String>>,
  /// Reverse adjacency: state name -> list of predecessor state names.
  reverse_adjacency: HashMap<String, Vec<String>>,
  /// States with no incoming transitions, sorted by name.
  entry_points: Vec<String>,
  /// States with more than one predecessor.
  join_points: HashSet<String>,
}

impl Graph {
  /// Build a graph from the states of one state machine.
  ///
  /// Map iterators are separate graphs and are not descended into. Transitions
  /// to names that are not in `states` are kept so validation can report them.
  pub fn new(states: &BTreeMap<String, State>) -> Self {
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    let mut reverse_adjacency: HashMap<String, Vec<String>> = HashMap::new();

    for name in states.keys() {
      adjacency.entry(name.clone()).or_default();
      reverse_adjacency.entry(name.clone()).or_default();
    }

    for (from, state) in states {
      for to in state.successors() {
        let downstream = adjacency.entry(from.clone()).or_default();
        if downstream.iter().any(|existing| existing == to) {
          // Two choice rules routing to the same state are one edge.
          continue;
        }
        downstream.push(to.to_string());
        reverse_adjacency
          .entry(to.to_string())
          .or_default()
          .push(from.clone());
      }
    }

    let entry_points: Vec<String> = states
      .keys()
      .filter(|name| reverse_adjacency.get(*name).is_none_or(|v| v.is_empty()))
      .cloned()
      .collect();

    let join_points: HashSet<String> = reverse_adjacency
      .iter()
      .filter(|(_, incoming)| incoming.len() > 1)
      .map(|(name, _)| name.clone())
      .collect();

    Self {
      adjacency,
      reverse_adjacency,
      entry_points,
      join_points,
    }
  }

  /// Get entry points (states with no incoming transitions).
  pub fn entry_points(&self) -> &[String] {
    &self.entry_points
  }

  /// Get successor states for a given state.
  pub fn downstream(&self, name: &str) -> &[String] {
    self
      .adjacency
      .get(name)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Get predecessor states for a given state.
  pub fn upstream(&self, name: &str) -> &[String] {
    self
      .reverse_adjacency
      .get(name)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Check if a state is a join point (has multiple predecessors).
  pub fn is_join_point(&self, name: &str) -> bool {
    self.join_points.contains(name)
  }

  /// Get all join points.
  pub fn join_points(&self) -> &HashSet<String> {
    &self.join_points
  }

  /// All states reachable from `start`, including `start` itself.
  pub fn reachable_from(&self, start: &str) -> HashSet<String> {
    let mut visited = HashSet::new();
    let mut stack = vec![start.to_string()];

    while let Some(name) = stack.pop() {
      if !visited.insert(name.clone()) {
        continue;
      }
      for next in self.downstream(&name) {
        if !visited.contains(next) {
          stack.push(next.clone());
        }
      }
    }

    visited
  }
}
