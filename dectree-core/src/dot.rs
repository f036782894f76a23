/*!

Renders a compiled [`Tree`] as Graphviz `dot` source, for debugging a compiled automaton by eye.
Not on any hot path; purely a diagnostic.

*/

use std::fmt::Write as _;

use crate::tree::Tree;

/// Renders `tree` as a `dot` digraph. `name` becomes the graph's name (e.g. the head symbol this
/// tree was compiled for).
pub fn to_dot(name: &str, tree: &Tree) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "digraph \"{name}\" {{");
  let mut counter = 0usize;
  write_node(tree, &mut counter, &mut out);
  out.push_str("}\n");
  out
}

fn write_node(tree: &Tree, counter: &mut usize, out: &mut String) -> usize {
  let id = *counter;
  *counter += 1;
  match tree {
    Tree::Leaf { rule, bindings } => {
      let _ = writeln!(out, "  n{id} [label=\"Leaf(rule={rule}, bindings={bindings:?})\", shape=box];");
    }
    Tree::Fail => {
      let _ = writeln!(out, "  n{id} [label=\"Fail\", shape=box, style=dashed];");
    }
    Tree::Node { position, store, children, default } => {
      let _ = writeln!(out, "  n{id} [label=\"@{position} store={store}\"];");
      for (key, child) in children {
        let child_id = write_node(child, counter, out);
        let _ = writeln!(out, "  n{id} -> n{child_id} [label=\"{key}\"];");
      }
      if let Some(default) = default {
        let child_id = write_node(default, counter, out);
        let _ = writeln!(out, "  n{id} -> n{child_id} [label=\"*\", style=dotted];");
      }
    }
    Tree::Fetch { position, next } => {
      let _ = writeln!(out, "  n{id} [label=\"fetch @{position}\", shape=oval];");
      let child_id = write_node(next, counter, out);
      let _ = writeln!(out, "  n{id} -> n{child_id};");
    }
  }
  id
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fail_renders_as_a_single_node() {
    let dot = to_dot("f", &Tree::Fail);
    assert!(dot.contains("digraph \"f\""));
    assert!(dot.contains("Fail"));
  }
}
