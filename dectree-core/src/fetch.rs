/*!

Once a row has no more columns worth switching on, something still has to retrieve the pattern
variables [`crate::matrix::ClauseMatrix::flushout_vars`] folded away without ever routing them
through a [`crate::tree::Tree::Node`]'s `store`. `fetch` builds the straight-line chain of
captures that does that, terminating in the row's `Leaf` (§4.5).

*/

use crate::matrix::Row;
use crate::position::Position;
use crate::tree::Tree;

/// Builds the tail of the tree for an exhausted row: a `Fetch` for every one of `row.variables`
/// not already captured along the path to here (`already_captured`), followed by the `Leaf`.
pub fn fetch(row: &Row, already_captured: &[Position]) -> Tree {
  let mut captured = already_captured.to_vec();
  let mut pending: Vec<(Position, usize)> =
    row.variables.iter().filter(|(p, _)| !captured.contains(p)).cloned().collect();
  build(row, &mut captured, &mut pending)
}

fn build(row: &Row, captured: &mut Vec<Position>, pending: &mut Vec<(Position, usize)>) -> Tree {
  if pending.is_empty() {
    let bindings = row
      .variables
      .iter()
      .map(|(position, slot)| {
        let index = captured
          .iter()
          .position(|c| c == position)
          .expect("every variable position is captured before the leaf it belongs to");
        (index, *slot)
      })
      .collect();
    return Tree::Leaf { rule: row.rule, bindings };
  }

  let (position, _slot) = pending.remove(0);
  captured.push(position.clone());
  let next = build(row, captured, pending);
  Tree::Fetch { position, next: Box::new(next) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn row_with_no_variables_is_a_bare_leaf() {
    let row = Row { rule: 3, cells: vec![], positions: vec![], variables: vec![] };
    let tree = fetch(&row, &[]);
    assert!(matches!(tree, Tree::Leaf { rule: 3, .. }));
  }

  #[test]
  fn uncaptured_variable_gets_a_fetch_node() {
    let position = Position::init().succ();
    let row = Row { rule: 0, cells: vec![], positions: vec![], variables: vec![(position.clone(), 0)] };
    let tree = fetch(&row, &[]);
    match tree {
      Tree::Fetch { position: p, next } => {
        assert_eq!(p, position);
        assert!(matches!(*next, Tree::Leaf { bindings, .. } if bindings == vec![(0, 0)]));
      }
      other => panic!("expected Fetch, got {:?}", other),
    }
  }

  #[test]
  fn already_captured_variable_skips_the_fetch() {
    let position = Position::init().succ();
    let row = Row { rule: 0, cells: vec![], positions: vec![], variables: vec![(position.clone(), 0)] };
    let tree = fetch(&row, &[position]);
    assert!(matches!(tree, Tree::Leaf { bindings, .. } if bindings == vec![(0, 0)]));
  }
}
