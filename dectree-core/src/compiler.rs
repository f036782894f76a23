/*!

The recursive compilation step: turn a [`ClauseMatrix`] into a [`Tree`] by repeatedly picking the
best remaining column, splitting the matrix on it, and recursing (§4.4).

*/

use dectree_abs::log::trace;
use dectree_abs::HashMap;

use crate::matrix::ClauseMatrix;
use crate::options::CompilerOptions;
use crate::position::Position;
use crate::rule::Rule;
use crate::tree::Tree;

/// Compiles a set of rules sharing a head symbol into one decision tree.
///
/// Rows are tried in the order `rules` lists them: if two rules could both match the same
/// subject, the earlier one wins (§8, priority).
pub fn compile_rules(rules: &[Rule], options: &CompilerOptions) -> Tree {
  let matrix = ClauseMatrix::of_rules(rules);
  let mut captured = Vec::new();
  compile(&matrix, options, &mut captured)
}

/// Compiles an already-built matrix. Exposed separately from [`compile_rules`] so tests and
/// [`crate::fetch`] can drive partially-specialized matrices directly.
pub fn compile(matrix: &ClauseMatrix, options: &CompilerOptions, captured: &mut Vec<Position>) -> Tree {
  if matrix.is_empty() {
    trace!("compile: no rows left, emitting Fail");
    return Tree::Fail;
  }

  if matrix.rows[0].exhausted() {
    trace!(rule = matrix.rows[0].rule, "compile: top row exhausted, emitting Leaf via fetch");
    return crate::fetch::fetch(&matrix.rows[0], captured);
  }

  let col = matrix
    .pick_best_among(options)
    .expect("a non-exhausted top row implies some column is switchable");
  let position = matrix.rows[0].positions[col].clone();
  let store = matrix.column_has_named_patt(col);
  let base = if store { matrix.capture_named_patt(col) } else { matrix.clone() };

  trace!(col, store, %position, "compile: switching on column");

  let mut children = HashMap::new();
  for key in base.get_cons(col) {
    let specialized = base.specialize(col, &key);
    let mut branch_captured = captured.clone();
    if store {
      branch_captured.push(position.clone());
    }
    children.insert(key, compile(&specialized, options, &mut branch_captured));
  }

  let default_matrix = base.default(col);
  let default = if default_matrix.is_empty() {
    None
  } else {
    let mut branch_captured = captured.clone();
    if store {
      branch_captured.push(position.clone());
    }
    Some(Box::new(compile(&default_matrix, options, &mut branch_captured)))
  };

  Tree::Node { position, store, children, default }
}
