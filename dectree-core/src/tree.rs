/*!

The compiled decision tree and the bookkeeping a consumer needs to run it.

*/

use dectree_abs::HashMap;

use crate::kernel::term::ConstructorKey;
use crate::position::Position;

/// A compiled match-dispatch automaton over one clause matrix (§4.4–§4.5).
///
/// Every node names an absolute [`Position`] (a path from the subject term's own root), so
/// running a `Tree` needs no separate worklist: a consumer navigates from the subject term down
/// to `position`, tests or captures what it finds, and recurses. A `Leaf`'s `bindings` then say
/// which capture-buffer slots (in the order they were pushed, root to leaf) land in which
/// argument position of that rule's right-hand side.
#[derive(Clone, Debug)]
pub enum Tree {
  /// A matching rule was found. `rule` identifies which of the rules passed to
  /// [`crate::compiler::compile`] matched; `bindings` maps a capture-buffer index to the
  /// right-hand-side argument slot it fills.
  Leaf { rule: usize, bindings: Vec<(usize, usize)> },
  /// No rule matches. Not an error — a perfectly ordinary outcome meaning the caller's subject
  /// term is already in normal form with respect to this symbol's rules.
  Fail,
  /// A constructor test at `position`. `store` says whether the inspected subterm should be
  /// pushed onto the capture buffer before dispatching — needed when some row reaching `default`
  /// treats this position as an opaque pattern-variable capture. `children` dispatches by
  /// constructor key; anything else falls to `default`.
  Node {
    position: Position,
    store:    bool,
    children: HashMap<ConstructorKey, Tree>,
    default:  Option<Box<Tree>>,
  },
  /// No test is performed: the subterm at `position` is captured unconditionally and `next` is
  /// run. Built by [`crate::fetch::fetch`] once a matrix's remaining columns hold nothing left to
  /// switch on — only unread pattern variables that a [`crate::matrix::ClauseMatrix::flushout_vars`]
  /// pass folded away before any `Node` had a chance to store them.
  Fetch { position: Position, next: Box<Tree> },
}

impl Tree {
  /// An upper bound on how large a consumer's capture buffer must be to run this tree: the
  /// number of capturing steps along the longest root-to-leaf path.
  pub fn capacity(&self) -> usize {
    match self {
      Tree::Leaf { .. } | Tree::Fail => 0,
      Tree::Node { store, children, default, .. } => {
        let from_children = children.values().map(Tree::capacity).max().unwrap_or(0);
        let from_default = default.as_ref().map(|t| t.capacity()).unwrap_or(0);
        from_children.max(from_default) + if *store { 1 } else { 0 }
      }
      Tree::Fetch { next, .. } => next.capacity() + 1,
    }
  }

  /// Depth-first, pre-order fold over every node in the tree, useful for tests and for
  /// [`crate::dot`]'s graph export.
  pub fn fold<A>(&self, init: A, mut visit: impl FnMut(A, &Tree) -> A) -> A
  where
    A: Clone,
  {
    fn go<A: Clone>(tree: &Tree, acc: A, visit: &mut impl FnMut(A, &Tree) -> A) -> A {
      let acc = visit(acc, tree);
      match tree {
        Tree::Leaf { .. } | Tree::Fail => acc,
        Tree::Node { children, default, .. } => {
          let mut acc = acc;
          for child in children.values() {
            acc = go(child, acc, visit);
          }
          if let Some(default) = default {
            acc = go(default, acc, visit);
          }
          acc
        }
        Tree::Fetch { next, .. } => go(next, acc, visit),
      }
    }
    go(self, init, &mut visit)
  }

  /// Counts every node reachable from `self`, including `self`.
  pub fn node_count(&self) -> usize {
    self.fold(0usize, |acc, _| acc + 1)
  }
}
