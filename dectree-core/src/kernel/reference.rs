/*!

A minimal stand-in for a real term kernel, used only by this crate's own tests to drive a
compiled [`crate::tree::Tree`] end to end: run it against a concrete subject, get back which rule
fired and what it captured, then instantiate that rule's right-hand side. None of this is part of
the public contract a real kernel integration would need to satisfy beyond [`super::ReductionKernel`]
itself.

*/

use std::rc::Rc;

use crate::kernel::term::{Term, TermPtr};
use crate::position::Position;
use crate::tree::Tree;

/// A trivial [`super::ReductionKernel`]: terms are already in the only normal form this crate's
/// tests ever construct, so `unfold` is the identity; `eq` is plain structural equality, since
/// none of the worked scenarios need genuine α-equivalence.
#[derive(Default)]
pub struct ReferenceKernel {
  fresh_counter: usize,
}

impl ReferenceKernel {
  pub fn new() -> Self {
    ReferenceKernel::default()
  }
}

impl super::ReductionKernel for ReferenceKernel {
  fn unfold(&self, t: &TermPtr) -> TermPtr {
    t.clone()
  }

  fn eq(&self, _ctx: &[(Rc<str>, TermPtr)], t: &TermPtr, u: &TermPtr) -> bool {
    structurally_equal(t, u)
  }

  fn fresh_variable(&mut self) -> Rc<str> {
    let n = self.fresh_counter;
    self.fresh_counter += 1;
    Rc::from(format!("_fresh{n}"))
  }
}

/// Structural term equality, exposed for this crate's own integration tests to check an
/// instantiated right-hand side against an expected shape. Not α-equivalence — see
/// [`super::ReductionKernel::eq`] for that.
pub fn term_eq(t: &TermPtr, u: &TermPtr) -> bool {
  structurally_equal(t, u)
}

fn structurally_equal(t: &TermPtr, u: &TermPtr) -> bool {
  match (t.as_ref(), u.as_ref()) {
    (Term::Var(a), Term::Var(b)) => a == b,
    (Term::Symb(a), Term::Symb(b)) => a == b,
    (Term::Type, Term::Type) | (Term::Kind, Term::Kind) => true,
    (Term::Appl(f1, a1), Term::Appl(f2, a2)) => structurally_equal(f1, f2) && structurally_equal(a1, a2),
    (Term::Abst(ty1, b1), Term::Abst(ty2, b2)) | (Term::Prod(ty1, b1), Term::Prod(ty2, b2)) => {
      structurally_equal(ty1, ty2) && structurally_equal(&b1.body, &b2.body)
    }
    _ => false,
  }
}

/// Walks `tree` against `args` (the arguments the rule set's head symbol was applied to) and
/// returns the rule that matched along with the captured subterms in right-hand-side slot order,
/// or `None` on [`Tree::Fail`].
pub fn run(tree: &Tree, args: &[TermPtr]) -> Option<(usize, Vec<TermPtr>)> {
  let mut captures = Vec::with_capacity(tree.capacity());
  walk(tree, args, &mut captures)
}

fn walk(tree: &Tree, args: &[TermPtr], captures: &mut Vec<TermPtr>) -> Option<(usize, Vec<TermPtr>)> {
  match tree {
    Tree::Fail => None,
    Tree::Leaf { rule, bindings } => {
      let mut out: Vec<Option<TermPtr>> = vec![None; bindings.len()];
      for (capture_index, slot) in bindings {
        if *slot >= out.len() {
          out.resize(*slot + 1, None);
        }
        out[*slot] = Some(captures[*capture_index].clone());
      }
      let out = out.into_iter().map(|o| o.expect("every rhs slot bound by a leaf is captured")).collect();
      Some((*rule, out))
    }
    Tree::Fetch { position, next } => {
      captures.push(subterm_at(args, position));
      walk(next, args, captures)
    }
    Tree::Node { position, store, children, default } => {
      let subterm = subterm_at(args, position);
      if *store {
        captures.push(subterm.clone());
      }
      let (head, subargs) = subterm.get_args();
      let key = match head.as_ref() {
        Term::Symb(symbol) => Some(crate::kernel::term::ConstructorKey::new(symbol, subargs.len())),
        Term::Var(name) => Some(crate::kernel::term::ConstructorKey::variable(name.clone(), subargs.len())),
        _ => None,
      };
      if let Some(key) = key {
        if let Some(child) = children.get(&key) {
          return walk(child, args, captures);
        }
      }
      match default {
        Some(default) => walk(default, args, captures),
        None => None,
      }
    }
  }
}

fn subterm_at(args: &[TermPtr], position: &Position) -> TermPtr {
  let path = position.path();
  assert!(!path.is_empty(), "a position used at runtime is never the root");
  let mut current = args[path[0]].clone();
  for &index in &path[1..] {
    current = match current.as_ref() {
      Term::Abst(_, binder) => {
        debug_assert_eq!(index, 0, "an abstraction has only one child: its body");
        binder.body.clone()
      }
      _ => {
        let (_, subargs) = current.get_args();
        subargs[index].clone()
      }
    };
  }
  current
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::kernel::ReductionKernel;

  #[test]
  fn structural_equality_distinguishes_symbols() {
    let a = Term::symb("", "Z");
    let b = Term::symb("", "S");
    assert!(structurally_equal(&a, &a));
    assert!(!structurally_equal(&a, &b));
  }

  #[test]
  fn fresh_variable_names_are_distinct() {
    let mut kernel = ReferenceKernel::new();
    let a = kernel.fresh_variable();
    let b = kernel.fresh_variable();
    assert_ne!(a, b);
  }
}
