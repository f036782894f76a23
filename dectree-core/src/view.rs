/*!

The two structural questions the matching compiler asks of a term: is it something we can switch
on, and if so, under what key.

*/

use crate::kernel::term::{ConstructorKey, Term, TermPtr};

/// True iff `t`'s head is a `Var` or a `Symb` — the two term shapes a [`crate::tree::Tree::Node`]
/// can dispatch on. `Patt` and `Abst` are matched structurally elsewhere (a pattern variable is
/// never switched on; an abstraction is only ever fetched into, never compared by key).
///
/// Panics (programmer error) if `t`'s head is `Type`, `Kind`, `LLet`, `Wild`, `TRef`, or `TEnv` —
/// none of those are legal occurrences on a rule's left-hand side.
pub fn is_tree_constructor(t: &TermPtr) -> bool {
  let (head, _args) = t.get_args();
  match head.as_ref() {
    Term::Var(_) | Term::Symb(_) => true,
    Term::Patt(..) | Term::Abst(..) => false,
    Term::Type | Term::Kind | Term::LLet(..) | Term::Wild | Term::TRef | Term::TEnv => {
      panic!("is_tree_constructor: illegal left-hand-side head {:?}", head)
    }
    Term::Prod(..) | Term::Appl(..) | Term::Meta(..) => {
      panic!("is_tree_constructor: illegal left-hand-side head {:?}", head)
    }
  }
}

/// The constructor key of `t`: its head symbol's identity paired with the number of arguments
/// `t` is applied to here, or the identity of its head variable (§4.3's `Var x | Var y` row).
/// Panics (programmer error) if `t`'s head is neither — callers must check
/// [`is_tree_constructor`] first.
pub fn key_of(t: &TermPtr) -> ConstructorKey {
  let (head, args) = t.get_args();
  match head.as_ref() {
    Term::Symb(symbol) => ConstructorKey::new(symbol, args.len()),
    Term::Var(name) => ConstructorKey::variable(name.clone(), args.len()),
    other => panic!("key_of: head is neither a symbol nor a variable: {:?}", other),
  }
}
