/*!

The boundary between this crate and a real dependently-typed term kernel (§6). `term` defines the
term language itself, which this crate depends on structurally; [`ReductionKernel`] documents the
handful of operations — unfolding, α-equivalence, binder opening/substitution, fresh-variable
generation — that belong to a term kernel rather than to the match compiler. The compiler never
calls a `ReductionKernel` itself: it is the interface a *consumer* of a compiled [`crate::tree::Tree`]
(a reduction engine) needs. [`reference`] provides a minimal implementation of it, used only by
this crate's own integration tests to drive compiled trees end to end.

*/

pub mod reference;
pub mod term;

use term::TermPtr;

/// The term-kernel operations a tree *consumer* needs that this crate does not implement.
/// `get_args`, `is_closed_in_env`, and `MultiBinder::arity` are inherent methods on
/// [`term::Term`] and [`term::MultiBinder`] because they are pure syntax; the methods below all
/// require knowledge this crate deliberately doesn't have (a signature, a typing context, a
/// variable-freshness counter).
pub trait ReductionKernel {
  /// Reduces `t` to weak head normal form.
  fn unfold(&self, t: &TermPtr) -> TermPtr;

  /// Tests `t` and `u` for α-equivalence under the bindings in `ctx`.
  fn eq(&self, ctx: &[(std::rc::Rc<str>, TermPtr)], t: &TermPtr, u: &TermPtr) -> bool;

  /// Produces a variable name guaranteed fresh with respect to everything generated so far.
  fn fresh_variable(&mut self) -> std::rc::Rc<str>;
}
