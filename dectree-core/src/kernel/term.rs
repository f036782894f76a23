/*!

The term language this crate's compiler operates over: a closed discriminated union with the
thirteen variants of a dependently-typed kernel's surface syntax. Construction, unfolding,
α-equivalence, and binder substitution are the term kernel's job (out of scope for this crate —
see [`crate::kernel::reference`] for a minimal stand-in used only by this crate's own tests);
what lives here is just enough structure for [`crate::view`], [`crate::matrix`], and
[`crate::fetch`] to pattern-match on.

*/

use std::rc::Rc;

use dectree_abs::HashSet;

pub type TermPtr = Rc<Term>;

/// A symbol's identity: where it lives and what it's called. Two `Symbol`s are the same symbol
/// iff `module_path` and `name` agree; [`ConstructorKey`] additionally records the arity of a
/// particular occurrence, since the same symbol applied to different numbers of arguments must
/// be switched on as distinct constructors (§4.1 of the design notes).
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Symbol {
  pub module_path: Rc<str>,
  pub name:        Rc<str>,
}

impl Symbol {
  pub fn new(module_path: impl Into<Rc<str>>, name: impl Into<Rc<str>>) -> Self {
    Symbol { module_path: module_path.into(), name: name.into() }
  }
}

impl std::fmt::Display for Symbol {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if self.module_path.is_empty() {
      write!(f, "{}", self.name)
    } else {
      write!(f, "{}.{}", self.module_path, self.name)
    }
  }
}

/// The discriminant used to select a subtree at a `Node`: either a defined symbol applied to a
/// given number of arguments, or the identity of a bound/free variable occurring as a head
/// (§4.3's `Var x | Var y | iff x = y` row), likewise paired with its arity — a `Var` can itself
/// be applied (a higher-order pattern's own bound function variable used as a head), and
/// §4.3's `Appl… | Appl… | heads match recursively AND argument counts equal` row requires two
/// such occurrences to agree on both identity and arity to be the same constructor.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum ConstructorKey {
  Symbol { module_path: Rc<str>, name: Rc<str>, arity: usize },
  Variable(Rc<str>, usize),
}

impl ConstructorKey {
  pub fn new(symbol: &Symbol, arity: usize) -> Self {
    ConstructorKey::Symbol { module_path: symbol.module_path.clone(), name: symbol.name.clone(), arity }
  }

  pub fn variable(name: impl Into<Rc<str>>, arity: usize) -> Self {
    ConstructorKey::Variable(name.into(), arity)
  }

  /// The number of sub-columns specializing on this key exposes.
  pub fn arity(&self) -> usize {
    match self {
      ConstructorKey::Symbol { arity, .. } => *arity,
      ConstructorKey::Variable(_, arity) => *arity,
    }
  }
}

impl std::fmt::Display for ConstructorKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ConstructorKey::Symbol { module_path, name, arity } if module_path.is_empty() => {
        write!(f, "{name}/{arity}")
      }
      ConstructorKey::Symbol { module_path, name, arity } => write!(f, "{module_path}.{name}/{arity}"),
      ConstructorKey::Variable(name, arity) => write!(f, "${name}/{arity}"),
    }
  }
}

/// A single-argument binder, as introduced by `Abst`, `Prod`, and `LLet`. `var_name` is cosmetic
/// bookkeeping only (this crate never needs to tell two bound variables with the same name
/// apart); `body` is the binder's scope, with occurrences of the bound variable represented as
/// `Term::Var(var_name)`.
#[derive(Clone, Debug)]
pub struct Binder1 {
  pub var_name: Rc<str>,
  pub body:     TermPtr,
}

impl Binder1 {
  pub fn new(var_name: impl Into<Rc<str>>, body: TermPtr) -> Self {
    Binder1 { var_name: var_name.into(), body }
  }

  /// Opens the binder, exposing the bound variable and the (unsubstituted) body. A term kernel
  /// would freshen `var_name` here to avoid capture; this crate's core never calls `unbind`
  /// itself (see §4.5: `Fetch` consumes `body` directly, unopened).
  pub fn unbind(&self) -> (Rc<str>, TermPtr) {
    (self.var_name.clone(), self.body.clone())
  }
}

/// A multi-argument binder: the shape of a rule's right-hand side. Its arity is the number of
/// distinct used pattern variables in the rule that owns it (§3).
#[derive(Clone, Debug)]
pub struct MultiBinder {
  pub var_names: Vec<Rc<str>>,
  pub body:      TermPtr,
}

impl MultiBinder {
  pub fn new(var_names: Vec<Rc<str>>, body: TermPtr) -> Self {
    MultiBinder { var_names, body }
  }

  #[inline(always)]
  pub fn arity(&self) -> usize {
    self.var_names.len()
  }

  /// Substitutes each bound variable with the correspondingly indexed argument. This is how a
  /// reduction engine would apply a `Leaf`'s environment to its right-hand side; the compiler
  /// itself never calls this (§6: "applies the binder" is the consumer's job).
  pub fn instantiate(&self, args: &[TermPtr]) -> TermPtr {
    debug_assert_eq!(args.len(), self.var_names.len(), "wrong number of arguments for binder");
    subst_names(&self.body, &self.var_names, args)
  }
}

fn subst_names(term: &TermPtr, names: &[Rc<str>], args: &[TermPtr]) -> TermPtr {
  match term.as_ref() {
    Term::Var(name) => {
      if let Some(i) = names.iter().position(|n| n == name) {
        args[i].clone()
      } else {
        term.clone()
      }
    }
    Term::Symb(_) | Term::Type | Term::Kind | Term::TEnv | Term::TRef | Term::Wild => term.clone(),
    Term::Appl(f, a) => {
      Rc::new(Term::Appl(subst_names(f, names, args), subst_names(a, names, args)))
    }
    Term::Abst(ty, binder) => Rc::new(Term::Abst(
      subst_names(ty, names, args),
      Binder1::new(binder.var_name.clone(), subst_names(&binder.body, names, args)),
    )),
    Term::Prod(ty, binder) => Rc::new(Term::Prod(
      subst_names(ty, names, args),
      Binder1::new(binder.var_name.clone(), subst_names(&binder.body, names, args)),
    )),
    Term::LLet(ty, def, binder) => Rc::new(Term::LLet(
      subst_names(ty, names, args),
      subst_names(def, names, args),
      Binder1::new(binder.var_name.clone(), subst_names(&binder.body, names, args)),
    )),
    Term::Meta(mv, env) => Rc::new(Term::Meta(
      mv.clone(),
      env.iter().map(|e| subst_names(e, names, args)).collect(),
    )),
    Term::Patt(slot, name, env) => Rc::new(Term::Patt(
      *slot,
      name.clone(),
      env.iter().map(|e| subst_names(e, names, args)).collect(),
    )),
  }
}

/// Identity of a metavariable (`Meta`), distinct from a rule's pattern variables (`Patt`).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MetaVar(pub Rc<str>);

/// The term language of §3. Only `Patt`, `Symb`, `Var`, `Appl`, `Abst` are permitted on rule
/// left-hand sides; the other variants may appear in right-hand sides or metavariable
/// environments but never as something [`crate::view::is_tree_constructor`] or
/// [`crate::view::key_of`] are asked to classify.
#[derive(Clone, Debug)]
pub enum Term {
  /// A (bound or free) variable, referenced by name.
  Var(Rc<str>),
  /// A defined or declared symbol, possibly applied to zero arguments.
  Symb(Symbol),
  Type,
  Kind,
  /// A dependent lambda abstraction: `λ(x : type). body`.
  Abst(TermPtr, Binder1),
  /// A dependent product (Pi) type: `Π(x : type). body`.
  Prod(TermPtr, Binder1),
  /// Application of a function term to an argument term.
  Appl(TermPtr, TermPtr),
  /// `let x : type := def in body`.
  LLet(TermPtr, TermPtr, Binder1),
  /// A metavariable applied to an explicit argument environment (an "instantiation list").
  Meta(MetaVar, Vec<TermPtr>),
  /// A rule pattern variable. `slot` is `Some(i)` iff the variable is used on the right-hand
  /// side, in which case captured terms for it must end up in RHS slot `i`. `env` is the local
  /// environment (the variables this pattern variable may legally depend on).
  Patt(Option<usize>, Rc<str>, Vec<TermPtr>),
  /// An environment placeholder internal to the kernel's representation of open terms.
  TEnv,
  /// A placeholder reference cell used internally by the kernel during elaboration.
  TRef,
  /// The wildcard / "don't care" term, never legal in a compiled rule's left-hand side.
  Wild,
}

impl Term {
  pub fn var(name: impl Into<Rc<str>>) -> TermPtr {
    Rc::new(Term::Var(name.into()))
  }

  pub fn symb(module_path: impl Into<Rc<str>>, name: impl Into<Rc<str>>) -> TermPtr {
    Rc::new(Term::Symb(Symbol::new(module_path, name)))
  }

  /// Builds `Appl(... Appl(Appl(head, args[0]), args[1]) ..., args[n-1])`, i.e. `head`
  /// saturated with `args` left to right.
  pub fn apply(head: TermPtr, args: impl IntoIterator<Item = TermPtr>) -> TermPtr {
    args.into_iter().fold(head, |f, a| Rc::new(Term::Appl(f, a)))
  }

  pub fn patt(slot: Option<usize>, name: impl Into<Rc<str>>, env: Vec<TermPtr>) -> TermPtr {
    Rc::new(Term::Patt(slot, name.into(), env))
  }

  /// Splits `self` into its head and the (left-to-right) arguments it has been applied to. Pure
  /// syntactic decomposition of the `Appl` spine; no reduction is performed (see §4.1: "fails
  /// (programmer error) on `Type`/`Kind`/`LLet`/`Wild`/`TRef`/`TEnv`" is about classification,
  /// not decomposition — `get_args` itself is total).
  pub fn get_args(self: &TermPtr) -> (TermPtr, Vec<TermPtr>) {
    let mut args = Vec::new();
    let mut head = self.clone();
    while let Term::Appl(f, a) = head.as_ref() {
      args.push(a.clone());
      head = f.clone();
    }
    args.reverse();
    (head, args)
  }

  /// Whether every `Var` occurring (free) in `self` also occurs as a `Var` somewhere in `env`.
  /// This is the structural stand-in the reference kernel uses for the higher-order-pattern
  /// "does this term depend only on variables `env` already allows" test that real closedness
  /// checking against a `TEnv` would perform (§4.3, `specialize`'s `Patt` row).
  pub fn is_closed_in_env(self: &TermPtr, env: &[TermPtr]) -> bool {
    fn allowed_names(env: &[TermPtr], out: &mut HashSet<Rc<str>>) {
      for e in env {
        if let Term::Var(name) = e.as_ref() {
          out.insert(name.clone());
        }
      }
    }
    fn check(term: &TermPtr, allowed: &HashSet<Rc<str>>) -> bool {
      match term.as_ref() {
        Term::Var(name) => allowed.contains(name),
        Term::Symb(_) | Term::Type | Term::Kind | Term::TEnv | Term::TRef | Term::Wild => true,
        Term::Appl(f, a) => check(f, allowed) && check(a, allowed),
        Term::Abst(ty, binder) | Term::Prod(ty, binder) => {
          check(ty, allowed) && check(&binder.body, allowed)
        }
        Term::LLet(ty, def, binder) => {
          check(ty, allowed) && check(def, allowed) && check(&binder.body, allowed)
        }
        Term::Meta(_, e) => e.iter().all(|t| check(t, allowed)),
        Term::Patt(_, _, e) => e.iter().all(|t| check(t, allowed)),
      }
    }

    let mut allowed = HashSet::new();
    allowed_names(env, &mut allowed);
    check(self, &allowed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn closed_when_every_free_variable_is_allowed() {
    let term = Term::apply(Term::symb("", "S"), [Term::var("x")]);
    let env = vec![Term::var("x")];
    assert!(term.is_closed_in_env(&env));
  }

  #[test]
  fn not_closed_when_a_free_variable_is_missing_from_env() {
    let term = Term::apply(Term::symb("", "S"), [Term::var("y")]);
    let env = vec![Term::var("x")];
    assert!(!term.is_closed_in_env(&env));
  }
}
