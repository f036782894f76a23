//! End-to-end coverage over Peano-style rules: compile a rule set, run the compiled tree against
//! concrete subjects via the reference kernel, and check both which rule fired and what it
//! captured.

use dectree_core::kernel::reference::{run, term_eq};
use dectree_core::kernel::term::{MultiBinder, Term, TermPtr};
use dectree_core::{compile_rules, CompilerOptions, Rule, Tree};

/// Installs a `tracing` subscriber so `RUST_LOG=trace cargo test -- --nocapture` shows the
/// compiler's column-selection decisions. Safe to call from every test: `try_init` ignores the
/// "already set" error from whichever test runs first.
fn init_tracing() {
  let _ = tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).try_init();
}

fn z() -> TermPtr {
  Term::symb("", "Z")
}

fn s(n: TermPtr) -> TermPtr {
  Term::apply(Term::symb("", "S"), [n])
}

fn f(a: TermPtr, b: TermPtr) -> TermPtr {
  Term::apply(Term::symb("", "f"), [a, b])
}

fn patt(slot: usize, name: &str) -> TermPtr {
  Term::patt(Some(slot), name, vec![])
}

/// `f Z Z -> Z`, `f (S x) Z -> x`, `f Z (S y) -> y`, `f (S x) (S y) -> S (f x y)`.
fn addition_rules() -> Vec<Rule> {
  vec![
    Rule::new(vec![z(), z()], MultiBinder::new(vec![], z())),
    Rule::new(vec![s(patt(0, "x")), z()], MultiBinder::new(vec!["x".into()], Term::var("x"))),
    Rule::new(vec![z(), s(patt(0, "y"))], MultiBinder::new(vec!["y".into()], Term::var("y"))),
    Rule::new(
      vec![s(patt(0, "x")), s(patt(1, "y"))],
      MultiBinder::new(vec!["x".into(), "y".into()], s(f(Term::var("x"), Term::var("y")))),
    ),
  ]
}

fn run_addition(a: TermPtr, b: TermPtr) -> Option<(usize, TermPtr)> {
  init_tracing();
  let rules = addition_rules();
  let tree = compile_rules(&rules, &CompilerOptions::default());
  let (rule, captures) = run(&tree, &[a, b])?;
  let rhs = rules[rule].rhs.instantiate(&captures);
  Some((rule, rhs))
}

#[test]
fn base_case_both_zero() {
  let (rule, rhs) = run_addition(z(), z()).expect("f Z Z should match");
  assert_eq!(rule, 0);
  assert!(term_eq(&rhs, &z()));
}

#[test]
fn left_successor_right_zero_captures_predecessor() {
  let (rule, rhs) = run_addition(s(s(z())), z()).expect("f (S (S Z)) Z should match");
  assert_eq!(rule, 1);
  assert!(term_eq(&rhs, &s(z())));
}

#[test]
fn left_zero_right_successor_captures_predecessor() {
  let (rule, rhs) = run_addition(z(), s(z())).expect("f Z (S Z) should match");
  assert_eq!(rule, 2);
  assert!(term_eq(&rhs, &z()));
}

#[test]
fn both_successors_captures_both_and_recurses_symbolically() {
  let (rule, rhs) = run_addition(s(z()), s(s(z()))).expect("f (S Z) (S (S Z)) should match");
  assert_eq!(rule, 3);
  // S (f Z (S Z)) -- the recursive call is left uninterpreted; only its shape is checked.
  let expected = s(f(z(), s(z())));
  assert!(term_eq(&rhs, &expected));
}

#[test]
fn unmatched_shape_fails_cleanly() {
  // Neither argument position is covered once both heads are bare pattern-free unknowns: a
  // symbol this rule set never mentions.
  let subject_a = Term::symb("", "Unrelated");
  let subject_b = z();
  let rules = addition_rules();
  let tree = compile_rules(&rules, &CompilerOptions::default());
  assert!(run(&tree, &[subject_a, subject_b]).is_none());
}

#[test]
fn earlier_rule_wins_on_overlap() {
  // r0 matches any `S _` first argument regardless of the second; r1 is the same shape with a
  // concrete `Z` second argument, strictly more specific. Listed first, r0 must still win.
  let wildcard = || Term::patt(None, "_", vec![]);
  let rules = vec![
    Rule::new(vec![s(patt(0, "x")), wildcard()], MultiBinder::new(vec!["x".into()], Term::symb("", "FIRST"))),
    Rule::new(vec![s(patt(0, "x")), z()], MultiBinder::new(vec!["x".into()], Term::symb("", "SECOND"))),
  ];
  let tree = compile_rules(&rules, &CompilerOptions::default());
  let (rule, captures) = run(&tree, &[s(z()), z()]).expect("S _ Z should match");
  assert_eq!(rule, 0, "the earlier, more general rule takes priority");
  let rhs = rules[rule].rhs.instantiate(&captures);
  assert!(term_eq(&rhs, &Term::symb("", "FIRST")));
}

#[test]
fn single_rule_symbol_needs_no_branching_node() {
  // `g a -> a`: one rule, one pattern variable, no constructor ever tested.
  let rules = vec![Rule::new(vec![patt(0, "a")], MultiBinder::new(vec!["a".into()], Term::var("a")))];
  let tree = compile_rules(&rules, &CompilerOptions::default());
  assert!(!matches!(tree, Tree::Node { .. }), "a single catch-all rule never needs a constructor test");
  let subject = s(s(z()));
  let (rule, captures) = run(&tree, &[subject.clone()]).expect("g always matches");
  assert_eq!(rule, 0);
  let rhs = rules[rule].rhs.instantiate(&captures);
  assert!(term_eq(&rhs, &subject));
}

#[test]
fn fetch_descends_through_an_abstraction_body() {
  // `h (\x. b) -> b`: the pattern variable sits under a binder, so capturing it means stepping
  // into the `Abst` body without ever testing a constructor there.
  let body = s(z());
  let binder = dectree_core::kernel::term::Binder1::new("x", patt(0, "b"));
  let lambda = std::rc::Rc::new(dectree_core::kernel::term::Term::Abst(Term::symb("", "Nat"), binder));
  let rules = vec![Rule::new(vec![lambda], MultiBinder::new(vec!["b".into()], Term::var("b")))];
  let tree = compile_rules(&rules, &CompilerOptions::default());

  let subject_binder = dectree_core::kernel::term::Binder1::new("x", body.clone());
  let subject = std::rc::Rc::new(dectree_core::kernel::term::Term::Abst(Term::symb("", "Nat"), subject_binder));
  let (rule, captures) = run(&tree, &[subject]).expect("h (\\x. body) should match");
  assert_eq!(rule, 0);
  let rhs = rules[rule].rhs.instantiate(&captures);
  assert!(term_eq(&rhs, &body));
}

#[test]
fn abstraction_row_sharing_a_column_with_a_constructor_row_still_captures() {
  // `h (\x. b) -> b` and `h Z -> ZERO_CASE` share their single argument column: one rule expects
  // an abstraction there, the other a concrete `Z`. Folding the abstraction open must not depend
  // on every row at that column also being an abstraction or pattern variable, and the resulting
  // capture must still reach the leaf instead of being silently dropped.
  init_tracing();
  let binder = dectree_core::kernel::term::Binder1::new("x", patt(0, "b"));
  let lambda_pattern = std::rc::Rc::new(dectree_core::kernel::term::Term::Abst(Term::symb("", "Nat"), binder));
  let rules = vec![
    Rule::new(vec![lambda_pattern], MultiBinder::new(vec!["b".into()], Term::var("b"))),
    Rule::new(vec![z()], MultiBinder::new(vec![], Term::symb("", "ZERO_CASE"))),
  ];
  let tree = compile_rules(&rules, &CompilerOptions::default());

  let body = s(z());
  let subject_binder = dectree_core::kernel::term::Binder1::new("x", body.clone());
  let subject = std::rc::Rc::new(dectree_core::kernel::term::Term::Abst(Term::symb("", "Nat"), subject_binder));
  let (rule, captures) = run(&tree, &[subject]).expect("an abstraction subject should still match");
  assert_eq!(rule, 0);
  let rhs = rules[rule].rhs.instantiate(&captures);
  assert!(term_eq(&rhs, &body));
}

#[test]
fn capacity_bounds_the_number_of_captures_actually_made() {
  let rules = addition_rules();
  let tree = compile_rules(&rules, &CompilerOptions::default());
  let capacity = tree.capacity();
  let (_, captures) = run(&tree, &[s(z()), s(s(z()))]).expect("f (S Z) (S (S Z)) should match");
  assert!(captures.len() <= capacity, "run captured more than the tree's declared capacity");
}
