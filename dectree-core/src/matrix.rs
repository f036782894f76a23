/*!

The clause matrix: the compiler's working representation of a set of still-candidate rules,
one row per rule, one column per subterm still worth inspecting. [`crate::compiler::compile`]
repeatedly asks a matrix to pick its best column, then splits on it, until every row is either
gone or exhausted.

*/

use std::rc::Rc;

use dectree_abs::IndexSet;

use crate::kernel::term::{ConstructorKey, MultiBinder, Term, TermPtr};
use crate::options::{CompilerOptions, TieBreak};
use crate::position::Position;

/// One candidate rule's state partway through compilation: the subterms still left to inspect,
/// the original position each occupies, and the pattern-variable captures already accounted for
/// (but not yet emitted as tree nodes — see [`crate::fetch`]).
#[derive(Clone, Debug)]
pub struct Row {
  pub rule: usize,
  pub cells: Vec<TermPtr>,
  pub positions: Vec<Position>,
  /// Pattern variables whose column has already been folded out of `cells` (because, across the
  /// whole matrix, it held nothing left to test) paired with the right-hand-side slot they fill.
  pub variables: Vec<(Position, usize)>,
}

impl Row {
  pub fn exhausted(&self) -> bool {
    self.cells.is_empty()
  }

  /// The position at which a named pattern variable sits, if this row still remembers one by
  /// that name — either live in `cells` or already folded into `variables`.
  pub fn varpos(&self, name: &str) -> Option<Position> {
    for (cell, pos) in self.cells.iter().zip(self.positions.iter()) {
      if let Term::Patt(_, n, _) = cell.as_ref() {
        if n.as_ref() == name {
          return Some(pos.clone());
        }
      }
    }
    None
  }
}

#[derive(Clone, Debug, Default)]
pub struct ClauseMatrix {
  pub rows: Vec<Row>,
}

/// Whether a variable named `name` actually occurs in `rhs`'s body — used when a rule's surface
/// syntax is translated into `Patt` cells, to decide whether a pattern variable needs a right-
/// hand-side slot at all or can be left `Patt(None, ..)`.
pub fn in_rhs(rhs: &MultiBinder, name: &str) -> bool {
  fn occurs(term: &TermPtr, name: &str) -> bool {
    match term.as_ref() {
      Term::Var(n) => n.as_ref() == name,
      Term::Symb(_) | Term::Type | Term::Kind | Term::TEnv | Term::TRef | Term::Wild => false,
      Term::Appl(f, a) => occurs(f, name) || occurs(a, name),
      Term::Abst(ty, binder) | Term::Prod(ty, binder) => occurs(ty, name) || occurs(&binder.body, name),
      Term::LLet(ty, def, binder) => occurs(ty, name) || occurs(def, name) || occurs(&binder.body, name),
      Term::Meta(_, env) | Term::Patt(_, _, env) => env.iter().any(|t| occurs(t, name)),
    }
  }
  occurs(&rhs.body, name)
}

impl ClauseMatrix {
  /// Builds the initial matrix for one head symbol's rules: one row per rule, its left-hand-side
  /// arguments tagged with their positions, then immediately flushed of any column that is a
  /// pattern variable in every row.
  pub fn of_rules(rules: &[crate::rule::Rule]) -> ClauseMatrix {
    let rows = rules
      .iter()
      .enumerate()
      .map(|(rule, r)| {
        let tagged = Position::tag(r.lhs.iter().cloned(), None);
        let (positions, cells): (Vec<_>, Vec<_>) = tagged.into_iter().unzip();
        Row { rule, cells, positions, variables: Vec::new() }
      })
      .collect();
    let mut matrix = ClauseMatrix { rows };
    matrix.normalize();
    matrix
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  fn ncols(&self) -> usize {
    self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
  }

  /// Runs [`Self::flushout_vars`] and [`Self::descend_binders`] to a fixpoint. An abstraction
  /// folded open by `descend_binders` often turns into an all-pattern-variable column that
  /// `flushout_vars` can then remove, and removing columns can in turn expose further
  /// abstractions — so the two are repeated together until neither changes anything.
  pub fn normalize(&mut self) {
    loop {
      let a = self.flushout_vars();
      let b = self.descend_binders();
      if !a && !b {
        break;
      }
    }
  }

  /// Folds out every column that, across all remaining rows, holds nothing but a pattern
  /// variable: there is nothing left to test there, so it is moved into each row's
  /// `variables` (named) and simply dropped (anonymous) instead of being carried around as dead
  /// weight in `cells`. Returns whether anything changed.
  pub fn flushout_vars(&mut self) -> bool {
    if self.rows.is_empty() {
      return false;
    }
    let ncols = self.ncols();
    let remove: Vec<bool> = (0..ncols)
      .map(|c| self.rows.iter().all(|row| matches!(row.cells[c].as_ref(), Term::Patt(..))))
      .collect();
    if !remove.iter().any(|&b| b) {
      return false;
    }
    for row in &mut self.rows {
      let mut new_cells = Vec::with_capacity(row.cells.len());
      let mut new_positions = Vec::with_capacity(row.positions.len());
      for (c, (cell, pos)) in row.cells.iter().zip(row.positions.iter()).enumerate() {
        if remove[c] {
          if let Term::Patt(Some(slot), _, _) = cell.as_ref() {
            row.variables.push((pos.clone(), *slot));
          }
        } else {
          new_cells.push(cell.clone());
          new_positions.push(pos.clone());
        }
      }
      row.cells = new_cells;
      row.positions = new_positions;
    }
    true
  }

  /// Folds open every `Abst` cell, in every column, independently of what any other row holds
  /// there: an abstraction is never tested (there is only one shape it can have), so it is always
  /// safe to replace it with its body, at the same column, with the position extended via
  /// `sub()` — regardless of whether sibling rows at that column are a concrete constructor, a
  /// pattern variable, or another abstraction. Returns whether anything changed.
  pub fn descend_binders(&mut self) -> bool {
    let mut changed = false;
    for row in &mut self.rows {
      for (cell, pos) in row.cells.iter_mut().zip(row.positions.iter_mut()) {
        if let Term::Abst(_, binder) = cell.as_ref() {
          *pos = pos.sub();
          *cell = binder.body.clone();
          changed = true;
        }
      }
    }
    changed
  }

  fn get_col(&self, col: usize) -> Vec<&TermPtr> {
    self.rows.iter().map(|r| &r.cells[col]).collect()
  }

  /// True iff `cell`'s head is a `Symb` or a `Var` — the two shapes [`Self::get_cons`] can turn
  /// into a [`ConstructorKey`] (§4.1/§4.3's `Var x | Var y | iff x = y` row gives a bare or
  /// applied variable head the same standing as a symbol). Pattern variables and abstractions
  /// carry no discriminating information and are never constructor cells.
  fn is_constructor_cell(cell: &TermPtr) -> bool {
    let (head, _) = cell.get_args();
    matches!(head.as_ref(), Term::Symb(_) | Term::Var(_))
  }

  /// True iff `cell` is literally a pattern variable — the only shape [`Self::default`] keeps.
  fn is_patt_cell(cell: &TermPtr) -> bool {
    matches!(cell.as_ref(), Term::Patt(..))
  }

  /// How many rows provide a real constructor test at `col`. The column-selection heuristic
  /// picks the column that maximizes this, on the theory that testing it prunes away the most
  /// rows at once.
  pub fn score(&self, col: usize) -> usize {
    self.get_col(col).into_iter().filter(|cell| Self::is_constructor_cell(cell)).count()
  }

  pub fn can_switch_on(&self, col: usize) -> bool {
    self.score(col) > 0
  }

  /// Filters `candidates` down to the columns worth scoring at all (those with at least one
  /// constructor cell); a column where every row holds a pattern variable can never be switched
  /// on and is never the right choice.
  pub fn discard_cons_free(&self, candidates: Vec<usize>) -> Vec<usize> {
    candidates.into_iter().filter(|&c| self.can_switch_on(c)).collect()
  }

  /// Chooses the column to test next, breaking ties in score per `options.tie_break`. `None`
  /// means every remaining column is cons-free — i.e. this matrix is exhausted or malformed
  /// (callers only reach this once [`Row::exhausted`] has already ruled out `self.rows[0]`).
  pub fn pick_best_among(&self, options: &CompilerOptions) -> Option<usize> {
    let candidates = self.discard_cons_free((0..self.ncols()).collect());
    if candidates.is_empty() {
      return None;
    }
    let mut best: Option<(usize, usize)> = None;
    for c in candidates {
      let s = self.score(c);
      best = match (best, options.tie_break) {
        (None, _) => Some((c, s)),
        (Some((_, bs)), TieBreak::PreferLast) if s >= bs => Some((c, s)),
        (Some((_, bs)), TieBreak::PreferFirst) if s > bs => Some((c, s)),
        (current, _) => current,
      };
    }
    best.map(|(c, _)| c)
  }

  /// The distinct constructor keys appearing at `col`, in first-seen row order.
  pub fn get_cons(&self, col: usize) -> Vec<ConstructorKey> {
    let mut seen: IndexSet<ConstructorKey, ConstructorKey> = IndexSet::new();
    for cell in self.get_col(col) {
      if Self::is_constructor_cell(cell) {
        seen.insert(crate::view::key_of(cell));
      }
    }
    (0..seen.len()).map(|i| seen.index_to_key(i).expect("index within bounds")).collect()
  }

  /// True iff some row has a named pattern variable at `col` — the condition under which a
  /// `Node` testing this column must capture (`store`) the inspected subterm before branching.
  pub fn column_has_named_patt(&self, col: usize) -> bool {
    self.get_col(col).into_iter().any(|cell| matches!(cell.as_ref(), Term::Patt(Some(_), _, _)))
  }

  /// Moves every named pattern-variable cell at `col` into its row's `variables` (the capture
  /// will be emitted once, as the `Node`'s `store` flag, by the caller), leaving an anonymous
  /// placeholder in its place so [`Self::specialize`] and [`Self::default`] can treat the column
  /// uniformly afterwards.
  pub fn capture_named_patt(&self, col: usize) -> ClauseMatrix {
    let mut matrix = self.clone();
    for row in &mut matrix.rows {
      if let Term::Patt(Some(slot), name, env) = row.cells[col].as_ref() {
        row.variables.push((row.positions[col].clone(), *slot));
        row.cells[col] = Rc::new(Term::Patt(None, name.clone(), env.clone()));
      }
    }
    matrix
  }

  /// The specialized matrix for constructor `key` at `col`: rows whose cell there matches `key`
  /// have it expanded into its arguments; rows with a pattern variable there have it expanded
  /// into `key.arity()` fresh anonymous placeholders carrying the same environment forward,
  /// provided binding the constructor against that environment would stay closed (§4.3's
  /// `anything | Patt(_,_,env) | iff binding pat against env yields a closed term` row). Rows
  /// with a *different* constructor at `col` are dropped — `key` can never match there.
  pub fn specialize(&self, col: usize, key: &ConstructorKey) -> ClauseMatrix {
    // A concrete occurrence of `key` at this column, if any row has one, stands in for `pat` when
    // checking a pattern-variable row's closedness below.
    let witness: Option<TermPtr> = self
      .get_col(col)
      .into_iter()
      .find(|cell| Self::is_constructor_cell(cell) && crate::view::key_of(cell) == *key)
      .cloned();

    let mut rows = Vec::new();
    for row in &self.rows {
      let cell = &row.cells[col];
      let base_pos = row.positions[col].sub();
      let expansion: Option<Vec<TermPtr>> = match cell.as_ref() {
        Term::Patt(_, _, env) => {
          let closed = witness.as_ref().map(|pat| pat.is_closed_in_env(env)).unwrap_or(true);
          if closed {
            Some((0..key.arity()).map(|_| Term::patt(None, "_", env.clone())).collect())
          } else {
            None
          }
        }
        _ if Self::is_constructor_cell(cell) => {
          let (_, args) = cell.get_args();
          if crate::view::key_of(cell) == *key { Some(args) } else { None }
        }
        _ => None,
      };
      let Some(args) = expansion else { continue };
      let tagged = Position::tag(args, Some(base_pos));
      let mut cells = row.cells.clone();
      let mut positions = row.positions.clone();
      cells.remove(col);
      positions.remove(col);
      for (i, (pos, term)) in tagged.into_iter().enumerate() {
        cells.insert(col + i, term);
        positions.insert(col + i, pos);
      }
      rows.push(Row { rule: row.rule, cells, positions, variables: row.variables.clone() });
    }
    let mut matrix = ClauseMatrix { rows };
    matrix.normalize();
    matrix
  }

  /// The default matrix for `col`: only rows whose cell there is literally a pattern variable
  /// survive (§4.3: "`default` keeps rows whose `ci` cell is a `Patt`") — a concrete constructor
  /// (`Symb`- or `Var`-headed) can never fall through to default, and neither can an
  /// abstraction, which [`Self::descend_binders`] should already have folded into its body
  /// before a `default` call ever sees it. The surviving rows simply lose the column, since
  /// default commits to no particular arity.
  pub fn default(&self, col: usize) -> ClauseMatrix {
    let mut rows = Vec::new();
    for row in &self.rows {
      if !Self::is_patt_cell(&row.cells[col]) {
        continue;
      }
      let mut cells = row.cells.clone();
      let mut positions = row.positions.clone();
      cells.remove(col);
      positions.remove(col);
      rows.push(Row { rule: row.rule, cells, positions, variables: row.variables.clone() });
    }
    let mut matrix = ClauseMatrix { rows };
    matrix.normalize();
    matrix
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::kernel::term::{MultiBinder, Symbol};
  use crate::rule::Rule;

  fn symb(name: &str) -> TermPtr {
    Term::symb("", name)
  }

  fn rule_z() -> Rule {
    // f Z => Z
    Rule::new(vec![symb("Z")], MultiBinder::new(vec![], symb("Z")))
  }

  fn rule_s() -> Rule {
    // f (S n) => n
    let n = Term::patt(Some(0), "n", vec![]);
    let lhs = Term::apply(symb("S"), [n]);
    Rule::new(vec![lhs], MultiBinder::new(vec!["n".into()], Term::var("n")))
  }

  #[test]
  fn of_rules_keeps_one_row_per_rule() {
    let matrix = ClauseMatrix::of_rules(&[rule_z(), rule_s()]);
    assert_eq!(matrix.rows.len(), 2);
  }

  #[test]
  fn column_zero_is_switchable_on_constructor_rules() {
    let matrix = ClauseMatrix::of_rules(&[rule_z(), rule_s()]);
    assert!(matrix.can_switch_on(0));
    assert_eq!(matrix.score(0), 2);
  }

  #[test]
  fn specialize_on_s_keeps_only_the_s_row_and_exposes_its_argument() {
    let matrix = ClauseMatrix::of_rules(&[rule_z(), rule_s()]);
    let key = ConstructorKey::new(&Symbol::new("", "S"), 1);
    let specialized = matrix.specialize(0, &key);
    assert_eq!(specialized.rows.len(), 1);
    assert!(specialized.rows[0].exhausted() || !specialized.rows[0].cells.is_empty());
  }

  #[test]
  fn default_on_z_drops_the_z_row() {
    let matrix = ClauseMatrix::of_rules(&[rule_z(), rule_s()]);
    let default = matrix.default(0);
    assert!(default.rows.is_empty());
  }

  #[test]
  fn in_rhs_detects_used_variables() {
    let rhs = MultiBinder::new(vec!["n".into()], Term::var("n"));
    assert!(in_rhs(&rhs, "n"));
    assert!(!in_rhs(&rhs, "m"));
  }

  #[test]
  fn var_headed_rows_specialize_by_identity() {
    // g x => X; g y => Y  — two rules whose left-hand side is a bare variable head.
    let rule_x = Rule::new(vec![Term::var("x")], MultiBinder::new(vec![], symb("X")));
    let rule_y = Rule::new(vec![Term::var("y")], MultiBinder::new(vec![], symb("Y")));
    let matrix = ClauseMatrix::of_rules(&[rule_x, rule_y]);
    let cons = matrix.get_cons(0);
    assert_eq!(cons.len(), 2, "distinct variable identities are distinct constructors");

    let key_x = ConstructorKey::variable("x", 0);
    let specialized = matrix.specialize(0, &key_x);
    assert_eq!(specialized.rows.len(), 1);
    assert_eq!(specialized.rows[0].rule, 0);
  }

  #[test]
  fn specialize_drops_a_pattern_row_whose_env_cannot_bind_the_constructor() {
    // f (S y) => ...     (the constructor occurrence here mentions the free variable `y`)
    // f (p : [x]) => p   (p's environment only ever admits `x`, never `y`)
    let lhs0 = Term::apply(symb("S"), [Term::var("y")]);
    let rule0 = Rule::new(vec![lhs0], MultiBinder::new(vec![], symb("R0")));
    let patt_p = Term::patt(Some(0), "p", vec![Term::var("x")]);
    let rule1 = Rule::new(vec![patt_p], MultiBinder::new(vec!["p".into()], Term::var("p")));
    let matrix = ClauseMatrix::of_rules(&[rule0, rule1]);

    let key = ConstructorKey::new(&Symbol::new("", "S"), 1);
    let specialized = matrix.specialize(0, &key);
    assert_eq!(specialized.rows.len(), 1, "the pattern row can't bind a term outside its own environment");
    assert_eq!(specialized.rows[0].rule, 0);
  }

  #[test]
  fn default_drops_abstraction_rows_left_unfolded_at_this_column() {
    // Simulates a column `descend_binders` never got to fold (e.g. because the caller is testing
    // `default` directly, bypassing `normalize`): an `Abst` cell is not a `Patt`, so it must not
    // survive into `default` no matter what `is_constructor_cell` thinks of it.
    use crate::kernel::term::Binder1;
    let row = Row {
      rule: 0,
      cells: vec![std::rc::Rc::new(Term::Abst(symb("Nat"), Binder1::new("x", symb("Z"))))],
      positions: vec![Position::init().succ()],
      variables: Vec::new(),
    };
    let matrix = ClauseMatrix { rows: vec![row] };
    let default = matrix.default(0);
    assert!(default.rows.is_empty(), "an abstraction cell must never fall through to default");
  }
}
