/*!

Subterm addresses within a rule's left-hand side. A `Position` is a path of child indices from
the rule's argument list down into nested applications and abstraction bodies; it exists purely
so that the tree a [`crate::compiler`] builds can tell the caller *where* a captured subterm came
from, independent of which column of which intermediate matrix happened to carry it.

*/

use std::cmp::Ordering;

use dectree_abs::{smallvec, SmallVec};

/// A path from the root of a rule's argument list to one of its subterms.
///
/// `init()` denotes the (virtual) root itself. `succ(p)` is `p`'s next sibling; `sub(p)` is `p`'s
/// first child. The ordering `Position` derives is lexicographic over the path, which makes it a
/// total order in which every descendant of `p` compares greater than `p`, and siblings compare
/// in the order they were tagged.
///
/// The path is a `SmallVec` of 4 indices: real rules rarely nest four levels of application or
/// abstraction deep, so almost every position lives on the stack, and only unusually deep terms
/// spill to the heap.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Position(SmallVec<[usize; 4]>);

impl Position {
  /// The root position. Not itself the address of any real argument; `succ(init())` is the
  /// first top-level argument.
  pub fn init() -> Position {
    Position(smallvec![])
  }

  /// The next sibling of `self`: same depth, next index.
  pub fn succ(&self) -> Position {
    let mut path = self.0.clone();
    match path.last_mut() {
      Some(last) => *last += 1,
      None => path.push(0),
    }
    Position(path)
  }

  /// The first child beneath `self`.
  pub fn sub(&self) -> Position {
    let mut path = self.0.clone();
    path.push(0);
    Position(path)
  }

  /// Re-roots `other` under `self`: the position of `other`, read relative to a term that itself
  /// sits at `self`.
  pub fn prefix(&self, other: &Position) -> Position {
    let mut path = self.0.clone();
    path.extend_from_slice(&other.0);
    Position(path)
  }

  pub fn depth(&self) -> usize {
    self.0.len()
  }

  /// The raw child-index path, for consumers that walk a concrete subject term by hand (see
  /// [`crate::kernel::reference`]).
  pub fn path(&self) -> &[usize] {
    &self.0
  }

  /// Assigns positions to an ordered sequence of siblings. `items[i]` is tagged
  /// `succ^i(empty)`; the default `empty` is `succ(init())`, reproducing "first argument is
  /// `succ(init)`, second is `succ(succ(init))`, ..." When descending into the children of a
  /// term already sitting at position `p`, pass `empty = p.sub()` so that the first child is
  /// `p.sub()` itself and later children are its successive siblings.
  pub fn tag<T>(items: impl IntoIterator<Item = T>, empty: Option<Position>) -> Vec<(Position, T)> {
    let mut current = empty.unwrap_or_else(|| Position::init().succ());
    let mut out = Vec::new();
    for (i, item) in items.into_iter().enumerate() {
      let p = if i == 0 { current.clone() } else { current.succ() };
      current = p.clone();
      out.push((p, item));
    }
    out
  }
}

impl Ord for Position {
  fn cmp(&self, other: &Self) -> Ordering {
    self.0.cmp(&other.0)
  }
}

impl PartialOrd for Position {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl std::fmt::Display for Position {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if self.0.is_empty() {
      write!(f, "ε")
    } else {
      let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
      write!(f, "{}", parts.join("."))
    }
  }
}
