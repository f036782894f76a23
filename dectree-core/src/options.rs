/*!

The compiler's entire configuration surface (§6): there are no environment variables, config
files, or wire formats to parse, just this struct passed directly by the caller.

*/

/// How [`crate::matrix::ClauseMatrix::pick_best_among`] breaks ties when more than one column
/// scores equally well under the column-selection heuristic.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub enum TieBreak {
  /// Keep the last column reaching the maximum score. Matches the literal reading of the
  /// heuristic as a left-to-right `≤` scan over scores (each tie replaces the previous best).
  #[default]
  PreferLast,
  /// Keep the first column reaching the maximum score.
  PreferFirst,
}

/// Compiler-wide options. `Default::default()` reproduces the behavior described in the rest of
/// this crate's documentation.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompilerOptions {
  pub tie_break: TieBreak,
}
