/*!

Compiles a set of rewrite rules that share a head symbol into a single match-dispatch decision
tree, the way a dependently-typed kernel's rewriting engine needs one per symbol before it can
reduce terms headed by it.

The pipeline is [`rule::Rule`] → [`matrix::ClauseMatrix`] → [`compiler::compile`] → [`tree::Tree`].
Everything about *terms* — construction, unfolding, α-equivalence, binder substitution — belongs
to a real term kernel and lives behind [`kernel::ReductionKernel`]; this crate only needs to
pattern-match on [`kernel::term::Term`]'s shape.

*/

pub mod compiler;
pub mod dot;
pub mod fetch;
pub mod kernel;
pub mod matrix;
pub mod options;
pub mod position;
pub mod rule;
pub mod tree;
pub mod view;

pub use compiler::compile_rules;
pub use options::{CompilerOptions, TieBreak};
pub use rule::Rule;
pub use tree::Tree;
