/*!

Types/type aliases that abstract over the implementing backing type, shared by the crates in
this workspace. Nothing in here knows anything about terms, rules, or decision trees; it is a
thin redirection layer so that later swapping, say, the hasher or small-vector crate backing a
type touches one module instead of the whole tree.

*/

mod index_set;
pub mod log;

// region Hashing data structures
pub use std::collections::HashMap;
pub use std::collections::HashSet;

// For vectors that are expected to have few or zero elements.
pub use smallvec::{smallvec, SmallVec};
// endregion

// Logging
pub use tracing;

// region Items meant to be used only internally

pub use index_set::IndexSet;

// endregion
