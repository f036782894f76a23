/*!

Thin wrapper over `tracing` so the rest of the workspace logs through one macro set instead of
depending on `tracing` directly. If the backing framework ever changes, only this module moves.

*/

pub use tracing::{trace, debug, warn};
