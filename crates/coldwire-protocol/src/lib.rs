//! Value types for the coldwire terminal-infiltration rules engine.
//!
//! Everything here is plain data exchanged between the resolver (which owns
//! dice and difficulty math), the state machine in `coldwire-core`, and the
//! narrative layer. All types are serde-ready; none of them read a clock or
//! touch I/O.

mod access;
mod ice;
mod ids;
mod layer;
mod lockout;
mod resolution;
mod terminal;

pub use crate::access::*;
pub use crate::ice::*;
pub use crate::ids::*;
pub use crate::layer::*;
pub use crate::lockout::*;
pub use crate::resolution::*;
pub use crate::terminal::*;
