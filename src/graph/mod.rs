//! Block-rendering interface shared by notes, the voice bank and the engine.

/// Core traits shared by all graph nodes.
pub mod node;

pub use node::{GraphNode, RenderCtx};
