//! Pure rendering pipeline: facet substitution, embed resolution and
//! Slack Block Kit mapping.
//!
//! Nothing in this crate does I/O or holds state; every function is a
//! deterministic mapping over its input and safe to run concurrently
//! across posts.

pub mod blocks;
pub mod embed;
pub mod facet;

pub use blocks::{render_blocks, Block};
pub use embed::{resolve_thread, RenderNode};
