//! Application systems
//!
//! Per-frame state that sits between configuration and the kernel.

mod animation;

pub use animation::AnimationSystem;
