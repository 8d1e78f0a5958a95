//! Specialized collection types

pub use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle to a renderable in the scene graph
    pub struct RenderHandle;
}

/// Handle-based map using slot map for stable references
pub type HandleMap<T> = SlotMap<RenderHandle, T>;
