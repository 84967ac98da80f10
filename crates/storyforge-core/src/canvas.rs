//! Render target abstraction.

/// A handle to the element a story renders into.
///
/// The rendering layer owns the element; the composition engine only needs to
/// know whether anything has been rendered into it yet.
pub trait Canvas: Send + Sync + std::fmt::Debug {
    /// Returns `true` once the render target holds rendered content.
    fn has_content(&self) -> bool;
}
