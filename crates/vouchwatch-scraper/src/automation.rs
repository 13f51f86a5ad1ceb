//! The browser capability the extraction session drives.
//!
//! Implementations expose single-shot probes and actions; bounded waiting is
//! layered on top by [`crate::wait::Waiter`]. A backend tracks one "current"
//! browsing context that all element lookups and actions target.

use async_trait::async_trait;

use crate::error::DriverError;

/// Opaque identifier of a browsing context (tab or window).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextId(String);

impl ContextId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait Automation: Send {
    /// Element handle. Only meaningful in the context it was found in.
    type Element: Send + Sync;

    /// Loads `url` in the current context.
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    /// All elements matching a CSS selector in the current context, in
    /// document order. Returns an empty list rather than waiting.
    async fn find_all(&mut self, selector: &str) -> Result<Vec<Self::Element>, DriverError>;

    /// Whether the element is rendered and enabled, so a click would land.
    async fn is_interactable(&mut self, element: &Self::Element) -> Result<bool, DriverError>;

    async fn click(&mut self, element: &Self::Element) -> Result<(), DriverError>;

    async fn scroll_into_view(&mut self, element: &Self::Element) -> Result<(), DriverError>;

    /// Rendered text of the element.
    async fn text(&mut self, element: &Self::Element) -> Result<String, DriverError>;

    /// Every open browsing context.
    async fn contexts(&mut self) -> Result<Vec<ContextId>, DriverError>;

    /// Makes `context` the current one.
    async fn switch_to(&mut self, context: &ContextId) -> Result<(), DriverError>;

    async fn close_context(&mut self, context: &ContextId) -> Result<(), DriverError>;

    /// Releases the browser. Owned by the caller, never by the session.
    async fn shutdown(self) -> Result<(), DriverError>;
}
