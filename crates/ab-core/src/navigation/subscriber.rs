//! Browser subscriber trait

use super::BrowserContext;

/// Trait for components that need to respond to browser changes
pub trait BrowserSubscriber: Send + Sync {
    /// Called after the path, filter, entries or selection changed
    fn on_browser_change(&self, context: &BrowserContext);
}
