use crate::document::{Document, DocumentSelector};
use crate::provider::ActionProvider;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// A provider together with the registration id it was given.
///
/// Cloning is cheap; the provider itself is shared. Actions keep one of these
/// so resolution can be routed back to the provider that produced them, even
/// if the registration has been disposed in the meantime (aggregation works
/// on detached snapshots).
#[derive(Clone)]
pub struct RegisteredProvider {
    id: u64,
    provider: Arc<dyn ActionProvider>,
}

impl RegisteredProvider {
    pub fn name(&self) -> &str {
        self.provider.name()
    }

    pub fn provider(&self) -> &dyn ActionProvider {
        self.provider.as_ref()
    }
}

impl fmt::Debug for RegisteredProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredProvider")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}

struct Registration {
    selector: DocumentSelector,
    priority: i32,
    provider: RegisteredProvider,
}

/// Process-scoped set of action provider registrations.
///
/// The registry is read-many/write-rarely: aggregation takes a copy-on-read
/// snapshot under a short read lock, so registering or disposing providers is
/// safe while an aggregation is in flight. A provider disposed mid-flight may
/// still have its actions resolved; that is an accepted race.
#[derive(Default)]
pub struct ProviderRegistry {
    registrations: RwLock<Vec<Registration>>,
    next_id: AtomicU64,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider for documents matching `selector`.
    ///
    /// The returned handle removes the registration when disposed (or
    /// dropped); keep it alive for as long as the provider should be visible.
    pub fn register(
        self: &Arc<Self>,
        selector: DocumentSelector,
        provider: Arc<dyn ActionProvider>,
    ) -> ProviderHandle {
        self.register_with_priority(selector, provider, 0)
    }

    /// Like [`ProviderRegistry::register`], but providers with a higher
    /// priority come first in snapshots. Equal priorities keep registration
    /// order.
    pub fn register_with_priority(
        self: &Arc<Self>,
        selector: DocumentSelector,
        provider: Arc<dyn ActionProvider>,
        priority: i32,
    ) -> ProviderHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.registrations.write().push(Registration {
            selector,
            priority,
            provider: RegisteredProvider { id, provider },
        });
        ProviderHandle {
            id,
            registry: Arc::downgrade(self),
        }
    }

    /// Providers matching `document`, by descending priority and then
    /// registration order.
    pub fn snapshot_for(&self, document: &Document) -> Vec<RegisteredProvider> {
        let mut matching: Vec<(i32, RegisteredProvider)> = self
            .registrations
            .read()
            .iter()
            .filter(|r| r.selector.matches(document))
            .map(|r| (r.priority, r.provider.clone()))
            .collect();
        matching.sort_by_key(|(priority, provider)| (std::cmp::Reverse(*priority), provider.id));
        matching.into_iter().map(|(_, provider)| provider).collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.read().is_empty()
    }

    /// Remove every registration. Outstanding handles become no-ops.
    pub fn drain(&self) {
        self.registrations.write().clear();
    }

    fn remove(&self, id: u64) {
        self.registrations.write().retain(|r| r.provider.id != id);
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .registrations
            .read()
            .iter()
            .map(|r| r.provider.name().to_string())
            .collect();
        f.debug_struct("ProviderRegistry")
            .field("providers", &names)
            .finish()
    }
}

/// Disposal handle for one provider registration.
pub struct ProviderHandle {
    id: u64,
    registry: Weak<ProviderRegistry>,
}

impl ProviderHandle {
    /// Make the provider invisible to subsequent aggregations. In-flight
    /// aggregations that already took a snapshot are unaffected.
    pub fn dispose(self) {}
}

impl Drop for ProviderHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderResult;
    use lsp_types::{CodeAction, CodeActionContext, Range};
    use tokio_util::sync::CancellationToken;

    struct Named(&'static str);

    impl ActionProvider for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn provide_actions(
            &self,
            _document: &Document,
            _range: Range,
            _context: &CodeActionContext,
            _cancel: &CancellationToken,
        ) -> ProviderResult<Vec<CodeAction>> {
            Ok(Vec::new())
        }
    }

    fn doc() -> Document {
        Document::new("file:///a.java".parse().unwrap(), "java", "class A {}")
    }

    #[test]
    fn snapshot_preserves_registration_order() {
        let registry = Arc::new(ProviderRegistry::new());
        let _a = registry.register(DocumentSelector::Any, Arc::new(Named("a")));
        let _b = registry.register(DocumentSelector::language("kotlin"), Arc::new(Named("b")));
        let _c = registry.register(DocumentSelector::language("java"), Arc::new(Named("c")));

        let snapshot = registry.snapshot_for(&doc());
        let names: Vec<&str> = snapshot.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn higher_priority_providers_come_first() {
        let registry = Arc::new(ProviderRegistry::new());
        let _a = registry.register(DocumentSelector::Any, Arc::new(Named("a")));
        let _b = registry.register_with_priority(DocumentSelector::Any, Arc::new(Named("b")), 10);
        let _c = registry.register(DocumentSelector::Any, Arc::new(Named("c")));

        let snapshot = registry.snapshot_for(&doc());
        let names: Vec<&str> = snapshot.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn extreme_priorities_sort_without_overflow() {
        let registry = Arc::new(ProviderRegistry::new());
        let _low =
            registry.register_with_priority(DocumentSelector::Any, Arc::new(Named("low")), i32::MIN);
        let _mid = registry.register(DocumentSelector::Any, Arc::new(Named("mid")));
        let _high =
            registry.register_with_priority(DocumentSelector::Any, Arc::new(Named("high")), i32::MAX);

        let snapshot = registry.snapshot_for(&doc());
        let names: Vec<&str> = snapshot.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
    }

    #[test]
    fn disposing_a_handle_removes_the_registration() {
        let registry = Arc::new(ProviderRegistry::new());
        let a = registry.register(DocumentSelector::Any, Arc::new(Named("a")));
        let _b = registry.register(DocumentSelector::Any, Arc::new(Named("b")));
        assert_eq!(registry.len(), 2);

        a.dispose();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.snapshot_for(&doc())[0].name(), "b");
    }

    #[test]
    fn drain_clears_everything_and_orphans_handles() {
        let registry = Arc::new(ProviderRegistry::new());
        let a = registry.register(DocumentSelector::Any, Arc::new(Named("a")));
        let _b = registry.register(DocumentSelector::Any, Arc::new(Named("b")));

        registry.drain();
        assert!(registry.is_empty());

        // Disposing after the drain is a no-op.
        a.dispose();
        assert!(registry.is_empty());
    }

    #[test]
    fn snapshots_survive_later_disposal() {
        let registry = Arc::new(ProviderRegistry::new());
        let a = registry.register(DocumentSelector::Any, Arc::new(Named("a")));
        let snapshot = registry.snapshot_for(&doc());

        a.dispose();
        assert!(registry.is_empty());
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].name(), "a");
    }
}
