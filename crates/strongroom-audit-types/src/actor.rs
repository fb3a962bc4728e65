//! Audit actors.

use std::fmt;
use std::sync::Arc;

/// Actor used when an operation does not name one.
pub const DEFAULT_ACTOR: &str = "system";

/// Where the identity responsible for an audited operation comes from.
#[derive(Clone)]
pub enum ActorSource {
    /// A fixed identity declared at registration time.
    Static(String),
    /// An identity looked up each time a record is built.
    Resolved(Arc<dyn Fn() -> String + Send + Sync>),
}

impl ActorSource {
    /// Create a static actor.
    pub fn fixed(actor: impl Into<String>) -> Self {
        Self::Static(actor.into())
    }

    /// Create an actor resolved at record-build time.
    pub fn resolved<F>(resolver: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::Resolved(Arc::new(resolver))
    }

    /// Get the identity for a record being built now.
    pub fn resolve(&self) -> String {
        match self {
            Self::Static(actor) => actor.clone(),
            Self::Resolved(resolver) => resolver(),
        }
    }
}

impl Default for ActorSource {
    fn default() -> Self {
        Self::Static(DEFAULT_ACTOR.to_string())
    }
}

impl fmt::Debug for ActorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(actor) => f.debug_tuple("Static").field(actor).finish(),
            Self::Resolved(_) => f.write_str("Resolved(..)"),
        }
    }
}

impl From<&str> for ActorSource {
    fn from(actor: &str) -> Self {
        Self::fixed(actor)
    }
}

impl From<String> for ActorSource {
    fn from(actor: String) -> Self {
        Self::Static(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_default_is_system() {
        assert_eq!(ActorSource::default().resolve(), "system");
    }

    #[test]
    fn test_resolved_actor_runs_on_every_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let actor = ActorSource::resolved(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            format!("teller-{}", n)
        });

        assert_eq!(actor.resolve(), "teller-0");
        assert_eq!(actor.resolve(), "teller-1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_debug_hides_resolver() {
        let actor = ActorSource::resolved(|| "x".to_string());
        assert_eq!(format!("{:?}", actor), "Resolved(..)");
        assert_eq!(format!("{:?}", ActorSource::fixed("ops")), "Static(\"ops\")");
    }
}
