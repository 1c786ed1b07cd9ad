use uuid::Uuid;

/// Injected identifier generation, so the core stays deterministic in tests.
pub trait IdProvider: Send + Sync {
    fn next_id(&self) -> Uuid;
}

/// Production provider: random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}
