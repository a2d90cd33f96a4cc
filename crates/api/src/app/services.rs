//! Service wiring: one store, one bus, one extractor, shared by the
//! lifecycle manager and the approval engine.

use std::sync::Arc;

use procura_engine::{
    ApprovalEngine, InMemoryWorkflowStore, LifecycleManager, WorkflowConfig,
};
use procura_events::InMemoryEventBus;
use procura_extract::TextExtractor;
use procura_requests::RequestEvent;

pub type Store = InMemoryWorkflowStore;
pub type Bus = InMemoryEventBus<RequestEvent>;

pub struct AppServices {
    pub lifecycle: LifecycleManager<Store, Bus, TextExtractor>,
    pub engine: ApprovalEngine<Store, Bus>,
    pub bus: Arc<Bus>,
}

pub fn build_services(config: WorkflowConfig) -> AppServices {
    let store = Arc::new(InMemoryWorkflowStore::new());
    let bus = Arc::new(InMemoryEventBus::new());

    AppServices {
        lifecycle: LifecycleManager::new(
            Arc::clone(&store),
            Arc::clone(&bus),
            Arc::new(TextExtractor::new()),
            config.clone(),
        ),
        engine: ApprovalEngine::new(store, Arc::clone(&bus), config),
        bus,
    }
}
