/// Domain services — one typed function per backend endpoint
///
/// Services are stateless pass-throughs over the API gateway: no caching,
/// no business logic. Views own all state and all recovery.
pub mod ai;
pub mod attention;
pub mod automation;
pub mod clients;
pub mod integrations;
pub mod messages;

use crate::api::ApiClient;
use std::sync::Arc;

pub use ai::AiService;
pub use attention::AttentionService;
pub use automation::AutomationService;
pub use clients::ClientService;
pub use integrations::IntegrationService;
pub use messages::MessageService;

/// Bundle handed to the views and the CLI
pub struct Services {
    pub clients: ClientService,
    pub messages: MessageService,
    pub attention: AttentionService,
    pub automation: AutomationService,
    pub integrations: IntegrationService,
    pub ai: AiService,
}

impl Services {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            clients: ClientService::new(api.clone()),
            messages: MessageService::new(api.clone()),
            attention: AttentionService::new(api.clone()),
            automation: AutomationService::new(api.clone()),
            integrations: IntegrationService::new(api.clone()),
            ai: AiService::new(api),
        }
    }
}
