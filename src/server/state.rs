use std::sync::Arc;
use std::time::Instant;

use crate::certificate::CertificateService;
use crate::config::Settings;
use crate::store::RecordStore;
use crate::template::TemplateService;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: Arc<RecordStore>,
    pub certificates: Arc<CertificateService>,
    pub templates: Arc<TemplateService>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let store = Arc::new(RecordStore::new());
        let templates = Arc::new(TemplateService::new(store.clone()));
        let certificates = Arc::new(CertificateService::new(store.clone()));

        Self {
            settings: Arc::new(settings),
            store,
            certificates,
            templates,
            started_at: Instant::now(),
        }
    }
}
