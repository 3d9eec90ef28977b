use crate::config::model::Config;
use crate::supabase::api::SupabaseAPI;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub supabase: Arc<SupabaseAPI>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            supabase: Arc::new(SupabaseAPI::new(&config.supabase)),
        }
    }
}
