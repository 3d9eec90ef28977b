pub mod i18n;
pub mod tracing;

pub mod config {
    pub mod env_loader;
    pub mod model;
}

pub mod events {
    pub mod calendar;
    pub mod model;
    pub mod url;
}

pub mod blocos {
    pub mod model;
}

pub mod supabase {
    pub mod api;
    pub mod dto;
    pub mod query;
}

pub mod server {
    pub mod app;
    pub mod error;
    pub mod extractors;
    pub mod routes;
    pub mod state;
}
