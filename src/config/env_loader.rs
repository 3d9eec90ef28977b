use crate::config::model::{Config, SupabaseConfig};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::info;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_RETRIES: u32 = 5;

pub fn load_config() -> Config {
    Config {
        port: load_parsed_config("PORT", DEFAULT_PORT),
        supabase: SupabaseConfig {
            url: load_required_config("SUPABASE_URL"),
            anon_key: load_required_config("SUPABASE_ANON_KEY"),
            max_retries: load_parsed_config("SUPABASE_MAX_RETRIES", DEFAULT_MAX_RETRIES),
        },
    }
}

fn load_required_config(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("{} must be set.", name))
}

fn load_parsed_config<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(name) {
        Ok(value) => value.parse().unwrap_or_else(|err| {
            panic!("Invalid config '{}' ('{}'): {}", name, value, err)
        }),
        Err(_) => {
            info!("{} not set, using default: {}", name, default);
            default
        }
    }
}
