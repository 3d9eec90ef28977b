#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub supabase: SupabaseConfig,
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://<project>.supabase.co`
    pub url: String,
    pub anon_key: String,
    pub max_retries: u32,
}
