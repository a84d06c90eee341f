use std::sync::OnceLock;

use serde::Deserialize;

fn default_port() -> u16 {
    3000
}

fn default_openai_api_base() -> String {
    candor_dispatch::OPENAI_API_BASE.to_string()
}

#[derive(Deserialize)]
pub struct Env {
    #[serde(default = "default_port")]
    pub port: u16,
    /// OpenAI-compatible upstream; overridable for staging and tests.
    #[serde(default = "default_openai_api_base")]
    pub openai_api_base: String,
}

static ENV: OnceLock<Env> = OnceLock::new();

pub fn env() -> &'static Env {
    ENV.get_or_init(|| {
        let _ = dotenvy::dotenv();
        envy::from_env().expect("Failed to load environment")
    })
}
