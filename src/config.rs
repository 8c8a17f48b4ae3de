use clap::Parser;

#[derive(Parser, Clone)]
pub struct Config {
    #[clap(env, long)]
    pub environment: String,

    #[clap(env, long)]
    pub database_url: String,

    /// Comma separated list of origins allowed through CORS.
    #[clap(env, long)]
    pub origin_urls: String,

    #[clap(env, long, default_value = "3000")]
    pub port: u16,
}
