use std::env;
use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub registry_host: String,
    pub registry_port: u16,
    pub max_pool_size: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // The store target is the one piece of configuration with no
        // usable default; refusing to start beats serving 500s.
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("Missing DATABASE_URL environment variable"))?;

        let registry_host = env::var("REGISTRY_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let registry_port = env::var("REGISTRY_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        let max_pool_size = env::var("MAX_POOL_SIZE")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        Ok(Config {
            database_url,
            registry_host,
            registry_port,
            max_pool_size,
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.registry_host, self.registry_port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address: {}", e))
    }
}
