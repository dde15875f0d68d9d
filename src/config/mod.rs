use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

use crate::store::{StoreConfig, PASSWORD_COST};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Tweet API server")]
pub struct Config {
    /// Address the HTTP server listens on
    #[arg(long, env = "TWEET_API_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,

    /// Directory of the sled database
    #[arg(long, env = "TWEET_API_DB_PATH", default_value = "./db")]
    pub db_path: PathBuf,

    /// Use a throw-away database that is deleted on shutdown
    #[arg(long, env = "TWEET_API_TEMPORARY")]
    pub temporary: bool,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long, env = "TWEET_API_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn store(&self) -> StoreConfig {
        StoreConfig {
            path: self.db_path.clone(),
            temporary: self.temporary,
            hash_cost: PASSWORD_COST,
        }
    }
}
