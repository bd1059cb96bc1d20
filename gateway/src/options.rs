use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, ensure, Context, Result};
use common::{Config, ConfigLoader};
use gomoku::BoardParams;
use model::ModelConfigKey;

use super::SearchOptions;

#[derive(Clone, Debug, PartialEq)]
pub struct GatewayOptions {
    pub host: String,
    pub port: u16,
    /// `None` leaves every route open.
    pub api_token: Option<String>,
    pub model_file: PathBuf,
    pub board: BoardParams,
    pub search: SearchOptions,
}

impl GatewayOptions {
    pub fn model_key(&self) -> ModelConfigKey {
        ModelConfigKey::new(&self.model_file, self.board.width, self.board.height)
    }

    /// Resolves `host`, which may be a name or a literal address.
    pub async fn socket_addrs(&self) -> Result<Vec<SocketAddr>> {
        let addrs = tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("Failed to resolve host {:?}", self.host))?
            .collect::<Vec<_>>();

        ensure!(!addrs.is_empty(), "Host {:?} has no addresses", self.host);

        Ok(addrs)
    }
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            api_token: None,
            model_file: PathBuf::from("best_policy_8_8_5.model"),
            board: BoardParams::default(),
            search: SearchOptions::default(),
        }
    }
}

impl Config for GatewayOptions {
    fn load(config: &ConfigLoader) -> Result<Self> {
        let defaults = Self::default();

        let port = usize_or(config, "port", defaults.port as usize)?;
        let port = u16::try_from(port).map_err(|_| anyhow!("port {} is out of range", port))?;

        let board = BoardParams::new(
            usize_or(config, "width", defaults.board.width)?,
            usize_or(config, "height", defaults.board.height)?,
            usize_or(config, "n_in_row", defaults.board.n_in_row)?,
        );

        ensure!(
            board.width > 0 && board.height > 0,
            "width and height must be positive"
        );
        ensure!(board.n_in_row > 0, "n_in_row must be positive");

        let search = SearchOptions {
            c_puct: f32_or(config, "c_puct", defaults.search.c_puct)?,
            n_playout: usize_or(config, "n_playout", defaults.search.n_playout)?,
            temperature: f32_or(config, "temperature", defaults.search.temperature)?,
            fpu: f32_or(config, "fpu", defaults.search.fpu)?,
        };

        ensure!(search.n_playout > 0, "n_playout must be positive");
        ensure!(search.c_puct >= 0.0, "c_puct must not be negative");
        ensure!(search.temperature >= 0.0, "temperature must not be negative");

        Ok(Self {
            host: config
                .get("host")
                .and_then(|v| v.as_string())
                .unwrap_or(defaults.host),
            port,
            api_token: config
                .get("api_token")
                .and_then(|v| v.as_string())
                .filter(|token| !token.is_empty()),
            model_file: config
                .get("model_file")
                .and_then(|v| v.as_string())
                .map(PathBuf::from)
                .unwrap_or(defaults.model_file),
            board,
            search,
        })
    }
}

fn usize_or(config: &ConfigLoader, name: &str, default: usize) -> Result<usize> {
    match config.get(name) {
        None => Ok(default),
        Some(value) => value
            .as_usize()
            .ok_or_else(|| anyhow!("{} must be a non-negative integer, got {:?}", name, value)),
    }
}

fn f32_or(config: &ConfigLoader, name: &str, default: f32) -> Result<f32> {
    match config.get(name) {
        None => Ok(default),
        Some(value) => value
            .as_f32()
            .filter(|v| v.is_finite())
            .ok_or_else(|| anyhow!("{} must be a number, got {:?}", name, value)),
    }
}
