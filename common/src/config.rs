use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use hocon::{Hocon, HoconLoader};
use log::debug;

#[derive(Debug)]
pub struct ConfigLoader {
    hocon: Hocon,
    env: HashMap<String, String>,
    scope: String,
}

impl ConfigLoader {
    pub fn new(path: impl AsRef<Path>, scope: String) -> Result<Self> {
        let path = path.as_ref();

        let hocon = HoconLoader::new()
            .load_file(path)
            .with_context(|| format!("Failed to find or load config file at: {:?}", path))?
            .hocon()?;

        Ok(Self::with_hocon(hocon, scope))
    }

    /// Loads the file when it exists, otherwise falls back to an empty document so that
    /// only defaults and environment variables apply.
    pub fn new_or_empty(path: impl AsRef<Path>, scope: String) -> Result<Self> {
        let path = path.as_ref();

        if path.is_file() {
            return Self::new(path, scope);
        }

        debug!("No config file at {:?}, using defaults and environment", path);

        Self::from_str("{}", scope)
    }

    pub fn from_str(config: &str, scope: String) -> Result<Self> {
        let hocon = HoconLoader::new()
            .load_str(config)
            .context("Failed to parse config")?
            .hocon()?;

        Ok(Self::with_hocon(hocon, scope))
    }

    /// Replaces the captured process environment.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    fn with_hocon(hocon: Hocon, scope: String) -> Self {
        let env = std::env::vars().collect::<HashMap<_, _>>();

        Self { hocon, env, scope }
    }

    /// Environment variables win over the file. The variable name is the upper-cased key,
    /// so `n_playout` is overridden by `N_PLAYOUT`.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.env.get(&name.to_uppercase()) {
            return Some(Value::String(value.clone()));
        }

        let scope = &self.hocon[self.scope.as_str()];
        if matches!(scope, Hocon::Hash(_)) {
            if let Some(value) = Self::map_hocon(scope, name) {
                return Some(value);
            }
        }

        Self::map_hocon(&self.hocon, name)
    }

    pub fn load<T: Config>(&self) -> Result<T> {
        let res = T::load(self)?;
        Ok(res)
    }

    fn map_hocon(hocon: &Hocon, name: &str) -> Option<Value> {
        match &hocon[name] {
            Hocon::Real(f64) => Some(Value::Float(*f64 as f32)),
            Hocon::Integer(i64) => Some(Value::Integer(*i64)),
            Hocon::String(string) => Some(Value::String(string.clone())),
            Hocon::Boolean(bool) => Some(Value::Boolean(*bool)),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f32),
    Boolean(bool),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(val) => Some(*val),
            Value::String(val) => Hocon::String(val.clone()).as_bool(),
            _ => None,
        }
    }

    pub fn as_usize(&self) -> Option<usize> {
        match self {
            Value::Integer(val) => usize::try_from(*val).ok(),
            Value::String(val) => val.trim().parse::<usize>().ok(),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(val) => Some(*val),
            Value::Integer(val) => Some(*val as f32),
            Value::String(val) => val.trim().parse::<f32>().ok(),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::String(val) => Some(val.clone()),
            Value::Boolean(true) => Some("true".to_string()),
            Value::Boolean(false) => Some("false".to_string()),
            Value::Float(val) => Some(val.to_string()),
            Value::Integer(val) => Some(val.to_string()),
        }
    }
}

pub trait Config {
    fn load(config: &ConfigLoader) -> Result<Self>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn loader(config: &str) -> ConfigLoader {
        ConfigLoader::from_str(config, "gateway".to_string())
            .unwrap()
            .with_env(HashMap::new())
    }

    #[test]
    fn test_scoped_value_wins_over_root() {
        let config = loader("port = 1\ngateway { port = 2 }");

        assert_eq!(config.get("port").and_then(|v| v.as_usize()), Some(2));
    }

    #[test]
    fn test_root_value_used_when_scope_missing_key() {
        let config = loader("width = 15\ngateway { port = 2 }");

        assert_eq!(config.get("width").and_then(|v| v.as_usize()), Some(15));
    }

    #[test]
    fn test_env_overrides_file() {
        let env = HashMap::from([("N_PLAYOUT".to_string(), "25".to_string())]);
        let config = loader("gateway { n_playout = 400 }").with_env(env);

        assert_eq!(config.get("n_playout").and_then(|v| v.as_usize()), Some(25));
    }

    #[test]
    fn test_missing_value_is_none() {
        let config = loader("{}");

        assert!(config.get("api_token").is_none());
    }

    #[test]
    fn test_negative_integer_is_not_usize() {
        let config = loader("gateway { port = -1 }");

        assert_eq!(config.get("port").and_then(|v| v.as_usize()), None);
    }

    #[test]
    fn test_float_from_string() {
        let env = HashMap::from([("TEMPERATURE".to_string(), "0.001".to_string())]);
        let config = loader("{}").with_env(env);

        let temperature = config.get("temperature").and_then(|v| v.as_f32()).unwrap();
        assert!((temperature - 0.001).abs() < f32::EPSILON);
    }

    #[test]
    fn test_new_or_empty_reads_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "gateway {{ host = \"127.0.0.1\" }}").unwrap();

        let config = ConfigLoader::new_or_empty(file.path(), "gateway".to_string())
            .unwrap()
            .with_env(HashMap::new());

        assert_eq!(
            config.get("host").and_then(|v| v.as_string()),
            Some("127.0.0.1".to_string())
        );
    }

    #[test]
    fn test_new_or_empty_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::new_or_empty(dir.path().join("missing.conf"), "gateway".to_string())
            .unwrap()
            .with_env(HashMap::new());

        assert!(config.get("host").is_none());
    }
}
