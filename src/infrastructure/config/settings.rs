use config::Environment;
use serde::Deserialize;

const APP_PREFIX: &str = "APP";

fn default_port() -> u16 {
	9999
}

fn default_server_keepalive() -> u64 {
	60
}

fn default_worker_count() -> usize {
	15
}

fn default_max_attempts() -> u32 {
	4
}

fn default_health_update_freq_secs() -> u64 {
	5
}

fn default_best_instance_ttl_secs() -> u64 {
	5
}

fn default_processor_timeout_ms() -> u64 {
	2000
}

fn default_health_probe_timeout_ms() -> u64 {
	500
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
	pub redis_url: String,
	pub default_processor_url: String,
	pub fallback_processor_url: String,
	#[serde(default = "default_port")]
	pub port: u16,
	#[serde(default = "default_server_keepalive")]
	pub server_keepalive: u64,
	#[serde(default = "default_worker_count")]
	pub intake_workers: usize,
	#[serde(default = "default_worker_count")]
	pub retry_workers: usize,
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	#[serde(default = "default_health_update_freq_secs")]
	pub health_update_freq_secs: u64,
	#[serde(default = "default_best_instance_ttl_secs")]
	pub best_instance_ttl_secs: u64,
	#[serde(default = "default_processor_timeout_ms")]
	pub processor_timeout_ms: u64,
	#[serde(default = "default_health_probe_timeout_ms")]
	pub health_probe_timeout_ms: u64,
}

impl Config {
	pub fn load() -> Result<Self, config::ConfigError> {
		Self::load_from(Environment::with_prefix(APP_PREFIX))
	}

	fn load_from(environment: Environment) -> Result<Self, config::ConfigError> {
		let config_builder =
			config::Config::builder().add_source(environment).build()?;

		config_builder.try_deserialize()
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;

	fn required_env() -> HashMap<String, String> {
		let mut env = HashMap::new();
		env.insert("APP_REDIS_URL".into(), "redis://test_redis/".into());
		env.insert(
			"APP_DEFAULT_PROCESSOR_URL".into(),
			"http://test_default/".into(),
		);
		env.insert(
			"APP_FALLBACK_PROCESSOR_URL".into(),
			"http://test_fallback/".into(),
		);
		env
	}

	#[test]
	fn test_config_load_fails_when_app_configs_are_unavailable() {
		let source =
			Environment::with_prefix(APP_PREFIX).source(Some(HashMap::new()));

		assert!(Config::load_from(source).is_err());
	}

	#[test]
	fn test_config_load_applies_defaults() {
		let source =
			Environment::with_prefix(APP_PREFIX).source(Some(required_env()));

		let config =
			Config::load_from(source).expect("Failed to load config in test");

		assert_eq!(config.redis_url, "redis://test_redis/");
		assert_eq!(config.default_processor_url, "http://test_default/");
		assert_eq!(config.fallback_processor_url, "http://test_fallback/");
		assert_eq!(config.port, 9999);
		assert_eq!(config.server_keepalive, 60);
		assert_eq!(config.intake_workers, 15);
		assert_eq!(config.retry_workers, 15);
		assert_eq!(config.max_attempts, 4);
		assert_eq!(config.health_update_freq_secs, 5);
		assert_eq!(config.best_instance_ttl_secs, 5);
		assert_eq!(config.processor_timeout_ms, 2000);
		assert_eq!(config.health_probe_timeout_ms, 500);
	}

	#[test]
	fn test_config_load_honors_overrides() {
		let mut env = required_env();
		env.insert("APP_PORT".into(), "8081".into());
		env.insert("APP_INTAKE_WORKERS".into(), "4".into());
		env.insert("APP_RETRY_WORKERS".into(), "2".into());
		env.insert("APP_MAX_ATTEMPTS".into(), "7".into());
		env.insert("APP_PROCESSOR_TIMEOUT_MS".into(), "750".into());
		let source = Environment::with_prefix(APP_PREFIX).source(Some(env));

		let config =
			Config::load_from(source).expect("Failed to load config in test");

		assert_eq!(config.port, 8081);
		assert_eq!(config.intake_workers, 4);
		assert_eq!(config.retry_workers, 2);
		assert_eq!(config.max_attempts, 7);
		assert_eq!(config.processor_timeout_ms, 750);
	}
}
