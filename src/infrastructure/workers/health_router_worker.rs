use std::time::Duration;

use log::{debug, error, warn};
use reqwest::Client;
use tokio::time::sleep;

use crate::domain::broker::BrokerGateway;
use crate::domain::health::{ServiceHealth, select_preferred};
use crate::domain::processor::ProcessorEndpoints;

async fn probe(
	http_client: &Client,
	base_url: &str,
	timeout: Duration,
) -> Option<ServiceHealth> {
	let health_url = format!("{base_url}/payments/service-health");

	let resp = match http_client
		.get(&health_url)
		.timeout(timeout)
		.send()
		.await
	{
		Ok(resp) if resp.status().is_success() => resp,
		Ok(resp) => {
			warn!("Health probe against {base_url} returned {}", resp.status());
			return None;
		}
		Err(e) => {
			warn!("Health probe against {base_url} failed: {e}");
			return None;
		}
	};

	match resp.json::<ServiceHealth>().await {
		Ok(health) => Some(health),
		Err(e) => {
			warn!("Health probe against {base_url} returned bad JSON: {e}");
			None
		}
	}
}

/// Single long-lived task. Probes both processors each cycle and refreshes
/// the published best instance; when both sides fail, the stale value is
/// left to expire through its TTL.
pub async fn health_router_worker<G>(
	broker: G,
	http_client: Client,
	endpoints: ProcessorEndpoints,
	update_freq: Duration,
	ttl: Duration,
	probe_timeout: Duration,
) where
	G: BrokerGateway + Clone,
{
	loop {
		let (default_health, fallback_health) = tokio::join!(
			probe(&http_client, &endpoints.default_url, probe_timeout),
			probe(&http_client, &endpoints.fallback_url, probe_timeout)
		);

		match select_preferred(
			default_health.as_ref(),
			fallback_health.as_ref(),
		) {
			Some(processor) => {
				let url = endpoints.url_of(processor);
				debug!("Publishing best instance: {}", processor.name());
				if let Err(e) = broker.try_publish_best(url, ttl).await {
					error!("Failed to publish best instance: {e}");
				}
			}
			None => {
				warn!(
					"Both processors failing; leaving best instance to expire"
				);
			}
		}

		sleep(update_freq).await;
	}
}
