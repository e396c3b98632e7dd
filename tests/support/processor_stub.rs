use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use actix_web::{App, HttpResponse, HttpServer, web};
use payment_relay::domain::payment::Payment;

/// Scriptable downstream processor. Flip `failing` to make it reject
/// payments and report itself unhealthy.
#[derive(Default)]
pub struct ProcessorStubState {
	failing:           AtomicBool,
	min_response_time: AtomicU64,
	received:          AtomicUsize,
}

impl ProcessorStubState {
	pub fn set_failing(&self, failing: bool) {
		self.failing.store(failing, Ordering::SeqCst);
	}

	pub fn set_min_response_time(&self, millis: u64) {
		self.min_response_time.store(millis, Ordering::SeqCst);
	}

	pub fn received_count(&self) -> usize {
		self.received.load(Ordering::SeqCst)
	}
}

pub struct ProcessorStub {
	pub url:   String,
	pub state: Arc<ProcessorStubState>,
}

async fn post_payment(
	state: web::Data<ProcessorStubState>,
	payment: web::Json<Payment>,
) -> HttpResponse {
	if state.failing.load(Ordering::SeqCst) {
		return HttpResponse::InternalServerError().finish();
	}
	let _ = payment.into_inner();
	state.received.fetch_add(1, Ordering::SeqCst);
	HttpResponse::Ok().finish()
}

async fn service_health(state: web::Data<ProcessorStubState>) -> HttpResponse {
	HttpResponse::Ok().json(serde_json::json!({
		"failing": state.failing.load(Ordering::SeqCst),
		"minResponseTime": state.min_response_time.load(Ordering::SeqCst),
	}))
}

/// Binds an in-process processor on an ephemeral port and serves it for
/// the rest of the test.
pub async fn start_processor_stub() -> ProcessorStub {
	let state = Arc::new(ProcessorStubState::default());
	let data = web::Data::from(state.clone());

	let server = HttpServer::new(move || {
		App::new()
			.app_data(data.clone())
			.route("/payments", web::post().to(post_payment))
			.route("/payments/service-health", web::get().to(service_health))
	})
	.workers(1)
	.disable_signals()
	.bind(("127.0.0.1", 0))
	.unwrap();

	let addr = server.addrs()[0];
	tokio::spawn(server.run());

	ProcessorStub {
		url: format!("http://127.0.0.1:{}", addr.port()),
		state,
	}
}

/// A base URL nothing listens on, for exercising network failures.
pub fn unreachable_processor_url() -> String {
	"http://127.0.0.1:9".to_string()
}
