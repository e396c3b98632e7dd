pub mod health_router_worker;
pub mod intake_worker;
pub mod retry_worker;
