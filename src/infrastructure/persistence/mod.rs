pub mod redis_broker_gateway;
