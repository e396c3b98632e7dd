//! Authoritative broker keyspace.

/// FIFO intake queue; elements are serialized payments with a zero
/// attempt count.
pub const PAYMENT_QUEUE_KEY: &str = "payment-queue";

/// Retry schedule; member = correlation id, score = due unix-seconds.
pub const PAYMENT_RETRY_QUEUE_KEY: &str = "payment-retry-queue";

/// Retry payload store; field = correlation id, value = serialized payment
/// carrying its current attempt count.
pub const PAYMENT_RETRY_PAYLOADS_KEY: &str = "payment-retry-payloads";

/// Successful dispatches, one sorted set per processor, scored by the
/// payment's `requested_at` in unix-seconds.
pub const PAYMENT_RESULT_DEFAULT_KEY: &str = "payment-result-default";
pub const PAYMENT_RESULT_FALLBACK_KEY: &str = "payment-result-fallback";

/// Terminal failures past the retry budget.
pub const DLQ_KEY: &str = "dlq";

/// Currently preferred processor URL, refreshed by the health router.
pub const BEST_INSTANCE_KEY: &str = "BestInstance";

/// Coarse serializer for `BestInstance` writers across replicas.
pub const BEST_INSTANCE_LOCK_KEY: &str = "BestInstance:lock";
