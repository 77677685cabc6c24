/// Configures the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` and defaults to `info`:
///
/// ```bash
/// RUST_LOG=debug rental_broker
/// RUST_LOG=rental_broker::lifecycle=debug,info rental_broker
/// ```
pub fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}
