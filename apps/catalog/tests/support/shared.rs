pub fn init_tracing() {
    use std::sync::OnceLock;
    use tracing_subscriber::prelude::*;
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "constellation=warn".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}
