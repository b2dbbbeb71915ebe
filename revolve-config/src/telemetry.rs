use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVES: &str = "info,revolve_core=info";

/// Install a global `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `default_directives`. Returns `false` if a subscriber was already set.
pub fn init_tracing(default_directives: &str) -> bool {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directives)),
        )
        .with(fmt::layer())
        .try_init()
        .is_ok()
}
