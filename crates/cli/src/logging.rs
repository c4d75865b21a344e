use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

/// Installs the fmt subscriber.
///
/// `CMAP_LOG` takes the usual `EnvFilter` syntax, e.g.
/// `CMAP_LOG=cmap_core::legistar=debug,cmap_core=info`. Without it the
/// level is info, or debug with `--verbose`.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose { "cmap_core=debug,cli=debug" } else { "cmap_core=info,cli=info" };
        let filter =
            EnvFilter::try_from_env("CMAP_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
