use tracing::{Subscriber, subscriber::set_global_default};
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{MakeWriter, format::FmtSpan},
    layer::SubscriberExt,
};

/// Formatted subscriber writing to `sink`. `RUST_LOG` overrides `env_filter`.
///
/// Closing spans are logged too, so every `#[instrument]`ed handler and
/// repository call reports its duration.
pub fn get_subscriber<Sink>(env_filter: &str, sink: Sink) -> impl Subscriber + Sync + Send
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_thread_ids(true)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(sink);

    Registry::default().with(env_filter).with(fmt_layer)
}

pub fn init_subscriber<S>(subscriber: S)
where
    S: Subscriber + Send + Sync + 'static,
{
    LogTracer::init().expect("Failed to set logger");
    set_global_default(subscriber).expect("Failed to set subscriber");
}

/// Installs the default stdout subscriber at `info`, overridable with `RUST_LOG`.
pub fn init_logger() {
    init_subscriber(get_subscriber("info", std::io::stdout));
}
