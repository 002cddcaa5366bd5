//! Application glue: logging, single-instance arbitration and wiring of the
//! intake pipeline. The interactive surface is expected to sit on top of
//! [`IntakeHandle`]; this binary runs the pipeline headless and logs events.

use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use intake_core::{scheme_url_from_argv, ActivationEvent};
use intake_engine::{
    AlphanumericNamer, GateOutcome, HttpTitleResolver, InstanceGate, IntakeDeps, IntakeEvent,
    IntakeHandle, RegistrarError, SchemeRegistrar, TitleSettings,
};
use intake_logging::{intake_error, intake_info, intake_warn};

use super::logging::{self, LogDestination};
use super::store::FileStore;

const SCHEME: &str = "fetchqueue";
const GATE_PORT: u16 = 45819;
const PAGE_SIZE: u32 = 50;
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Scheme registration backend. Wiring the scheme into the OS shell differs
/// per platform and install mode; until an installer exists this backend
/// records the intent so activations forwarded over the gate still work.
struct LoggingRegistrar;

impl SchemeRegistrar for LoggingRegistrar {
    fn register_privileged(&self, scheme: &str) -> Result<(), RegistrarError> {
        intake_info!("treating {scheme}:// as a privileged scheme for this session");
        Ok(())
    }
}

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::File, Path::new("./fetchqueue.log"));

    let args: Vec<String> = env::args().skip(1).collect();
    let activation_url = scheme_url_from_argv(args.iter().map(String::as_str), SCHEME);

    let gate = match InstanceGate::acquire(GATE_PORT, activation_url.as_deref())
        .context("instance gate failed")?
    {
        GateOutcome::Primary(gate) => gate,
        GateOutcome::Secondary => {
            // The running instance now owns this launch's activation.
            intake_info!("another instance is running; yielding");
            return Ok(());
        }
    };

    let store = Arc::new(FileStore::open(Path::new(".")));
    let resolver = HttpTitleResolver::new(TitleSettings::default())
        .context("title resolver construction failed")?;

    let handle = IntakeHandle::new(IntakeDeps {
        engine: store.clone(),
        store,
        resolver: Arc::new(resolver),
        namer: Arc::new(AlphanumericNamer),
        registrar: Arc::new(LoggingRegistrar),
        scheme: SCHEME.to_string(),
        page_size: PAGE_SIZE,
    });

    // A deep link on our own argv is the cold-start activation path.
    if let Some(url) = activation_url {
        handle.activation(ActivationEvent::open_url(url));
    }
    handle.ready();
    handle.fetch_page(0);

    intake_info!("intake pipeline running on gate port {}", gate.port());
    loop {
        while let Some(event) = gate.try_recv() {
            handle.activation(event);
        }
        while let Some(event) = handle.recv_timeout(POLL_INTERVAL) {
            report(event);
        }
    }
}

fn report(event: IntakeEvent) {
    match event {
        IntakeEvent::OpenForm(request) => {
            // No form is attached in headless mode; surface the decoded
            // request so the operator sees the activation was understood.
            intake_warn!(
                "interactive activation for {} ({}) has no form to open",
                request.url,
                request.name.as_deref().unwrap_or("")
            );
        }
        IntakeEvent::RegistrationFailed { scheme, error } => {
            intake_error!("could not claim {scheme}:// with the OS: {error}");
        }
        IntakeEvent::Submitted(outcome) => {
            if outcome.fully_accepted() {
                intake_info!("submission accepted: {} item(s)", outcome.accepted);
            } else {
                for failure in &outcome.failures {
                    intake_warn!("item {} rejected: {}", failure.url, failure.message);
                }
            }
        }
        IntakeEvent::Refreshed { items, pagination } => {
            intake_info!(
                "list page {} refreshed: {} of {} item(s)",
                pagination.page_index,
                items.len(),
                pagination.total
            );
        }
    }
}
