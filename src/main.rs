use std::sync::Arc;

use clinic_ledger::{
    config,
    console::Console,
    context::ClinicContext,
    errors::Result,
    notify::Notifier,
    store::{AutosaveEngine, DocumentStore, FileBackend, LoadOutcome, StorageBackend},
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config =
        config::load_default_config().inspect_err(|e| error!("Failed to load configuration: {e}"))?;

    // 4. Open the storage backend and the document over it
    let backend: Arc<dyn StorageBackend> = Arc::new(
        FileBackend::open(&app_config.data_dir)
            .await
            .inspect(|_| info!("Storage directory ready."))
            .inspect_err(|e| error!("Failed to open storage directory: {e}"))?,
    );
    let (store, outcome) = DocumentStore::open(backend.as_ref()).await;

    // 5. Wire the notification channel and the auto-save engine
    let (notify, events) = Notifier::channel();
    let ctx = ClinicContext::new(store.clone(), notify.clone());
    let engine = AutosaveEngine::start(
        store,
        Arc::clone(&backend),
        notify.clone(),
        app_config.autosave.to_autosave_config(),
    );

    // 6. Report the load outcome; a fresh or recovered document is persisted
    //    right away so the files on disk match memory from the start
    match outcome {
        LoadOutcome::Loaded => {
            notify.success("Database loaded successfully! Resuming from where you left off.");
        }
        LoadOutcome::Fresh | LoadOutcome::Recovered => {
            if let Err(e) = engine.flush().await {
                notify.error(format!("Auto-save failed: {e}"));
            }
            if outcome == LoadOutcome::Fresh {
                notify.success("New database created and ready to use!");
            }
        }
    }

    // 7. Run the console until the user quits
    Console::new(ctx, engine, events, app_config.clinic_name)
        .run()
        .await
}
