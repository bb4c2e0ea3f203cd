use anyhow::Context;
use folio_cli::settings::Settings;
use folio_cli::{cli, commands, init_tracing};
use folio_core::{FolioError, Portfolio};
use folio_store::JsonFileStore;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let matches = cli::build().get_matches();

    if let Err(e) = run(&matches).await {
        eprintln!("error: {e:#}");
        if e.downcast_ref::<FolioError>().is_some_and(FolioError::is_retryable) {
            eprintln!("the command is safe to re-run");
        }
        std::process::exit(1);
    }
}

async fn run(matches: &clap::ArgMatches) -> anyhow::Result<()> {
    let mut settings = Settings::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    if let Some(path) = matches.get_one::<PathBuf>("data") {
        settings = settings.with_data_path(path.clone());
    }
    if let Some(student) = matches.get_one::<String>("student") {
        settings = settings.with_student(student.clone());
    }
    init_tracing(&settings);

    let store = JsonFileStore::open(settings.data_path.clone())
        .await
        .with_context(|| format!("opening {}", settings.data_path.display()))?;
    tracing::debug!(path = %settings.data_path.display(), "data file opened");

    let portfolio = Portfolio::new(Arc::new(store), settings.folio)?;

    let mut stdout = std::io::stdout().lock();
    commands::run(matches, &portfolio, &mut stdout).await
}
