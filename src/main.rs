use anyhow::Context;
use clap::Parser;
use find_records::config::cli::normalize_args;
use find_records::config::{Command, SearchArgs};
use find_records::utils::{logger, validation::Validate};
use find_records::{
    Cli, FindRecordsError, LocalStorage, LookupTable, OleRecordFinder, SearchEngine, Settings,
    SolrIndexSearcher,
};
use std::io::Write;
use std::process::ExitCode;

const EXIT_INTERRUPTED: u8 = 131;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI arguments: {:?}", cli);

    tokio::select! {
        outcome = run(cli) => match outcome {
            Ok(code) => code,
            Err(e) => report_failure(&e),
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, exiting");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = Settings::from_env()?;
    settings.validate()?;

    match cli.command {
        Command::ShowLookups => {
            let listing = LookupTable::default().render();
            std::io::stdout()
                .lock()
                .write_all(listing.as_bytes())
                .context("Failed to print the lookup table")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Searching(args) => search(&settings, &args).await,
    }
}

async fn search(settings: &Settings, args: &SearchArgs) -> anyhow::Result<ExitCode> {
    let client = settings.http_client()?;
    let searcher =
        SolrIndexSearcher::new(client.clone(), &settings.solr_url()?, &settings.solr_core)?;
    let finder = OleRecordFinder::new(client, settings.ole_url()?);
    let storage = LocalStorage::new(args.output_dir.clone());
    let engine = SearchEngine::new(searcher, finder, storage);

    let request = args.to_request();
    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();

    let summary = engine
        .run(&request, &mut stdout, &mut stderr)
        .await
        .with_context(|| format!("Search for '{}' failed", request.query_term))?;
    stdout.flush()?;

    tracing::debug!("Run summary: {:?}", summary);

    if summary.fetch_failures > 0 {
        tracing::error!(
            "{} record(s) could not be retrieved from the OLE SRU",
            summary.fetch_failures
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn report_failure(error: &anyhow::Error) -> ExitCode {
    eprintln!("❌ {:#}", error);
    if let Some(e) = error.downcast_ref::<FindRecordsError>() {
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    }
    ExitCode::FAILURE
}
