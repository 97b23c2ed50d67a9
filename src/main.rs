use clap::Parser;
use tmdb_movies::core::detail;
use tmdb_movies::domain::parcel;
use tmdb_movies::domain::ports::{ConnectivityProbe, MovieSource};
use tmdb_movies::utils::error::ErrorSeverity;
use tmdb_movies::utils::logger;
use tmdb_movies::{
    CliConfig, ImageSettings, Lifecycle, LifecycleOutcome, ListController, ListEvent, MovieError,
    Snapshot, TcpProbe, TmdbClient,
};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting tmdb-movies");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    match run(&config).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            tracing::error!(
                "❌ tmdb-movies failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

/// Returns whether a movie list could be shown.
async fn run(config: &CliConfig) -> Result<bool, MovieError> {
    let settings = config.settings()?;

    let client = TmdbClient::new(&settings)?;
    let probe = TcpProbe::from_config(&settings).await;
    let mut controller = ListController::new(client, probe, ImageSettings::from_config(&settings))
        .with_criterion(settings.default_sort());

    let snapshot = match &config.state_in {
        Some(path) if path.exists() => Some(Snapshot::from(std::fs::read_to_string(path)?)),
        _ => None,
    };

    let created = controller.handle_lifecycle(Lifecycle::Create(snapshot))?;
    if let Some(sort) = config.sort {
        controller.request_list(sort);
    }
    if created == LifecycleOutcome::Restored {
        // a state saved while offline carries no movies; retry it
        controller.handle_lifecycle(Lifecycle::Restart)?;
    }

    if let Some(ListEvent::Failed { message, .. }) = controller.next_event().await {
        eprintln!("⚠️  {}", message);
    }

    let shown = controller.state().has_movies();
    if shown {
        if let Some(position) = config.show {
            show_detail(&mut controller, position)?;
        }
        print_list(&controller, config.limit);
    }

    if let Some(path) = &config.state_out {
        if let LifecycleOutcome::Saved(snapshot) =
            controller.handle_lifecycle(Lifecycle::SaveState)?
        {
            std::fs::write(path, snapshot.as_str())?;
            tracing::info!("📁 List state saved to: {}", path.display());
        }
    }

    controller.handle_lifecycle(Lifecycle::Destroy)?;
    Ok(shown)
}

fn print_list<S, N>(controller: &ListController<S, N>, limit: Option<usize>)
where
    S: MovieSource + 'static,
    N: ConnectivityProbe,
{
    let movies = controller.movies();
    println!("🎬 {} ({} movies)", controller.criterion(), movies.len());

    for (rank, movie) in movies
        .iter()
        .enumerate()
        .take(limit.unwrap_or(movies.len()))
    {
        let year = detail::extract_release_year(movie.release_date())
            .unwrap_or(movie.release_date());
        println!(
            "{:>3}. {} ({}) ★ {}",
            rank + 1,
            movie.title(),
            year,
            movie.vote_average()
        );
    }
}

/// Hands the movie at `position` (1-based) to the detail binder through its parcel form.
fn show_detail<S, N>(controller: &mut ListController<S, N>, position: usize) -> Result<(), MovieError>
where
    S: MovieSource + 'static,
    N: ConnectivityProbe,
{
    let movie = position
        .checked_sub(1)
        .and_then(|index| controller.select(index))
        .ok_or_else(|| MovieError::InvalidConfigValueError {
            field: "show".to_string(),
            value: position.to_string(),
            reason: format!("Position must be between 1 and {}", controller.movies().len()),
        })?;
    controller.set_scroll_offset(position - 1);

    let handoff = parcel::encode(&movie)?;
    let fields = detail::bind(&parcel::decode(&handoff)?);

    println!("━━ {} ━━", fields.window_title);
    println!("Poster:   {}", fields.poster);
    println!("Rating:   {}", fields.vote_average);
    println!("Released: {}", fields.release_year);
    println!("Plot:     {}", fields.plot);
    println!();
    Ok(())
}
