use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use moodlist::migrator::{find_playlist, save_migration_results};
use moodlist::{
    AppError, Config, MigrationOrchestrator, MigrationResult, MoodServiceClient,
    MoodShuffleOrchestrator, MoodSource, PlaylistSource, SearchFields, SpotifyClient,
    YoutubeClient, remove_duplicates,
};

const UNMATCHED_DISPLAY_LIMIT: usize = 20;

#[derive(Parser)]
#[command(name = "moodlist")]
#[command(about = "Deduplicate, migrate and mood-shuffle streaming playlists")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceKind {
    Spotify,
    Youtube,
}

#[derive(Subcommand)]
enum Commands {
    /// List your playlists
    ListPlaylists {
        /// Provider to list playlists from
        #[arg(long, value_enum, default_value = "spotify")]
        provider: SourceKind,
    },

    /// Remove repeated tracks from a Spotify playlist, keeping the first occurrence
    Dedup {
        /// Playlist id or name
        playlist: String,

        /// Show what would be removed without changing the playlist
        #[arg(long)]
        dry_run: bool,
    },

    /// Copy a playlist from a source provider into a new Spotify playlist
    Migrate {
        /// Source playlist id or name
        playlist: String,

        /// Name of the playlist to create
        #[arg(long)]
        name: String,

        /// Provider the playlist comes from
        #[arg(long, value_enum, default_value = "youtube")]
        from: SourceKind,

        /// Search by title only instead of title, artist and album
        #[arg(long)]
        title_only: bool,
    },

    /// Create a playlist of the tracks matching one mood
    MoodShuffle {
        /// Spotify playlist id or name
        playlist: String,

        /// Mood label: happy, sad, energetic, calm or angry
        #[arg(long, conflicts_with = "image", required_unless_present = "image")]
        mood: Option<String>,

        /// Image to predict the mood from
        #[arg(long)]
        image: Option<PathBuf>,

        /// Name of the playlist to create
        #[arg(long)]
        name: Option<String>,
    },

    /// Show setup guide
    Setup,
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    match cli.command {
        Commands::ListPlaylists { provider } => list_playlists(provider).await?,
        Commands::Dedup { playlist, dry_run } => dedup(&playlist, dry_run).await?,
        Commands::Migrate {
            playlist,
            name,
            from,
            title_only,
        } => migrate(&playlist, &name, from, title_only).await?,
        Commands::MoodShuffle {
            playlist,
            mood,
            image,
            name,
        } => mood_shuffle(&playlist, mood, image, name.as_deref()).await?,
        Commands::Setup => show_setup_guide(),
    }

    Ok(())
}

fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;

    let missing = config.get_missing_config();
    if !missing.is_empty() {
        println!("{}", "Missing configuration:".red());
        for item in &missing {
            println!("   - {}", item);
        }
        println!(
            "\n{}",
            "Run `moodlist setup` for the expected environment variables.".yellow()
        );
        std::process::exit(1);
    }

    Ok(config)
}

async fn list_playlists(provider: SourceKind) -> Result<()> {
    let config = load_config()?;

    let playlists = match provider {
        SourceKind::Spotify => {
            let client = SpotifyClient::from_config(&config)?;
            client.list_playlists(&config.spotify_auth()).await
        }
        SourceKind::Youtube => {
            let client = YoutubeClient::from_config(&config)?;
            client.list_playlists(&config.youtube_auth()?).await
        }
    };
    let playlists = playlists.map_err(explain).context("Failed to fetch playlists")?;

    println!("{}", "Your Playlists".cyan().bold());
    println!("{}", "=".repeat(50));

    if playlists.is_empty() {
        println!("{}", "No playlists found".yellow());
        return Ok(());
    }

    for (i, playlist) in playlists.iter().enumerate() {
        println!(
            "{:2}. {} ({} tracks) {}",
            i + 1,
            playlist.name.green(),
            playlist.track_count,
            playlist.id.dimmed()
        );
    }

    println!("\n{}", format!("Total: {} playlists", playlists.len()).cyan());

    Ok(())
}

async fn dedup(playlist: &str, dry_run: bool) -> Result<()> {
    let config = load_config()?;
    let spotify = SpotifyClient::from_config(&config)?;
    let auth = config.spotify_auth();

    if dry_run {
        println!(
            "{}",
            "DRY RUN MODE - The playlist will not be changed".yellow()
        );
    } else {
        println!(
            "{}",
            "Removing duplicates cannot be undone. The first occurrence of each track is kept."
                .yellow()
        );
    }

    let target = find_playlist(&spotify, &auth, playlist)
        .await
        .map_err(explain)?;

    let report = remove_duplicates(&spotify, &auth, &target.id, config.chunk_size, dry_run)
        .await
        .map_err(explain)
        .context("Failed to remove duplicates")?;

    println!(
        "Scanned {} tracks in {}",
        report.scanned,
        target.name.green()
    );
    for entry in &report.removed {
        println!(
            "  #{:<4} {} - {}",
            entry.added_index_hint,
            entry.track.artists.join(", "),
            entry.track.title
        );
    }

    let verb = if dry_run { "Would remove" } else { "Removed" };
    println!(
        "\n{}",
        format!("{} {} duplicate entries", verb, report.removed.len()).cyan()
    );

    Ok(())
}

async fn migrate(playlist: &str, name: &str, from: SourceKind, title_only: bool) -> Result<()> {
    println!("{}", "Playlist Migrator".cyan().bold());
    println!("{}", "=".repeat(50));

    let config = load_config()?;
    let spotify = SpotifyClient::from_config(&config)?;
    let destination_auth = config.spotify_auth();

    let search_fields = if title_only {
        SearchFields::TitleOnly
    } else {
        config.search_fields
    };
    let migrator = MigrationOrchestrator::new(&spotify)
        .with_search_fields(search_fields)
        .with_chunk_size(config.chunk_size)
        .with_deadline(config.operation_deadline)
        .with_progress(true);

    let outcome = match from {
        SourceKind::Spotify => {
            let source = find_playlist(&spotify, &destination_auth, playlist)
                .await
                .map_err(explain)?;
            migrator
                .migrate(&spotify, &destination_auth, &destination_auth, &source.id, name)
                .await
        }
        SourceKind::Youtube => {
            let youtube = YoutubeClient::from_config(&config)?;
            let source_auth = config.youtube_auth()?;
            let source = find_playlist(&youtube, &source_auth, playlist)
                .await
                .map_err(explain)?;
            migrator
                .migrate(&youtube, &source_auth, &destination_auth, &source.id, name)
                .await
        }
    };

    let results_dir = Path::new("migration_results");
    match outcome {
        Ok(result) => {
            print_summary(&result);
            save_migration_results(results_dir, std::slice::from_ref(&result))?;
            println!("\n{}", "Migration completed!".green());
            Ok(())
        }
        Err(AppError::MigrationIncomplete { result, cause }) => {
            print_summary(&result);
            save_migration_results(results_dir, std::slice::from_ref(result.as_ref()))?;
            println!("\n{} {}", "Migration incomplete:".red(), cause);
            std::process::exit(1);
        }
        Err(e) => Err(explain(e)).context("Migration failed"),
    }
}

async fn mood_shuffle(
    playlist: &str,
    mood: Option<String>,
    image: Option<PathBuf>,
    name: Option<&str>,
) -> Result<()> {
    let config = load_config()?;
    let spotify = SpotifyClient::from_config(&config)?;
    let mood_service = MoodServiceClient::from_config(&config)?;
    let auth = config.spotify_auth();

    let source = match (mood, image) {
        (Some(label), _) => MoodSource::Label(label),
        (None, Some(path)) => MoodSource::Image(
            std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        (None, None) => anyhow::bail!("Either --mood or --image is required"),
    };

    let target = find_playlist(&spotify, &auth, playlist)
        .await
        .map_err(explain)?;

    let outcome = MoodShuffleOrchestrator::new(&spotify, &mood_service)
        .with_predictor(&mood_service)
        .with_chunk_size(config.chunk_size)
        .with_deadline(config.operation_deadline)
        .shuffle(&auth, &target.id, source, name)
        .await
        .map_err(explain)
        .context("Mood shuffle failed")?;

    println!(
        "{} Created {} playlist {} with {} tracks",
        "Done.".green(),
        outcome.mood.to_string().cyan(),
        outcome.destination_playlist_id,
        outcome.track_count
    );

    Ok(())
}

/// Adds a re-login hint to errors caused by a rejected token.
fn explain(err: AppError) -> anyhow::Error {
    if err.is_auth_expired() {
        anyhow::Error::new(err).context("Access token rejected; obtain a new one and update .env")
    } else {
        anyhow::Error::new(err)
    }
}

fn print_summary(result: &MigrationResult) {
    println!();
    println!("{}", "=".repeat(60));
    println!("{}", "MIGRATION SUMMARY".bold());
    println!("{}", "=".repeat(60));
    println!("Destination playlist: {} ({})", result.destination_name, result.destination_playlist_id);
    println!("Total tracks processed: {}", result.total_tracks);
    println!(
        "Successfully matched: {}",
        result.matched_count.to_string().green()
    );
    println!(
        "Not found: {}",
        result.unmatched_titles.len().to_string().yellow()
    );
    println!("Search errors: {}", result.error_count.to_string().red());
    println!("Success rate: {:.1}%", result.success_rate);
    println!("{}", "=".repeat(60));

    if !result.unmatched_titles.is_empty() {
        println!("\nNot found:");
        for title in result.unmatched_titles.iter().take(UNMATCHED_DISPLAY_LIMIT) {
            println!("  - {}", title);
        }
        let hidden = result
            .unmatched_titles
            .len()
            .saturating_sub(UNMATCHED_DISPLAY_LIMIT);
        if hidden > 0 {
            println!("  ... and {} more (see migration_results/)", hidden);
        }
    }

    if !result.low_confidence.is_empty() {
        println!("\n{}", "Matches worth checking:".yellow());
        for m in &result.low_confidence {
            println!(
                "  {} -> {} - {} ({:.0}%)",
                m.source,
                m.matched_artist,
                m.matched_title,
                m.confidence * 100.0
            );
        }
    }
}

fn show_setup_guide() {
    println!("{}", "moodlist Setup Guide".cyan().bold());
    println!("{}", "=".repeat(50));

    println!("\n{}", "1. Access tokens".yellow());
    println!("   - Obtain a Spotify Web API access token with the scopes");
    println!("     playlist-read-private, playlist-modify-private, playlist-modify-public");
    println!("   - For YouTube migrations, obtain a YouTube Data API token with");
    println!("     the youtube.readonly scope");

    println!("\n{}", "2. Configuration".yellow());
    println!("   - Create a .env file with:");
    println!("     SPOTIFY_ACCESS_TOKEN=your_spotify_token");
    println!("     YOUTUBE_ACCESS_TOKEN=your_youtube_token");
    println!("     MOOD_CLASSIFY_URL=http://127.0.0.1:5000/mood");
    println!("     MOOD_PREDICT_URL=http://127.0.0.1:5000/predict");
    println!("   - Optional: BATCH_CHUNK_SIZE, REQUEST_TIMEOUT_SECS,");
    println!("     OPERATION_DEADLINE_SECS, SEARCH_FIELDS (full|title)");

    println!("\n{}", "3. Usage".yellow());
    println!("   - moodlist list-playlists --provider youtube");
    println!("   - moodlist dedup \"Road Trip\" --dry-run");
    println!("   - moodlist migrate \"Liked videos\" --from youtube --name \"From YouTube\"");
    println!("   - moodlist mood-shuffle \"Road Trip\" --mood happy");

    println!("\n{}", "Ready to go!".green());
}
