use anyhow::Result;
use clap::Parser;
use conversight::cli::{Cli, Commands, SortArg};
use conversight::core::models::Collection;
use conversight::dashboard::navigation::{ConsoleNavigator, ConsoleNotifier, Route};
use conversight::dashboard::{
    filter, sort_by_created, CacheState, DashboardStats, DeletionOutcome, SearchIndex,
};
use conversight::{utils, Conversation, ConversationId, Dashboard, Settings};
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::new()?;
    conversight::init_logging(&settings);

    let cli = Cli::parse();

    let dashboard = Dashboard::from_settings(
        &settings,
        Arc::new(ConsoleNavigator),
        Arc::new(ConsoleNotifier),
    )
    .await?;

    match cli.command {
        Commands::Login { email, password } => handle_login(&dashboard, email, password).await,
        Commands::Logout => {
            dashboard.auth().logout().await;
            utils::print_success("Logged out");
            Ok(())
        }
        Commands::Register {
            email,
            business_name,
            password,
        } => handle_register(&dashboard, email, business_name, password).await,
        Commands::Verify { token } => {
            // Failures were already reported through the notifier
            let _ = dashboard.auth().verify(&token).await;
            Ok(())
        }
        Commands::List { query, sort } => handle_list(&dashboard, query, sort).await,
        Commands::Show { id, transcript } => handle_show(&dashboard, id, transcript).await,
        Commands::Stats { json } => handle_stats(&dashboard, json).await,
        Commands::Delete { id, yes } => handle_delete(&dashboard, id, yes).await,
        Commands::Browse => handle_browse(&dashboard).await,
    }
}

/// Reads one line with only the line terminator removed
async fn read_raw_line(prompt: &str) -> Result<String> {
    utils::print_prompt(prompt);
    use std::io::Write;
    std::io::stdout().flush()?;

    let mut reader = BufReader::new(io::stdin());
    let mut input = String::new();
    reader.read_line(&mut input).await?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

async fn read_line(prompt: &str) -> Result<String> {
    Ok(read_raw_line(prompt).await?.trim().to_string())
}

async fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        // Surrounding spaces are part of the password
        None => read_raw_line("Password: ").await,
    }
}

async fn handle_login(dashboard: &Dashboard, email: String, password: Option<String>) -> Result<()> {
    let password = password_or_prompt(password).await?;
    // Failures were already reported through the notifier
    let _ = dashboard.auth().login(&email, &password).await;
    Ok(())
}

async fn handle_register(
    dashboard: &Dashboard,
    email: String,
    business_name: String,
    password: Option<String>,
) -> Result<()> {
    let password = password_or_prompt(password).await?;
    let _ = dashboard
        .auth()
        .register(&email, &password, &business_name)
        .await;
    Ok(())
}

/// Fetches the collection; `None` when the failure was already reported
async fn load(dashboard: &Dashboard) -> Option<Collection> {
    utils::print_info("Loading...");
    let listing = dashboard.repository().list_conversations().await;
    match listing.error {
        None => Some(listing.conversations),
        Some(error) if error.is_unauthenticated() => None,
        Some(error) => {
            utils::print_error(&error.user_message());
            None
        }
    }
}

fn print_row(conversation: &Conversation) {
    let sentiment = conversation
        .sentiment()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  {:<20} {:<40} {}",
        Route::Conversation(conversation.id),
        conversation.display_name(),
        sentiment
    );
}

async fn handle_list(dashboard: &Dashboard, query: Option<String>, sort: Option<SortArg>) -> Result<()> {
    let Some(collection) = load(dashboard).await else {
        return Ok(());
    };

    let query = query.unwrap_or_default();
    let matches = filter(&collection, &query);

    let rows = match sort {
        Some(order) => sort_by_created(matches, order.into()),
        None => matches,
    };

    utils::print_header("Your Conversations");
    for conversation in &rows {
        print_row(conversation);
    }
    println!();
    utils::print_info(&format!("{} of {} conversations", rows.len(), collection.len()));
    Ok(())
}

async fn handle_show(dashboard: &Dashboard, id: i64, transcript: bool) -> Result<()> {
    utils::print_info("Loading...");
    let conversation = match dashboard.repository().get_conversation(ConversationId(id)).await {
        Ok(conversation) => conversation,
        Err(error) if error.is_unauthenticated() => return Ok(()),
        Err(error) => {
            utils::print_error(&error.user_message());
            return Ok(());
        }
    };

    utils::print_header(&conversation.display_name());
    println!("Route:     {}", Route::Conversation(conversation.id));
    println!("Summary:   {}", conversation.summary_text());
    println!(
        "Sentiment: {}",
        conversation.sentiment_score.as_deref().unwrap_or("-")
    );

    println!("\nEmotion scores:");
    let rows: Vec<(String, f64)> = conversation
        .emotion_scores
        .iter()
        .map(|(label, score)| (label.to_string(), score))
        .collect();
    if rows.is_empty() {
        println!("  (none)");
    } else {
        utils::print_bar_chart(&rows, 2);
    }

    if transcript {
        println!("\nTranscript:\n{}", conversation.transcript_text());
    } else if !conversation.transcript_text().is_empty() {
        utils::print_info("\n(use --transcript to show the full transcript)");
    }
    Ok(())
}

async fn handle_stats(dashboard: &Dashboard, json: bool) -> Result<()> {
    let Some(collection) = load(dashboard).await else {
        return Ok(());
    };
    let stats = DashboardStats::compute(&collection);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    utils::print_header(&format!("Emotions across {} conversations", stats.total));
    let emotions: Vec<(String, f64)> = stats
        .emotions
        .iter()
        .map(|e| (e.label.clone(), e.total))
        .collect();
    if emotions.is_empty() {
        println!("  (no emotion data)");
    } else {
        utils::print_bar_chart(&emotions, 2);
    }

    utils::print_header("Sentiment distribution");
    let sentiments: Vec<(String, f64)> = stats
        .sentiments
        .buckets()
        .iter()
        .map(|b| (b.sentiment.to_string(), b.count as f64))
        .collect();
    utils::print_bar_chart(&sentiments, 0);
    Ok(())
}

async fn handle_delete(dashboard: &Dashboard, id: i64, yes: bool) -> Result<()> {
    let workflow = dashboard.deletion();
    workflow.request(ConversationId(id));

    if !yes {
        let answer = read_line(&format!("Delete conversation {}? This cannot be undone [y/N]: ", id)).await?;
        if !matches!(answer.to_lowercase().as_str(), "y" | "yes") {
            workflow.cancel();
            utils::print_info("Cancelled");
            return Ok(());
        }
    }

    // Success and failure are reported by the workflow itself
    if workflow.confirm().await == DeletionOutcome::Ignored {
        utils::print_info("A delete is already in progress");
    }
    Ok(())
}

async fn handle_browse(dashboard: &Dashboard) -> Result<()> {
    utils::print_header("Browse Conversations");
    utils::print_info("Type to search (empty shows all). /refresh, /help, /quit\n");

    if load(dashboard).await.is_none() {
        return Ok(());
    }

    let mut index = SearchIndex::new();
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin);

    loop {
        utils::print_prompt("search> ");
        use std::io::Write;
        std::io::stdout().flush()?;

        let mut input = String::new();
        if reader.read_line(&mut input).await? == 0 {
            break;
        }
        let input = input.trim();

        match input {
            "/quit" | "/exit" => break,
            "/help" => {
                println!("Special commands:");
                println!("  /refresh - Fetch the conversation list again");
                println!("  /quit    - Leave browse mode");
                println!("  anything else filters by name, transcript, summary or sentiment\n");
                continue;
            }
            "/refresh" => {
                if load(dashboard).await.is_none() {
                    return Ok(());
                }
                continue;
            }
            _ => {}
        }

        let collection = match dashboard.repository().snapshot().await {
            CacheState::Loaded(collection) => collection,
            CacheState::Loading => {
                utils::print_info("Loading...");
                continue;
            }
            CacheState::NotLoaded => break,
        };

        let view = index.view(&collection, input);
        for conversation in view.iter() {
            print_row(conversation);
        }
        utils::print_info(&format!("{} of {} conversations\n", view.len(), view.source_len()));
    }

    Ok(())
}
