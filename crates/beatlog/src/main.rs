mod app;

use std::io::{self, IsTerminal, Read};
use std::process::Command;

use app::{App, RequestTicket, Screen};
use beatlog_config::{
    BeatlogConfig, config_exists, load_config, open_in_editor, resolve_gemini_key, resolve_model,
    resolve_simple_output, save_config, set_config_value,
};
use beatlog_core::{BeatlogError, BeatlogResult, Recommendation, Track, normalize_theme};
use beatlog_music::{PromptOptions, Recommender};
use clap::{Parser, Subcommand};
use console::style;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use dialoguer::{Input, Select, theme::ColorfulTheme};

const SUGGESTED_THEMES: [&str; 5] = ["NewJeans", "City Pop", "Day6", "Rainy Day", "Morning Calm"];

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Open config file in editor
    Edit,
}

#[derive(Debug, Parser)]
#[command(name = "beatlog")]
#[command(version, about = "AI-curated commute playlists", long_about = None)]
struct Cli {
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=50))]
    count: Option<u32>,
    #[arg(long)]
    no_covers: bool,
    #[arg(long)]
    simple: bool,
    #[arg(value_name = "THEME")]
    theme: Vec<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Handle config commands first
    if let Some(Commands::Config { action }) = cli.command {
        if let Err(err) = handle_config_command(action) {
            eprintln!("{} {err}", style("Error:").red());
            std::process::exit(1);
        }
        return;
    }

    let mut config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {err}", style("Error:").red());
            std::process::exit(1);
        }
    };

    let theme = gather_theme(&cli).unwrap_or_else(|err| {
        eprintln!("{} {err}", style("Error:").red());
        std::process::exit(1);
    });

    let api_key = resolve_or_prompt_gemini_key(&mut config);
    let model = resolve_model(&config);
    let options = prompt_options(&cli, &config);
    let simple = cli.simple || resolve_simple_output(&config).unwrap_or(false);

    let recommender = Recommender::new(api_key, model, options);

    match theme {
        Some(theme) => run_once(&recommender, &theme, simple).await,
        None if io::stdin().is_terminal() => run_session(&recommender).await,
        None => {
            eprintln!("{} no theme provided", style("Error:").red());
            std::process::exit(1);
        }
    }
}

fn gather_theme(cli: &Cli) -> Result<Option<String>, BeatlogError> {
    let joined = cli.theme.join(" ");
    if let Some(theme) = normalize_theme(&joined) {
        return Ok(Some(theme));
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|err| BeatlogError::InvalidInput(format!("failed to read stdin: {err}")))?;
        return Ok(first_theme_line(&buffer));
    }

    Ok(None)
}

fn first_theme_line(content: &str) -> Option<String> {
    content.lines().find_map(normalize_theme)
}

fn resolve_or_prompt_gemini_key(config: &mut BeatlogConfig) -> Option<String> {
    // Env var or an existing config file never triggers the first-run prompt
    if let Some(key) = resolve_gemini_key(config) {
        return Some(key);
    }
    if config_exists().unwrap_or(false) {
        return None;
    }

    let theme = ColorfulTheme::default();
    println!(
        "{} {}",
        style("First-time setup:").bold().cyan(),
        "Let's configure your beatlog settings"
    );

    let input: String = Input::with_theme(&theme)
        .with_prompt("Gemini API key (press Enter to skip)")
        .allow_empty(true)
        .interact_text()
        .unwrap_or_default();

    if !input.trim().is_empty() {
        config.api.gemini_key = Some(input);
    }

    // Always create config file on first run
    if let Err(err) = save_config(config) {
        eprintln!("{} {err}", style("Warning:").yellow());
    } else {
        println!(
            "{} Config file created at ~/.beatlog/config.toml",
            style("✓").green()
        );
    }

    config.api.gemini_key.clone()
}

fn prompt_options(cli: &Cli, config: &BeatlogConfig) -> PromptOptions {
    let mut options = PromptOptions::default();
    if let Some(count) = cli.count.or(config.playlist.song_count) {
        options.song_count = count;
    }
    if let Some(korean) = config.playlist.korean_count {
        options.korean_count = korean;
    }
    if cli.no_covers {
        options.cover_art = false;
    } else if let Some(cover_art) = config.playlist.cover_art {
        options.cover_art = cover_art;
    }
    options.template = config.playlist.prompt_template.clone();
    // A Korean quota larger than the playlist makes no sense
    options.korean_count = options.korean_count.min(options.song_count);
    options
}

fn handle_config_command(action: ConfigAction) -> BeatlogResult<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = load_config()?;
            let value = get_nested_config_value(&config, &key);
            match value {
                Some(v) => println!("{} = {}", key, v),
                None => println!("{} = <null>", key),
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            set_config_value(&key, &value)?;
            println!("{} Set {} = {}", style("✓").green(), key, value);
            Ok(())
        }
        ConfigAction::List => {
            let config = load_config()?;
            let defaults = PromptOptions::default();
            println!("Current configuration:");
            println!("\n[api]");
            println!(
                "gemini_key = {}",
                config.api.gemini_key.as_deref().unwrap_or("<null>")
            );
            println!("model = {}", config.api.model.as_deref().unwrap_or("<null>"));
            println!("\n[playlist]");
            println!(
                "song_count = {}",
                config.playlist.song_count.unwrap_or(defaults.song_count)
            );
            println!(
                "korean_count = {}",
                config.playlist.korean_count.unwrap_or(defaults.korean_count)
            );
            println!(
                "cover_art = {}",
                config.playlist.cover_art.unwrap_or(defaults.cover_art)
            );
            println!(
                "prompt_template = {}",
                config.playlist.prompt_template.as_deref().unwrap_or("<null>")
            );
            println!("\n[output]");
            println!("simple = {}", config.output.simple.unwrap_or(false));
            Ok(())
        }
        ConfigAction::Edit => {
            open_in_editor()?;
            Ok(())
        }
    }
}

fn get_nested_config_value(config: &BeatlogConfig, key_path: &str) -> Option<String> {
    let parts: Vec<&str> = key_path.split('.').collect();

    match parts.as_slice() {
        ["api", "gemini_key"] => config.api.gemini_key.clone(),
        ["api", "model"] => config.api.model.clone(),
        ["playlist", "song_count"] => config.playlist.song_count.map(|v| v.to_string()),
        ["playlist", "korean_count"] => config.playlist.korean_count.map(|v| v.to_string()),
        ["playlist", "cover_art"] => config.playlist.cover_art.map(|v| v.to_string()),
        ["playlist", "prompt_template"] => config.playlist.prompt_template.clone(),
        ["output", "simple"] => config.output.simple.map(|b| b.to_string()),
        _ => None,
    }
}

async fn run_once(recommender: &Recommender, theme: &str, simple: bool) {
    if !simple {
        println!(
            "{} {}",
            style("Curating your vibe...").bold().cyan(),
            style(theme).dim()
        );
        println!();
    }

    match recommender.recommend(theme).await {
        Ok(recommendation) => print_recommendation(theme, &recommendation, simple, None),
        Err(err) => {
            eprintln!("{} {theme}: {err}", style("Failed").red());
            std::process::exit(1);
        }
    }
}

enum SessionAction {
    Open(usize),
    Reshuffle,
    NewTheme,
    Quit,
}

async fn run_session(recommender: &Recommender) {
    let mut app = App::new();

    loop {
        clear_screen();
        print_banner();
        let Some(theme) = prompt_theme() else {
            return;
        };

        if let Some(ticket) = app.submit(&theme) {
            fetch(&mut app, recommender, ticket).await;
        }

        // Stay on the results/error screens until the user wants a new theme
        loop {
            let action = match app.screen() {
                Screen::Loaded {
                    theme,
                    playlist,
                    now_playing,
                } => {
                    clear_screen();
                    print_recommendation(theme, playlist, false, Some(*now_playing));
                    results_menu(playlist)
                }
                Screen::Error { message, .. } => {
                    println!();
                    println!("{}", style(message).red().bold());
                    error_menu()
                }
                Screen::Idle | Screen::Loading { .. } => break,
            };

            match action {
                SessionAction::Open(index) => {
                    if let Some(link) = app.select_track(index) {
                        let link = link.to_string();
                        if let Err(err) = open_link(&link) {
                            eprintln!(
                                "{} could not open a browser: {err}",
                                style("Warning:").yellow()
                            );
                            println!("{link}");
                            pause();
                        }
                    }
                }
                SessionAction::Reshuffle => {
                    if let Some(ticket) = app.refresh() {
                        fetch(&mut app, recommender, ticket).await;
                    }
                }
                SessionAction::NewTheme => {
                    app.reset();
                    break;
                }
                SessionAction::Quit => return,
            }
        }
    }
}

async fn fetch(app: &mut App, recommender: &Recommender, ticket: RequestTicket) {
    println!();
    println!(
        "{} {}",
        style("Curating your vibe...").bold().cyan(),
        style(ticket.theme()).dim()
    );

    let result = recommender.recommend(ticket.theme()).await;
    if let Err(err) = &result {
        eprintln!("{} {err}", style("Error:").red());
    }
    app.complete(ticket, result);
}

fn print_banner() {
    println!(
        "{} {}",
        style("Beat.log").bold().cyan().italic(),
        style("Music Discovery Engine").dim()
    );
    println!("{}", style("What's your soundtrack?").bold());
    println!();
}

fn prompt_theme() -> Option<String> {
    let theme = ColorfulTheme::default();

    let mut labels: Vec<String> = vec!["Type a theme".to_string()];
    labels.extend(SUGGESTED_THEMES.iter().map(|tag| format!("#{tag}")));
    labels.push("Quit".to_string());

    loop {
        let selection = Select::with_theme(&theme)
            .with_prompt("Pick a starting point")
            .items(&labels)
            .default(0)
            .interact()
            .ok()?;

        if selection == labels.len() - 1 {
            return None;
        }
        if selection > 0 {
            return Some(SUGGESTED_THEMES[selection - 1].to_string());
        }

        let input: String = Input::with_theme(&theme)
            .with_prompt("가수, 장르, 혹은 지금의 기분")
            .allow_empty(true)
            .interact_text()
            .ok()?;
        if let Some(theme) = normalize_theme(&input) {
            return Some(theme);
        }
        // Blank input falls back to the menu
    }
}

fn results_menu(playlist: &Recommendation) -> SessionAction {
    let mut labels: Vec<String> = playlist
        .songs
        .iter()
        .enumerate()
        .map(|(idx, song)| format!("{:02} {} - {}", idx + 1, song.artist, song.title))
        .collect();
    labels.push("Reshuffle".to_string());
    labels.push("New theme".to_string());
    labels.push("Quit".to_string());

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Play a track")
        .items(&labels)
        .default(0)
        .interact();

    let Ok(selection) = selection else {
        return SessionAction::Quit;
    };

    if selection < playlist.songs.len() {
        return SessionAction::Open(selection);
    }
    match selection - playlist.songs.len() {
        0 => SessionAction::Reshuffle,
        1 => SessionAction::NewTheme,
        _ => SessionAction::Quit,
    }
}

fn error_menu() -> SessionAction {
    let labels = ["Retry selection", "New theme", "Quit"];
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("What next?")
        .items(&labels)
        .default(0)
        .interact();

    match selection {
        Ok(0) => SessionAction::Reshuffle,
        Ok(1) => SessionAction::NewTheme,
        _ => SessionAction::Quit,
    }
}

fn print_recommendation(
    theme: &str,
    recommendation: &Recommendation,
    simple: bool,
    now_playing: Option<usize>,
) {
    if simple {
        for song in &recommendation.songs {
            println!("{}", song.youtube_link);
        }
        return;
    }

    println!("{} {}", style("Selection:").cyan(), style(theme).bold());
    println!(
        "{} \"{}\"",
        style("Commentary:").dim(),
        recommendation.daily_message
    );
    println!();

    for (idx, song) in recommendation.songs.iter().enumerate() {
        print_track(idx, song, now_playing == Some(idx));
    }
}

fn print_track(index: usize, song: &Track, playing: bool) {
    let marker = if playing { "▶" } else { " " };
    let badge = if song.is_korean {
        style("KOR").cyan()
    } else {
        style("INT").dim()
    };
    println!(
        "{} {} {} - {} [{}]",
        marker,
        style(format!("{:02}", index + 1)).bold(),
        song.artist,
        style(&song.title).bold(),
        badge
    );
    println!("     {}", style(&song.reason).dim());
    println!("     {}", style(&song.youtube_link).dim());
    if let Some(cover) = &song.cover_image_url {
        println!("     {}", style(cover).dim());
    }
    println!();
}

fn pause() {
    let _: Result<String, _> = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Press Enter to continue")
        .allow_empty(true)
        .interact_text();
}

fn clear_screen() {
    let _ = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0));
}

fn open_link(link: &str) -> io::Result<()> {
    let status = if cfg!(target_os = "macos") {
        Command::new("open").arg(link).status()?
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", "", link]).status()?
    } else {
        Command::new("xdg-open").arg(link).status()?
    };

    if !status.success() {
        return Err(io::Error::other(format!("opener exited with {status}")));
    }
    Ok(())
}
