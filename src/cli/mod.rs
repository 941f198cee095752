use crate::{
    clarifying_question, ChatMessage, Config, ExtractRequest, ParsedPreferences, RecommendRequest,
    TravelAssistant,
};
use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use futures::StreamExt;
use std::collections::HashMap;
use std::env;
use std::io::{self, BufRead, Write};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Most recent messages sent along with each request.
const HISTORY_LIMIT: usize = 8;

fn command() -> Command {
    Command::new("voyage")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Fact-grounded travel recommendations from a chat prompt")
        .arg(
            Arg::new("prompt")
                .help("What you're looking for; omit to start an interactive session")
                .index(1),
        )
        .arg(
            Arg::new("stream")
                .short('s')
                .long("stream")
                .action(ArgAction::SetTrue)
                .help("Stream markdown as the model writes it"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .conflicts_with("stream")
                .help("Print the structured response as JSON"),
        )
        .arg(
            Arg::new("tone")
                .long("tone")
                .value_name("TONE")
                .help("Phrasing style (surfer, friendly, formal, concise, enthusiastic, luxury, adventure, 90s-daria, hank-hill)"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("Chat model to use (or set OPENAI_MODEL)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("API key (or set OPENAI_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("OpenAI-compatible base URL (or set OPENAI_BASE_URL)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Request timeout in seconds (or set VOYAGE_TIMEOUT_SECS)"),
        )
        .arg(
            Arg::new("weather-api-base")
                .long("weather-api-base")
                .value_name("URL")
                .help("Open-Meteo compatible forecast URL (or set WEATHER_API_BASE)"),
        )
}

/// Environment lookups with command-line values taking precedence.
fn config_from(matches: &ArgMatches) -> crate::Result<Config> {
    let flags = [
        ("api-key", "OPENAI_API_KEY"),
        ("base-url", "OPENAI_BASE_URL"),
        ("model", "OPENAI_MODEL"),
        ("timeout", "VOYAGE_TIMEOUT_SECS"),
        ("weather-api-base", "WEATHER_API_BASE"),
        ("tone", "VOYAGE_TONE"),
    ];
    let overrides: HashMap<&str, String> = flags
        .iter()
        .filter_map(|(flag, key)| matches.get_one::<String>(flag).map(|v| (*key, v.clone())))
        .collect();

    Config::from_lookup(|key| overrides.get(key).cloned().or_else(|| env::var(key).ok()))
}

#[derive(Debug, Clone, Copy)]
enum Output {
    Markdown,
    Stream,
    Json,
}

/// Conversation state for one CLI session.
#[derive(Debug, Default)]
struct Session {
    history: Vec<ChatMessage>,
    preferences: Option<ParsedPreferences>,
}

impl Session {
    fn push(&mut self, message: ChatMessage) {
        self.history.push(message);
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }
}

async fn handle_turn(
    assistant: &TravelAssistant,
    config: &Config,
    session: &mut Session,
    text: &str,
    output: Output,
) -> crate::Result<()> {
    let extracted = assistant
        .extract(ExtractRequest {
            text: text.to_string(),
            history: session.history.clone(),
        })
        .await?
        .preferences;
    session.push(ChatMessage::user(text));

    // Follow-ups like "what about flights?" carry no new preferences.
    let preferences = match (extracted.is_empty(), session.preferences.take()) {
        (true, Some(previous)) => previous,
        _ => extracted,
    };
    session.preferences = Some(preferences.clone());

    if let Some(question) = clarifying_question(&preferences, config.min_missing_groups) {
        println!("{question}");
        session.push(ChatMessage::assistant(question));
        session.preferences = None;
        return Ok(());
    }

    let request = RecommendRequest {
        preferences,
        history: session.history.clone(),
        tone: None,
    };

    let reply = match output {
        Output::Stream => {
            let mut stream = assistant.recommend_stream(request).await?;
            let mut reply = String::new();
            let mut stdout = io::stdout();
            while let Some(fragment) = stream.next().await {
                print!("{fragment}");
                let _ = stdout.flush();
                reply.push_str(&fragment);
            }
            println!();
            reply
        }
        Output::Json => {
            let response = assistant.recommend(request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            response.markdown
        }
        Output::Markdown => {
            let response = assistant.recommend(request).await?;
            println!("{}", response.markdown);
            response.markdown
        }
    };

    session.push(ChatMessage::assistant(reply));
    Ok(())
}

fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// CLI entry point for the voyage tool
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let matches = command().get_matches();
    let config = config_from(&matches).context("failed to load configuration")?;
    let output = if matches.get_flag("stream") {
        Output::Stream
    } else if matches.get_flag("json") {
        Output::Json
    } else {
        Output::Markdown
    };

    let assistant = TravelAssistant::from_config(&config);
    info!(
        model = %config.model,
        base_url = %config.base_url,
        tone = %config.tone,
        live_weather = assistant.facts().has_weather_source(),
        "voyage ready"
    );

    let mut session = Session::default();

    if let Some(prompt) = matches.get_one::<String>("prompt") {
        if let Err(e) = handle_turn(&assistant, &config, &mut session, prompt, output).await {
            error!(code = e.error_code(), "request failed: {}", e);
            return Err(e).context("recommendation request failed");
        }
        return Ok(());
    }

    println!("Where to? (empty line or Ctrl-D to quit)");
    while let Some(line) = read_line("> ")? {
        if line.is_empty() {
            break;
        }
        if let Err(e) = handle_turn(&assistant, &config, &mut session, &line, output).await {
            error!(code = e.error_code(), "request failed: {}", e);
            eprintln!("{}", serde_json::to_string_pretty(&e.to_error_payload())?);
        }
    }

    Ok(())
}
