use interview_assist::cli;
use interview_assist::config::{AppConfig, SourceBackend};
use interview_assist::keystore::Keystore;
use interview_assist::session::InterviewSession;
use interview_assist::sources::create_sources;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut config = AppConfig::from_env()?;

    // The Gemini variant needs a key: env var wins, then the keystore,
    // then a one-time interactive prompt persisted for next launch.
    let keystore = Keystore::new(Keystore::default_path());
    if config.source == SourceBackend::Gemini && config.gemini_api_key.is_none() {
        config.gemini_api_key = keystore.load().await?;
    }
    if config.source == SourceBackend::Gemini && config.gemini_api_key.is_none() {
        eprint!("Gemini API key> ");
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        let key = input.trim();
        if key.is_empty() {
            eprintln!("Error: the gemini source needs an API key");
            eprintln!("  export GEMINI_API_KEY=... (or enter one when prompted)");
            std::process::exit(1);
        }
        keystore.store(key).await?;
        config.gemini_api_key = Some(secrecy::SecretString::from(key.to_string()));
    }

    eprintln!("🎤 Interview Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Source: {}", config.source);
    if config.source == SourceBackend::Backend {
        eprintln!("   Backend: {}", config.backend_url);
    }
    eprintln!();

    let sources = create_sources(&config);
    let session = InterviewSession::new(sources.clone(), config.max_questions);

    cli::run(session, &sources, &config).await?;

    eprintln!("Good luck out there.");
    Ok(())
}
