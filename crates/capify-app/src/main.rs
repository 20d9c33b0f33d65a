//! capify application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Read the bot credential (fatal if missing)
//! 4. Build the chat orchestrator
//! 5. Run the console transport until stdin closes or Ctrl-C

mod cli;
mod console;

use std::collections::BTreeMap;
use std::sync::Arc;

use capify_chat::ChatOrchestrator;
use capify_core::config::CapifyConfig;
use capify_core::UserId;
use clap::Parser;

use crate::cli::CliArgs;
use crate::console::ConsoleTransport;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing exists so its log level can apply.
    let config_file = args.resolve_config_path();
    let (config, config_error) = match CapifyConfig::load(&config_file) {
        Ok(config) => (config, None),
        Err(e) => (CapifyConfig::default(), Some(e)),
    };

    // Tracing.
    let level = args.resolve_log_level(Some(&config.general.log_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting capify v{}", env!("CARGO_PKG_VERSION"));
    match config_error {
        None => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Some(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config, using defaults"
        ),
    }

    // Credential.
    let credential = match config.bot.credential() {
        Ok(credential) => credential,
        Err(e) => {
            tracing::error!(error = %e, "Cannot start without a bot credential");
            return Err(e.into());
        }
    };
    // The console transport does not authenticate; the credential is only
    // required so a misconfigured deployment fails before serving anyone.
    tracing::info!(
        var = %config.bot.token_env,
        token_len = credential.expose().len(),
        "Bot credential present"
    );

    // Chat engine.
    let orchestrator = Arc::new(ChatOrchestrator::new(&config)?);
    tracing::info!(
        categories = orchestrator.classifier().taxonomy().categories().len(),
        "Chat orchestrator ready"
    );

    // Console transport.
    let transport = ConsoleTransport::new(
        Arc::clone(&orchestrator),
        UserId::new(args.user.clone()),
        args.name.clone(),
    );
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = transport.run(stdin, stdout) => {
            let handled = result?;
            tracing::info!(
                handled,
                sessions = orchestrator.sessions().len(),
                "Console session finished"
            );
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, shutting down");
        }
    }

    if args.dump_sessions {
        let sessions = orchestrator.sessions().all();
        let by_user: BTreeMap<&str, _> = sessions
            .iter()
            .map(|(user, draft)| (user.as_str(), draft))
            .collect();
        println!("{}", serde_json::to_string_pretty(&by_user)?);
    }

    Ok(())
}
