//! dbchat CLI: ask questions about a database over a chat endpoint

mod logging;
mod output;

use clap::{Parser, Subcommand};
use dbchat_engine::{
    render_message, ChatClient, Config, ConversationView, Effect, ViewEvent, DEFAULT_CONFIG_PATH,
};
use std::path::{Path, PathBuf};

/// Chat with a database through a natural-language endpoint
#[derive(Parser)]
#[command(name = "dbchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Chat endpoint URL, overriding the config file
    #[arg(long, global = true, env = "DBCHAT_ENDPOINT")]
    endpoint: Option<String>,

    /// Append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Ask a single question and print the reply
    Ask {
        /// The question
        question: String,

        /// Print the reply content as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default config file
    Init,
}

fn main() {
    let cli = Cli::parse();

    // The TUI owns the terminal, so it only logs to a file
    let to_stderr = matches!(cli.command, Some(Commands::Ask { .. }));
    if let Err(e) = logging::init_tracing(cli.log_file.as_deref(), to_stderr) {
        eprintln!("Failed to open log file: {e}");
        std::process::exit(1);
    }

    match cli.command {
        None | Some(Commands::Tui) => {
            let config = load_config(&cli.config, cli.endpoint);
            let rt = build_runtime();
            if let Err(e) = rt.block_on(dbchat_tui::run_tui(config)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Ask { question, json }) => {
            let config = load_config(&cli.config, cli.endpoint);
            cmd_ask(&config, question, json);
        }
        Some(Commands::Init) => {
            cmd_init(&cli.config);
        }
    }
}

fn load_config(path: &Path, endpoint: Option<String>) -> Config {
    let config = match Config::load_or_default(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", path.display());
            std::process::exit(1);
        }
    };
    match endpoint {
        Some(endpoint) => config.with_endpoint(endpoint),
        None => config,
    }
}

fn build_runtime() -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_ask(config: &Config, question: String, json: bool) {
    let client = ChatClient::from_config(config);
    let view = ConversationView::new(config.greeting.clone());

    let (view, effect) = view.update(ViewEvent::Submit { draft: question });
    let Some(Effect::Send(request)) = effect else {
        eprintln!("Nothing to ask: the question is empty");
        std::process::exit(1);
    };

    let rt = build_runtime();
    let outcome = rt.block_on(client.send(&request));
    let (view, _) = view.update(ViewEvent::ReplyReceived {
        request_id: request.request_id,
        outcome,
    });

    let Some(reply) = view.conversation().last() else {
        std::process::exit(1);
    };

    if json {
        match serde_json::to_string_pretty(&reply.content) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Failed to serialize reply: {e}");
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", output::render_plain(&render_message(reply)));
    }

    if reply.content.is_error() {
        std::process::exit(1);
    }
}

fn cmd_init(config_path: &Path) {
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return;
    }

    match Config::default().save(config_path) {
        Ok(()) => println!("Created {}", config_path.display()),
        Err(e) => {
            eprintln!("Failed to write config: {e}");
            std::process::exit(1);
        }
    }
}
