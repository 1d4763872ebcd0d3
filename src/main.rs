use broadside::{init_logging, server};

use clap::Parser;
use log::info;
use tokio::net::TcpListener;

/// Authoritative server for two-player networked Battleship.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:3000")]
    bind: String,

    /// Voice recognizer command launched per player (program plus args);
    /// the player number is appended as the final argument.
    #[arg(long, value_delimiter = ' ', num_args = 1.., default_value = "python3 voice_commands.py")]
    voice_cmd: Vec<String>,

    /// Run without voice recognizer subprocesses.
    #[arg(long)]
    no_voice: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let listener = TcpListener::bind(&cli.bind).await?;
    info!("server listening on {}", listener.local_addr()?);

    let voice_command = if cli.no_voice {
        None
    } else {
        Some(cli.voice_cmd)
    };
    server::run(listener, voice_command).await
}
