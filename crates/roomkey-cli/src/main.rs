use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::CredentialArgs;
use commands::token::MintArgs;

#[derive(Parser, Debug)]
#[command(name = "roomkey", version, about = "Room access tokens for real-time media rooms")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP token service
    Serve {
        /// Configuration file (defaults to ROOMKEY_CONFIG, then roomkey.yaml)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Override the listen port
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Mint, verify and inspect participant tokens
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },

    /// API key management
    Keys {
        #[command(subcommand)]
        cmd: KeysCommand,
    },

    /// Room management on the platform
    Room {
        #[command(subcommand)]
        cmd: RoomCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Mint a participant token
    Mint(MintArgs),

    /// Verify a token's signature and lifetime, then print its claims
    Verify {
        #[command(flatten)]
        credentials: CredentialArgs,

        /// Seconds of clock skew tolerated on not-before/expiry
        #[arg(long, default_value_t = 0)]
        leeway: u64,

        /// The token, or a file containing it
        token: String,
    },

    /// Decode a token without verifying it
    Inspect {
        /// The token, or a file containing it
        token: String,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate a random API key and secret
    Generate {
        /// Write `LIVEKIT_API_KEY=`/`LIVEKIT_API_SECRET=` lines to this file
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum RoomCommand {
    /// Delete a room, disconnecting everyone in it
    Delete {
        #[command(flatten)]
        credentials: CredentialArgs,

        /// Platform URL (ws://, wss:// or http(s)://)
        #[arg(long, env = "LIVEKIT_URL")]
        url: Option<String>,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,

        room: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // `serve` installs its own subscriber from configuration.
    if !matches!(cli.cmd, Command::Serve { .. }) {
        tracing_subscriber::fmt()
            .with_env_filter("warn")
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.cmd {
        Command::Serve { config, port } => commands::serve::serve(config, port).await?,

        Command::Token { cmd } => match cmd {
            TokenCommand::Mint(args) => commands::token::mint(args)?,
            TokenCommand::Verify {
                credentials,
                leeway,
                token,
            } => commands::token::verify(credentials, token, leeway)?,
            TokenCommand::Inspect { token } => commands::token::inspect(token)?,
        },

        Command::Keys { cmd } => match cmd {
            KeysCommand::Generate { output } => commands::keys::generate(output)?,
        },

        Command::Room { cmd } => match cmd {
            RoomCommand::Delete {
                credentials,
                url,
                timeout,
                room,
            } => commands::room::delete(credentials, url, room, timeout).await?,
        },
    }

    Ok(())
}
