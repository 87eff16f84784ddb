use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod feed;
mod freeze;
mod paginate;
mod posts;
mod render;
mod server;
mod structured;

#[derive(Parser)]
#[command(name = "quill", version, about = "A personal blog engine", long_about = None)]
struct Args {
    /// The command to execute
    #[command(subcommand)]
    command: QuillCommand,
}

#[derive(Parser)]
struct ServeArgs {
    /// The address to bind to
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    /// The port to bind to
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// The path to the configuration file
    #[arg(short, long, default_value = "blog.ini")]
    config_file: PathBuf,
}

#[derive(Parser)]
struct BuildArgs {
    /// The path to the configuration file
    #[arg(short, long, default_value = "blog.ini")]
    config_file: PathBuf,
}

#[derive(Parser)]
struct RunStaticArgs {
    /// The address to bind to
    #[arg(default_value = "0.0.0.0")]
    host: String,

    /// The port to bind to
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// The path to the configuration file
    #[arg(short, long, default_value = "blog.ini")]
    config_file: PathBuf,
}

#[derive(Subcommand)]
enum QuillCommand {
    /// Serve the blog dynamically
    Serve(ServeArgs),

    /// Freeze the blog into static HTML
    Build(BuildArgs),

    /// Serve a previously built static blog
    RunStatic(RunStaticArgs),
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    match args.command {
        QuillCommand::Serve(args) => {
            commands::serve::run(&args).await?;
        }
        QuillCommand::Build(args) => {
            commands::build::run(&args)?;
        }
        QuillCommand::RunStatic(args) => {
            commands::run_static::run(&args).await?;
        }
    }

    Ok(())
}
