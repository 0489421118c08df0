//! CLI entry point for guidebook

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "guidebook")]
#[command(version)]
#[command(about = "A static site generator for ordered Markdown guides", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new guidebook site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new guide with the next free order key
    New {
        /// Title of the new guide
        title: String,

        /// Create the guide as a draft
        #[arg(long)]
        draft: bool,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,

        /// Regenerate everything, ignoring the cache
        #[arg(short, long)]
        force: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Clean the public folder and cache
    Clean,

    /// List site content
    List {
        /// Type of content to list (guide, page)
        #[arg(default_value = "guide")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "guidebook=debug,info"
    } else {
        "guidebook=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = cli.cwd.unwrap_or_else(|| {
        std::env::current_dir().expect("cannot determine current directory")
    });

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing guidebook site in {:?}", target_dir);
            guidebook::commands::init::init_site(&target_dir)?;
            println!("Initialized empty guidebook site in {:?}", target_dir);
        }

        Commands::New { title, draft } => {
            let site = guidebook::Guidebook::new(&base_dir)?;
            tracing::info!("Creating new guide: {}", title);
            guidebook::commands::new::run(&site, &title, draft)?;
        }

        Commands::Generate { watch, force } => {
            let site = guidebook::Guidebook::new(&base_dir)?;
            tracing::info!("Generating static files...");

            guidebook::commands::generate::run_with_options(&site, force)?;
            println!("Generated successfully!");

            if watch {
                tracing::info!("Watching for file changes...");
                guidebook::commands::generate::watch(&site).await?;
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let site = guidebook::Guidebook::new(&base_dir)?;

            // Generate first
            tracing::info!("Generating static files...");
            site.generate()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            guidebook::server::start(&site, &ip, port, !r#static, open).await?;
        }

        Commands::Clean => {
            let site = guidebook::Guidebook::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = guidebook::Guidebook::new(&base_dir)?;
            guidebook::commands::list::run(&site, &r#type)?;
        }

        Commands::Version => {
            println!("guidebook version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
