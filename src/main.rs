// MEDIVOX Main Entry Point
// Copyright (c) 2026 Xing_The_Creator | MEDIVOX

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use medivox_core::config::{Config, DEFAULT_PORT};
use medivox_core::doctor::Doctor;
use medivox_core::server;
use medivox_core::state::ClinicState;

#[derive(Parser)]
#[command(name = "medivox-core")]
#[command(about = "MEDIVOX Voice & Vision Clinic", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the clinic web dashboard
    Serve {
        /// Preferred port; nearby ports are scanned when busy
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },

    /// Run a single consultation from the terminal
    Consult {
        /// Recorded symptom description (wav/mp3/m4a)
        #[arg(short, long)]
        audio: PathBuf,

        /// Medical image to analyze
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Archive the response text and audio
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Default log level, unless explicitly overridden by the user.
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,hyper=warn,reqwest=warn");
    }
    tracing_subscriber::fmt::init();

    let args = Cli::parse();

    info!("--- MEDIVOX CLINIC v0.1.0 ---");

    let config = Config::from_env()?;
    config.ensure_dirs()?;

    match args.command {
        Commands::Serve { port } => {
            let doctor = Doctor::from_config(&config);
            let state = Arc::new(ClinicState::new(doctor, config));
            server::start_server(port, state).await?;
        }

        Commands::Consult { audio, image, save } => {
            let doctor = Doctor::from_config(&config);
            match doctor.consult(&audio, image.as_deref(), save).await {
                Ok(consultation) => {
                    println!("Patient: {}", consultation.transcript);
                    println!("Doctor:  {}", consultation.doctor_text);
                    println!("Audio:   {}", consultation.audio_path.display());
                }
                Err(e) => {
                    error!("[PIPELINE] Consultation failed ({}): {}", e.kind(), e);
                    println!("{}", e.user_message());
                }
            }
        }
    }

    Ok(())
}
