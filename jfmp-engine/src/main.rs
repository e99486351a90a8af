//! jfmp-negotiate - offline playback negotiation
//!
//! Loads a device profile and reports which format the engine would decode
//! for a given stream and which decoders it would try, in order. Exits with a
//! failure status when no decoder is available.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jfmp_common::config::{LoggingConfig, TomlConfig};
use jfmp_common::StaticPolicyStore;
use jfmp_engine::oracle::DeviceProfileOracle;
use jfmp_engine::spatial::NullEffectFactory;
use jfmp_engine::{EngineDeps, EngineSettings, Error, PlaybackEngine, PlaybackPlan, PlaybackRequest};

/// Command-line arguments for jfmp-negotiate
#[derive(Parser, Debug)]
#[command(name = "jfmp-negotiate")]
#[command(about = "Reproduce playback format and decoder negotiation for a device profile")]
#[command(version)]
struct Args {
    /// Device profile (TOML) describing display, decoders and audio route
    #[arg(short, long)]
    profile: PathBuf,

    /// Configuration file with playback policy
    #[arg(short, long, env = "JFMP_CONFIG")]
    config: Option<PathBuf>,

    /// Content mime type (defaults to H.264)
    #[arg(short, long)]
    mime: Option<String>,

    /// Codec string, e.g. "dvhe.05.06" or "hvc1.2.4.L153"
    #[arg(long)]
    codec: Option<String>,

    /// Color info, e.g. "smpte2084" or "arib-std-b67"
    #[arg(long)]
    color: Option<String>,

    /// Require a secure (DRM) decoder
    #[arg(long)]
    secure: bool,

    /// Require a tunneling decoder
    #[arg(long)]
    tunneling: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    plan: Option<&'a PlaybackPlan>,
    hardware_decoder_available: bool,
    error: Option<String>,
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let file_layer = match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = file_layer
        .is_none()
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

fn print_plan(plan: &PlaybackPlan, hardware_available: bool) {
    let resolution = &plan.resolution;
    println!("Requested: {}", resolution.requested.describe());
    println!(
        "Effective: {}{}",
        resolution.effective.describe(),
        if resolution.downgraded { " (downgraded)" } else { "" }
    );
    println!("Decoders:");
    for (i, decoder) in plan.decoders.iter().enumerate() {
        println!(
            "  {}. {}{}",
            i + 1,
            decoder.name,
            if decoder.is_hardware_accelerated { " [hw]" } else { "" }
        );
    }
    println!(
        "Hardware decoder for {}: {}",
        resolution.effective.mime_type,
        if hardware_available { "yes" } else { "no" }
    );
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    init_logging(&config.logging)?;

    let oracle = Arc::new(
        DeviceProfileOracle::from_file(&args.profile)
            .with_context(|| format!("Failed to load device profile {}", args.profile.display()))?,
    );
    info!("Policy: {:?}", config.policy);

    let deps = EngineDeps::new(
        oracle,
        Arc::new(NullEffectFactory),
        Arc::new(StaticPolicyStore::new(config.policy.clone())),
    )
    .with_settings(EngineSettings::from(&config));
    let engine = PlaybackEngine::new(deps);

    let request = PlaybackRequest {
        mime_type: args.mime.clone(),
        codec: args.codec.clone(),
        color_info: args.color.clone(),
        requires_secure_decoder: args.secure,
        requires_tunneling_decoder: args.tunneling,
    };

    let outcome = engine.prepare_playback(&request);
    let effective_mime = match &outcome {
        Ok(plan) => plan.resolution.effective_mime_type().to_string(),
        Err(Error::NoDecoderAvailable { mime_type }) => mime_type.clone(),
        Err(_) => String::new(),
    };
    let hardware_available =
        !effective_mime.is_empty() && engine.has_hardware_decoder(&effective_mime);

    if args.json {
        let report = Report {
            plan: outcome.as_ref().ok(),
            hardware_decoder_available: hardware_available,
            error: outcome.as_ref().err().map(|e| e.to_string()),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else if let Ok(plan) = &outcome {
        print_plan(plan, hardware_available);
    }

    match outcome {
        Ok(_) => Ok(()),
        Err(Error::NoDecoderAvailable { mime_type }) => {
            bail!("No decoder available for {}", mime_type)
        }
        Err(e) => Err(e).context("Negotiation failed"),
    }
}
