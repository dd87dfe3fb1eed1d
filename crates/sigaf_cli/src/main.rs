//! sigaf CLI for generating signals, distorting them and encoding them as GAF images.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sigaf::pipeline::{Pipeline, PipelineConfig, PipelineOutput};
use sigaf::prelude::*;
use sigaf::transforms::{
    AddDiscontinuityConfig, AddNoiseConfig, AddSuddenChangeConfig, AddTrendConfig,
};

#[derive(Parser)]
#[command(name = "sigaf")]
#[command(author, version)]
#[command(about = "Generate synthetic signals, apply distortions and encode them as Gramian Angular Fields")]
#[command(long_about = "sigaf: synthetic time series and Gramian Angular Field images.

EXAMPLES:
  # 5 s of a 1 Hz sine at 100 Hz, both GAF images, summary only
  sigaf generate

  # Noisy square wave with a linear trend, saved as JSON
  sigaf generate --waveform square --frequency 2 --snr-db 15 --trend linear -o out.json

  # Binomial noise with a jump of 3 at t = 2 s, difference field only
  sigaf generate --waveform random --distribution binomial --break-time 2 --jump 3 --method difference

  # Write a default pipeline config, edit it, then run it
  sigaf config -o pipeline.json
  sigaf run --config pipeline.json -o out.json

WAVEFORMS:
  sine, square, triangle  - periodic, use --frequency
  random                  - i.i.d. noise, use --distribution (normal, uniform, binomial)")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a pipeline from flags and run it
    Generate {
        #[command(flatten)]
        synth: SynthArgs,

        #[command(flatten)]
        effects: EffectArgs,

        #[command(flatten)]
        encode: EncodeArgs,

        /// Random seed for reproducibility (drawn from entropy if omitted)
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,

        /// Write the signal and fields as JSON to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Run a pipeline described by a JSON config file
    Run {
        /// Pipeline config file
        #[arg(long, value_name = "FILE")]
        config: PathBuf,

        /// Override the seed stored in the config
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,

        /// Write the signal and fields as JSON to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print or save the default pipeline config
    Config {
        /// Save to this file instead of printing
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct SynthArgs {
    /// Waveform: sine, square, triangle, random
    #[arg(long, default_value = "sine", value_name = "NAME")]
    waveform: String,

    /// Frequency in Hz (periodic waveforms)
    #[arg(long, default_value = "1.0", value_name = "HZ")]
    frequency: f64,

    /// Noise law for the random waveform: normal, uniform, binomial
    #[arg(long, default_value = "normal", value_name = "NAME")]
    distribution: NoiseDistribution,

    /// Constant added to every sample
    #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
    offset: f64,

    /// Waveform amplitude
    #[arg(long, default_value = "1.0", allow_negative_numbers = true)]
    amplitude: f64,

    /// Sampling rate in Hz
    #[arg(long, default_value = "100.0", value_name = "HZ")]
    fs: f64,

    /// Duration in seconds
    #[arg(long, default_value = "5.0", value_name = "SECONDS")]
    duration: f64,
}

/// Effects are applied in the order listed here.
#[derive(clap::Args)]
struct EffectArgs {
    /// Add Gaussian noise at this SNR (dB)
    #[arg(long, value_name = "DB", allow_negative_numbers = true)]
    snr_db: Option<f64>,

    /// Add a trend: linear or quadratic
    #[arg(long, value_name = "KIND")]
    trend: Option<TrendKind>,

    /// Time (s) of an additive jump; requires --jump
    #[arg(long, value_name = "SECONDS", requires = "jump", allow_negative_numbers = true)]
    break_time: Option<f64>,

    /// Size of the jump
    #[arg(long, requires = "break_time", allow_negative_numbers = true)]
    jump: Option<f64>,

    /// Time (s) of a sudden amplitude change; requires --new-amplitude
    #[arg(long, value_name = "SECONDS", requires = "new_amplitude", allow_negative_numbers = true)]
    change_time: Option<f64>,

    /// Peak amplitude after the change
    #[arg(long, requires = "change_time", allow_negative_numbers = true)]
    new_amplitude: Option<f64>,
}

#[derive(clap::Args)]
struct EncodeArgs {
    /// GAF method: summation or difference (both if omitted)
    #[arg(long, value_name = "METHOD")]
    method: Option<GAFType>,

    /// Reduce the series to this many points before encoding
    #[arg(long, value_name = "N")]
    image_size: Option<usize>,

    /// Fail on constant signals instead of mapping them to the range floor
    #[arg(long, default_value = "false")]
    reject_constant: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::filter::LevelFilter::from_level(log_level))
        .init();

    match cli.command {
        Commands::Generate {
            synth,
            effects,
            encode,
            seed,
            output,
        } => {
            let config = build_config(synth, effects, encode, seed)?;
            handle_run(config, output)
        }
        Commands::Run {
            config,
            seed,
            output,
        } => {
            let mut pipeline_config = PipelineConfig::from_json_file(&config)
                .with_context(|| format!("Failed to load config from {}", config.display()))?;
            if seed.is_some() {
                pipeline_config.seed = seed;
            }
            handle_run(pipeline_config, output)
        }
        Commands::Config { output } => handle_config(output),
    }
}

fn build_config(
    synth: SynthArgs,
    effects: EffectArgs,
    encode: EncodeArgs,
    seed: Option<u64>,
) -> Result<PipelineConfig> {
    let waveform = Waveform::from_name(&synth.waveform, synth.frequency, synth.distribution)?;

    let mut augmentations = Vec::new();
    if let Some(snr_db) = effects.snr_db {
        augmentations.push(AugmentationConfig::Noise(AddNoiseConfig { snr_db }));
    }
    if let Some(kind) = effects.trend {
        augmentations.push(AugmentationConfig::Trend(AddTrendConfig { kind }));
    }
    if let (Some(break_time), Some(jump)) = (effects.break_time, effects.jump) {
        augmentations.push(AugmentationConfig::Discontinuity(AddDiscontinuityConfig {
            break_time,
            jump,
        }));
    }
    if let (Some(change_time), Some(new_amplitude)) = (effects.change_time, effects.new_amplitude) {
        augmentations.push(AugmentationConfig::SuddenChange(AddSuddenChangeConfig {
            change_time,
            new_amplitude,
        }));
    }

    let methods = match encode.method {
        Some(method) => vec![method],
        None => GAFType::ALL.to_vec(),
    };
    let degenerate = if encode.reject_constant {
        DegeneratePolicy::Reject
    } else {
        DegeneratePolicy::LowerBound
    };
    let encoders = methods
        .into_iter()
        .map(|gaf_type| GAFConfig {
            gaf_type,
            image_size: encode.image_size,
            degenerate,
        })
        .collect();

    Ok(PipelineConfig {
        seed,
        synth: SynthConfig {
            waveform,
            offset: synth.offset,
            amplitude: synth.amplitude,
            fs: synth.fs,
            duration: synth.duration,
        },
        augmentations,
        encoders,
    })
}

fn handle_run(config: PipelineConfig, output: Option<PathBuf>) -> Result<()> {
    if config.encoders.is_empty() {
        bail!("No encoders configured; add at least one entry to `encoders`");
    }

    let pipeline = Pipeline::new(config);
    let result = pipeline.run().context("Pipeline failed")?;

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, &result).context("Failed to serialize output")?;
            writer.flush()?;
            tracing::info!("Output written to {}", path.display());
            print_summary(&result);
            println!("\nSaved to: {}", path.display());
        }
        None => print_summary(&result),
    }

    Ok(())
}

fn handle_config(output: Option<PathBuf>) -> Result<()> {
    let config = PipelineConfig {
        seed: Some(42),
        ..Default::default()
    };

    match output {
        Some(path) => {
            config
                .save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Default config written to {}", path.display());
        }
        None => println!("{}", config.to_json_string()?),
    }

    Ok(())
}

fn print_summary(result: &PipelineOutput) {
    let signal = &result.signal;

    println!("Signal");
    println!("─────────────────────────────────────────");
    println!("  Seed:       {}", result.seed.value());
    println!("  Samples:    {}", signal.len());
    println!("  Duration:   {:.4} s", signal.duration());
    println!("  Min / Max:  {:.4} / {:.4}", signal.min(), signal.max());
    println!("  Mean:       {:.4}", signal.mean());
    println!("  Variance:   {:.4}", signal.variance());

    println!("\nGramian Angular Fields");
    println!("─────────────────────────────────────────");
    for field in &result.fields {
        let values = field.as_array();
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        println!(
            "  {:<12} {}x{}  range [{:.4}, {:.4}]",
            field.gaf_type().as_str(),
            field.size(),
            field.size(),
            lo,
            hi
        );
    }
}
