use clap::{Parser, Subcommand};
use sonofile_core::{wav, Decoder, Encoder};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sonofile")]
#[command(about = "Send files as sound: encode any file to an audible WAV and back")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a file into an audible WAV
    Encode {
        /// File to transmit
        #[arg(value_name = "INPUT_FILE")]
        input: PathBuf,

        /// WAV file to write
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,
    },

    /// Decode a WAV back into the original file
    Decode {
        /// WAV file to decode
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Directory to place the recovered file in
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    let result = match cli.command {
        Commands::Encode { input, output } => encode_command(&input, &output),
        Commands::Decode { input, output_dir } => decode_command(&input, &output_dir),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn encode_command(input: &Path, output: &Path) -> Result<(), Box<dyn Error>> {
    let payload = fs::read(input)?;
    info!("read {} bytes from {}", payload.len(), input.display());

    let file_name = input
        .file_name()
        .ok_or_else(|| format!("input path has no file name: {}", input.display()))?
        .to_string_lossy()
        .into_owned();

    let encoder = Encoder::new();
    let samples = encoder.encode(file_name.as_bytes(), &payload)?;

    wav::write_wav_file(output, &samples)?;
    info!("wrote {} samples to {}", samples.len(), output.display());
    Ok(())
}

fn decode_command(input: &Path, output_dir: &Path) -> Result<(), Box<dyn Error>> {
    let samples = wav::read_wav_file(input)?;
    info!("read {} samples from {}", samples.len(), input.display());

    let decoder = Decoder::new();
    let decoded = decoder.decode(&samples)?;
    if !decoded.crc_ok {
        warn!("checksum mismatch: writing possibly corrupt data for inspection");
    }

    let name = String::from_utf8_lossy(&decoded.file_name).into_owned();
    let base = base_name(&name);
    if base.is_empty() {
        return Err(format!("packet carries an unusable file name: {name:?}").into());
    }

    let output_path = output_dir.join(base);
    fs::write(&output_path, &decoded.payload)?;
    info!(
        "wrote {} bytes to {}",
        decoded.payload.len(),
        output_path.display()
    );
    Ok(())
}

/// Final path component of a transmitted name. The encoder only frames base
/// names, but a hostile or corrupt packet must not escape the output
/// directory.
fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}
