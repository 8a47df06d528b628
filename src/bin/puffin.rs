//! CLI glue around the [`puffin`] crate: inspect an existing Puffin file's
//! footer, or assemble one from blob files on disk. Not part of the core
//! codec, just a thin wrapper for humans and scripts.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use puffin::error::Result;
use puffin::io::FileIO;
use puffin::puffin::{Blob, CompressionCodec, Puffin};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

#[derive(Parser)]
#[command(name = "puffin", about = "Inspect and build Puffin sidecar files")]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the footer metadata of a Puffin file.
    Inspect { path: PathBuf },
    /// Assemble a Puffin file from one or more blob payload files.
    Create {
        path: PathBuf,
        /// `path:type:field1,field2:snapshot_id:sequence_number`, repeatable.
        #[arg(long = "blob", value_name = "SPEC")]
        blobs: Vec<String>,
        #[arg(long)]
        created_by: Option<String>,
        #[arg(long)]
        compress_footer: bool,
        #[arg(long, value_enum)]
        compress_blobs: Option<CliCodec>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CliCodec {
    Lz4,
    Zstd,
}

impl From<CliCodec> for CompressionCodec {
    fn from(value: CliCodec) -> Self {
        match value {
            CliCodec::Lz4 => CompressionCodec::Lz4,
            CliCodec::Zstd => CompressionCodec::Zstd,
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Inspect { path } => inspect(path),
        Command::Create {
            path,
            blobs,
            created_by,
            compress_footer,
            compress_blobs,
        } => create(path, blobs, created_by, compress_footer, compress_blobs),
    }
}

fn inspect(path: PathBuf) -> Result<()> {
    let file_io = FileIO::local();
    let input = file_io.new_input(path.to_string_lossy())?;
    let reader = Puffin::read(input).build()?;
    let metadata = reader.file_metadata()?;

    tracing::info!(blob_count = metadata.blobs.len(), "parsed puffin footer");
    for blob in &metadata.blobs {
        println!(
            "type={} fields={:?} snapshot-id={} sequence-number={} offset={} length={} codec={:?}",
            blob.r#type,
            blob.fields,
            blob.snapshot_id,
            blob.sequence_number,
            blob.offset,
            blob.length,
            blob.compression_codec
        );
    }
    for (key, value) in &metadata.properties {
        println!("property {key}={value}");
    }
    Ok(())
}

fn create(
    path: PathBuf,
    blob_specs: Vec<String>,
    created_by: Option<String>,
    compress_footer: bool,
    compress_blobs: Option<CliCodec>,
) -> Result<()> {
    let file_io = FileIO::local();
    let output = file_io.new_output(path.to_string_lossy())?;

    let mut builder = Puffin::write(output);
    if let Some(id) = created_by {
        builder = builder.created_by(id);
    }
    if compress_footer {
        builder = builder.compress_footer();
    }
    if let Some(codec) = compress_blobs {
        builder = builder.compress_blobs(codec.into());
    }
    let mut writer = builder.build()?;

    for spec in blob_specs {
        let blob = parse_blob_spec(&spec)?;
        writer.write_blob(blob)?;
    }
    writer.close()?;
    tracing::info!(footer_size = writer.footer_size()?, "wrote puffin file");
    Ok(())
}

fn parse_blob_spec(spec: &str) -> Result<Blob> {
    use puffin::error::{Error, ErrorKind};

    let parts: Vec<&str> = spec.splitn(5, ':').collect();
    let [path, blob_type, fields, snapshot_id, sequence_number] = parts.as_slice() else {
        return Err(Error::new(
            ErrorKind::InvalidArgument,
            "blob spec must be path:type:fields:snapshot_id:sequence_number",
        ));
    };

    let data = std::fs::read(path).map_err(Error::from)?;
    let input_fields = if fields.is_empty() {
        Vec::new()
    } else {
        fields
            .split(',')
            .map(|f| {
                f.parse::<i64>()
                    .map_err(|e| Error::new(ErrorKind::InvalidArgument, e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?
    };
    let snapshot_id = snapshot_id
        .parse::<i64>()
        .map_err(|e| Error::new(ErrorKind::InvalidArgument, e.to_string()))?;
    let sequence_number = sequence_number
        .parse::<i64>()
        .map_err(|e| Error::new(ErrorKind::InvalidArgument, e.to_string()))?;

    Blob::builder(*blob_type, data)
        .input_fields(input_fields)
        .snapshot_id(snapshot_id)
        .sequence_number(sequence_number)
        .build()
}
