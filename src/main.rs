// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use the_codepack::config::load_registry;
use the_codepack::data::MediaPayload;
use the_codepack::engine::ProcessorFactory;
use the_codepack::package::{load_package_descriptor, PackageDescriptor, ParameterId};
use tracing_subscriber::EnvFilter;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Parsed command line.
struct CliArgs {
    registry: PathBuf,
    package: PathBuf,
    bindings: Vec<Binding>,
    timeout: Option<Duration>,
    out_dir: PathBuf,
    keep_workspace: bool,
}

/// `ID=FILE[@mime]`, or `ID=@mime` to declare an output type.
struct Binding {
    id: ParameterId,
    file: Option<PathBuf>,
    mime_type: Option<String>,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {} <registry.yaml> <package.yaml> [ID=FILE[@mime] | ID=@mime]... [--timeout SECS] [--out DIR] [--keep-workspace]\n\
         Example: {} registry.yaml ndvi.yaml NIR=nir.tif RED=red.tif NDVI=@image/tiff --out results",
        program, program
    )
}

fn parse_binding(arg: &str) -> Result<Binding> {
    let Some((id, rest)) = arg.split_once('=') else {
        bail!("Expected ID=FILE[@mime], got '{}'", arg);
    };
    let id = match id.parse::<u32>() {
        Ok(position) => ParameterId::Position(position),
        Err(_) => ParameterId::from(id),
    };

    let (file, mime_type) = match rest.rsplit_once('@') {
        Some((file, mime)) => (file, Some(mime.to_string())),
        None => (rest, None),
    };
    let file = (!file.is_empty()).then(|| PathBuf::from(file));

    Ok(Binding {
        id,
        file,
        mime_type,
    })
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut positional = Vec::new();
    let mut timeout = None;
    let mut out_dir = PathBuf::from(".");
    let mut keep_workspace = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--timeout" => {
                let secs = iter.next().context("--timeout needs a value")?;
                let secs: u64 = secs
                    .parse()
                    .with_context(|| format!("Invalid timeout '{}'", secs))?;
                timeout = Some(Duration::from_secs(secs));
            }
            "--out" => out_dir = PathBuf::from(iter.next().context("--out needs a value")?),
            "--keep-workspace" => keep_workspace = true,
            _ => positional.push(arg.clone()),
        }
    }

    if positional.len() < 2 {
        let program = args.first().map(String::as_str).unwrap_or("the-codepack");
        bail!("{}", usage(program));
    }
    let bindings = positional[2..]
        .iter()
        .map(|arg| parse_binding(arg))
        .collect::<Result<Vec<_>>>()?;

    Ok(CliArgs {
        registry: PathBuf::from(&positional[0]),
        package: PathBuf::from(&positional[1]),
        bindings,
        timeout,
        out_dir,
        keep_workspace,
    })
}

/// First permitted MIME type of a parameter that names a concrete type.
fn concrete_mime_type(package: &PackageDescriptor, id: &ParameterId) -> Option<String> {
    package
        .parameter(id)?
        .mime_types
        .iter()
        .find(|m| !m.contains('*'))
        .cloned()
}

fn payload_for(package: &PackageDescriptor, binding: &Binding) -> MediaPayload {
    let mime_type = binding
        .mime_type
        .clone()
        .or_else(|| concrete_mime_type(package, &binding.id))
        .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string());

    match &binding.file {
        Some(file) => MediaPayload::from_file(file, mime_type),
        None => MediaPayload::declaration(mime_type),
    }
}

fn output_file(out_dir: &Path, id: &ParameterId) -> PathBuf {
    out_dir.join(id.file_stem())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if let Err(e) = run(&args).await {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: &[String]) -> Result<()> {
    let start_time = Instant::now();
    let cli = parse_args(args)?;

    let registry = load_registry(&cli.registry)
        .with_context(|| format!("Loading registry '{}'", cli.registry.display()))?;
    let package = load_package_descriptor(&cli.package)
        .with_context(|| format!("Loading package '{}'", cli.package.display()))?;
    let package = Arc::new(package);

    let timeout = cli.timeout.or_else(|| registry.executor_options().timeout());
    let factory = ProcessorFactory::new(Arc::new(registry));
    let mut processor = factory
        .new_processor(package.clone())?
        .retain_workspace(cli.keep_workspace || factory.registry().executor_options().retain_workspace);

    println!("📦 Package: {}", package.label());
    println!("🔧 Backend: {}", processor.backend_id());

    for binding in &cli.bindings {
        processor
            .try_add_data(binding.id.clone(), payload_for(&package, binding))
            .with_context(|| format!("Binding '{}'", binding.id))?;
    }

    // Outputs the caller did not mention get their first concrete permitted type.
    for output in package.outputs() {
        if cli.bindings.iter().any(|b| b.id == output.id) {
            continue;
        }
        if let Some(mime_type) = concrete_mime_type(&package, &output.id) {
            processor.try_add_data(output.id.clone(), MediaPayload::declaration(mime_type))?;
        }
    }

    if !processor.is_feasible() {
        let missing: Vec<String> = processor
            .missing_parameters()
            .iter()
            .map(ToString::to_string)
            .collect();
        bail!("Package is not runnable; bind: {}", missing.join(", "));
    }

    let execution_start = Instant::now();
    processor.execute(timeout).await?;
    let execution_time = execution_start.elapsed();

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("Creating output directory '{}'", cli.out_dir.display()))?;

    println!("\n📊 Execution Results:");
    println!("⏱️  Execution Time: {:?}", execution_time);
    for (id, payload) in processor.outputs() {
        let Some(bytes) = payload.bytes() else {
            continue;
        };
        let path = output_file(&cli.out_dir, id);
        std::fs::write(&path, bytes)
            .with_context(|| format!("Writing output '{}'", path.display()))?;
        println!(
            "  {} ({}, {} bytes) -> {}",
            id,
            payload.mime_type(),
            bytes.len(),
            path.display()
        );
    }
    println!("\n🎉 Done in {:?}", start_time.elapsed());
    Ok(())
}
