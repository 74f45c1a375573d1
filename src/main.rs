use anyhow::Context;
use clap::{CommandFactory, Parser};
use imgood::cli::{is_usage_error, Args, Commands};
use imgood::config::{load_settings, StorageSettings};
use imgood::constants::ERROR_PREFIX;
use imgood::copy::{copy_object, CopyOptions};
use imgood::list::{list_objects, ListOptions};
use imgood::listing::SortKey;
use imgood::processing::CodecEngine;
use imgood::s3::S3Store;
use imgood::upload::{upload_image, UploadOptions};
use imgood::logger;
use std::io;
use std::process::ExitCode;
use tracing::{debug, warn};

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if !is_usage_error(&err) => err.exit(),
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };
    logger::init(args.verbose, args.quiet);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} Error: {:#}", ERROR_PREFIX, err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if let Commands::Completion { shell } = args.command {
        clap_complete::generate(shell, &mut Args::command(), "imgood", &mut io::stdout());
        return Ok(());
    }

    let loaded = load_settings(args.config.as_deref());
    if let Some(warning) = &loaded.warning {
        warn!("{}", warning);
    }
    if let Some(source) = &loaded.source {
        debug!(path = %source.display(), "loaded config file");
    }
    let settings = loaded.settings;
    let engine = CodecEngine::new();

    match args.command {
        Commands::Up {
            input,
            key,
            compress,
            format,
            quality,
            resize,
            timestamp,
            keep_metadata,
            no_rotate,
        } => {
            let options = UploadOptions {
                input,
                key,
                compress,
                format,
                quality,
                resize,
                timestamp,
                keep_metadata,
                no_rotate,
            };
            let store = connect(&settings)?;
            upload_image(&store, &engine, &options)?;
        }
        Commands::Cp {
            source,
            target,
            format,
            quality,
            resize,
        } => {
            let options = CopyOptions {
                source,
                target,
                format,
                quality,
                resize,
            };
            let store = connect(&settings)?;
            copy_object(&store, &engine, &options)?;
        }
        Commands::Ls {
            prefix,
            limit,
            sort,
            desc,
            urls,
        } => {
            let options = ListOptions {
                prefix,
                limit,
                sort: SortKey::parse(&sort),
                descending: desc,
                show_urls: urls,
            };
            let store = connect(&settings)?;
            list_objects(&store, &options)?;
        }
        Commands::Completion { .. } => {}
    }

    Ok(())
}

fn connect(settings: &StorageSettings) -> anyhow::Result<S3Store> {
    S3Store::new(settings).context(
        "Failed to create S3 client. Check your S3 configuration in config.toml or environment variables",
    )
}
