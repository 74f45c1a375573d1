use crate::constants::{DEFAULT_LIST_LIMIT, DEFAULT_QUALITY};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "imgood",
    about = "Upload, copy and list images in S3-compatible storage",
    long_about = "imgood uploads images to an S3-compatible bucket, copies objects inside the bucket \
                  and lists what is stored there. Images can be converted to WebP, JPEG or PNG, \
                  resized and auto-rotated on the way.",
    version,
    after_help = "EXAMPLES:\n  \
    imgood up -i photo.jpg -c\n  \
    imgood up -i photo.png -k avatars/me.png -r 256,256\n  \
    imgood cp -s photos/cat.jpg -f webp -q 90\n  \
    imgood ls -p photos/ -s size -d -u\n  \
    imgood completion zsh"
)]
pub struct Args {
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Path to config.toml",
        long_help = "Path to a TOML config file. Defaults to ./config.toml, then ~/.imgood/config.toml."
    )]
    pub config: Option<PathBuf>,

    #[arg(short = 'v', long, global = true, help = "Print debug diagnostics")]
    pub verbose: bool,

    #[arg(long, global = true, conflicts_with = "verbose", help = "Only print errors to stderr")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        visible_alias = "upload",
        about = "Upload an image to S3-compatible storage",
        long_about = "Upload a local image. With --compress the image is converted to WebP; \
                      unless --keep-metadata and --no-rotate are both given the image is re-encoded \
                      so that EXIF orientation is applied and metadata is stripped."
    )]
    Up {
        #[arg(short = 'i', long, help = "Input image file path")]
        input: PathBuf,

        #[arg(
            short = 'k',
            long,
            help = "Object key (default: file name)",
            long_help = "Object key to store the image under. Defaults to the input file name, \
                         with the extension replaced when the format changes."
        )]
        key: Option<String>,

        #[arg(short = 'c', long, help = "Compress the image (converts to WebP)")]
        compress: bool,

        #[arg(
            short = 'f',
            long,
            help = "Output format (webp, jpeg, png)",
            long_help = "Convert to this format before uploading. Takes precedence over --compress. \
                         Unknown formats fall back to the original format with a warning."
        )]
        format: Option<String>,

        #[arg(
            short = 'q',
            long,
            default_value_t = DEFAULT_QUALITY,
            help = "Compression quality (1-100, ignored for WebP)",
            long_help = "Compression quality from 1 (lowest) to 100 (highest). \
                         For PNG: >=90 uses Zopfli, >=70 uses high compression, <70 uses standard compression. \
                         WebP output (including --compress) is lossless and ignores it."
        )]
        quality: u16,

        #[arg(
            short = 'r',
            long,
            value_name = "WIDTH,HEIGHT",
            help = "Resize image (e.g. 800,600)",
            long_help = "Resize to WIDTH,HEIGHT. A 0 or invalid dimension is derived from the other \
                         one to keep the aspect ratio."
        )]
        resize: Option<String>,

        #[arg(short = 't', long, help = "Use a timestamp as the object key")]
        timestamp: bool,

        #[arg(long, help = "Keep the ICC profile of the original image")]
        keep_metadata: bool,

        #[arg(long, help = "Do not apply EXIF orientation")]
        no_rotate: bool,
    },

    #[command(
        visible_alias = "copy",
        about = "Copy an object inside the bucket",
        long_about = "Copy an object to a new key in the same bucket, optionally converting its format \
                      or resizing it. Fails if the target key already exists."
    )]
    Cp {
        #[arg(short = 's', long, help = "Source object key")]
        source: String,

        #[arg(
            short = 't',
            long,
            help = "Target object key",
            long_help = "Target object key. Defaults to the source key with the new format's extension, \
                         or with a -copy suffix when the format is unchanged."
        )]
        target: Option<String>,

        #[arg(
            short = 'f',
            long,
            help = "Output format (webp, jpeg, jpg, png)",
            long_help = "Convert to this format while copying. Unknown formats fall back to the \
                         original format with a warning."
        )]
        format: Option<String>,

        #[arg(
            short = 'q',
            long,
            default_value_t = DEFAULT_QUALITY,
            help = "Compression quality (1-100, ignored for WebP)"
        )]
        quality: u16,

        #[arg(
            short = 'r',
            long,
            value_name = "WIDTH,HEIGHT",
            help = "Resize image (e.g. 800,600)"
        )]
        resize: Option<String>,
    },

    #[command(
        visible_alias = "list",
        about = "List objects in the bucket",
        long_about = "List objects in the bucket as a table of key, size and modification date."
    )]
    Ls {
        #[arg(short = 'p', long, default_value = "", help = "Only list keys with this prefix")]
        prefix: String,

        #[arg(
            short = 'l',
            long,
            default_value_t = DEFAULT_LIST_LIMIT,
            help = "Maximum number of objects (0 for all)"
        )]
        limit: usize,

        #[arg(
            short = 's',
            long,
            default_value = "name",
            help = "Sort by name, size or date",
            long_help = "Sort by name, size or date. Unknown values sort by name."
        )]
        sort: String,

        #[arg(short = 'd', long, help = "Sort in descending order")]
        desc: bool,

        #[arg(short = 'u', long, help = "Show public URLs")]
        urls: bool,
    },

    #[command(about = "Generate a shell completion script")]
    Completion {
        #[arg(value_enum, help = "Target shell")]
        shell: Shell,
    },
}

/// False for `--help` and `--version`, which clap reports as errors but are not failures.
pub fn is_usage_error(err: &clap::Error) -> bool {
    !matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}
