pub const DEFAULT_QUALITY: u16 = 80;
pub const MIN_QUALITY: u16 = 1;
pub const MAX_QUALITY: u16 = 100;

pub const DEFAULT_LIST_LIMIT: usize = 100;

pub const ZOPFLI_ITERATIONS: u8 = 15;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const LIBDEFLATER_LOW_LEVEL: u8 = 8;
pub const ZOPFLI_MIN_QUALITY: u8 = 90;
pub const HIGH_COMPRESSION_MIN_QUALITY: u8 = 70;

/// Keys longer than this are shortened in listings.
pub const KEY_DISPLAY_MAX: usize = 38;
/// Number of trailing characters kept when a key is shortened.
pub const KEY_DISPLAY_TAIL: usize = 35;

pub const COPY_SUFFIX: &str = "-copy";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%3f";
pub const LISTING_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const CONFIG_HOME_DIR: &str = ".imgood";
pub const ENV_PREFIX: &str = "IMGOOD";

pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";

// Common output message prefixes
pub const INFO_PREFIX: &str = "📋";
pub const SIZE_PREFIX: &str = "📊";
pub const UPLOAD_PREFIX: &str = "📤";
pub const DOWNLOAD_PREFIX: &str = "📥";
pub const LINK_PREFIX: &str = "🌐";
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const ERROR_PREFIX: &str = "❌";
