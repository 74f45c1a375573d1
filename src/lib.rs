pub mod cli;
pub mod config;
pub mod constants;
pub mod copy;
pub mod error;
pub mod formats;
pub mod info;
pub mod keys;
pub mod list;
pub mod listing;
pub mod logger;
pub mod processing;
pub mod s3;
pub mod storage;
pub mod transform;
pub mod upload;
pub mod utils;

pub use config::{load_settings, resolve_settings, LoadedSettings, StorageSettings};
pub use copy::{copy_object, CopyOptions, CopyReport};
pub use error::{ImgoodError, Result};
pub use formats::TargetFormat;
pub use info::{probe_image, ImageInfo};
pub use keys::{derive_target_key, KeyMode, KeyOptions};
pub use list::{list_objects, ListOptions};
pub use listing::{format_listing, render_listing, ListingRow, SortKey};
pub use processing::{CodecEngine, ImageEngine};
pub use s3::S3Store;
pub use storage::{object_url, ObjectStore, StorageEntry};
pub use transform::{parse_resize_spec, resolve_options, TransformFlags, TransformRequest};
pub use upload::{upload_image, UploadOptions, UploadReport};
