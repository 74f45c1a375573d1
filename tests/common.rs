#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use image::{DynamicImage, ImageFormat};
use imgood::error::{ImgoodError, Result};
use imgood::storage::{ObjectStore, StorageEntry};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const TEST_BUCKET: &str = "test-bucket";

/// In-memory object store that counts every backend call.
#[derive(Default)]
pub struct FakeStore {
    pub bucket: String,
    pub objects: RefCell<BTreeMap<String, Vec<u8>>>,
    pub calls: Cell<usize>,
    pub puts: RefCell<Vec<String>>,
    pub fail_puts: bool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            bucket: TEST_BUCKET.to_string(),
            ..Default::default()
        }
    }

    pub fn with_object(self, key: &str, data: Vec<u8>) -> Self {
        self.objects.borrow_mut().insert(key.to_string(), data);
        self
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.borrow().get(key).cloned()
    }

    fn record(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

impl ObjectStore for FakeStore {
    fn ensure_ready(&self) -> Result<()> {
        if self.bucket.is_empty() {
            return Err(ImgoodError::MissingBucket);
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        self.record();
        Ok(self.objects.borrow().contains_key(key))
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.record();
        self.objects
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| ImgoodError::storage("getting object", key, "NoSuchKey"))
    }

    fn put(&self, key: &str, data: Vec<u8>) -> Result<()> {
        self.record();
        if self.fail_puts {
            return Err(ImgoodError::storage("uploading object", key, "AccessDenied"));
        }
        self.puts.borrow_mut().push(key.to_string());
        self.objects.borrow_mut().insert(key.to_string(), data);
        Ok(())
    }

    fn list(&self, prefix: &str, limit: usize) -> Result<Vec<StorageEntry>> {
        self.record();
        let entries = self
            .objects
            .borrow()
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .enumerate()
            .map(|(i, (key, data))| StorageEntry {
                key: key.clone(),
                size: data.len() as i64,
                last_modified: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, i as u32).unwrap(),
                url: self.url(key),
            })
            .take(if limit == 0 { usize::MAX } else { limit })
            .collect();
        Ok(entries)
    }

    fn url(&self, key: &str) -> String {
        format!("https://{}.example.com/{}", self.bucket, key)
    }

    fn bucket_name(&self) -> &str {
        &self.bucket
    }
}

pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::new_rgb8(width, height)
        .write_to(&mut buf, format)
        .unwrap();
    buf.into_inner()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encoded_image(width, height, ImageFormat::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encoded_image(width, height, ImageFormat::Jpeg)
}

pub fn write_image(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}
