//! Class label table loaded from a one-label-per-line asset.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;

use crate::error::{Error, Result};

/// Ordered class labels; a class index is a position in this table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
    lowered: Vec<String>,
}

impl LabelTable {
    /// Build a table from labels already in memory.
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(Error::EmptyLabelTable);
        }
        let lowered = labels.iter().map(|l| l.to_lowercase()).collect();
        Ok(Self { labels, lowered })
    }

    /// Load labels from a file, one label per line.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let asset_err = |source| Error::AssetLoad {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(asset_err)?;
        let table = Self::from_reader(BufReader::new(file)).map_err(|err| match err {
            Error::AssetLoad { source, .. } => asset_err(source),
            other => other,
        })?;
        info!("loaded {} labels from {}", table.len(), path.display());
        Ok(table)
    }

    /// Read labels from any buffered reader, one label per line.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut labels = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|source| Error::AssetLoad {
                path: Default::default(),
                source,
            })?;
            labels.push(line.trim_end_matches('\r').to_string());
        }
        Self::new(labels)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label as written in the asset.
    pub fn get(&self, class_index: usize) -> Option<&str> {
        self.labels.get(class_index).map(String::as_str)
    }

    /// Lower-cased label, the form used for presence tracking.
    pub fn lowercase(&self, class_index: usize) -> Option<&str> {
        self.lowered.get(class_index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}
