// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::decode::is_supported;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Sorted list of the displayable images in one directory, with a cursor.
#[derive(Debug, Clone)]
pub struct Playlist {
    dir: PathBuf,
    entries: Vec<PathBuf>,
    index: usize,
}

impl Playlist {
    /// Lists the files in `dir` with a supported image extension, sorted by
    /// file name. Subdirectories are not descended into.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && is_supported(&path) {
                entries.push(path);
            }
        }
        entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        Ok(Self {
            dir,
            entries,
            index: 0,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Zero-based position of the cursor.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Path> {
        self.entries.get(self.index).map(PathBuf::as_path)
    }

    /// Advances the cursor, wrapping to the first image after the last.
    pub fn next(&mut self) -> Option<&Path> {
        if !self.is_empty() {
            self.index = (self.index + 1) % self.len();
        }
        self.current()
    }

    /// Moves the cursor back, wrapping to the last image before the first.
    pub fn prev(&mut self) -> Option<&Path> {
        if !self.is_empty() {
            self.index = (self.index + self.len() - 1) % self.len();
        }
        self.current()
    }

    /// Moves the cursor to `index`; out-of-range indices leave it unchanged.
    pub fn select(&mut self, index: usize) -> Option<&Path> {
        if index < self.len() {
            self.index = index;
            self.current()
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(PathBuf::as_path)
    }
}
