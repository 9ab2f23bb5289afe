// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The view of a dropped file that validation needs.

use alloc::string::String;

/// A file carried by a drop event.
///
/// Only the declared MIME type is used for validation; the rest is for
/// logging and for consumers.
pub trait DroppedFile {
    /// Declared MIME type, empty when the host does not know it.
    fn mime_type(&self) -> &str;

    /// File name, if known.
    fn name(&self) -> &str {
        ""
    }

    /// Size in bytes, if known.
    fn size(&self) -> Option<u64> {
        None
    }
}

/// Plain file description for hosts without a native file handle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FileInfo {
    /// File name.
    pub name: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: Option<u64>,
}

impl FileInfo {
    /// Creates a description with unknown size.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: None,
        }
    }

    /// Sets the size in bytes.
    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

impl DroppedFile for FileInfo {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> Option<u64> {
        self.size
    }
}

impl<F: DroppedFile + ?Sized> DroppedFile for &F {
    fn mime_type(&self) -> &str {
        (**self).mime_type()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn size(&self) -> Option<u64> {
        (**self).size()
    }
}
