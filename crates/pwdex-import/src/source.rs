// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Picking an import route from the input path.

use std::path::{Path, PathBuf};

use pwdex_core::ExportFormat;

/// Where an import reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    /// A Password Exporter file.
    Export { path: PathBuf, format: ExportFormat },
    /// A foreign browser's `Login Data` database.
    Foreign { path: PathBuf },
}

impl ImportSource {
    /// Route by what the path contains: `.csv` first, then `.xml`, anything
    /// else is treated as a foreign database.
    ///
    /// The whole path is searched, so `backup.csv.old` is still CSV.
    pub fn sniff(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let text = path.to_string_lossy();
        let format = if text.contains(".csv") {
            Some(ExportFormat::Csv)
        } else if text.contains(".xml") {
            Some(ExportFormat::Xml)
        } else {
            None
        };
        match format {
            Some(format) => Self::Export {
                path: path.to_path_buf(),
                format,
            },
            None => Self::Foreign {
                path: path.to_path_buf(),
            },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Export { path, .. } | Self::Foreign { path } => path,
        }
    }
}
