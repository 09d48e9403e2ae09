// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Import and export orchestration for pwdex.
//!
//! Ties the file formats and the foreign database reader to a
//! [`CredentialStore`](pwdex_core::CredentialStore): validated input goes
//! through the [`InsertPipeline`] one record at a time, honoring a
//! cancellation token and reporting progress to an [`ImportObserver`].

pub mod importer;
pub mod pipeline;
pub mod source;

pub use importer::{
    DisabledExport, DisabledImportReport, ImportReport, Importer, export_disabled_from_store,
    export_store,
};
pub use pipeline::{
    ImportBatch, ImportObserver, InsertFailure, InsertPipeline, NoopObserver, Progress,
    StepResult,
};
pub use source::ImportSource;
