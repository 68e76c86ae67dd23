//! # gridport-import
//!
//! Header resolution, value normalization, type coercion and the
//! sheet-to-grid reader for gridport, plus the retrying file opener and the
//! source-side traits format adapters implement.

mod coerce;
mod header;
mod normalize;
mod opener;
mod reader;
mod settings;
mod source;

pub use coerce::{numeric_date_candidate, Coercer};
pub use header::{ColumnBinding, HeaderResolution};
pub use normalize::ValueNormalizer;
pub use opener::{is_lock_contention, next_step, CancelToken, FileOpener, RetryPolicy, RetryStep};
pub use reader::{GridReader, Import};
pub use settings::{ColumnStart, HeaderMode, ImportSettings, SheetSelector};
pub use source::{
    resolve_sheet, MemorySheet, MemoryWorkbook, RawValue, SheetSource, WorkbookSource,
};

/// Resolve a header row without running a full import
pub fn resolve_header(
    header: &[String],
    settings: &ImportSettings,
    log: &mut gridport_core::ImportLog,
) -> gridport_core::Result<HeaderResolution> {
    header::resolve(header, settings, log)
}
