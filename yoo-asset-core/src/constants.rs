//! Constants shared by the runtime and the build pipeline

/// Name of the folder the bundle build pipeline writes into. The pipeline
/// also emits a serialized manifest with this exact name plus a
/// human-readable `<name>.manifest` next to it.
pub const OUTPUT_FOLDER_NAME: &str = "OutputCache";

/// Extension of the text manifest emitted by the pipeline
pub const MANIFEST_FILE_EXTENSION: &str = "manifest";

/// Progress value reported once an operation reached a terminal state
pub const PROGRESS_COMPLETE: f32 = 1.0;

/// Default per-update time slice for the operation system, in milliseconds
pub const DEFAULT_MAX_TIME_SLICE_MS: u64 = 30;
