//! CLI Exit Code Registry
//!
//! Single source of truth for `paceline` exit codes. Scripts rely on them.
//!
//! | Range   | Domain    | Description                               |
//! |---------|-----------|-------------------------------------------|
//! | 0       | Universal | Success                                   |
//! | 1       | Universal | General error (unspecified)               |
//! | 2       | Universal | Usage error (bad args, missing file)      |
//! | 60-69   | reconcile | Provider, load and config failures        |

use paceline_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing files.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Reconcile (60-69)
// =============================================================================

/// A selection names a provider that no `--fixtures` directory registered.
pub const EXIT_UNKNOWN_PROVIDER: u8 = 60;

/// A provider search or load failed (all-or-nothing), or every load failed
/// (best effort).
pub const EXIT_FETCH_FAILED: u8 = 61;

/// Config or provider manifest failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 62;

/// Query lookup found no hit on any provider.
pub const EXIT_NO_RESULTS: u8 = 63;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::UnknownProvider(_) => EXIT_UNKNOWN_PROVIDER,
        ReconError::Fetch { .. } | ReconError::NothingLoaded { .. } => EXIT_FETCH_FAILED,
        ReconError::NoSearchResults(_) => EXIT_NO_RESULTS,
        ReconError::DuplicateProvider(_)
        | ReconError::ConfigParse(_)
        | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::Io(_) => EXIT_USAGE,
    }
}
