//! System-wide constants for the Fundraise ledger.

/// Default maximum campaign title length in bytes.
pub const DEFAULT_MAX_TITLE_LEN: usize = 200;

/// Default maximum campaign description length in bytes.
pub const DEFAULT_MAX_DESCRIPTION_LEN: usize = 4096;

/// Default maximum campaign duration (365 days) in seconds.
pub const DEFAULT_MAX_CAMPAIGN_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// Version tag written into every ledger snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Domain separator for snapshot digests.
pub const SNAPSHOT_DIGEST_DOMAIN: &[u8] = b"fundraise:snapshot:v1:";

