//! Process exit codes for `rest-time-client`.
//! These codes are part of the public contract: automation tells failure
//! classes apart by status alone.

pub const SUCCESS: i32 = 0;
pub const INTERNAL_ERROR: i32 = 2; // Logging setup failed; clap usage errors also exit 2
pub const VERIFICATION_FAILED: i32 = 3; // Signature rejected (only with --fail-on-untrusted)

// Pipeline failures, one per ClientError variant.
pub const MISSING_TARGET: i32 = 10;
pub const FETCH_FAILED: i32 = 100;
pub const DECODE_FAILED: i32 = 110;
pub const ENCODE_FAILED: i32 = 111;
pub const DATA_WRITE_FAILED: i32 = 115;
pub const SIGNATURE_WRITE_FAILED: i32 = 116;
pub const KEY_LOAD_FAILED: i32 = 120;
pub const MALFORMED_SIGNATURE: i32 = 121;
pub const DIGEST_MISMATCH: i32 = 122;
