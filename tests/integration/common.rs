//! Common utilities for integration tests

use assert_cmd::Command;

const RELCOPY_ENV: &[&str] = &[
    "RELCOPY_SOURCE_REPO",
    "RELCOPY_SOURCE_TOKEN",
    "RELCOPY_DEST_REPO",
    "RELCOPY_DEST_TOKEN",
    "RELCOPY_SOURCE_API_URL",
    "RELCOPY_SOURCE_UPLOAD_URL",
    "RELCOPY_DEST_API_URL",
    "RELCOPY_DEST_UPLOAD_URL",
    "RELCOPY_STAGING_DIR",
    "RELCOPY_ASSET_FILTER",
    "RELCOPY_BODY_PATTERN",
    "RELCOPY_BODY_REPLACEMENT",
    "RELCOPY_COPY_ALL",
    "RELCOPY_SORT",
    "RELCOPY_DRY_RUN",
    "RELCOPY_CONFIG",
    "RUST_LOG",
];

/// The relcopy binary with a clean RELCOPY_* environment
pub fn relcopy_command() -> Command {
    let mut cmd = Command::cargo_bin("relcopy").unwrap();
    for var in RELCOPY_ENV {
        cmd.env_remove(var);
    }
    cmd
}
