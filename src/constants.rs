//! Shared crate-wide constants.
//!
//! Centralizes magic values, file names, and templates used across modules.
//! Adjusting these here will propagate through the crate.

/// UUIDv5 namespace tag for deterministic batch ids.
pub const NS_TAG: &str = "https://testyard.dev/write-engine";

/// Filename suffix for backup payloads. Full names follow
/// `.{name}.{digest}.bak`; see [`crate::engine::backup_path_for`].
pub const BACKUP_SUFFIX: &str = ".bak";

/// Hex digits of the path-plus-pid digest embedded in backup filenames.
pub const BACKUP_DIGEST_LEN: usize = 16;

/// npm package providing the wrapped test runner.
pub const RUNNER_PKG: &str = "testyard-jest";

/// Runner executable name under `node_modules/.bin`.
pub const RUNNER_BIN: &str = "testyard-jest";

/// Project manifest filename; also the marker used for root discovery.
pub const MANIFEST_FILE: &str = "package.json";

/// Runner configuration file created at the project root.
pub const RUNNER_CONFIG_FILE: &str = "jest.config.js";

/// Deploy ignore-list file maintained at the project root.
pub const IGNORE_FILE: &str = ".deployignore";

/// Glob excluded from deployment; at most one entry per project.
pub const IGNORE_PATTERN: &str = "**/__tests__/**";

/// Block written or appended to the ignore file. The leading newline keeps
/// the entry on its own line after pre-existing content.
pub const IGNORE_ENTRY: &str = "\n# component unit tests\n**/__tests__/**";

/// Directory that holds scaffolded unit tests, next to each module.
pub const TEST_DIR_NAME: &str = "__tests__";

/// Minimum supported Node.js version, as (major, minor, patch).
pub const MIN_NODE_VERSION: (u64, u64, u64) = (18, 0, 0);

/// Script entries added to the manifest by `setup`.
pub const TEST_SCRIPTS: &[(&str, &str)] = &[
    ("test:unit", "testyard-jest"),
    ("test:unit:debug", "testyard-jest --debug"),
    ("test:unit:watch", "testyard-jest --watch"),
];

/// Contents of the generated runner configuration.
pub const RUNNER_CONFIG_TEMPLATE: &str = "const { jestConfig } = require('testyard-jest/config');
module.exports = {
    ...jestConfig,
    // add any custom configurations here
};
";
