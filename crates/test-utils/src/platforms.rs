// crates/test-utils/src/platforms.rs

use cleanexec::sys::mock::MockPlatform;
use cleanexec::types::Fd;

/// Descriptors a typical "leaky" parent hands down: a few low ones plus a
/// couple far above the reference 1023 bound.
pub const LEAKED_FDS: [Fd; 6] = [3, 4, 7, 255, 1500, 4096];

/// Mock process that inherited [`LEAKED_FDS`].
pub fn leaky_process() -> MockPlatform {
    MockPlatform::new().with_open_fds(LEAKED_FDS)
}

/// Mock process on a platform that can neither enumerate descriptors nor
/// report a limit.
pub fn opaque_process() -> MockPlatform {
    leaky_process().with_enumeration(false).with_limit(None)
}
