//! Last versions of each release line that shipped a Windows installer
//!
//! Once a line moves to security-only maintenance, python.org publishes
//! source tarballs only. Tags above these versions still exist upstream but
//! have nothing to download.

use crate::version::identifier::Version;

const FINAL_RELEASE_BOUNDARIES: &[Version] = &[
    Version::new(3, 9, 13),
    Version::new(3, 10, 11),
    Version::new(3, 11, 9),
    Version::new(3, 12, 10),
];

/// Returns the highest version of `minor` with a published installer, if the
/// line has stopped receiving them.
pub fn final_release_boundary(minor: u32) -> Option<&'static Version> {
    FINAL_RELEASE_BOUNDARIES.iter().find(|v| v.minor == minor)
}
