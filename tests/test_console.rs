// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

#![cfg(target_os = "linux")]

use kms_slideshow::console::ConsoleGuard;
use std::path::Path;

#[test]
fn test_rejects_non_console() {
    // Opens fine but is not a virtual console.
    assert!(ConsoleGuard::acquire(Path::new("/dev/null")).is_err());
}

#[test]
fn test_missing_device() {
    let err = ConsoleGuard::acquire(Path::new("/nonexistent/tty")).err();
    assert_eq!(err.map(|e| e.kind()), Some(std::io::ErrorKind::NotFound));
}
