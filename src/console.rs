// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use std::{
    fs::{File, OpenOptions},
    io,
    os::{fd::AsRawFd, raw::c_int},
    path::Path,
};
use tracing::{debug, warn};

// From <linux/kd.h>
const KDSETMODE: u32 = 0x4B3A;
const KDGETMODE: u32 = 0x4B3B;
const KD_TEXT: c_int = 0x00;
const KD_GRAPHICS: c_int = 0x01;

/// Switches a virtual console to graphics mode for as long as it is alive.
///
/// While in graphics mode the kernel stops drawing console text and the
/// blinking cursor over the framebuffer. The mode that was active before
/// acquisition is restored exactly once, when the guard is dropped.
pub struct ConsoleGuard {
    tty: File,
    previous: c_int,
}

impl ConsoleGuard {
    /// Puts the console at `path` (usually `/dev/tty`) into graphics mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be opened or is not a virtual
    /// console (serial lines and pseudo terminals reject `KDGETMODE`).
    pub fn acquire(path: &Path) -> io::Result<Self> {
        let tty = OpenOptions::new().read(true).write(true).open(path)?;
        let fd = tty.as_raw_fd();

        let mut previous: c_int = KD_TEXT;
        if unsafe { libc::ioctl(fd, KDGETMODE as _, &mut previous as *mut c_int) } < 0 {
            return Err(io::Error::last_os_error());
        }
        if unsafe { libc::ioctl(fd, KDSETMODE as _, KD_GRAPHICS as libc::c_ulong) } < 0 {
            return Err(io::Error::last_os_error());
        }

        debug!(tty = %path.display(), previous, "console switched to graphics mode");
        Ok(Self { tty, previous })
    }
}

impl Drop for ConsoleGuard {
    fn drop(&mut self) {
        let fd = self.tty.as_raw_fd();
        if unsafe { libc::ioctl(fd, KDSETMODE as _, self.previous as libc::c_ulong) } < 0 {
            warn!(
                err = %io::Error::last_os_error(),
                "failed to restore console mode"
            );
        } else {
            debug!(mode = self.previous, "console mode restored");
        }
    }
}
