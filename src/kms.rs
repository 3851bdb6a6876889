// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{error::DisplayError, framebuffer::DisplaySink};
use drm::{
    buffer::{Buffer as _, DrmFourcc},
    control::{
        connector, crtc, dumbbuffer::DumbBuffer, framebuffer, Device as ControlDevice, Mode,
        ModeTypeFlags, ResourceHandles,
    },
    Device,
};
use std::{
    fs::{File, OpenOptions},
    io,
    os::fd::{AsFd, AsRawFd, BorrowedFd},
    path::Path,
    ptr::{self, NonNull},
    slice,
};
use tracing::{debug, info, warn};

/// An opened DRM device node such as `/dev/dri/card0`.
struct Card(File);

impl AsFd for Card {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.0.as_fd()
    }
}

impl Device for Card {}
impl ControlDevice for Card {}

/// A shared, writable memory mapping of a device buffer, unmapped on drop.
struct Mapping {
    ptr: NonNull<u8>,
    len: usize,
}

impl Mapping {
    /// Maps `len` bytes of `fd` starting at `offset`.
    fn new(fd: BorrowedFd<'_>, offset: u64, len: usize) -> io::Result<Self> {
        let offset = libc::off_t::try_from(offset)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "mapping offset out of range"))?;
        let addr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd.as_raw_fd(),
                offset,
            )
        };
        if addr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }
        let ptr = NonNull::new(addr.cast::<u8>())
            .ok_or_else(|| io::Error::other("mmap returned a null mapping"))?;
        Ok(Self { ptr, len })
    }

    /// Maps a dumb buffer through the offset the kernel assigns to it.
    fn dumb(card: &Card, buffer: &DumbBuffer) -> io::Result<Self> {
        let info = drm_ffi::mode::dumbbuffer::map(card.as_fd(), u32::from(buffer.handle()), 0, 0)?;
        let (_, height) = buffer.size();
        let len = buffer.pitch() as usize * height as usize;
        Self::new(card.as_fd(), info.offset, len)
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        // The mapping is exclusively owned and stays valid until drop.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for Mapping {
    fn drop(&mut self) {
        if unsafe { libc::munmap(self.ptr.as_ptr().cast(), self.len) } < 0 {
            warn!(err = %io::Error::last_os_error(), "failed to unmap framebuffer");
        }
    }
}

/// Display sink backed by a KMS dumb framebuffer.
///
/// `KmsSink::open` drives the first connected connector at its preferred
/// mode using a single XRGB8888 dumb buffer, mapped into memory once for
/// the whole session. Dropping the sink restores the CRTC configuration that
/// was active before it was opened, unmaps and frees the buffer. Failures
/// during that cleanup are logged, never raised.
///
/// # Example
///
/// ```no_run
/// use kms_slideshow::{framebuffer::DisplaySink, kms::KmsSink};
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let sink = KmsSink::open(Path::new("/dev/dri/card0"))?;
/// let (width, height) = sink.resolution();
/// println!("display is {width}x{height}");
/// # Ok(())
/// # }
/// ```
pub struct KmsSink {
    card: Card,
    connector: connector::Handle,
    crtc: crtc::Handle,
    mode: Mode,
    saved: crtc::Info,
    pitch: usize,
    mapping: Option<Mapping>,
    framebuffer: Option<framebuffer::Handle>,
    buffer: Option<DumbBuffer>,
}

impl KmsSink {
    /// Opens the DRM device at `path` and takes over its first connected
    /// display.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The device cannot be opened or queried
    /// - No connector reports a connected display, or it has no modes
    /// - No CRTC can drive the connector
    /// - The dumb buffer or framebuffer cannot be created, or the mode cannot
    ///   be set (another DRM master such as a compositor is usually the cause)
    pub fn open(path: &Path) -> Result<Self, DisplayError> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let card = Card(file);
        if let Err(err) = card.acquire_master_lock() {
            debug!(%err, "DRM master lock not acquired");
        }

        let resources = card.resource_handles()?;
        let connector = resources
            .connectors()
            .iter()
            .filter_map(|&handle| card.get_connector(handle, true).ok())
            .find(|info| info.state() == connector::State::Connected)
            .ok_or(DisplayError::NoConnector)?;

        let mode = connector
            .modes()
            .iter()
            .find(|mode| mode.mode_type().contains(ModeTypeFlags::PREFERRED))
            .or_else(|| connector.modes().first())
            .copied()
            .ok_or(DisplayError::NoMode)?;

        let crtc = select_crtc(&card, &resources, &connector)?;
        let saved = card.get_crtc(crtc)?;

        let (width, height) = mode.size();
        let buffer =
            card.create_dumb_buffer((width.into(), height.into()), DrmFourcc::Xrgb8888, 32)?;
        let framebuffer = match card.add_framebuffer(&buffer, 24, 32) {
            Ok(fb) => fb,
            Err(err) => {
                if let Err(err) = card.destroy_dumb_buffer(buffer) {
                    warn!(%err, "failed to destroy dumb buffer");
                }
                return Err(err.into());
            }
        };

        // Build the sink first so a failed map or modeset still releases
        // everything.
        let pitch = buffer.pitch() as usize;
        let mut sink = Self {
            card,
            connector: connector.handle(),
            crtc,
            mode,
            saved,
            pitch,
            mapping: None,
            framebuffer: Some(framebuffer),
            buffer: Some(buffer),
        };
        if let Some(buffer) = sink.buffer.as_ref() {
            sink.mapping = Some(Mapping::dumb(&sink.card, buffer)?);
        }
        sink.card.set_crtc(
            crtc,
            Some(framebuffer),
            (0, 0),
            &[sink.connector],
            Some(mode),
        )?;

        info!(
            device = %path.display(),
            interface = ?connector.interface(),
            interface_id = connector.interface_id(),
            "display {}x{}@{}",
            width,
            height,
            mode.vrefresh()
        );
        Ok(sink)
    }
}

fn select_crtc(
    card: &Card,
    resources: &ResourceHandles,
    connector: &connector::Info,
) -> Result<crtc::Handle, DisplayError> {
    if let Some(crtc) = connector
        .current_encoder()
        .and_then(|handle| card.get_encoder(handle).ok())
        .and_then(|encoder| encoder.crtc())
    {
        return Ok(crtc);
    }

    connector
        .encoders()
        .iter()
        .filter_map(|&handle| card.get_encoder(handle).ok())
        .find_map(|encoder| {
            resources
                .filter_crtcs(encoder.possible_crtcs())
                .first()
                .copied()
        })
        .ok_or(DisplayError::NoCrtc)
}

impl DisplaySink for KmsSink {
    fn resolution(&self) -> (u32, u32) {
        let (width, height) = self.mode.size();
        (width.into(), height.into())
    }

    fn update(
        &mut self,
        draw: &mut dyn FnMut(&mut [u8], usize) -> Result<(), DisplayError>,
    ) -> Result<(), DisplayError> {
        let mapping = self
            .mapping
            .as_mut()
            .ok_or_else(|| io::Error::other("framebuffer is not mapped"))?;
        draw(mapping.as_mut_slice(), self.pitch)
    }
}

impl Drop for KmsSink {
    fn drop(&mut self) {
        if let Err(err) = self.card.set_crtc(
            self.crtc,
            self.saved.framebuffer(),
            self.saved.position(),
            &[self.connector],
            self.saved.mode(),
        ) {
            warn!(%err, "failed to restore previous CRTC configuration");
        }
        drop(self.mapping.take());
        if let Some(fb) = self.framebuffer.take() {
            if let Err(err) = self.card.destroy_framebuffer(fb) {
                warn!(%err, "failed to destroy framebuffer");
            }
        }
        if let Some(buffer) = self.buffer.take() {
            if let Err(err) = self.card.destroy_dumb_buffer(buffer) {
                warn!(%err, "failed to destroy dumb buffer");
            }
        }
        if let Err(err) = self.card.release_master_lock() {
            debug!(%err, "DRM master lock not released");
        }
        debug!("KMS sink released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, io::Read};

    #[test]
    fn test_mapping_writes_through_until_drop() -> Result<(), Box<dyn std::error::Error>> {
        let path = std::env::temp_dir().join(format!("kms-slideshow-mapping-{}", std::process::id()));
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        file.set_len(8192)?;

        let mut mapping = Mapping::new(file.as_fd(), 0, 8192)?;
        assert_eq!(mapping.as_mut_slice().len(), 8192);
        mapping.as_mut_slice()[..4].copy_from_slice(&[1, 2, 3, 4]);
        // A second write lands in the same mapping.
        mapping.as_mut_slice()[8188..].copy_from_slice(&[5, 6, 7, 8]);
        drop(mapping);

        let mut contents = Vec::new();
        fs::File::open(&path)?.read_to_end(&mut contents)?;
        fs::remove_file(&path)?;
        assert_eq!(&contents[..4], &[1, 2, 3, 4]);
        assert_eq!(&contents[8188..], &[5, 6, 7, 8]);
        assert!(contents[4..8188].iter().all(|&b| b == 0));
        Ok(())
    }

    #[test]
    fn test_mapping_rejects_bad_fd_range() -> Result<(), Box<dyn std::error::Error>> {
        let file = fs::File::open("/dev/null")?;
        assert!(Mapping::new(file.as_fd(), 0, 4096).is_err());
        Ok(())
    }
}
