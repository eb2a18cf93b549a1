use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::ptr;

use libc::{self, c_void, off_t, size_t, MAP_FAILED, MAP_SHARED, O_SYNC, PROT_READ};

use crate::gpio::{Level, Mode, Result};

pub mod bcm;
pub mod sunxi;

pub(crate) trait GpioRegisters: fmt::Debug {
    /// Number of native GPIOs exposed by the register block.
    fn pin_count(&self) -> u16;
    fn level(&self, pin: u16) -> Level;
    fn mode(&self, pin: u16) -> Mode;
}

/// A read-only memory mapping of a register block.
pub(crate) struct MemMap {
    mem_ptr: *mut u32,
    size: usize,
}

impl fmt::Debug for MemMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemMap")
            .field("mem_ptr", &self.mem_ptr)
            .field("size", &self.size)
            .finish()
    }
}

impl MemMap {
    /// Maps `size` bytes of `path`, starting at the page-aligned `offset`.
    pub(crate) fn open(path: &str, offset: u32, size: usize) -> Result<MemMap> {
        // Only read access is needed. O_SYNC disables caching, so every
        // register read reflects the current hardware state.
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(O_SYNC)
            .open(path)?;

        let mem_ptr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                size,
                PROT_READ,
                MAP_SHARED,
                file.as_raw_fd(),
                offset as off_t,
            )
        };

        if mem_ptr == MAP_FAILED {
            return Err(io::Error::last_os_error().into());
        }

        Ok(MemMap {
            mem_ptr: mem_ptr as *mut u32,
            size,
        })
    }

    /// Reads the 32-bit register at word `offset`.
    #[inline(always)]
    pub(crate) fn read(&self, offset: usize) -> u32 {
        debug_assert!(offset < self.size / std::mem::size_of::<u32>());

        unsafe { ptr::read_volatile(self.mem_ptr.add(offset)) }
    }
}

impl Drop for MemMap {
    fn drop(&mut self) {
        unsafe {
            libc::munmap(self.mem_ptr as *mut c_void, self.size as size_t);
        }
    }
}

// Required because of the raw pointer to our memory-mapped file
unsafe impl Send for MemMap {}
unsafe impl Sync for MemMap {}
