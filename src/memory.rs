use log::{debug, error, info, trace};
use std::io;

/// A readable committed memory region of the target process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferRegion {
    pub base: usize,
    pub size: usize,
}

impl BufferRegion {
    pub fn contains(&self, addr: usize) -> bool {
        self.base <= addr && addr < self.base + self.size
    }
}

/// Regions larger than this are never scanned (image/resource mappings).
const MAX_REGION_SIZE: usize = 100 * 1024 * 1024;

pub trait ProcessMemoryReader: Send {
    fn attach(&mut self, pid: u32) -> io::Result<()>;
    fn read_memory(&self, address: usize, size: usize) -> io::Result<Vec<u8>>;
    fn detach(&mut self) -> io::Result<()>;
    fn is_attached(&self) -> bool;

    /// Enumerate readable committed regions, sorted by base address.
    fn memory_regions(&self) -> io::Result<Vec<BufferRegion>>;

    /// Whether the attached process still exists and is accessible.
    fn is_process_alive(&self) -> bool;
}

#[cfg(windows)]
mod windows_impl {
    use super::*;
    use windows::Win32::Foundation::{CloseHandle, HANDLE, STILL_ACTIVE};
    use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
    use windows::Win32::System::Memory::{MEM_COMMIT, MEMORY_BASIC_INFORMATION, VirtualQueryEx};
    use windows::Win32::System::Threading::{
        GetExitCodeProcess, OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ,
    };

    // Page protections that permit reading: READWRITE, READONLY,
    // EXECUTE_READ, EXECUTE_READWRITE, WRITECOPY.
    const READABLE_PROTECT: [u32; 5] = [0x04, 0x02, 0x20, 0x40, 0x08];

    pub struct WindowsMemoryReader {
        handle: Option<HANDLE>,
    }

    impl WindowsMemoryReader {
        pub fn new() -> Self {
            Self { handle: None }
        }
    }

    impl ProcessMemoryReader for WindowsMemoryReader {
        fn attach(&mut self, pid: u32) -> io::Result<()> {
            self.detach()?;
            info!("Opening process PID={} with PROCESS_VM_READ", pid);
            let handle = unsafe { OpenProcess(PROCESS_VM_READ | PROCESS_QUERY_INFORMATION, false, pid) }
                .map_err(|e| {
                    error!("OpenProcess failed for PID={}: {}", pid, e);
                    io::Error::new(io::ErrorKind::PermissionDenied, e.to_string())
                })?;
            info!("Successfully opened process PID={}, handle={:?}", pid, handle);
            self.handle = Some(handle);
            Ok(())
        }

        fn read_memory(&self, address: usize, size: usize) -> io::Result<Vec<u8>> {
            let handle = self
                .handle
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "Not attached"))?;
            let mut buffer = vec![0u8; size];
            let mut bytes_read = 0usize;
            trace!("ReadProcessMemory addr=0x{:X} size={}", address, size);
            unsafe {
                ReadProcessMemory(
                    handle,
                    address as *const _,
                    buffer.as_mut_ptr() as *mut _,
                    size,
                    Some(&mut bytes_read),
                )
            }
            .map_err(|e| {
                debug!(
                    "ReadProcessMemory failed at 0x{:X} (size={}): {}",
                    address, size, e
                );
                io::Error::new(io::ErrorKind::Other, e.to_string())
            })?;
            trace!("ReadProcessMemory OK: {} of {} bytes read", bytes_read, size);
            buffer.truncate(bytes_read);
            Ok(buffer)
        }

        fn detach(&mut self) -> io::Result<()> {
            if let Some(handle) = self.handle.take() {
                info!("Closing process handle {:?}", handle);
                unsafe { CloseHandle(handle) }
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
            }
            Ok(())
        }

        fn is_attached(&self) -> bool {
            self.handle.is_some()
        }

        fn memory_regions(&self) -> io::Result<Vec<BufferRegion>> {
            let handle = self
                .handle
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "Not attached"))?;

            let mut regions = Vec::new();
            let mut address: usize = 0;
            let max_address: usize = 0x7FFF_FFFF_FFFF;

            while address < max_address {
                let mut mbi = MEMORY_BASIC_INFORMATION::default();
                let ret = unsafe {
                    VirtualQueryEx(
                        handle,
                        Some(address as *const _),
                        &mut mbi,
                        std::mem::size_of::<MEMORY_BASIC_INFORMATION>(),
                    )
                };
                if ret == 0 {
                    break;
                }

                let size = mbi.RegionSize;
                if mbi.State == MEM_COMMIT
                    && READABLE_PROTECT.contains(&mbi.Protect.0)
                    && size > 0
                    && size <= MAX_REGION_SIZE
                {
                    regions.push(BufferRegion {
                        base: mbi.BaseAddress as usize,
                        size,
                    });
                }

                let next = address.wrapping_add(size.max(0x1000));
                if next <= address {
                    break; // overflow
                }
                address = next;
            }

            regions.sort_by_key(|r| r.base);
            Ok(regions)
        }

        fn is_process_alive(&self) -> bool {
            let Some(handle) = self.handle else {
                return false;
            };
            let mut code = 0u32;
            match unsafe { GetExitCodeProcess(handle, &mut code) } {
                Ok(()) => code == STILL_ACTIVE.0 as u32,
                Err(_) => false,
            }
        }
    }

    impl Drop for WindowsMemoryReader {
        fn drop(&mut self) {
            let _ = self.detach();
        }
    }
}

#[cfg(target_os = "linux")]
mod linux_impl {
    use super::*;
    use std::fs::File;
    use std::io::{Read, Seek, SeekFrom};

    pub struct LinuxMemoryReader {
        pid: Option<u32>,
        mem_file: Option<File>,
    }

    impl LinuxMemoryReader {
        pub fn new() -> Self {
            Self {
                pid: None,
                mem_file: None,
            }
        }
    }

    impl ProcessMemoryReader for LinuxMemoryReader {
        fn attach(&mut self, pid: u32) -> io::Result<()> {
            self.detach()?;
            let path = format!("/proc/{}/mem", pid);
            info!("Opening {} for memory reading", path);
            let file = File::open(&path).map_err(|e| {
                error!("Failed to open {}: {}", path, e);
                e
            })?;
            info!("Successfully opened {}", path);
            self.pid = Some(pid);
            self.mem_file = Some(file);
            Ok(())
        }

        fn read_memory(&self, address: usize, size: usize) -> io::Result<Vec<u8>> {
            let file = self
                .mem_file
                .as_ref()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "Not attached"))?;
            let mut file = file.try_clone()?;
            trace!("Reading /proc mem at 0x{:X} size={}", address, size);
            file.seek(SeekFrom::Start(address as u64))?;
            let mut buffer = vec![0u8; size];
            let bytes_read = file.read(&mut buffer)?;
            trace!("Read {} of {} bytes from 0x{:X}", bytes_read, size, address);
            buffer.truncate(bytes_read);
            Ok(buffer)
        }

        fn detach(&mut self) -> io::Result<()> {
            if self.mem_file.take().is_some() {
                info!("Closed /proc/mem file");
            }
            self.pid = None;
            Ok(())
        }

        fn is_attached(&self) -> bool {
            self.mem_file.is_some()
        }

        fn memory_regions(&self) -> io::Result<Vec<BufferRegion>> {
            let pid = self
                .pid
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "Not attached"))?;
            let maps = std::fs::read_to_string(format!("/proc/{}/maps", pid))?;

            let mut regions = Vec::new();
            for line in maps.lines() {
                // "start-end perms offset dev inode path"
                let mut fields = line.split_whitespace();
                let Some(range) = fields.next() else { continue };
                let Some(perms) = fields.next() else { continue };
                if !perms.starts_with('r') {
                    continue;
                }
                let Some((start_s, end_s)) = range.split_once('-') else {
                    continue;
                };
                let (Ok(start), Ok(end)) = (
                    usize::from_str_radix(start_s, 16),
                    usize::from_str_radix(end_s, 16),
                ) else {
                    continue;
                };
                let size = end.saturating_sub(start);
                if size > 0 && size <= MAX_REGION_SIZE {
                    regions.push(BufferRegion { base: start, size });
                }
            }

            regions.sort_by_key(|r| r.base);
            Ok(regions)
        }

        fn is_process_alive(&self) -> bool {
            match self.pid {
                Some(pid) => unsafe { libc::kill(pid as libc::pid_t, 0) == 0 },
                None => false,
            }
        }
    }
}

pub fn create_reader() -> Box<dyn ProcessMemoryReader> {
    #[cfg(windows)]
    {
        Box::new(windows_impl::WindowsMemoryReader::new())
    }
    #[cfg(target_os = "linux")]
    {
        Box::new(linux_impl::LinuxMemoryReader::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_contains_bounds() {
        let r = BufferRegion { base: 0x1000, size: 0x100 };
        assert!(r.contains(0x1000));
        assert!(r.contains(0x10FF));
        assert!(!r.contains(0x1100));
        assert!(!r.contains(0xFFF));
    }
}
