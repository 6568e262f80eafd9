//! Cartridge loading from the iNES format (.nes files).
//!
//! Implements the fixed-bank portion of the
//! [iNES](https://www.nesdev.org/wiki/INES) format: a 16-byte header (magic
//! `NES\x1A`, PRG ROM size in 16 KiB units, CHR ROM size in 8 KiB units,
//! flag bytes), then PRG ROM, then CHR ROM. Mapper registers and bank
//! switching are out of scope; the CPU sees a fixed PRG window and writes
//! are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::bus::MemoryUnit;

pub const INES_HEADER_SIZE: usize = 16;
pub const INES_MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A]; // "NES" + DOS EOF

const PRG_UNIT: usize = 16 * 1024;
const CHR_UNIT: usize = 8 * 1024;
const PRG_WINDOW: usize = 0x4000;

/// Failure to produce a usable cartridge; fatal to starting a run.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open ROM image: {0}")]
    Io(#[from] std::io::Error),
    #[error("ROM image shorter than the 16-byte iNES header")]
    Truncated,
    #[error("bad iNES magic {0:02X?}")]
    BadMagic([u8; 4]),
}

/// Program and graphics data extracted from a ROM image.
///
/// Populated once at load time, read-only afterwards. PRG ROM answers CPU
/// reads over `$8000-$FFFF`; with a single 16 KiB bank the upper window
/// mirrors the lower. CHR ROM is held for the video unit and never touched
/// by the CPU.
pub struct Cartridge {
    prg_rom: Vec<u8>,
    chr_rom: Vec<u8>,
}

impl Cartridge {
    /// Load a cartridge from an iNES file on disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let mut data = Vec::new();
        File::open(path)?.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Parse an iNES image already in memory.
    ///
    /// Header bytes 4-5 give the PRG/CHR sizes; the remaining flag and
    /// padding bytes are skipped (mapper and mirroring are out of scope).
    /// Stores are sized exactly from the header and zero-filled when the
    /// payload runs short.
    pub fn from_bytes(data: &[u8]) -> Result<Self, LoadError> {
        if data.len() < INES_HEADER_SIZE {
            return Err(LoadError::Truncated);
        }
        let magic = [data[0], data[1], data[2], data[3]];
        if magic != INES_MAGIC {
            return Err(LoadError::BadMagic(magic));
        }

        let prg_size = data[4] as usize * PRG_UNIT;
        let chr_size = data[5] as usize * CHR_UNIT;

        let payload = &data[INES_HEADER_SIZE..];
        let mut prg_rom = vec![0; prg_size];
        let mut chr_rom = vec![0; chr_size];
        copy_available(&mut prg_rom, payload, 0);
        copy_available(&mut chr_rom, payload, prg_size);

        Ok(Self { prg_rom, chr_rom })
    }

    /// Graphics data for the video unit; parsed for offset correctness only.
    pub fn chr(&self) -> &[u8] {
        &self.chr_rom
    }

    pub fn prg_len(&self) -> usize {
        self.prg_rom.len()
    }
}

/// Copy as much of `src[offset..]` into `dst` as exists; the rest stays 0.
fn copy_available(dst: &mut [u8], src: &[u8], offset: usize) {
    if offset >= src.len() {
        return;
    }
    let n = dst.len().min(src.len() - offset);
    dst[..n].copy_from_slice(&src[offset..offset + n]);
}

impl MemoryUnit for Cartridge {
    fn read8(&mut self, addr: u16) -> u8 {
        match addr {
            // PRG windows $8000-$BFFF and $C000-$FFFF; a single 16 KiB bank
            // mirrors into both
            0x8000..=0xFFFF => {
                let offset = addr as usize % PRG_WINDOW;
                self.prg_rom.get(offset).copied().unwrap_or(0)
            }
            _ => 0,
        }
    }

    fn write8(&mut self, _addr: u16, _data: u8) {
        // PRG ROM is read-only and this mapper has no registers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ines_image(prg_units: u8, chr_units: u8, payload: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&INES_MAGIC);
        data.push(prg_units);
        data.push(chr_units);
        data.extend_from_slice(&[0; 10]);
        data.extend_from_slice(payload);
        data
    }

    #[test]
    fn rejects_short_stream() {
        assert!(matches!(Cartridge::from_bytes(&[0x4E, 0x45]), Err(LoadError::Truncated)));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut data = ines_image(1, 1, &[]);
        data[0] = b'X';
        assert!(matches!(Cartridge::from_bytes(&data), Err(LoadError::BadMagic(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        assert!(matches!(Cartridge::load("does/not/exist.nes"), Err(LoadError::Io(_))));
    }

    #[test]
    fn sizes_stores_from_header_and_zero_fills() {
        let mut cart = Cartridge::from_bytes(&ines_image(1, 1, &[0xAA, 0xBB])).unwrap();
        assert_eq!(cart.prg_len(), 16 * 1024);
        assert_eq!(cart.chr().len(), 8 * 1024);
        assert_eq!(cart.read8(0x8000), 0xAA);
        assert_eq!(cart.read8(0x8001), 0xBB);
        assert_eq!(cart.read8(0x8002), 0);
    }

    #[test]
    fn single_bank_mirrors_into_upper_window() {
        let mut payload = vec![0; 16 * 1024];
        payload[0] = 0x11;
        payload[0x3FFF] = 0x22;
        let mut cart = Cartridge::from_bytes(&ines_image(1, 0, &payload)).unwrap();
        assert_eq!(cart.read8(0x8000), 0x11);
        assert_eq!(cart.read8(0xC000), 0x11);
        assert_eq!(cart.read8(0xBFFF), 0x22);
        assert_eq!(cart.read8(0xFFFF), 0x22);
    }

    #[test]
    fn reads_outside_prg_windows_are_zero() {
        let mut cart = Cartridge::from_bytes(&ines_image(1, 0, &[0xAA])).unwrap();
        assert_eq!(cart.read8(0x4020), 0);
        assert_eq!(cart.read8(0x7FFF), 0);
    }

    #[test]
    fn writes_are_ignored() {
        let mut cart = Cartridge::from_bytes(&ines_image(1, 0, &[0xAA])).unwrap();
        cart.write8(0x8000, 0x55);
        assert_eq!(cart.read8(0x8000), 0xAA);
    }
}
