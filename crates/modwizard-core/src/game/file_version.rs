//! Reading the embedded file version of a PE image
//!
//! MelonLoader ships its core assembly with a Win32 `VERSIONINFO` resource.
//! The reader here parses that resource directly from the file bytes so the
//! inspector works the same on every host OS.

use std::path::Path;
use thiserror::Error;

/// Version reported when a file carries no readable version metadata
pub const UNKNOWN_FILE_VERSION: &str = "0.0.0";

const RT_VERSION: u32 = 16;
const FIXED_FILE_INFO_SIGNATURE: u32 = 0xFEEF_04BD;
const RESOURCE_DIRECTORY_INDEX: usize = 2;

/// Why a version could not be read. Never surfaced to the user.
#[derive(Debug, Error)]
pub enum VersionReadError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a PE image: {0}")]
    NotPe(&'static str),

    #[error("image is truncated")]
    Truncated,

    #[error("image has no version resource")]
    NoVersionResource,
}

/// Source of file version strings
pub trait FileVersionReader {
    /// Version string of the file, or [`UNKNOWN_FILE_VERSION`] when unavailable
    fn read_version(&self, path: &Path) -> String;
}

/// Reads `VS_FIXEDFILEINFO` out of a PE image's resource section
#[derive(Debug, Clone, Copy, Default)]
pub struct PeVersionReader;

impl FileVersionReader for PeVersionReader {
    fn read_version(&self, path: &Path) -> String {
        match std::fs::read(path)
            .map_err(VersionReadError::from)
            .and_then(|bytes| file_version_from_image(&bytes))
        {
            Ok(version) => {
                tracing::debug!(path = %path.display(), %version, "read file version");
                version
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "file version unavailable");
                UNKNOWN_FILE_VERSION.to_string()
            }
        }
    }
}

/// Little-endian reads that fail on out-of-range offsets instead of panicking
struct Image<'a> {
    bytes: &'a [u8],
}

impl<'a> Image<'a> {
    fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], VersionReadError> {
        let end = offset.checked_add(len).ok_or(VersionReadError::Truncated)?;
        self.bytes.get(offset..end).ok_or(VersionReadError::Truncated)
    }

    fn u16_at(&self, offset: usize) -> Result<u16, VersionReadError> {
        let b = self.slice(offset, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32_at(&self, offset: usize) -> Result<u32, VersionReadError> {
        let b = self.slice(offset, 4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

struct Section {
    virtual_address: u32,
    virtual_size: u32,
    raw_size: u32,
    raw_offset: u32,
}

/// Extract the file version (`major.minor.build.revision`) from a PE image
pub fn file_version_from_image(bytes: &[u8]) -> Result<String, VersionReadError> {
    let image = Image { bytes };

    if image.slice(0, 2)? != b"MZ" {
        return Err(VersionReadError::NotPe("missing MZ header"));
    }
    let pe_offset = image.u32_at(0x3C)? as usize;
    if image.slice(pe_offset, 4)? != b"PE\0\0" {
        return Err(VersionReadError::NotPe("missing PE signature"));
    }

    let coff = pe_offset + 4;
    let section_count = image.u16_at(coff + 2)? as usize;
    let optional_size = image.u16_at(coff + 16)? as usize;
    let optional = coff + 20;

    let directories = match image.u16_at(optional)? {
        0x10B => optional + 96,
        0x20B => optional + 112,
        _ => return Err(VersionReadError::NotPe("unknown optional header magic")),
    };
    let directory_count = match image.u16_at(optional)? {
        0x10B => image.u32_at(optional + 92)?,
        _ => image.u32_at(optional + 108)?,
    } as usize;
    if directory_count <= RESOURCE_DIRECTORY_INDEX {
        return Err(VersionReadError::NoVersionResource);
    }

    let resource_rva = image.u32_at(directories + RESOURCE_DIRECTORY_INDEX * 8)?;
    if resource_rva == 0 {
        return Err(VersionReadError::NoVersionResource);
    }

    let sections = (0..section_count)
        .map(|i| {
            let header = optional + optional_size + i * 40;
            Ok(Section {
                virtual_size: image.u32_at(header + 8)?,
                virtual_address: image.u32_at(header + 12)?,
                raw_size: image.u32_at(header + 16)?,
                raw_offset: image.u32_at(header + 20)?,
            })
        })
        .collect::<Result<Vec<_>, VersionReadError>>()?;

    let to_offset = |rva: u32| -> Result<usize, VersionReadError> {
        sections
            .iter()
            .find(|s| {
                let span = s.virtual_size.max(s.raw_size);
                rva >= s.virtual_address && rva - s.virtual_address < span
            })
            .map(|s| (rva - s.virtual_address + s.raw_offset) as usize)
            .ok_or(VersionReadError::Truncated)
    };

    let resource_root = to_offset(resource_rva)?;

    // type -> name -> language; the version resource is the first leaf under RT_VERSION
    let by_type = find_entry(&image, resource_root, Some(RT_VERSION))?
        .ok_or(VersionReadError::NoVersionResource)?;
    let by_name = subdirectory(by_type)
        .and_then(|dir| find_entry(&image, resource_root + dir, None).transpose())
        .ok_or(VersionReadError::NoVersionResource)??;
    let by_language = subdirectory(by_name)
        .and_then(|dir| find_entry(&image, resource_root + dir, None).transpose())
        .ok_or(VersionReadError::NoVersionResource)??;
    if subdirectory(by_language).is_some() {
        return Err(VersionReadError::NoVersionResource);
    }

    let data_entry = resource_root + by_language as usize;
    let data_rva = image.u32_at(data_entry)?;
    let data_size = image.u32_at(data_entry + 4)? as usize;
    let data = image.slice(to_offset(data_rva)?, data_size)?;

    fixed_file_version(data)
}

/// Offset of the child directory if the entry points to one
fn subdirectory(offset_to_data: u32) -> Option<usize> {
    (offset_to_data & 0x8000_0000 != 0).then(|| (offset_to_data & 0x7FFF_FFFF) as usize)
}

/// Find an entry in a resource directory, by numeric id or the first one present
fn find_entry(
    image: &Image<'_>,
    directory: usize,
    id: Option<u32>,
) -> Result<Option<u32>, VersionReadError> {
    let named = image.u16_at(directory + 12)? as usize;
    let ids = image.u16_at(directory + 14)? as usize;

    for i in 0..named + ids {
        let entry = directory + 16 + i * 8;
        let name = image.u32_at(entry)?;
        let offset_to_data = image.u32_at(entry + 4)?;
        match id {
            None => return Ok(Some(offset_to_data)),
            Some(wanted) if name == wanted => return Ok(Some(offset_to_data)),
            Some(_) => {}
        }
    }
    Ok(None)
}

/// Locate `VS_FIXEDFILEINFO` in a `VS_VERSIONINFO` blob and render its file version
fn fixed_file_version(data: &[u8]) -> Result<String, VersionReadError> {
    let blob = Image { bytes: data };
    let mut offset = 0;
    while offset + 52 <= data.len() {
        if blob.u32_at(offset)? == FIXED_FILE_INFO_SIGNATURE {
            let ms = blob.u32_at(offset + 8)?;
            let ls = blob.u32_at(offset + 12)?;
            return Ok(format!(
                "{}.{}.{}.{}",
                ms >> 16,
                ms & 0xFFFF,
                ls >> 16,
                ls & 0xFFFF
            ));
        }
        offset += 4;
    }
    Err(VersionReadError::NoVersionResource)
}
