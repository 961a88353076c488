//! Assembly references for a generated mod project
//!
//! Where MelonLoader keeps its own assemblies moved twice: 0.5.4 split out
//! Harmony, and 0.6.0 moved everything into per-runtime `net35`/`net6`
//! folders. The game's own assemblies live in `<Game>_Data/Managed` for Mono
//! and in MelonLoader's generated folder for IL2CPP.

use super::layout::{GameInfo, RuntimeBackend, CORE_ASSEMBLY};
use super::version::FrameworkVersion;
use std::path::{Path, PathBuf};

pub const HARMONY_ASSEMBLY: &str = "0Harmony.dll";
pub const VALUE_TUPLE_BRIDGE: &str = "ValueTupleBridge.dll";
pub const IL2CPP_INTEROP_ASSEMBLIES: [&str; 2] =
    ["Il2CppInterop.Runtime.dll", "Il2CppInterop.Common.dll"];

/// Assemblies the target framework already provides
const BLACKLIST: [&str; 3] = ["mscorlib.dll", "netstandard.dll", "Mono.Security.dll"];

/// Last release shipping a single combined core assembly
const LAST_COMBINED_CORE: FrameworkVersion = FrameworkVersion::new(0, 5, 3);
/// Last release keeping its assemblies at the MelonLoader root
const LAST_FLAT_LAYOUT: FrameworkVersion = FrameworkVersion::new(0, 5, 7);

/// Every assembly the generated project should reference, in order:
/// MelonLoader's own, the Mono bridge, then the game's managed assemblies.
/// Paths that do not exist are skipped.
pub fn resolve(info: &GameInfo) -> Vec<PathBuf> {
    let mut references: Vec<PathBuf> = framework_references(info)
        .into_iter()
        .filter(|path| {
            let exists = path.is_file();
            if !exists {
                tracing::debug!(path = %path.display(), "skipping missing framework assembly");
            }
            exists
        })
        .collect();

    references.extend(sweep_managed(&managed_dir(info)));
    references
}

/// MelonLoader assemblies for this version and backend, before existence filtering
pub fn framework_references(info: &GameInfo) -> Vec<PathBuf> {
    let base = info.framework_root();
    let version = &info.framework_version;
    let mut files = Vec::new();

    if *version <= LAST_COMBINED_CORE {
        files.push(base.join(CORE_ASSEMBLY));
    } else if *version <= LAST_FLAT_LAYOUT {
        files.push(base.join(CORE_ASSEMBLY));
        files.push(base.join(HARMONY_ASSEMBLY));
    } else {
        let runtime_dir = base.join(info.backend.framework_subdir());
        files.push(runtime_dir.join(CORE_ASSEMBLY));
        files.push(runtime_dir.join(HARMONY_ASSEMBLY));

        if info.backend == RuntimeBackend::Il2Cpp {
            let net6 = base.join(RuntimeBackend::Il2Cpp.framework_subdir());
            files.extend(IL2CPP_INTEROP_ASSEMBLIES.iter().map(|name| net6.join(name)));
        }
    }

    match info.backend {
        RuntimeBackend::Mono if info.is_framework_v6_plus() => files.push(
            base.join(RuntimeBackend::Mono.framework_subdir())
                .join(VALUE_TUPLE_BRIDGE),
        ),
        RuntimeBackend::Mono => files.push(base.join(VALUE_TUPLE_BRIDGE)),
        RuntimeBackend::Il2Cpp => {}
    }

    files
}

/// Directory holding the game assemblies to reference
pub fn managed_dir(info: &GameInfo) -> PathBuf {
    match info.backend {
        RuntimeBackend::Il2Cpp if info.is_framework_v6_plus() => {
            info.framework_root().join("Il2CppAssemblies")
        }
        RuntimeBackend::Il2Cpp => info.framework_root().join("Managed"),
        RuntimeBackend::Mono => info.data_path.join("Managed"),
    }
}

/// Whether an assembly is supplied by the target framework
pub fn is_blacklisted(file_name: &str) -> bool {
    BLACKLIST.contains(&file_name) || file_name.starts_with("System")
}

/// All non-platform `.dll` files in `dir`, sorted by file name
pub fn sweep_managed(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "managed assembly folder unreadable");
            return Vec::new();
        }
    };

    let mut assemblies: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| {
            let is_dll = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("dll"));
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            is_dll && !is_blacklisted(name)
        })
        .collect();

    assemblies.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    assemblies
}

/// Render references as MSBuild `<Reference>` items for a `.csproj`
pub fn render_msbuild_items(references: &[PathBuf]) -> String {
    references
        .iter()
        .map(|path| {
            let include = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!(
                "\t\t<Reference Include=\"{}\">\n\t\t\t<HintPath>{}</HintPath>\n\t\t</Reference>",
                xml_escape(&include),
                xml_escape(&path.display().to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape text for an XML attribute or element body
pub fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
