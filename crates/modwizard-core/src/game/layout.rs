//! Inspection of a Unity game installation with MelonLoader present

use super::file_version::{FileVersionReader, PeVersionReader};
use super::version::FrameworkVersion;
use crate::error::{Result, WizardError};
use std::fmt;
use std::path::{Path, PathBuf};

/// MelonLoader's installation directory, relative to the game root
pub const FRAMEWORK_DIR: &str = "MelonLoader";
/// Core assembly, also the version probe
pub const CORE_ASSEMBLY: &str = "MelonLoader.dll";

pub const UNKNOWN_DEVELOPER: &str = "Unknown Developer";
pub const UNKNOWN_GAME: &str = "Unknown Game";

/// First release with the per-runtime `net35`/`net6` layout
pub const V6: FrameworkVersion = FrameworkVersion::new(0, 6, 0);

/// Which managed runtime the game runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeBackend {
    /// Mono/.NET, assemblies in `<Game>_Data/Managed`
    Mono,
    /// Ahead-of-time IL2CPP, detected by `global-metadata.dat`
    Il2Cpp,
}

impl RuntimeBackend {
    /// Subdirectory of `MelonLoader/` holding this backend's loader build
    pub fn framework_subdir(&self) -> &'static str {
        match self {
            RuntimeBackend::Mono => "net35",
            RuntimeBackend::Il2Cpp => "net6",
        }
    }

    /// Target framework moniker for the generated project
    pub fn target_framework(&self) -> &'static str {
        match self {
            RuntimeBackend::Mono => "net35",
            RuntimeBackend::Il2Cpp => "net6.0",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RuntimeBackend::Mono => "Mono",
            RuntimeBackend::Il2Cpp => "IL2CPP",
        }
    }
}

impl fmt::Display for RuntimeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Everything the scaffolder knows about the selected game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInfo {
    pub path: PathBuf,
    pub data_path: PathBuf,
    pub exe_path: PathBuf,
    pub is_unity_game: bool,
    pub has_framework_installed: bool,
    pub backend: RuntimeBackend,
    pub framework_version: FrameworkVersion,
    pub game_developer: String,
    pub game_name: String,
}

impl GameInfo {
    pub fn framework_root(&self) -> PathBuf {
        self.path.join(FRAMEWORK_DIR)
    }

    pub fn is_framework_v6_plus(&self) -> bool {
        self.framework_version >= V6
    }

    pub fn is_il2cpp(&self) -> bool {
        self.backend == RuntimeBackend::Il2Cpp
    }
}

/// Inspect a game executable using the PE version reader
pub fn inspect(exe_path: &Path) -> Result<GameInfo> {
    GameLayoutInspector::new(PeVersionReader).inspect(exe_path)
}

/// Derives [`GameInfo`] from the files around a game executable
pub struct GameLayoutInspector<R: FileVersionReader> {
    reader: R,
}

impl<R: FileVersionReader> GameLayoutInspector<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn inspect(&self, exe_path: &Path) -> Result<GameInfo> {
        let game_dir = exe_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let data_path = data_dir_for(exe_path);

        if !data_path.is_dir() {
            return Err(WizardError::invalid_layout(
                exe_path,
                "Selected path does not contain a Unity game Data folder.",
            ));
        }

        let framework_root = game_dir.join(FRAMEWORK_DIR);
        if !framework_root.is_dir() {
            return Err(WizardError::invalid_layout(
                exe_path,
                "MelonLoader is not installed in the selected game directory.",
            ));
        }

        let backend = detect_backend(&data_path);
        let probe = framework_root
            .join(backend.framework_subdir())
            .join(CORE_ASSEMBLY);
        let framework_version = FrameworkVersion::parse(&self.reader.read_version(&probe));

        let (game_developer, game_name) = read_app_info(&data_path).unwrap_or_else(|| {
            (UNKNOWN_DEVELOPER.to_string(), UNKNOWN_GAME.to_string())
        });

        tracing::debug!(
            game = %game_dir.display(),
            %backend,
            version = %framework_version,
            "inspected game layout"
        );

        Ok(GameInfo {
            path: game_dir,
            data_path,
            exe_path: exe_path.to_path_buf(),
            is_unity_game: true,
            has_framework_installed: true,
            backend,
            framework_version,
            game_developer,
            game_name,
        })
    }
}

/// `<dir>/<exe stem>_Data`
pub fn data_dir_for(exe_path: &Path) -> PathBuf {
    let stem = exe_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    exe_path.with_file_name(format!("{}_Data", stem))
}

fn detect_backend(data_path: &Path) -> RuntimeBackend {
    let metadata = data_path
        .join("il2cpp_data")
        .join("Metadata")
        .join("global-metadata.dat");
    if metadata.is_file() {
        RuntimeBackend::Il2Cpp
    } else {
        RuntimeBackend::Mono
    }
}

/// Developer and game name from `app.info`, if it has both lines
fn read_app_info(data_path: &Path) -> Option<(String, String)> {
    let app_info = data_path.join("app.info");
    let content = match std::fs::read_to_string(&app_info) {
        Ok(content) => content,
        Err(e) => {
            if app_info.exists() {
                tracing::warn!(path = %app_info.display(), error = %e, "unreadable app.info");
            }
            return None;
        }
    };

    let mut lines = content.lines().filter(|line| !line.trim().is_empty());
    let developer = lines.next()?;
    let name = lines.next()?;
    Some((developer.to_string(), name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct FixedVersion(&'static str);

    impl FileVersionReader for FixedVersion {
        fn read_version(&self, _path: &Path) -> String {
            self.0.to_string()
        }
    }

    fn mono_game(temp: &TempDir) -> PathBuf {
        let root = temp.path();
        fs::create_dir_all(root.join("Game_Data/Managed")).unwrap();
        fs::create_dir_all(root.join("MelonLoader/net35")).unwrap();
        fs::write(root.join("Game.exe"), b"").unwrap();
        root.join("Game.exe")
    }

    #[test]
    fn test_inspects_mono_game() {
        let temp = TempDir::new().unwrap();
        let exe = mono_game(&temp);

        let info = GameLayoutInspector::new(FixedVersion("0.6.1.0"))
            .inspect(&exe)
            .unwrap();

        assert_eq!(info.path, temp.path());
        assert_eq!(info.data_path, temp.path().join("Game_Data"));
        assert_eq!(info.exe_path, exe);
        assert_eq!(info.backend, RuntimeBackend::Mono);
        assert_eq!(info.framework_version, FrameworkVersion::new(0, 6, 1));
        assert!(info.is_framework_v6_plus());
        assert!(info.is_unity_game && info.has_framework_installed);
        assert_eq!(info.game_developer, UNKNOWN_DEVELOPER);
        assert_eq!(info.game_name, UNKNOWN_GAME);
    }

    #[test]
    fn test_detects_il2cpp_backend() {
        let temp = TempDir::new().unwrap();
        let exe = mono_game(&temp);
        let metadata = temp.path().join("Game_Data/il2cpp_data/Metadata");
        fs::create_dir_all(&metadata).unwrap();
        fs::write(metadata.join("global-metadata.dat"), b"\xAF\x1B\xB1\xFA").unwrap();

        let info = GameLayoutInspector::new(FixedVersion("0.5.7"))
            .inspect(&exe)
            .unwrap();
        assert_eq!(info.backend, RuntimeBackend::Il2Cpp);
        assert!(!info.is_framework_v6_plus());
    }

    #[test]
    fn test_probes_backend_specific_core_assembly() {
        struct RecordingReader(std::cell::RefCell<Vec<PathBuf>>);
        impl FileVersionReader for RecordingReader {
            fn read_version(&self, path: &Path) -> String {
                self.0.borrow_mut().push(path.to_path_buf());
                "0.6.0".to_string()
            }
        }

        let temp = TempDir::new().unwrap();
        let exe = mono_game(&temp);
        let inspector = GameLayoutInspector::new(RecordingReader(Default::default()));
        inspector.inspect(&exe).unwrap();

        assert_eq!(
            inspector.reader.0.borrow().as_slice(),
            &[temp.path().join("MelonLoader/net35/MelonLoader.dll")]
        );
    }

    #[test]
    fn test_missing_data_dir_is_invalid_layout() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("MelonLoader")).unwrap();
        // a data folder for a different executable does not count
        fs::create_dir_all(temp.path().join("Other_Data")).unwrap();

        let err = GameLayoutInspector::new(FixedVersion("0.6.0"))
            .inspect(&temp.path().join("Game.exe"))
            .unwrap_err();
        assert!(matches!(err, WizardError::InvalidLayout { .. }));
        assert!(err.to_string().contains("Data folder"));
    }

    #[test]
    fn test_missing_framework_is_invalid_layout() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Game_Data")).unwrap();

        let err = GameLayoutInspector::new(FixedVersion("0.6.0"))
            .inspect(&temp.path().join("Game.exe"))
            .unwrap_err();
        assert!(matches!(err, WizardError::InvalidLayout { .. }));
        assert!(err.to_string().contains("MelonLoader is not installed"));
    }

    #[test]
    fn test_reads_app_info_skipping_blank_lines() {
        let temp = TempDir::new().unwrap();
        let exe = mono_game(&temp);
        fs::write(
            temp.path().join("Game_Data/app.info"),
            "\r\nStudio Name\r\n\r\nGreat Game\r\n",
        )
        .unwrap();

        let info = GameLayoutInspector::new(FixedVersion("0.6.0"))
            .inspect(&exe)
            .unwrap();
        assert_eq!(info.game_developer, "Studio Name");
        assert_eq!(info.game_name, "Great Game");
    }

    #[test]
    fn test_single_line_app_info_keeps_sentinels() {
        let temp = TempDir::new().unwrap();
        let exe = mono_game(&temp);
        fs::write(temp.path().join("Game_Data/app.info"), "Studio Only\n").unwrap();

        let info = GameLayoutInspector::new(FixedVersion("0.6.0"))
            .inspect(&exe)
            .unwrap();
        assert_eq!(info.game_developer, UNKNOWN_DEVELOPER);
        assert_eq!(info.game_name, UNKNOWN_GAME);
    }

    #[test]
    fn test_unreadable_version_defaults_to_zero() {
        let temp = TempDir::new().unwrap();
        let exe = mono_game(&temp);

        let info = inspect(&exe).unwrap();
        assert_eq!(info.framework_version, FrameworkVersion::default());
        assert!(!info.is_framework_v6_plus());
    }

    #[test]
    fn test_reads_version_from_core_assembly() {
        let temp = TempDir::new().unwrap();
        let exe = mono_game(&temp);
        fs::write(
            temp.path().join("MelonLoader/net35/MelonLoader.dll"),
            crate::game::file_version::tests::pe_with_version(0, 6, 1, 0),
        )
        .unwrap();

        let info = inspect(&exe).unwrap();
        assert_eq!(info.framework_version, FrameworkVersion::new(0, 6, 1));
        assert!(info.is_framework_v6_plus());
    }

    #[test]
    fn test_data_dir_strips_extension() {
        assert_eq!(
            data_dir_for(Path::new("/games/Some Game/Some Game.exe")),
            PathBuf::from("/games/Some Game/Some Game_Data")
        );
        assert_eq!(
            data_dir_for(Path::new("/games/linux/Game.x86_64")),
            PathBuf::from("/games/linux/Game_Data")
        );
    }
}
