//! Plain-text report of an inspected game

use crate::game::references::managed_dir;
use crate::game::GameInfo;
use colored::Colorize;
use std::fmt::Write;
use std::path::PathBuf;

/// Render what was detected about a game and which assemblies a project
/// for it would reference
pub fn inspection_report(info: &GameInfo, references: &[PathBuf]) -> String {
    let mut out = String::new();
    let field = |label: &str| format!("{:>18}", label).dimmed();

    let _ = writeln!(out, "{}", "Game".cyan().bold());
    let _ = writeln!(out, "{} {}", field("Executable"), info.exe_path.display());
    let _ = writeln!(out, "{} {}", field("Data folder"), info.data_path.display());
    let _ = writeln!(out, "{} {}", field("Developer"), info.game_developer);
    let _ = writeln!(out, "{} {}", field("Name"), info.game_name);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "MelonLoader".cyan().bold());
    let _ = writeln!(out, "{} {}", field("Version"), info.framework_version);
    let _ = writeln!(out, "{} {}", field("Runtime"), info.backend);
    let _ = writeln!(
        out,
        "{} {}",
        field("Target framework"),
        info.backend.target_framework()
    );
    let _ = writeln!(
        out,
        "{} {}",
        field("Assemblies from"),
        managed_dir(info).display()
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} ({})",
        "References".cyan().bold(),
        references.len()
    );
    for reference in references {
        let _ = writeln!(out, "  {} {}", "->".blue(), reference.display());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{FrameworkVersion, RuntimeBackend};

    #[test]
    fn test_report_lists_everything() {
        colored::control::set_override(false);
        let info = GameInfo {
            path: PathBuf::from("/g"),
            data_path: PathBuf::from("/g/Game_Data"),
            exe_path: PathBuf::from("/g/Game.exe"),
            is_unity_game: true,
            has_framework_installed: true,
            backend: RuntimeBackend::Il2Cpp,
            framework_version: FrameworkVersion::new(0, 6, 1),
            game_developer: "Dev".to_string(),
            game_name: "Name".to_string(),
        };

        let report = inspection_report(&info, &[PathBuf::from("/g/MelonLoader/net6/0Harmony.dll")]);

        assert!(report.contains("0.6.1"));
        assert!(report.contains("IL2CPP"));
        assert!(report.contains("net6.0"));
        assert!(report.contains("References (1)"));
        assert!(report.contains("0Harmony.dll"));
    }
}
