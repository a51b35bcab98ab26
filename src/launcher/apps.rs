//! Friendly application names mapped to launch targets.

/// (friendly name, Windows target, other platforms target)
const APPLICATIONS: &[(&str, &str, &str)] = &[
    ("notepad", "notepad.exe", "gedit"),
    ("notepad++", "notepad++.exe", "notepad++"),
    ("word", "winword.exe", "libreoffice --writer"),
    ("excel", "excel.exe", "libreoffice --calc"),
    ("powerpoint", "powerpnt.exe", "libreoffice --impress"),
    ("outlook", "outlook.exe", "thunderbird"),
    ("calculator", "calc.exe", "gnome-calculator"),
    ("paint", "mspaint.exe", "pinta"),
    ("cmd", "cmd.exe", "x-terminal-emulator"),
    ("terminal", "cmd.exe", "x-terminal-emulator"),
    ("powershell", "powershell.exe", "pwsh"),
    ("chrome", "chrome.exe", "google-chrome"),
    ("firefox", "firefox.exe", "firefox"),
    ("edge", "msedge.exe", "microsoft-edge"),
    ("explorer", "explorer.exe", "nautilus"),
    ("task manager", "taskmgr.exe", "gnome-system-monitor"),
    ("control panel", "control.exe", "gnome-control-center"),
    ("vlc", "vlc.exe", "vlc"),
    ("media player", "wmplayer.exe", "totem"),
    ("photos", "ms-photos:", "eog"),
    ("camera", "microsoft.windows.camera:", "cheese"),
    ("settings", "ms-settings:", "gnome-control-center"),
    ("store", "ms-windows-store:", "gnome-software"),
];

/// Resolve a friendly name to a launch target; unknown names pass through trimmed
pub fn resolve_application(name: &str) -> String {
    let key = name.trim().to_lowercase();
    APPLICATIONS
        .iter()
        .find(|(friendly, _, _)| *friendly == key)
        .map(|(_, windows, other)| if cfg!(target_os = "windows") { *windows } else { *other })
        .map(str::to_string)
        .unwrap_or_else(|| name.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_resolve_case_insensitively() {
        let resolved = resolve_application("  Calculator ");
        if cfg!(target_os = "windows") {
            assert_eq!(resolved, "calc.exe");
        } else {
            assert_eq!(resolved, "gnome-calculator");
        }
    }

    #[test]
    fn test_unknown_names_pass_through() {
        assert_eq!(resolve_application(" blender "), "blender");
    }
}
