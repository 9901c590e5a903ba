use std::path::Path;

/// Extensions scanned by the secret detector.
const TEXT_LIKE: &[&str] = &["py", "js", "ts", "yml", "yaml", "json"];

/// Check if a file has one of the given extensions
pub fn has_extension(p: &Path, extensions: &[&str]) -> bool {
    p.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}

/// Check if a file is text-like enough to scan for secrets
pub fn is_text_like(p: &Path) -> bool {
    has_extension(p, TEXT_LIKE)
}

/// File name as UTF-8, empty when the name is not representable
pub fn file_name(p: &Path) -> &str {
    p.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

/// Read a file, replacing invalid UTF-8 sequences
pub fn read_lossy(p: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(p)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Render a relative path with forward slashes so reports are stable across platforms
pub fn display_relative(p: &Path) -> String {
    p.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_is_text_like() {
        assert!(is_text_like(Path::new("app/settings.py")));
        assert!(is_text_like(Path::new("deploy.yml")));
        assert!(is_text_like(Path::new("package.json")));
        assert!(!is_text_like(Path::new("README.md")));
        assert!(!is_text_like(Path::new("Makefile")));
    }

    #[test]
    fn test_display_relative() {
        let p: PathBuf = ["src", "pkg", "mod.py"].iter().collect();
        assert_eq!(display_relative(&p), "src/pkg/mod.py");
    }
}
