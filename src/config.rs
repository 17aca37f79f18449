use crate::error::{Result, VisitReportError};
use crate::export::ReportOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use visit_report_common::BrandingAssets;

/// ロゴ未設定時にカレントディレクトリから探すファイル
pub const DEFAULT_LOGO_FILE: &str = "logo_placeholder.png";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub consultant: String,
    pub organization: String,
    pub logo_path: Option<PathBuf>,
    pub signature_path: Option<PathBuf>,
    pub show_anniversary_banner: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| VisitReportError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("visit-report").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            consultant: "Your Name".into(),
            organization: "Comtécnica Agro".into(),
            logo_path: None,
            signature_path: None,
            show_anniversary_banner: true,
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            show_anniversary_banner: self.show_anniversary_banner,
            ..Default::default()
        }
    }

    /// ロゴ・署名を読み込む（読めないファイルは無いものとして扱う）
    ///
    /// ロゴ未設定なら `base_dir/logo_placeholder.png` を使う。
    pub fn load_branding(&self, base_dir: &Path) -> BrandingAssets {
        let logo_path = self.logo_path.clone().or_else(|| {
            let fallback = base_dir.join(DEFAULT_LOGO_FILE);
            fallback.exists().then_some(fallback)
        });

        BrandingAssets {
            logo: logo_path.as_deref().and_then(|p| read_asset(p, "ロゴ")),
            signature: self
                .signature_path
                .as_deref()
                .and_then(|p| read_asset(p, "署名")),
        }
    }
}

fn read_asset(path: &Path, kind: &str) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "{}画像を読み込めません", kind);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_returns_default() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config.organization, "Comtécnica Agro");
        assert!(config.show_anniversary_banner);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.consultant = "Maria".into();
        config.show_anniversary_banner = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.consultant, "Maria");
        assert!(!loaded.show_anniversary_banner);
        assert!(!loaded.report_options().show_anniversary_banner);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"consultant": "João"}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.consultant, "João");
        assert_eq!(loaded.organization, "Comtécnica Agro");
    }

    #[test]
    fn test_branding_fallback_logo() {
        let dir = tempdir().unwrap();
        let config = Config::default();
        assert!(config.load_branding(dir.path()).logo.is_none());

        std::fs::write(dir.path().join(DEFAULT_LOGO_FILE), b"logo").unwrap();
        let branding = config.load_branding(dir.path());
        assert_eq!(branding.logo.as_deref(), Some(&b"logo"[..]));
        assert!(branding.signature.is_none());
    }

    #[test]
    fn test_branding_missing_file_is_absent() {
        let dir = tempdir().unwrap();
        let config = Config {
            signature_path: Some(dir.path().join("missing.png")),
            ..Default::default()
        };
        assert!(config.load_branding(dir.path()).signature.is_none());
    }
}
