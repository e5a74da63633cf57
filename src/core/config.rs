// 設定管理
//
// 環境変数とCLIフラグからのストア接続記述子の読み込み、検証、
// データベース方言の定義を行います。
// 接続記述子は不透明なURL文字列として扱い、スキームのみを解釈します。

use anyhow::{anyhow, Context, Result};
use std::env;

/// ソースストアの接続記述子を指定する環境変数
pub const SOURCE_URL_ENV: &str = "SOURCE_DATABASE_URL";

/// デスティネーションストアの接続記述子を指定する環境変数
pub const DEST_URL_ENV: &str = "DEST_DATABASE_URL";

/// HTTPサービスのバインドアドレスを指定する環境変数
pub const HTTP_ADDR_ENV: &str = "FERRY_HTTP_ADDR";

/// HTTPサービスのデフォルトバインドアドレス
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

/// データベース方言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    PostgreSQL,
    MySQL,
    SQLite,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::PostgreSQL => write!(f, "postgresql"),
            Dialect::MySQL => write!(f, "mysql"),
            Dialect::SQLite => write!(f, "sqlite"),
        }
    }
}

/// 照合実行の設定
///
/// ソースとデスティネーションの接続記述子を保持します。
/// CLIフラグが環境変数より優先されます。
#[derive(Debug, Clone)]
pub struct Config {
    /// ソースストアの接続記述子
    pub source_url: String,

    /// デスティネーションストアの接続記述子
    pub dest_url: String,
}

impl Config {
    /// CLIフラグと環境変数から設定を解決
    ///
    /// # Arguments
    ///
    /// * `source_url` - CLIで指定されたソース記述子（優先）
    /// * `dest_url` - CLIで指定されたデスティネーション記述子（優先）
    pub fn resolve(source_url: Option<String>, dest_url: Option<String>) -> Result<Self> {
        let config = Self {
            source_url: resolve_store_url(source_url, SOURCE_URL_ENV)?,
            dest_url: resolve_store_url(dest_url, DEST_URL_ENV)?,
        };
        config.validate()?;

        Ok(config)
    }

    /// 設定の妥当性を検証
    ///
    /// 接続記述子が空でないことのみを確認します。
    /// スキームの検証は接続時にアダプターが行います。
    pub fn validate(&self) -> Result<()> {
        if self.source_url.trim().is_empty() {
            return Err(anyhow!("Source store connection descriptor is empty"));
        }

        if self.dest_url.trim().is_empty() {
            return Err(anyhow!("Destination store connection descriptor is empty"));
        }

        Ok(())
    }
}

/// ストア接続記述子を解決
///
/// CLIフラグが環境変数より優先されます。どちらも無い場合はエラーです。
pub fn resolve_store_url(flag: Option<String>, env_name: &str) -> Result<String> {
    let url = match flag {
        Some(url) => url,
        None => env::var(env_name).with_context(|| format!("{} is not set", env_name))?,
    };

    if url.trim().is_empty() {
        return Err(anyhow!("Store connection descriptor is empty"));
    }

    Ok(url)
}

/// HTTPサービスのバインドアドレスを解決
///
/// CLIフラグ、環境変数、デフォルト値の順に解決します。
pub fn resolve_http_addr(addr: Option<String>) -> String {
    addr.or_else(|| env::var(HTTP_ADDR_ENV).ok())
        .unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_display() {
        assert_eq!(Dialect::PostgreSQL.to_string(), "postgresql");
        assert_eq!(Dialect::MySQL.to_string(), "mysql");
        assert_eq!(Dialect::SQLite.to_string(), "sqlite");
    }

    #[test]
    fn test_resolve_prefers_cli_flags() {
        let config = Config::resolve(
            Some("sqlite:///tmp/source.db".to_string()),
            Some("sqlite:///tmp/dest.db".to_string()),
        )
        .unwrap();

        assert_eq!(config.source_url, "sqlite:///tmp/source.db");
        assert_eq!(config.dest_url, "sqlite:///tmp/dest.db");
    }

    #[test]
    fn test_validate_rejects_empty_source() {
        let config = Config {
            source_url: "".to_string(),
            dest_url: "sqlite:///tmp/dest.db".to_string(),
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_dest() {
        let config = Config {
            source_url: "sqlite:///tmp/source.db".to_string(),
            dest_url: "   ".to_string(),
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_http_addr_default() {
        // 環境変数に依存しないフラグ優先のケースのみ検証
        assert_eq!(
            resolve_http_addr(Some("127.0.0.1:9000".to_string())),
            "127.0.0.1:9000"
        );
    }
}
