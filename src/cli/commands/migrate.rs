// migrateコマンドハンドラー
//
// 一回限りの照合実行を実装します。
// - ソース・デスティネーション両ストアへの接続
// - デスティネーションのスキーマ同期
// - 単一トランザクション内での全レコード複製
// - 実行結果サマリーの表示

use crate::core::config::Config;
use crate::services::reconciliation::{self, ReconcileReport};
use anyhow::Result;
use colored::Colorize;

/// migrateコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct MigrateCommand {
    /// ソースストアの接続記述子（CLIフラグ、未指定時は環境変数）
    pub source_url: Option<String>,
    /// デスティネーションストアの接続記述子（CLIフラグ、未指定時は環境変数）
    pub dest_url: Option<String>,
}

/// migrateコマンドハンドラー
#[derive(Debug, Clone)]
pub struct MigrateCommandHandler {}

impl MigrateCommandHandler {
    /// 新しいMigrateCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// migrateコマンドを実行
    ///
    /// # Arguments
    ///
    /// * `command` - migrateコマンドのパラメータ
    ///
    /// # Returns
    ///
    /// 成功時は移行結果のサマリー、失敗時は失敗フェーズと原因を示すエラー
    pub async fn execute(&self, command: &MigrateCommand) -> Result<String> {
        let config = Config::resolve(command.source_url.clone(), command.dest_url.clone())?;

        let report = reconciliation::run(&config).await?;

        Ok(self.generate_summary(&report))
    }

    /// 実行結果のサマリーを生成
    fn generate_summary(&self, report: &ReconcileReport) -> String {
        let mut summary = String::from("=== Reconciliation Complete ===\n");

        if report.migrated == 0 {
            summary.push_str("Nothing to migrate: the source store has no records.\n");
        } else {
            summary.push_str(&format!(
                "{} {} record(s) migrated\n",
                "✓".green(),
                report.migrated
            ));
        }

        summary.push_str(&format!(
            "\nTotal execution time: {}ms\n",
            report.duration.num_milliseconds()
        ));

        summary
    }
}

impl Default for MigrateCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
