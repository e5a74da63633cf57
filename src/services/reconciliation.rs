// 照合エンジン
//
// ソースストアからデスティネーションストアへの一回限りのコピーを編成します。
// 5つのフェーズ（接続、スキーマ同期、取得、複製、コミット）を厳密に順番に
// 実行し、分岐の巻き戻しはありません。並列処理・リトライ・タイムアウトは
// 一切行わず、どのフェーズの失敗も実行全体に対して致命的です。
//
// 中心的な保証: 実行後のデスティネーションは、(a) 実行前の内容にソースの
// 全レコードがキー単位でマージされた状態（原子的にコミット済み）か、
// (b) 実行前と観測上まったく同じ状態のいずれかであり、中間状態には
// なりません。

use crate::adapters::record_store::{RecordStore, SqlRecordStore};
use crate::core::config::Config;
use crate::core::error::{Phase, ReconcileError};
use chrono::{Duration, Utc};
use tracing::{debug, info};

/// 照合実行の結果
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    /// 移行されたレコード数（0を含む）
    pub migrated: usize,
    /// 実行時間
    pub duration: Duration,
}

/// 照合エンジン
///
/// 接続済みの2つのストアを所有し、実行終了時（成功・失敗を問わず）に
/// 両方のストアを解放します。
pub struct ReconciliationEngine<S: RecordStore, D: RecordStore> {
    source: S,
    dest: D,
}

impl<S: RecordStore, D: RecordStore> ReconciliationEngine<S, D> {
    /// 接続済みのストアからエンジンを作成
    ///
    /// # Arguments
    ///
    /// * `source` - ソースストア（エンジンからは読み取り専用）
    /// * `dest` - デスティネーションストア（実行中はエンジンが排他的に書き込む）
    pub fn new(source: S, dest: D) -> Self {
        Self { source, dest }
    }

    /// 照合を実行
    ///
    /// すべての終了経路で両ストアを解放します。
    pub async fn run(self) -> Result<ReconcileReport, ReconcileError> {
        let started = Utc::now();

        let result = Self::run_phases(&self.source, &self.dest).await;

        // 終了経路を問わず、所有するストアを解放する
        self.source.close().await;
        self.dest.close().await;

        result.map(|migrated| ReconcileReport {
            migrated,
            duration: Utc::now().signed_duration_since(started),
        })
    }

    /// 接続後のフェーズ（スキーマ同期、取得、複製、コミット）を実行
    async fn run_phases(source: &S, dest: &D) -> Result<usize, ReconcileError> {
        // SchemaSync: デスティネーションのみ。ソースのスキーマは常に正しい前提で、
        // 変更されることはない。
        dest.ensure_schema()
            .await
            .map_err(|e| ReconcileError::new(Phase::SchemaSync, e))?;
        debug!("Destination schema ensured");

        // Fetching: ソースの全レコードを取得
        let records = source
            .fetch_all()
            .await
            .map_err(|e| ReconcileError::new(Phase::Fetching, e))?;
        debug!(count = records.len(), "Fetched source records");

        // 空の結果は有効であり、トランザクションを開かずにDoneへ遷移する
        if records.is_empty() {
            info!("Nothing to migrate");
            return Ok(0);
        }

        // Replicating: 単一トランザクション内で、取得順にアップサートする
        let mut tx = dest
            .begin()
            .await
            .map_err(|e| ReconcileError::new(Phase::Replicating, e))?;

        for record in &records {
            if let Err(e) = tx.upsert(record).await {
                // 最初の失敗で残りを打ち切り、ロールバックして中断する。
                // 部分コミットは決して起こらない。
                tx.rollback().await;
                return Err(ReconcileError::new(Phase::Replicating, e));
            }
        }

        // Done: コミット成功後にのみ永続性を保証する
        tx.commit()
            .await
            .map_err(|e| ReconcileError::new(Phase::Commit, e))?;

        info!(count = records.len(), "Reconciliation committed");

        Ok(records.len())
    }
}

/// 設定から照合を実行
///
/// Connectingフェーズ（両ストアへの接続）を行い、接続済みのストアを
/// エンジンに引き渡します。接続失敗は致命的であり、リトライしません。
pub async fn run(config: &Config) -> Result<ReconcileReport, ReconcileError> {
    let source = SqlRecordStore::connect(&config.source_url)
        .await
        .map_err(|e| ReconcileError::new(Phase::Connecting, e))?;

    let dest = match SqlRecordStore::connect(&config.dest_url).await {
        Ok(dest) => dest,
        Err(e) => {
            // ソース側は開いているため、中断経路でも解放する
            source.close().await;
            return Err(ReconcileError::new(Phase::Connecting, e));
        }
    };

    ReconciliationEngine::new(source, dest).run().await
}
