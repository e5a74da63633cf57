// レコードストアアダプター
//
// SQLxのAnyドライバーを使用して、方言の差異を統一されたコントラクトの裏に隠します。
// ストアの取得・解放は呼び出し側が明示的に所有し、プロセスグローバルな
// ハンドルは持ちません。接続失敗は型付きエラーとして呼び出し側に返します。

use crate::adapters::connection_string::dialect_from_descriptor;
use crate::adapters::sql_generator;
use crate::core::config::Dialect;
use crate::core::error::StoreError;
use crate::core::record::Record;
use async_trait::async_trait;
use sqlx::any::AnyPoolOptions;
use sqlx::{Any, AnyPool, Row, Transaction};
use std::time::Duration;
use tracing::debug;

/// レコードストアの統一コントラクト
///
/// エンジンはこのトレイトのみに依存し、バックエンドの方言を関知しません。
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// レコードテーブルを作成（存在しない場合のみ）
    ///
    /// 冪等な操作です。既に正しいスキーマが存在する場合は何もせず成功します。
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// 全レコードを主キー順で取得
    ///
    /// ページネーションは行いません。結果セット全体がメモリに収まることを
    /// 前提とした設計上のスケーリング境界です。
    async fn fetch_all(&self) -> Result<Vec<Record>, StoreError>;

    /// トランザクションを開始
    async fn begin(&self) -> Result<Box<dyn RecordTransaction>, StoreError>;

    /// 接続プールを解放
    ///
    /// 成功・失敗を問わず、すべての終了経路で呼び出されます。
    async fn close(&self);
}

/// レコードストアのトランザクション
#[async_trait]
pub trait RecordTransaction: Send {
    /// レコードをアップサート
    ///
    /// 同じ `id` の行が存在する場合は `name` のみを上書きし、
    /// 存在しない場合は新しい行を挿入します。
    async fn upsert(&mut self, record: &Record) -> Result<(), StoreError>;

    /// トランザクションをコミット
    ///
    /// 永続性はコミット成功後にのみ保証されます。
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    /// トランザクションをロールバック
    ///
    /// 観測可能な失敗はありません。内部の失敗はデバッグログに記録して破棄します。
    async fn rollback(self: Box<Self>);
}

/// SQLxベースのレコードストア
///
/// SQLite・PostgreSQL・MySQLを単一の実装でカバーし、
/// 方言固有のSQLはsql_generatorアダプターに委譲します。
#[derive(Debug, Clone)]
pub struct SqlRecordStore {
    pool: AnyPool,
    dialect: Dialect,
}

impl SqlRecordStore {
    /// 接続記述子からストアに接続
    ///
    /// 記述子が空または未知のスキームの場合、および接続先に到達できない場合は
    /// 接続エラーを返します。呼び出し側はこれを致命的として扱います（リトライなし）。
    ///
    /// # Arguments
    ///
    /// * `descriptor` - 不透明な接続記述子（URL文字列）
    pub async fn connect(descriptor: &str) -> Result<Self, StoreError> {
        let dialect = dialect_from_descriptor(descriptor)?;

        let pool = AnyPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(descriptor)
            .await
            .map_err(|e| StoreError::Connection {
                message: format!("レコードストアへの接続に失敗しました: {}", dialect),
                cause: e.to_string(),
            })?;

        // シンプルなクエリで接続を検証
        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(|e| StoreError::Connection {
                message: "レコードストアの接続検証に失敗しました".to_string(),
                cause: e.to_string(),
            })?;

        debug!(dialect = %dialect, "Connected to record store");

        Ok(Self { pool, dialect })
    }

    /// ストアのデータベース方言を取得
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
}

#[async_trait]
impl RecordStore for SqlRecordStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let sql = sql_generator::create_records_table_sql(self.dialect);

        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Schema {
                message: "レコードテーブルの作成に失敗しました".to_string(),
                cause: e.to_string(),
            })?;

        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<Record>, StoreError> {
        let sql = sql_generator::fetch_all_records_sql(self.dialect);

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Query {
                message: format!("レコードの取得に失敗しました: {}", e),
                sql: Some(sql.clone()),
            })?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: i64 = row.try_get(0).map_err(|e| StoreError::Query {
                message: format!("レコードのid列の読み取りに失敗しました: {}", e),
                sql: Some(sql.clone()),
            })?;
            let name: String = row.try_get(1).map_err(|e| StoreError::Query {
                message: format!("レコードのname列の読み取りに失敗しました: {}", e),
                sql: Some(sql.clone()),
            })?;

            records.push(Record { id, name });
        }

        Ok(records)
    }

    async fn begin(&self) -> Result<Box<dyn RecordTransaction>, StoreError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Transaction {
                message: format!("トランザクションの開始に失敗しました: {}", e),
            })?;

        Ok(Box::new(SqlRecordTransaction {
            tx,
            dialect: self.dialect,
        }))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// SQLxベースのトランザクション
struct SqlRecordTransaction {
    tx: Transaction<'static, Any>,
    dialect: Dialect,
}

#[async_trait]
impl RecordTransaction for SqlRecordTransaction {
    async fn upsert(&mut self, record: &Record) -> Result<(), StoreError> {
        let sql = sql_generator::upsert_record_sql(self.dialect);

        sqlx::query(&sql)
            .bind(record.id)
            .bind(&record.name)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| StoreError::Constraint {
                message: format!("レコード(id={})のアップサートに失敗しました", record.id),
                cause: e.to_string(),
            })?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(|e| StoreError::Commit {
            message: format!("トランザクションのコミットに失敗しました: {}", e),
        })
    }

    async fn rollback(self: Box<Self>) {
        if let Err(e) = self.tx.rollback().await {
            debug!(error = %e, "Rollback failed");
        }
    }
}
