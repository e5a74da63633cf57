// エラー型定義
//
// アプリケーション全体で使用されるカスタムエラー型を提供します。
// thiserrorを使用して、StoreError と ReconcileError を定義します。
// すべてのエラーは実行に対して致命的であり、自動リトライは行いません。

use thiserror::Error;

/// レコードストアエラー
///
/// レコードストアの操作時に発生するエラーを表現します。
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection error (unreachable host, bad credentials, malformed descriptor)
    #[error("Connection error: {message} (cause: {cause})")]
    Connection {
        /// エラーメッセージ
        message: String,
        /// エラー原因
        cause: String,
    },

    /// Schema error (cannot create or verify the records table)
    #[error("Schema error: {message} (cause: {cause})")]
    Schema {
        /// エラーメッセージ
        message: String,
        /// エラー原因
        cause: String,
    },

    /// Query error (read failure against a store)
    #[error("Query error: {message}")]
    Query {
        /// エラーメッセージ
        message: String,
        /// 失敗したSQL
        sql: Option<String>,
    },

    /// Constraint error (a single upsert violated a constraint)
    #[error("Constraint error: {message} (cause: {cause})")]
    Constraint {
        /// エラーメッセージ
        message: String,
        /// エラー原因
        cause: String,
    },

    /// Transaction error (failed to open a transaction)
    #[error("Transaction error: {message}")]
    Transaction {
        /// エラーメッセージ
        message: String,
    },

    /// Commit error (durability is only claimed after a successful commit)
    #[error("Commit error: {message}")]
    Commit {
        /// エラーメッセージ
        message: String,
    },
}

impl StoreError {
    /// 接続エラーかどうか
    pub fn is_connection(&self) -> bool {
        matches!(self, StoreError::Connection { .. })
    }

    /// スキーマエラーかどうか
    pub fn is_schema(&self) -> bool {
        matches!(self, StoreError::Schema { .. })
    }

    /// クエリエラーかどうか
    pub fn is_query(&self) -> bool {
        matches!(self, StoreError::Query { .. })
    }

    /// 制約エラーかどうか
    pub fn is_constraint(&self) -> bool {
        matches!(self, StoreError::Constraint { .. })
    }

    /// トランザクションエラーかどうか
    pub fn is_transaction(&self) -> bool {
        matches!(self, StoreError::Transaction { .. })
    }

    /// コミットエラーかどうか
    pub fn is_commit(&self) -> bool {
        matches!(self, StoreError::Commit { .. })
    }
}

/// 照合実行のフェーズ
///
/// エンジンは5つのフェーズを厳密に順番に通過します。
/// どのフェーズで失敗したかをエラーメッセージで特定できるようにします。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// ソース・デスティネーション両ストアへの接続
    Connecting,
    /// デスティネーションのスキーマ同期
    SchemaSync,
    /// ソースからの全レコード取得
    Fetching,
    /// トランザクション内でのレコード複製
    Replicating,
    /// トランザクションのコミット
    Commit,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Connecting => write!(f, "connecting"),
            Phase::SchemaSync => write!(f, "schema sync"),
            Phase::Fetching => write!(f, "fetching"),
            Phase::Replicating => write!(f, "replicating"),
            Phase::Commit => write!(f, "commit"),
        }
    }
}

/// 照合エラー
///
/// 照合実行の失敗を表現します。失敗したフェーズと原因を保持します。
#[derive(Debug, Error)]
#[error("Reconciliation aborted during {phase}: {source}")]
pub struct ReconcileError {
    /// 失敗したフェーズ
    pub phase: Phase,
    /// 原因となったストアエラー
    #[source]
    pub source: StoreError,
}

impl ReconcileError {
    /// 新しい照合エラーを作成
    pub fn new(phase: Phase, source: StoreError) -> Self {
        Self { phase, source }
    }

    /// 失敗したフェーズを取得
    pub fn phase(&self) -> Phase {
        self.phase
    }
}
