// SQLite用SQLジェネレーター
//
// レコードテーブルに対するSQLite用のSQL文を生成します。
// プレースホルダーは `?` を使用します。

use crate::core::record::RECORDS_TABLE;

/// レコードテーブル作成のDDL文を生成
pub fn create_records_table_sql() -> String {
    format!(
        r#"CREATE TABLE IF NOT EXISTS {} (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
)"#,
        RECORDS_TABLE
    )
}

/// レコードのアップサート文を生成
///
/// 競合時は `name` のみを上書きします（競合キーの `id` は保持）。
pub fn upsert_record_sql() -> String {
    format!(
        "INSERT INTO {} (id, name) VALUES (?, ?) ON CONFLICT(id) DO UPDATE SET name = excluded.name",
        RECORDS_TABLE
    )
}

/// 全レコード取得のSELECT文を生成
pub fn fetch_all_records_sql() -> String {
    format!("SELECT id, name FROM {} ORDER BY id", RECORDS_TABLE)
}
