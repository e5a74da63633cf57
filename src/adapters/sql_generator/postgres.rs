// PostgreSQL用SQLジェネレーター
//
// レコードテーブルに対するPostgreSQL用のSQL文を生成します。
// プレースホルダーは `$1` 形式を使用します。

use crate::core::record::RECORDS_TABLE;

/// レコードテーブル作成のDDL文を生成
pub fn create_records_table_sql() -> String {
    format!(
        r#"CREATE TABLE IF NOT EXISTS {} (
    id BIGINT PRIMARY KEY,
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
        "INSERT INTO {} (id, name) VALUES ($1, $2) ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name",
        RECORDS_TABLE
    )
}

/// 全レコード取得のSELECT文を生成
pub fn fetch_all_records_sql() -> String {
    format!("SELECT id, name FROM {} ORDER BY id", RECORDS_TABLE)
}
