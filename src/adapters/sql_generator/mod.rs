// SQL生成アダプター
//
// レコードテーブルに対する各データベース方言用のSQL文を生成するアダプター層。
// 方言固有の構文（アップサートの競合句、型名、プレースホルダー）をここに閉じ込め、
// エンジン側には方言分岐を持ち込みません。

pub mod mysql;
pub mod postgres;
pub mod sqlite;

use crate::core::config::Dialect;

/// レコードテーブル作成のDDL文を生成
///
/// 冪等なCREATE TABLE IF NOT EXISTS文を返します。
/// テーブルが既に存在する場合、実行しても構造は変更されません。
pub fn create_records_table_sql(dialect: Dialect) -> String {
    match dialect {
        Dialect::PostgreSQL => postgres::create_records_table_sql(),
        Dialect::MySQL => mysql::create_records_table_sql(),
        Dialect::SQLite => sqlite::create_records_table_sql(),
    }
}

/// レコードのアップサート文を生成
///
/// `id` を競合キーとし、競合時は `name` のみを上書きします。
/// パラメータは (id, name) の順でバインドします。
pub fn upsert_record_sql(dialect: Dialect) -> String {
    match dialect {
        Dialect::PostgreSQL => postgres::upsert_record_sql(),
        Dialect::MySQL => mysql::upsert_record_sql(),
        Dialect::SQLite => sqlite::upsert_record_sql(),
    }
}

/// 全レコード取得のSELECT文を生成
///
/// 主キー順で全件を返します。
pub fn fetch_all_records_sql(dialect: Dialect) -> String {
    match dialect {
        Dialect::PostgreSQL => postgres::fetch_all_records_sql(),
        Dialect::MySQL => mysql::fetch_all_records_sql(),
        Dialect::SQLite => sqlite::fetch_all_records_sql(),
    }
}
