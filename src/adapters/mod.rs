// アダプターモジュール
//
// レコードストア（リレーショナルバックエンド）へのアクセスを抽象化します。

pub mod connection_string;
pub mod record_store;
pub mod sql_generator;
