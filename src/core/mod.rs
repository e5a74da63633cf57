// コアドメインモジュール
//
// 設定、レコードモデル、エラー型を提供します。

pub mod config;
pub mod error;
pub mod record;
