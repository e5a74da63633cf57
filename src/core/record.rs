// レコードモデル
//
// 照合対象となる唯一のエンティティ（ユーザーIDの行）を定義します。
// `id` はストア間で安定した主キーであり、アップサートの競合キーとして使用されます。
// `name` は可変属性であり、一意性制約を持ちません。

use serde::{Deserialize, Serialize};

/// レコードが格納されるテーブル名
pub const RECORDS_TABLE: &str = "users";

/// ユーザーIDレコード
///
/// ソース・デスティネーション両ストアで同一のワイヤ形状
/// `{"id": <integer>, "name": <string>}` を持ちます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 主キー（ストア間で安定した識別子、アップサートの競合キー）
    pub id: i64,
    /// 可変属性（一意性制約なし）
    pub name: String,
}

impl Record {
    /// 新しいレコードを作成
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
