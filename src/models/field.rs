use serde::{Deserialize, Serialize};

/// `/rest/api/2/field` が返すフィールド定義
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orderable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub searchable: Option<bool>,
}

/// ダウンロード対象フィールドの設定。
///
/// `include` と `include_history` は独立したフラグで、値は取得しないが
/// 履歴だけ追う、という設定も許される。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSelection {
    pub id: String,
    pub name: String,
    pub include: bool,
    pub include_history: bool,
}

impl FieldSelection {
    /// サーバーのフィールド定義から未選択状態のエントリを作成
    pub fn from_field(field: &Field) -> Self {
        Self {
            id: field.id.clone(),
            name: field.name.clone(),
            include: false,
            include_history: false,
        }
    }
}
