use super::Issue;
use serde::{Deserialize, Serialize};

/// 検索リクエストで要求するフィールドの指定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FieldsParam {
    /// 全フィールド（`*all`）
    All,
    /// フィールドIDの明示リスト
    Ids(Vec<String>),
}

impl FieldsParam {
    /// `fields` クエリパラメータの値（エンコード前）を組み立てる
    pub fn to_param(&self) -> String {
        match self {
            FieldsParam::All => "*all".to_string(),
            FieldsParam::Ids(ids) => ids.join(","),
        }
    }
}

/// 1回の実行を通して不変な検索条件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// JQLクエリ文字列
    pub jql: String,
    /// 要求するフィールド
    pub fields: FieldsParam,
    /// 変更履歴（changelog）を展開して取得するかどうか
    pub expand_changelog: bool,
}

impl SearchQuery {
    pub fn new(jql: impl Into<String>) -> Self {
        Self {
            jql: jql.into(),
            fields: FieldsParam::All,
            expand_changelog: false,
        }
    }

    pub fn fields(mut self, ids: Vec<String>) -> Self {
        self.fields = FieldsParam::Ids(ids);
        self
    }

    pub fn all_fields(mut self) -> Self {
        self.fields = FieldsParam::All;
        self
    }

    pub fn expand_changelog(mut self, expand: bool) -> Self {
        self.expand_changelog = expand;
        self
    }
}

/// `/rest/api/2/search` のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "startAt")]
    pub start_at: u32,

    #[serde(rename = "maxResults")]
    pub max_results: u32,

    pub total: u32,

    pub issues: Vec<Issue>,
}
