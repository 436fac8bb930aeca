use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// JIRAから取得した課題レコード。
///
/// `fields` はサーバーが返すフィールドをそのまま保持する（どのフィールドを
/// 要求するかは実行時設定で決まるため、スキーマを固定しない）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_url: Option<String>,
    pub fields: HashMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog: Option<Changelog>,
}

/// 課題の変更履歴ブロック（`expand=changelog` 指定時のみ付与される）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Changelog {
    #[serde(rename = "startAt")]
    pub start_at: u32,
    #[serde(rename = "maxResults")]
    pub max_results: u32,
    pub total: u32,
    pub histories: Vec<History>,
}

/// 1回の変更操作（変更者・日時と、変更されたフィールドのリスト）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct History {
    pub id: String,
    /// 変更者情報。JIRA Server と Cloud で形が異なるためそのまま保持する
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<serde_json::Value>,
    pub created: DateTime<Utc>,
    pub items: Vec<HistoryItem>,
}

/// 1フィールド分の変更内容
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryItem {
    pub field: String,
    #[serde(rename = "fieldtype")]
    pub field_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(rename = "fromString")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(rename = "toString")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_string: Option<String>,
}
