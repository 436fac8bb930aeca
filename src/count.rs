use crate::client::SearchApi;
use crate::error::{Error, Result};
use crate::models::SearchQuery;
use std::sync::Arc;

/// 総件数の取得（カウントプローブ）。
///
/// `maxResults=0` の検索を1回発行して `total` のみを読み取る。
/// ここで失敗した場合はページ取得に進まず、実行全体を中断する。
pub struct CountProber {
    api: Arc<dyn SearchApi>,
}

impl CountProber {
    pub fn new(api: Arc<dyn SearchApi>) -> Self {
        Self { api }
    }

    /// クエリにマッチする課題の総数を取得
    pub async fn total_count(&self, query: &SearchQuery) -> Result<u32> {
        let result = self
            .api
            .search(query, 0, 0)
            .await
            .map_err(|e| Error::CountUnavailable(e.to_string()))?;

        Ok(result.total)
    }
}
