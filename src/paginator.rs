use crate::client::SearchApi;
use crate::models::{Issue, SearchQuery};
use crate::observer::{DownloadObserver, NullObserver};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// 1ページ分の取得リクエスト。状態を持たず、単独で再実行できる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 取得開始オフセット（startAt）
    pub start_at: u32,
    /// このページで要求する最大件数（maxResults）
    pub max_results: u32,
}

impl PageRequest {
    /// 総件数からページリクエストのリストを組み立てる。
    ///
    /// ページ数は `ceil(total / page_size)`、オフセットは `0, P, 2P, ...`。
    /// 最終ページの `max_results` は残件数まで切り詰める。
    pub fn plan(total: u32, page_size: u32) -> Vec<PageRequest> {
        if total == 0 || page_size == 0 {
            return Vec::new();
        }

        let num_pages = total.div_ceil(page_size);
        (0..num_pages)
            .map(|i| {
                let start_at = i * page_size;
                PageRequest {
                    start_at,
                    max_results: page_size.min(total - start_at),
                }
            })
            .collect()
    }
}

/// 失敗したページの記録（オフセットとエラー内容）
#[derive(Debug, Clone)]
pub struct PageFailure {
    pub start_at: u32,
    pub detail: String,
}

/// 並列ページ取得の結果
#[derive(Debug, Clone, Default)]
pub struct PaginationOutcome {
    /// 成功した全ページの課題を完了順にマージしたもの。
    /// サーバー側の順序は保証されない。
    pub issues: Vec<Issue>,
    /// 失敗したページの一覧
    pub failed_pages: Vec<PageFailure>,
}

impl PaginationOutcome {
    /// 計画した全ページが成功した場合にのみtrue
    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty()
    }
}

/// 並列ページネータ。
///
/// 全ページリクエストを最初に投入し、セマフォで同時実行数を制限しながら
/// 完了順に回収・マージする。途中キャンセルはなく、投入した全タスクの
/// 完了を必ず待つ。
///
/// 失敗ポリシーは lenient（継続）：失敗したページは警告イベントを通知して
/// 集約から除外し、残りのページの取得は続行する。リトライ・タイムアウト・
/// バックオフは行わない。
pub struct ParallelPaginator {
    api: Arc<dyn SearchApi>,
    observer: Arc<dyn DownloadObserver>,
    concurrency: usize,
}

impl ParallelPaginator {
    pub fn new(api: Arc<dyn SearchApi>, concurrency: usize) -> Self {
        Self {
            api,
            observer: Arc::new(NullObserver),
            concurrency: concurrency.max(1),
        }
    }

    /// 観測インターフェースを設定
    pub fn observer(mut self, observer: Arc<dyn DownloadObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// 計画した全ページを並列に取得してマージする
    pub async fn fetch_all(
        &self,
        query: &SearchQuery,
        total: u32,
        page_size: u32,
    ) -> PaginationOutcome {
        let requests = PageRequest::plan(total, page_size);
        let mut outcome = PaginationOutcome::default();

        if requests.is_empty() {
            return outcome;
        }

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks: JoinSet<(PageRequest, crate::error::Result<Vec<Issue>>)> = JoinSet::new();
        // タスクIDとオフセットの対応。パニックしたタスクの失敗報告にも
        // 元のオフセットを付けるために持つ。
        let mut submitted: HashMap<tokio::task::Id, PageRequest> = HashMap::new();

        for request in requests {
            let api = Arc::clone(&self.api);
            let observer = Arc::clone(&self.observer);
            let semaphore = Arc::clone(&semaphore);
            let query = query.clone();

            let handle = tasks.spawn(async move {
                // close()は呼ばないためacquireは失敗しない
                let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                observer.on_page_started(request.start_at);
                let result = api
                    .search(&query, request.start_at, request.max_results)
                    .await
                    .map(|r| r.issues);
                (request, result)
            });
            submitted.insert(handle.id(), request);
        }

        // 完了順に回収する。マージはこの単一ループだけが行うため、
        // 集約コレクションへの同期は不要。
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_id, (request, Ok(issues)))) => {
                    self.observer.on_page_succeeded(request.start_at, issues.len());
                    outcome.issues.extend(issues);
                }
                Ok((_id, (request, Err(error)))) => {
                    self.observer.on_page_failed(request.start_at, &error);
                    outcome.failed_pages.push(PageFailure {
                        start_at: request.start_at,
                        detail: error.to_string(),
                    });
                }
                Err(join_error) => {
                    // タスクのパニックもページ失敗として扱う
                    let start_at = submitted
                        .get(&join_error.id())
                        .map(|r| r.start_at)
                        .unwrap_or(0);
                    let error = crate::Error::Unexpected(join_error.to_string());
                    self.observer.on_page_failed(start_at, &error);
                    outcome.failed_pages.push(PageFailure {
                        start_at,
                        detail: error.to_string(),
                    });
                }
            }
        }

        outcome
    }
}
