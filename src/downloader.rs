use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::client::SearchApi;
use crate::count::CountProber;
use crate::error::Result;
use crate::export::JsonExporter;
use crate::history_filter::HistoryFilter;
use crate::models::{FieldSelection, SearchQuery};
use crate::observer::{DownloadObserver, NullObserver};
use crate::paginator::{PageFailure, ParallelPaginator};

/// 1ページあたりの取得件数（maxResults）
pub const MAX_RESULTS_PER_CALL: u32 = 1000;

/// ダウンロード実行の設定
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// 検索に使うJQL
    pub jql: String,
    /// フィールド設定（値の取得と履歴の取得は独立フラグ）
    pub field_selections: Vec<FieldSelection>,
    /// 1ページあたりの取得件数
    pub page_size: u32,
    /// 並列ワーカー数
    pub max_workers: usize,
    /// 出力先のJSONファイルパス
    pub output_path: PathBuf,
}

impl DownloadConfig {
    pub fn new(jql: impl Into<String>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            jql: jql.into(),
            field_selections: Vec::new(),
            page_size: MAX_RESULTS_PER_CALL,
            max_workers: 5,
            output_path: output_path.into(),
        }
    }

    /// フィールド設定を指定
    pub fn field_selections(mut self, selections: Vec<FieldSelection>) -> Self {
        self.field_selections = selections;
        self
    }

    /// 並列ワーカー数を指定
    pub fn max_workers(mut self, count: usize) -> Self {
        self.max_workers = count;
        self
    }

    /// ページサイズを指定
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// 履歴取得対象フィールドの識別子集合（IDと表示名の両方）
    pub fn history_field_set(&self) -> HashSet<String> {
        let mut set = HashSet::new();
        for selection in self.field_selections.iter().filter(|s| s.include_history) {
            set.insert(selection.id.clone());
            set.insert(selection.name.clone());
        }
        set
    }

    /// この設定から1回の実行で使う検索条件を組み立てる。
    ///
    /// includeされたフィールドが1つもなければ全フィールド（`*all`）を要求する
    /// （元ツールの挙動）。履歴フラグが1つでも立っていればchangelogを展開する。
    pub fn build_query(&self) -> SearchQuery {
        let included: Vec<String> = self
            .field_selections
            .iter()
            .filter(|s| s.include)
            .map(|s| s.id.clone())
            .collect();

        let expand = self.field_selections.iter().any(|s| s.include_history);

        let query = SearchQuery::new(self.jql.clone()).expand_changelog(expand);
        if included.is_empty() {
            query.all_fields()
        } else {
            query.fields(included)
        }
    }
}

/// ダウンロード実行の結果
#[derive(Debug, Clone)]
pub struct DownloadResult {
    /// 実行開始時刻
    pub start_time: DateTime<Utc>,
    /// 実行終了時刻
    pub end_time: DateTime<Utc>,
    /// サーバーが報告した総件数
    pub total: u32,
    /// 実際に取得できた課題数
    pub downloaded_count: usize,
    /// 失敗したページの一覧
    pub failed_pages: Vec<PageFailure>,
}

impl DownloadResult {
    /// 計画した全ページが成功した場合にのみtrue
    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty()
    }

    /// 実行時間を取得（秒）
    pub fn duration_seconds(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}

/// ダウンロードサービス。
///
/// カウントプローブ → 並列ページ取得 → 履歴フィルター → JSON書き出し、
/// の順で1回の実行を組み立てる。カウント取得の失敗は致命的で、ページ取得には
/// 進まない。ページ単位の失敗は記録して続行する（lenientポリシー）。
pub struct DownloadService {
    api: Arc<dyn SearchApi>,
    observer: Arc<dyn DownloadObserver>,
    config: DownloadConfig,
}

impl DownloadService {
    pub fn new(api: Arc<dyn SearchApi>, config: DownloadConfig) -> Self {
        Self {
            api,
            observer: Arc::new(NullObserver),
            config,
        }
    }

    /// 観測インターフェースを設定
    pub fn observer(mut self, observer: Arc<dyn DownloadObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// ダウンロードを実行し、結果ドキュメントを出力先に書き込む
    pub async fn run(&self) -> Result<DownloadResult> {
        let start_time = Utc::now();
        let query = self.config.build_query();

        let prober = CountProber::new(Arc::clone(&self.api));
        let total = prober.total_count(&query).await?;
        self.observer.on_count_probed(total);

        let paginator = ParallelPaginator::new(Arc::clone(&self.api), self.config.max_workers)
            .observer(Arc::clone(&self.observer));
        let mut outcome = paginator
            .fetch_all(&query, total, self.config.page_size)
            .await;

        let history_fields = self.config.history_field_set();
        if !history_fields.is_empty() {
            HistoryFilter::new(history_fields).apply(&mut outcome.issues);
        }

        JsonExporter::new(&self.config.output_path)
            .write_issues(&outcome.issues)
            .await?;

        Ok(DownloadResult {
            start_time,
            end_time: Utc::now(),
            total,
            downloaded_count: outcome.issues.len(),
            failed_pages: outcome.failed_pages,
        })
    }
}
