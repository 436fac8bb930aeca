use crate::Error;

/// ダウンロード進行の観測インターフェース。
///
/// コアはコンソールへ直接書き込まず、構造化イベントをこのトレイト経由で
/// 通知する。ワーカーから完了順に呼ばれるため実装はスレッドセーフであること。
pub trait DownloadObserver: Send + Sync {
    /// 総件数の取得が完了した
    fn on_count_probed(&self, total: u32) {
        let _ = total;
    }

    /// ページ取得を開始した
    fn on_page_started(&self, start_at: u32) {
        let _ = start_at;
    }

    /// ページ取得が成功した
    fn on_page_succeeded(&self, start_at: u32, issue_count: usize) {
        let _ = (start_at, issue_count);
    }

    /// ページ取得が失敗した
    fn on_page_failed(&self, start_at: u32, error: &Error) {
        let _ = (start_at, error);
    }
}

/// イベントをtracingログとして出力する観測実装
#[derive(Debug, Clone, Default)]
pub struct TracingObserver;

impl DownloadObserver for TracingObserver {
    fn on_count_probed(&self, total: u32) {
        tracing::info!(total, "total issue count probed");
    }

    fn on_page_started(&self, start_at: u32) {
        tracing::info!(start_at, "page fetch started");
    }

    fn on_page_succeeded(&self, start_at: u32, issue_count: usize) {
        tracing::info!(start_at, issue_count, "page fetch succeeded");
    }

    fn on_page_failed(&self, start_at: u32, error: &Error) {
        tracing::warn!(start_at, %error, "page fetch failed");
    }
}

/// 何も通知しない観測実装（テスト・組み込み用）
#[derive(Debug, Clone, Default)]
pub struct NullObserver;

impl DownloadObserver for NullObserver {}
