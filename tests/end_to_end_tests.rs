//! エンドツーエンドテスト
//!
//! カウントプローブ → 並列ページ取得 → 履歴フィルター → JSON書き出し、
//! の一連の流れをモックサーバーと一時ディレクトリで検証する。

use jira_downloader::{
    Auth, DownloadConfig, DownloadService, FieldSelection, JiraClient, JiraConfig,
    TracingObserver,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> Arc<JiraClient> {
    let config = JiraConfig::new(
        mock_server.uri(),
        Auth::Basic {
            username: "tanaka".to_string(),
            password: "secret".to_string(),
        },
    )
    .unwrap();
    Arc::new(JiraClient::new(config).unwrap())
}

fn selection(id: &str, name: &str, include: bool, include_history: bool) -> FieldSelection {
    FieldSelection {
        id: id.to_string(),
        name: name.to_string(),
        include,
        include_history,
    }
}

#[tokio::test]
async fn test_full_download_with_history_filtering() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    // Given: summary/statusを取得し、履歴はstatusのみ有効にした設定。
    //        サーバーはstatus以外の変更履歴も混ざった2件を返す。
    let mock_server = MockServer::start().await;

    let count_body = json!({
        "startAt": 0,
        "maxResults": 0,
        "total": 2,
        "issues": []
    });

    let page_body = json!({
        "startAt": 0,
        "maxResults": 2,
        "total": 2,
        "issues": [
            {
                "id": "10000",
                "key": "E2E-1",
                "fields": {
                    "summary": "First issue",
                    "status": { "id": "1", "name": "Open" }
                },
                "changelog": {
                    "startAt": 0,
                    "maxResults": 100,
                    "total": 3,
                    "histories": [
                        {
                            "id": "100",
                            "created": "2024-01-05T10:30:00.000Z",
                            "items": [
                                { "field": "status", "fieldtype": "jira", "fromString": "Open", "toString": "In Progress" },
                                { "field": "assignee", "fieldtype": "jira", "fromString": "tanaka", "toString": "suzuki" }
                            ]
                        },
                        {
                            "id": "101",
                            "created": "2024-01-06T09:00:00.000Z",
                            "items": [
                                { "field": "summary", "fieldtype": "jira", "fromString": "Old title", "toString": "First issue" }
                            ]
                        },
                        {
                            "id": "102",
                            "created": "2024-01-07T15:45:00.000Z",
                            "items": [
                                { "field": "status", "fieldtype": "jira", "fromString": "In Progress", "toString": "Closed" }
                            ]
                        }
                    ]
                }
            },
            {
                "id": "10001",
                "key": "E2E-2",
                "fields": {
                    "summary": "Second issue",
                    "status": { "id": "1", "name": "Open" }
                }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("maxResults", "0"))
        .and(query_param("fields", "summary,status"))
        .and(query_param("expand", "changelog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&count_body))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("startAt", "0"))
        .and(query_param("maxResults", "2"))
        .and(query_param("expand", "changelog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page_body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("tickets.json");
    let config = DownloadConfig::new("project = E2E", &output_path).field_selections(vec![
        selection("summary", "Summary", true, false),
        selection("status", "Status", true, true),
        selection("assignee", "Assignee", false, false),
    ]);
    let service = DownloadService::new(test_client(&mock_server), config)
        .observer(Arc::new(TracingObserver));

    // When: ダウンロードを実行
    let result = service.run().await.unwrap();

    // Then: 全ページ成功で取得件数は総件数に一致する
    assert!(result.is_complete());
    assert_eq!(result.total, 2);
    assert_eq!(result.downloaded_count, 2);
    assert!(result.duration_seconds() >= 0.0);

    // 出力ドキュメントを検証
    let contents = std::fs::read_to_string(&output_path).unwrap();
    let document: Value = serde_json::from_str(&contents).unwrap();
    let issues = document["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 2);

    let first = issues.iter().find(|i| i["key"] == "E2E-1").unwrap();

    // summary/statusの値は保持される
    assert_eq!(first["fields"]["summary"], "First issue");
    assert_eq!(first["fields"]["status"]["name"], "Open");

    // 履歴はstatusの変更を含むエントリだけが残り、
    // エントリ内のstatus以外の変更項目も除去される
    let histories = first["changelog"]["histories"].as_array().unwrap();
    assert_eq!(histories.len(), 2);
    assert_eq!(histories[0]["id"], "100");
    assert_eq!(histories[0]["items"].as_array().unwrap().len(), 1);
    assert_eq!(histories[0]["items"][0]["field"], "status");
    assert_eq!(histories[1]["id"], "102");

    // changelogを持たない課題はそのまま
    let second = issues.iter().find(|i| i["key"] == "E2E-2").unwrap();
    assert!(second.get("changelog").is_none());
}

#[tokio::test]
async fn test_download_with_zero_matches_writes_empty_document() {
    // Given: 該当0件の検索結果
    let mock_server = MockServer::start().await;

    let count_body = json!({
        "startAt": 0,
        "maxResults": 0,
        "total": 0,
        "issues": []
    });

    // カウントプローブの1回しかリクエストは発生しない
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&count_body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("tickets.json");
    let config = DownloadConfig::new("project = EMPTY", &output_path);
    let service = DownloadService::new(test_client(&mock_server), config);

    // When: ダウンロードを実行
    let result = service.run().await.unwrap();

    // Then: ページリクエストは発行されず、空のドキュメントが書き出される
    assert!(result.is_complete());
    assert_eq!(result.total, 0);
    assert_eq!(result.downloaded_count, 0);

    let contents = std::fs::read_to_string(&output_path).unwrap();
    let document: Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(document["issues"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_download_without_field_selection_requests_all_fields() {
    // Given: フィールド設定なしの実行
    let mock_server = MockServer::start().await;

    let count_body = json!({
        "startAt": 0,
        "maxResults": 0,
        "total": 1,
        "issues": []
    });

    let page_body = json!({
        "startAt": 0,
        "maxResults": 1,
        "total": 1,
        "issues": [{
            "id": "10000",
            "key": "ALL-1",
            "fields": { "summary": "Everything" }
        }]
    });

    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("maxResults", "0"))
        .and(query_param("fields", "*all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&count_body))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("maxResults", "1"))
        .and(query_param("fields", "*all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page_body))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("tickets.json");
    let config = DownloadConfig::new("project = ALL", &output_path);
    let service = DownloadService::new(test_client(&mock_server), config);

    // When: ダウンロードを実行
    let result = service.run().await.unwrap();

    // Then: fields=*allで要求され、expandは付かない
    assert_eq!(result.downloaded_count, 1);
}
