use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::Error;
use crate::models::{Field, FieldSelection};

/// 接続・検索の基本設定（`config.json` の内容）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicConfig {
    /// JIRAサーバーのベースURL
    pub jira_url: String,
    /// Basic認証のユーザー名
    pub username: String,
    /// Basic認証のパスワード
    pub password: String,
    /// 検索に使うJQL
    pub jql: String,
    /// ページ取得の並列ワーカー数
    pub max_workers: usize,
}

impl BasicConfig {
    /// 初回実行時に書き出すテンプレート
    pub fn template() -> Self {
        Self {
            jira_url: "https://your-jira-server.com".to_string(),
            username: "your-username".to_string(),
            password: "your-password".to_string(),
            jql: "project = YOURPROJECT AND status = Open".to_string(),
            max_workers: 5,
        }
    }
}

/// 設定の読み書きを抽象化するトレイト
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// 基本設定を読み込み（ファイルが無ければNone）
    async fn load_basic_config(&self) -> Result<Option<BasicConfig>, Error>;

    /// 基本設定を保存
    async fn save_basic_config(&mut self, config: &BasicConfig) -> Result<(), Error>;

    /// フィールド設定を読み込み（ファイルが無ければNone）
    async fn load_field_config(&self) -> Result<Option<Vec<FieldSelection>>, Error>;

    /// フィールド設定を保存
    async fn save_field_config(&mut self, selections: &[FieldSelection]) -> Result<(), Error>;

    /// 設定ストアを初期化
    async fn initialize(&mut self) -> Result<(), Error>;
}

/// JSONファイルベースの設定ストア。
///
/// `config_dir` 直下に `config.json` と `field_config.json` を置く
/// （元ツールのファイル配置に合わせている）。
pub struct FileConfigStore {
    config_dir: PathBuf,
}

impl FileConfigStore {
    pub fn new<P: AsRef<Path>>(config_dir: P) -> Self {
        Self {
            config_dir: config_dir.as_ref().to_path_buf(),
        }
    }

    fn basic_config_path(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    fn field_config_path(&self) -> PathBuf {
        self.config_dir.join("field_config.json")
    }

    /// 基本設定が無ければテンプレートを書き出す。
    /// テンプレートを書いた場合はtrueを返す（呼び出し側は編集を促して終了する）。
    pub async fn write_basic_template_if_missing(&mut self) -> Result<bool, Error> {
        if self.basic_config_path().exists() {
            return Ok(false);
        }
        self.save_basic_config(&BasicConfig::template()).await?;
        Ok(true)
    }

    /// サーバーのフィールド一覧から未選択状態のフィールド設定テンプレートを書き出す
    pub async fn write_field_template(&mut self, catalogue: &[Field]) -> Result<(), Error> {
        let selections: Vec<FieldSelection> =
            catalogue.iter().map(FieldSelection::from_field).collect();
        self.save_field_config(&selections).await
    }

    /// JSONファイルに書き込み
    async fn write_json_file<T>(&self, path: &Path, data: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        // 親ディレクトリを作成
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(Error::IoError)?;
        }

        let json_data = serde_json::to_string_pretty(data)
            .map_err(|e| Error::SerializationError(format!("JSON serialization failed: {}", e)))?;

        let mut file = fs::File::create(path).await.map_err(Error::IoError)?;

        file.write_all(json_data.as_bytes())
            .await
            .map_err(Error::IoError)?;

        file.sync_all().await.map_err(Error::IoError)?;

        Ok(())
    }

    /// JSONファイルから読み込み
    async fn read_json_file<T>(&self, path: &Path) -> Result<Option<T>, Error>
    where
        T: for<'de> Deserialize<'de>,
    {
        if !path.exists() {
            return Ok(None);
        }

        let mut file = fs::File::open(path).await.map_err(Error::IoError)?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .await
            .map_err(Error::IoError)?;

        if contents.trim().is_empty() {
            return Ok(None);
        }

        let data: T = serde_json::from_str(&contents)
            .map_err(|e| Error::SerializationError(format!("JSON deserialization failed: {}", e)))?;

        Ok(Some(data))
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load_basic_config(&self) -> Result<Option<BasicConfig>, Error> {
        let path = self.basic_config_path();
        self.read_json_file(&path).await
    }

    async fn save_basic_config(&mut self, config: &BasicConfig) -> Result<(), Error> {
        let path = self.basic_config_path();
        self.write_json_file(&path, config).await
    }

    async fn load_field_config(&self) -> Result<Option<Vec<FieldSelection>>, Error> {
        let path = self.field_config_path();
        self.read_json_file(&path).await
    }

    async fn save_field_config(&mut self, selections: &[FieldSelection]) -> Result<(), Error> {
        let path = self.field_config_path();
        self.write_json_file(&path, selections).await
    }

    async fn initialize(&mut self) -> Result<(), Error> {
        fs::create_dir_all(&self.config_dir)
            .await
            .map_err(Error::IoError)?;

        Ok(())
    }
}
