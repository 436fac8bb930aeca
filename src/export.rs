use crate::error::{Error, Result};
use crate::models::Issue;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// 出力ドキュメントのルート構造
#[derive(Debug, Serialize)]
struct IssueDocument<'a> {
    issues: &'a [Issue],
}

/// 集約結果を1つのJSONドキュメントとして書き出すエクスポーター。
///
/// `issues` 配列の順序はページ完了順であり、安定とは限らない。
pub struct JsonExporter {
    output_path: PathBuf,
}

impl JsonExporter {
    pub fn new<P: AsRef<Path>>(output_path: P) -> Self {
        Self {
            output_path: output_path.as_ref().to_path_buf(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// `{ "issues": [...] }` 形式で出力先に書き込む
    pub async fn write_issues(&self, issues: &[Issue]) -> Result<()> {
        // 親ディレクトリを作成
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(Error::IoError)?;
            }
        }

        let document = IssueDocument { issues };
        let json_data = serde_json::to_vec_pretty(&document)
            .map_err(|e| Error::SerializationError(format!("JSON serialization failed: {}", e)))?;

        let mut file = fs::File::create(&self.output_path)
            .await
            .map_err(Error::IoError)?;

        file.write_all(&json_data).await.map_err(Error::IoError)?;
        file.sync_all().await.map_err(Error::IoError)?;

        Ok(())
    }
}
