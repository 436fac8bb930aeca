use crate::models::Issue;
use std::collections::HashSet;

/// 変更履歴のフィールド別フィルター。
///
/// 履歴取得対象に指定されたフィールド以外の変更を changelog から取り除く。
/// changelog を持たない課題には一切触れない、順序保存の純粋なフィルター。
#[derive(Debug, Clone)]
pub struct HistoryFilter {
    /// 履歴を残すフィールドの識別子（IDと表示名の両方を登録できる）
    fields: HashSet<String>,
}

impl HistoryFilter {
    pub fn new(fields: impl IntoIterator<Item = String>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// 対象フィールドかどうか
    fn is_target(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    /// 全課題の changelog を対象フィールドの変更だけに絞り込む
    pub fn apply(&self, issues: &mut [Issue]) {
        for issue in issues.iter_mut() {
            let Some(changelog) = issue.changelog.as_mut() else {
                continue;
            };

            for history in changelog.histories.iter_mut() {
                history.items.retain(|item| self.is_target(&item.field));
            }
            // 変更項目が1つも残らなかった履歴エントリは丸ごと落とす
            changelog.histories.retain(|history| !history.items.is_empty());
            changelog.total = changelog.histories.len() as u32;
        }
    }
}
