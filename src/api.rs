//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// 変換対象の言語
///
/// ソーステーブルのスキーマ、品詞タグ表、レイアウト名の組を選択します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Language {
    /// 英語（スキーマに`examples`列を含む）
    English,

    /// スペイン語（語彙スキーマに`examples`列を含まない）
    Spanish,
}

impl Language {
    /// テンプレートファイル名に使用する言語セグメントを返す
    ///
    /// 例: `Language::Spanish` → `"spanish"`
    pub fn template_segment(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Spanish => "spanish",
        }
    }

    /// CLIで使用する短い言語コードを返す（`en` / `es`）
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
        }
    }
}

/// 変換対象のコンテンツ種別
///
/// スキーマとデッキ構成（統計スライドの有無など）を決定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ContentKind {
    /// 語彙テーブル → 品詞別グループのデッキ
    ///
    /// 構成: 表紙 → 統計 → 品詞グループ（セクションタイトル + 単語スライド） → 結び
    Vocab,

    /// 例文・句テーブル → 文ごとのデッキ
    ///
    /// 構成: 表紙 → 文スライド（1行につき1枚） → 結び。統計スライドはありません。
    Phrase,
}

impl ContentKind {
    /// テンプレートファイル名に使用する種別セグメントを返す
    pub fn template_segment(&self) -> &'static str {
        match self {
            ContentKind::Vocab => "vocab",
            ContentKind::Phrase => "phrase",
        }
    }
}

/// テンプレートのジャンル（視覚バリアント）
///
/// 同じレイアウト名・スロット契約を持つテンプレートファイルの
/// 見た目違いを選択します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Genre {
    /// 標準デザイン（デフォルト）
    Classic,

    /// 透かし入りデザイン（無償プレビュー用）
    Watermark,
}

impl Genre {
    /// テンプレートファイル名に使用するジャンルセグメントを返す
    pub fn template_segment(&self) -> &'static str {
        match self {
            Genre::Classic => "classic",
            Genre::Watermark => "watermark",
        }
    }
}

/// 統計スライドに表示するカテゴリ数
///
/// 元データの系統によって「先頭3カテゴリのみ」と「全カテゴリ」の
/// 二つの挙動が存在するため、どちらを使うかを設定として公開します。
///
/// # 使用例
///
/// ```rust,no_run
/// use pptxzero::{ContentKind, ConverterBuilder, Language, StatisticsDisplay};
///
/// # fn main() -> Result<(), pptxzero::CsvToPptxError> {
/// let converter = ConverterBuilder::new(Language::Spanish, ContentKind::Vocab)
///     .with_statistics_display(StatisticsDisplay::All)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StatisticsDisplay {
    /// 出現順で先頭3カテゴリのみ表示（デフォルト）
    ///
    /// `Word count`レイアウトはカウンタ枠を3組しか持たないため、
    /// 出荷テンプレートではこちらを使用します。
    FirstThree,

    /// すべてのカテゴリを表示
    ///
    /// カウンタ枠を十分に持つテンプレート向け。枠が足りない場合は
    /// `PlaceholderNotFound`エラーになります。
    All,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_segments() {
        assert_eq!(Language::English.template_segment(), "english");
        assert_eq!(Language::Spanish.template_segment(), "spanish");
        assert_eq!(ContentKind::Vocab.template_segment(), "vocab");
        assert_eq!(ContentKind::Phrase.template_segment(), "phrase");
        assert_eq!(Genre::Classic.template_segment(), "classic");
        assert_eq!(Genre::Watermark.template_segment(), "watermark");
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::Spanish.code(), "es");
    }
}
