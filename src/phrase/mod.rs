//! Phrase Deck Module
//!
//! 句・例文テーブルからデッキを組み立てるモジュール。構成は
//! 表紙 → 文スライド（1行につき1枚） → 結び、の固定パスで、
//! 統計スライドはありません。文スライドの中身は言語別のルール
//! （`en` / `es`）が書き込みます。

pub(crate) mod en;
pub(crate) mod es;

use std::io::Read;

use crate::api::Language;
use crate::deck::Deck;
use crate::error::CsvToPptxError;
use crate::reader::read_records;
use crate::record::PhraseEntry;
use crate::template::TemplatePackage;

/// 表紙レイアウト名（両言語共通）
const OPENING_LAYOUT: &str = "Opening for chinese";

/// 表紙の副題（固定文字列）
const PHRASE_SUBTITLE: &str = "短语总结";

/// 言語ごとの句スキーマ
pub(crate) fn content_keys(language: Language) -> &'static [&'static str] {
    match language {
        Language::English => en::CONTENT_KEYS,
        Language::Spanish => es::CONTENT_KEYS,
    }
}

/// 句デッキの組み立て器
pub(crate) struct PhraseDeck<'t> {
    template: &'t TemplatePackage,
    language: Language,
    title: String,
    entries: Vec<PhraseEntry>,
}

impl<'t> PhraseDeck<'t> {
    /// ソーステーブルを読み込む
    ///
    /// スキーマ不一致・不正JSONはここで変換全体を失敗させます。
    pub fn load<R: Read>(
        source: R,
        template: &'t TemplatePackage,
        language: Language,
        title: &str,
    ) -> Result<Self, CsvToPptxError> {
        let raw = read_records(source, content_keys(language))?;
        let entries = raw
            .iter()
            .map(|record| PhraseEntry::from_raw(record, language))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(records = entries.len(), "phrase records loaded");

        Ok(PhraseDeck {
            template,
            language,
            title: title.to_string(),
            entries,
        })
    }

    /// 読み込んだレコード数
    pub fn record_count(&self) -> usize {
        self.entries.len()
    }

    /// デッキを組み立てる
    pub fn build(&self) -> Result<Deck, CsvToPptxError> {
        let mut deck = Deck::new();
        self.create_opening(&mut deck)?;
        for entry in &self.entries {
            match self.language {
                Language::English => en::render_line(&mut deck, self.template, entry)?,
                Language::Spanish => es::render_line(&mut deck, self.template, entry)?,
            }
        }
        deck.add_slide(self.template, "Thanks")?;
        Ok(deck)
    }

    /// 表紙スライド
    fn create_opening(&self, deck: &mut Deck) -> Result<(), CsvToPptxError> {
        deck.add_slide(self.template, OPENING_LAYOUT)?
            .set(10, self.title.as_str())?
            .set(11, PHRASE_SUBTITLE)?;
        Ok(())
    }
}
