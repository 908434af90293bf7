//! English Vocabulary Rules
//!
//! 英語語彙レコードのレイアウト選択とスロット書き込み。先頭一致の
//! ディスパッチで、語形変化+例文 → 語形変化のみ → 例文のみ → 既定、
//! の順に特殊レイアウトへ振り分けます。スロット番号はテンプレート
//! `vocab_english_*.pptx`との契約です。

use crate::api::Language;
use crate::deck::Deck;
use crate::error::CsvToPptxError;
use crate::pos::PartOfSpeech;
use crate::record::{ExamplePair, VocabEntry};
use crate::template::TemplatePackage;

/// 英語語彙スキーマ
pub(crate) const CONTENT_KEYS: &[&str] = &[
    "num",
    "word",
    "pos",
    "meaning",
    "dict_pos",
    "from",
    "extension",
    "variations",
    "examples",
];

/// 表紙レイアウト名
pub(crate) const OPENING_LAYOUT: &str = "Title and subtitle for chinese";

/// 1レコードを対応するレイアウトへ振り分けて描画する
pub(crate) fn render_entry(
    deck: &mut Deck,
    template: &TemplatePackage,
    entry: &VocabEntry,
) -> Result<(), CsvToPptxError> {
    match PartOfSpeech::classify(Language::English, &entry.dict_pos) {
        PartOfSpeech::Noun if entry.extension.is_present() => noun_word(deck, template, entry),
        PartOfSpeech::Adj if entry.extension.is_present() => adj_word(deck, template, entry),
        PartOfSpeech::Verb => {
            if super::render_verb_forms(deck, template, entry)? {
                return Ok(());
            }
            if !entry.examples.is_empty() {
                verb_word(deck, template, entry)
            } else {
                default_word(deck, template, entry)
            }
        }
        _ => default_word(deck, template, entry),
    }
}

/// 名詞スライド（単数/複数の語形と例文つき）
fn noun_word(
    deck: &mut Deck,
    template: &TemplatePackage,
    entry: &VocabEntry,
) -> Result<(), CsvToPptxError> {
    let mut slide = deck.add_slide(template, "Noun vocab")?;
    slide
        .set(11, entry.word.as_str())?
        .set(12, entry.meanings().join("\n"))?;

    // 語形変化グループ: 単数はそのまま、複数はextensionの"s"
    slide.set(13, entry.word.as_str())?;
    slide.set(14, entry.extension.form("s").unwrap_or(""))?;

    fill_examples(&mut slide, &entry.examples, 15)?;

    slide.note(entry.word.as_str());
    Ok(())
}

/// 形容詞スライド（原級/比較級/最上級）
fn adj_word(
    deck: &mut Deck,
    template: &TemplatePackage,
    entry: &VocabEntry,
) -> Result<(), CsvToPptxError> {
    let mut slide = deck.add_slide(template, "Adj vocab")?;
    slide
        .set(11, entry.word.as_str())?
        .set(12, entry.meanings().join("\n"))?
        .set(13, entry.extension.form("original").unwrap_or(""))?
        .set(14, entry.extension.form("comparative").unwrap_or(""))?
        .set(15, entry.extension.form("superlative").unwrap_or(""))?;
    slide.note(entry.word.as_str());
    Ok(())
}

/// 原形動詞スライド（例文つき、人称変化なし）
fn verb_word(
    deck: &mut Deck,
    template: &TemplatePackage,
    entry: &VocabEntry,
) -> Result<(), CsvToPptxError> {
    let mut slide = deck.add_slide(template, "Original verb vocab")?;
    slide
        .set(11, entry.word.as_str())?
        .set(12, entry.meanings().join("\n"))?;

    fill_examples(&mut slide, &entry.examples, 14)?;

    slide.note(entry.word.as_str());
    Ok(())
}

/// 既定スライド（品詞・見出し語・意味のみ、例文があれば併記）
fn default_word(
    deck: &mut Deck,
    template: &TemplatePackage,
    entry: &VocabEntry,
) -> Result<(), CsvToPptxError> {
    let mut slide = deck.add_slide(template, "Common layout")?;
    slide
        .set(12, entry.dict_pos.as_str())?
        .set(13, entry.word.as_str())?
        .set(14, entry.meanings().join("\n"))?;

    fill_examples(&mut slide, &entry.examples, 15)?;

    slide.note(entry.word.as_str());
    Ok(())
}

/// 例文ペアを`base`から始まる連続スロットへ書き込む（最大2組）
fn fill_examples(
    slide: &mut crate::deck::SlideDraft<'_, '_>,
    examples: &[ExamplePair],
    base: u32,
) -> Result<(), CsvToPptxError> {
    for (index, example) in examples.iter().take(2).enumerate() {
        let offset = base + 2 * index as u32;
        slide.set(offset, example.original.as_str())?;
        slide.set(offset + 1, example.translated.as_str())?;
    }
    Ok(())
}
