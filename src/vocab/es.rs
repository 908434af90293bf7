//! Spanish Vocabulary Rules
//!
//! スペイン語語彙レコードのレイアウト選択とスロット書き込み。名詞は
//! 性・数タグ（`m.` / `f.` / `m.pl.` / `f.pl.`）ごとに冠詞表を引いて
//! 専用レイアウトへ、形容詞は語形変化つきレイアウトへ、動詞は変化形の
//! 形に応じた時制レイアウトへ振り分けます。スペイン語スキーマに例文列は
//! ありません。スロット番号はテンプレート`vocab_spanish_*.pptx`との
//! 契約です。

use crate::api::Language;
use crate::deck::Deck;
use crate::error::CsvToPptxError;
use crate::pos::{spanish_noun_articles, PartOfSpeech};
use crate::record::VocabEntry;
use crate::template::TemplatePackage;

/// スペイン語語彙スキーマ（例文列なし）
pub(crate) const CONTENT_KEYS: &[&str] = &[
    "num",
    "word",
    "pos",
    "meaning",
    "dict_pos",
    "from",
    "extension",
    "variations",
];

/// 表紙レイアウト名
pub(crate) const OPENING_LAYOUT: &str = "Title and subtitle";

/// 1レコードを対応するレイアウトへ振り分けて描画する
pub(crate) fn render_entry(
    deck: &mut Deck,
    template: &TemplatePackage,
    entry: &VocabEntry,
) -> Result<(), CsvToPptxError> {
    if let Some(articles) = spanish_noun_articles(&entry.dict_pos) {
        return gendered_noun_word(deck, template, entry, articles);
    }

    match PartOfSpeech::classify(Language::Spanish, &entry.dict_pos) {
        PartOfSpeech::Adj if entry.extension.is_present() => adj_word(deck, template, entry),
        PartOfSpeech::Verb => {
            if super::render_verb_forms(deck, template, entry)? {
                return Ok(());
            }
            default_word(deck, template, entry)
        }
        _ => default_word(deck, template, entry),
    }
}

/// 性・数つき名詞スライド
///
/// 単数側スロット（12-15）は冠詞と見出し語、複数側スロット（16-19）は
/// 冠詞と`extension`から引いた語形。複数形見出し語（`m.pl.` / `f.pl.`）
/// では冠詞表が反転し、複数側に単数形が入ります。
fn gendered_noun_word(
    deck: &mut Deck,
    template: &TemplatePackage,
    entry: &VocabEntry,
    articles: &crate::pos::NounArticles,
) -> Result<(), CsvToPptxError> {
    let mut slide = deck.add_slide(template, articles.layout)?;
    slide
        .set(10, entry.word.as_str())?
        .set(11, entry.meanings().join("\n"))?;

    slide.set(12, articles.singular_definite)?;
    slide.set(13, entry.word.as_str())?;
    slide.set(14, articles.singular_indefinite)?;
    slide.set(15, entry.word.as_str())?;

    if entry.extension.is_present() {
        let counterpart = entry.extension.form(articles.extension_key).unwrap_or("");
        slide.set(16, articles.plural_definite)?;
        slide.set(17, counterpart)?;
        slide.set(18, articles.plural_indefinite)?;
        slide.set(19, counterpart)?;
    }

    slide.note(entry.word.as_str());
    Ok(())
}

/// 形容詞スライド（男性/女性 × 単数/複数の4語形）
fn adj_word(
    deck: &mut Deck,
    template: &TemplatePackage,
    entry: &VocabEntry,
) -> Result<(), CsvToPptxError> {
    let mut slide = deck.add_slide(template, "Adj vocab")?;
    slide
        .set(10, entry.word.as_str())?
        .set(11, entry.meanings().join("\n"))?
        .set(12, entry.extension.form("m").unwrap_or(""))?
        .set(13, entry.extension.form("f").unwrap_or(""))?
        .set(14, entry.extension.form("mpl").unwrap_or(""))?
        .set(15, entry.extension.form("fpl").unwrap_or(""))?;
    slide.note(entry.word.as_str());
    Ok(())
}

/// 既定スライド（見出し語と意味のみ）
fn default_word(
    deck: &mut Deck,
    template: &TemplatePackage,
    entry: &VocabEntry,
) -> Result<(), CsvToPptxError> {
    let mut slide = deck.add_slide(template, "Default vocab")?;
    slide
        .set(10, entry.word.as_str())?
        .set(11, entry.meanings().join("\n"))?;
    slide.note(entry.word.as_str());
    Ok(())
}
