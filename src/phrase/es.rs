//! Spanish Phrase Rules
//!
//! スペイン語の文スライド: 文と訳、名詞句と前置詞句（各最大2組）、
//! 動詞（最大4組）を`Phrase and verb`レイアウトへ書き込みます。
//! スロット番号はテンプレート`phrase_spanish_*.pptx`との契約です。

use crate::deck::Deck;
use crate::error::CsvToPptxError;
use crate::record::PhraseEntry;
use crate::template::TemplatePackage;

/// スペイン語句スキーマ（前置詞句列を含む）
pub(crate) const CONTENT_KEYS: &[&str] = &[
    "sentence",
    "noun_phrases",
    "prep_phrases",
    "verb_phrases",
    "verbs",
];

/// 1行分の文スライドを描画する
pub(crate) fn render_line(
    deck: &mut Deck,
    template: &TemplatePackage,
    entry: &PhraseEntry,
) -> Result<(), CsvToPptxError> {
    let mut slide = deck.add_slide(template, "Phrase and verb")?;
    slide
        .set(10, entry.sentence.text.as_str())?
        .set(11, entry.sentence.meaning.as_str())?;

    // 名詞句2組 + 前置詞句2組をスロット12から連続で並べる
    let phrases = entry
        .noun_phrases
        .iter()
        .take(2)
        .chain(entry.prep_phrases.iter().take(2));
    for (index, phrase) in phrases.enumerate() {
        let base = 12 + 2 * index as u32;
        slide.set(base, phrase.text.as_str())?;
        slide.set(base + 1, phrase.meaning.as_str())?;
    }

    // 動詞: スロット20から1組3スロット（語・原形・形態）
    for (index, verb) in entry.verbs.iter().take(4).enumerate() {
        let base = 20 + 3 * index as u32;
        slide.set(base, verb.text.as_str())?;
        slide.set(base + 1, verb.lemma.as_str())?;
        slide.set(base + 2, verb.form.as_str())?;
    }

    Ok(())
}
