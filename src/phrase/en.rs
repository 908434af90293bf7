//! English Phrase Rules
//!
//! 英語の文スライド: 文と訳、名詞句（最大4組）、動詞（最大4組）を
//! `Phrase and verb`レイアウトへ書き込みます。スロット番号はテンプレート
//! `phrase_english_*.pptx`との契約です。

use crate::deck::Deck;
use crate::error::CsvToPptxError;
use crate::record::PhraseEntry;
use crate::template::TemplatePackage;

/// 英語句スキーマ
pub(crate) const CONTENT_KEYS: &[&str] =
    &["sentence", "noun_phrases", "verb_phrases", "verbs"];

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

    // 名詞句: スロット12から1組2スロット
    for (index, phrase) in entry.noun_phrases.iter().take(4).enumerate() {
        let base = 12 + 2 * index as u32;
        slide.set(base, phrase.text.as_str())?;
        slide.set(base + 1, phrase.meaning.as_str())?;
    }

    // 動詞: スロット20から1組3スロット（語・原形・形態）
    for (index, verb) in entry.verbs.iter().take(4).enumerate() {
        let base = 20 + 3 * index as u32;
        slide.set(base, verb.text.as_str())?;
        slide.set(base + 1, verb.lemma.as_str())?;
        slide.set(base + 2, form_label(&verb.form))?;
    }

    Ok(())
}

/// 形態表示: `"VBD,past"`のようなカンマ区切りの2要素目を使う
///
/// 区切りがない形態はそのまま表示します。
fn form_label(form: &str) -> &str {
    form.split(',').nth(1).unwrap_or(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_label_takes_second_component() {
        assert_eq!(form_label("VBD,past"), "past");
        assert_eq!(form_label("VBP,present,x"), "present");
    }

    #[test]
    fn test_form_label_without_comma_is_whole() {
        assert_eq!(form_label("gerund"), "gerund");
        assert_eq!(form_label(""), "");
    }
}
