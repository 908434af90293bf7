//! Vocabulary Deck Module
//!
//! 語彙テーブルからデッキを組み立てるモジュール。構成は固定のパスで、
//! 表紙 → 統計 → 品詞グループ（セクションタイトル + 単語スライド） →
//! 結び、の順にスライドを追記します。品詞カテゴリは出現順に分配され、
//! レコードごとのレイアウト選択は言語別のディスパッチ（`en` / `es`）が
//! 行います。動詞の時制スライドは両言語で同一のレイアウト契約を持つため
//! ここで共有します。

pub(crate) mod en;
pub(crate) mod es;

use std::io::Read;

use crate::api::{Language, StatisticsDisplay};
use crate::deck::Deck;
use crate::error::CsvToPptxError;
use crate::pos::{tense_display, PartOfSpeech};
use crate::reader::read_records;
use crate::record::{VerbVariations, VocabEntry};
use crate::template::TemplatePackage;

/// 表紙の副題（固定文字列）
const VOCAB_SUBTITLE: &str = "词汇总结";

/// 言語ごとの語彙スキーマ
pub(crate) fn content_keys(language: Language) -> &'static [&'static str] {
    match language {
        Language::English => en::CONTENT_KEYS,
        Language::Spanish => es::CONTENT_KEYS,
    }
}

/// 語彙デッキの組み立て器
///
/// レコード集合は構築時に一度だけ読み込まれ、品詞カテゴリごとに
/// 出現順で分配されます。1回の変換が1つの`VocabDeck`を所有します。
pub(crate) struct VocabDeck<'t> {
    template: &'t TemplatePackage,
    language: Language,
    title: String,
    statistics: StatisticsDisplay,
    entries: Vec<VocabEntry>,
    /// 出現順のカテゴリと、各カテゴリに属するエントリ添字
    distribution: Vec<(PartOfSpeech, Vec<usize>)>,
}

impl<'t> VocabDeck<'t> {
    /// ソーステーブルを読み込み、品詞別に分配する
    ///
    /// スキーマ不一致・不正JSONはここで変換全体を失敗させます。
    pub fn load<R: Read>(
        source: R,
        template: &'t TemplatePackage,
        language: Language,
        title: &str,
        statistics: StatisticsDisplay,
    ) -> Result<Self, CsvToPptxError> {
        let raw = read_records(source, content_keys(language))?;
        let entries = raw
            .iter()
            .map(|record| VocabEntry::from_raw(record, language))
            .collect::<Result<Vec<_>, _>>()?;
        let distribution = partition(&entries, language);

        tracing::debug!(
            records = entries.len(),
            categories = distribution.len(),
            "vocabulary records partitioned"
        );

        Ok(VocabDeck {
            template,
            language,
            title: title.to_string(),
            statistics,
            entries,
            distribution,
        })
    }

    /// 読み込んだレコード数
    pub fn record_count(&self) -> usize {
        self.entries.len()
    }

    /// デッキを組み立てる
    ///
    /// 表紙 → 統計 → 品詞グループ → 結び の固定パス。スライドは
    /// 追記のみで、途中の失敗は出力ファイルを残しません（保存は
    /// 呼び出し側が最後に一度だけ行う）。
    pub fn build(&self) -> Result<Deck, CsvToPptxError> {
        let mut deck = Deck::new();
        self.create_opening(&mut deck)?;
        self.create_statistics(&mut deck)?;
        self.create_groups(&mut deck)?;
        self.create_ending(&mut deck)?;
        Ok(deck)
    }

    /// 表紙スライド
    fn create_opening(&self, deck: &mut Deck) -> Result<(), CsvToPptxError> {
        let layout = match self.language {
            Language::English => en::OPENING_LAYOUT,
            Language::Spanish => es::OPENING_LAYOUT,
        };
        deck.add_slide(self.template, layout)?
            .set(10, self.title.as_str())?
            .set(11, VOCAB_SUBTITLE)?;
        Ok(())
    }

    /// 統計スライド
    ///
    /// カテゴリごとにカウンタ1組（スロット`10+2i`に件数、`11+2i`に
    /// 大文字化した品詞名）。表示数は設定で先頭3カテゴリ/全カテゴリを
    /// 切り替えます。
    fn create_statistics(&self, deck: &mut Deck) -> Result<(), CsvToPptxError> {
        let shown: &[(PartOfSpeech, Vec<usize>)] = match self.statistics {
            StatisticsDisplay::FirstThree => {
                &self.distribution[..self.distribution.len().min(3)]
            }
            StatisticsDisplay::All => &self.distribution,
        };

        let mut slide = deck.add_slide(self.template, "Word count")?;
        for (index, (pos, members)) in shown.iter().enumerate() {
            let base = 10 + 2 * index as u32;
            slide.set(base, members.len().to_string())?;
            slide.set(base + 1, pos.local_name(self.language).to_uppercase())?;
        }
        Ok(())
    }

    /// 品詞グループ: セクションタイトル + 単語スライド
    ///
    /// グループは分配時の出現順。セクションタイトルのレイアウト名は
    /// 描画されるグループの1始まりの通し番号で`Title {n}`を引きます。
    fn create_groups(&self, deck: &mut Deck) -> Result<(), CsvToPptxError> {
        for (ordinal, (pos, members)) in self.distribution.iter().enumerate() {
            let title = pos.local_name(self.language).to_uppercase();
            let subtitle = pos.chinese_name();

            let layout = format!("Title {}", ordinal + 1);
            let mut slide = deck.add_slide(self.template, &layout)?;
            slide.set(10, title.as_str())?.set(11, subtitle)?;
            slide.note(title.to_lowercase());

            for &index in members {
                let entry = &self.entries[index];
                match self.language {
                    Language::English => en::render_entry(deck, self.template, entry)?,
                    Language::Spanish => es::render_entry(deck, self.template, entry)?,
                }
            }
        }
        Ok(())
    }

    /// 結びスライド（書き込みなし）
    fn create_ending(&self, deck: &mut Deck) -> Result<(), CsvToPptxError> {
        deck.add_slide(self.template, "Thanks")?;
        Ok(())
    }
}

/// レコードを品詞カテゴリごとに出現順で分配する
fn partition(entries: &[VocabEntry], language: Language) -> Vec<(PartOfSpeech, Vec<usize>)> {
    let mut distribution: Vec<(PartOfSpeech, Vec<usize>)> = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let pos = PartOfSpeech::classify(language, &entry.dict_pos);
        match distribution.iter_mut().find(|(p, _)| *p == pos) {
            Some((_, members)) => members.push(index),
            None => distribution.push((pos, vec![index])),
        }
    }
    distribution
}

/// 動詞の変化形スライドを描画する（両言語共通の契約）
///
/// `variations.formats`の形でレイアウトを選びます:
/// 複数要素 → `Verb multi tiempo`、単一要素で`tense`あり →
/// `Verb single tiempo`、単一要素で`format`あり → `Verb participle`。
/// どの形にも当てはまらない場合は`Ok(false)`を返し、呼び出し側の
/// 既定レイアウトに委ねます。
pub(super) fn render_verb_forms(
    deck: &mut Deck,
    template: &TemplatePackage,
    entry: &VocabEntry,
) -> Result<bool, CsvToPptxError> {
    let variations = match &entry.variations {
        crate::record::Variations::Verb(v) if !v.formats.is_empty() => v,
        _ => return Ok(false),
    };

    if variations.formats.len() > 1 {
        render_multi_tense(deck, template, entry, variations)?;
        return Ok(true);
    }

    let sign = &variations.formats[0];
    if let Some(tense) = &sign.tense {
        render_single_tense(deck, template, entry, variations, tense, sign.person.as_deref())?;
        Ok(true)
    } else if let Some(format) = &sign.format {
        render_participle(deck, template, entry, variations, format)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// 単一時制の人称変化スライド
fn render_single_tense(
    deck: &mut Deck,
    template: &TemplatePackage,
    entry: &VocabEntry,
    variations: &VerbVariations,
    tense: &str,
    person: Option<&str>,
) -> Result<(), CsvToPptxError> {
    // 人称スロット（13-18）の並びはレイアウト契約
    const PERSONS: [&str; 6] = [
        "yo",
        "tú",
        "él/ella/Usted",
        "nosotros",
        "vosotros",
        "ellos/ellas/Ustedes",
    ];

    let conjugation = entry.extension.conjugation(tense).ok_or_else(|| {
        CsvToPptxError::Schema {
            row: entry.row,
            message: format!(
                "verb row declares tense '{}' but extension has no conjugation table",
                tense
            ),
        }
    })?;

    let mut slide = deck.add_slide(template, "Verb single tiempo")?;
    slide
        .set(10, variations.origin.as_str())?
        .set(11, entry.word.as_str())?
        .set(12, entry.meanings().join("\n"))?;

    for (offset, key) in PERSONS.iter().enumerate() {
        let form = conjugation.get(*key).map(String::as_str).unwrap_or("");
        // 一人称単数が空のときは空白1文字（プレースホルダの既定文言を防ぐ）
        let text = if offset == 0 && form.is_empty() { " " } else { form };
        slide.set(13 + offset as u32, text)?;
    }

    slide.set(19, tense_display(tense))?;
    slide.set(
        20,
        format!("人称 {} 的变位", person.unwrap_or("")),
    )?;
    slide.note(entry.word.as_str());
    Ok(())
}

/// 複数時制の一覧スライド
fn render_multi_tense(
    deck: &mut Deck,
    template: &TemplatePackage,
    entry: &VocabEntry,
    variations: &VerbVariations,
) -> Result<(), CsvToPptxError> {
    let tenses: Vec<&str> = variations
        .formats
        .iter()
        .map(|f| {
            f.tense
                .as_deref()
                .or(f.format.as_deref())
                .map(tense_display)
                .unwrap_or("")
        })
        .collect();
    let persons: Vec<String> = variations
        .formats
        .iter()
        .map(|f| match &f.person {
            Some(person) => format!("{} 的变位", person),
            None => String::new(),
        })
        .collect();

    let mut slide = deck.add_slide(template, "Verb multi tiempo")?;
    slide
        .set(10, variations.origin.as_str())?
        .set(11, entry.word.as_str())?
        .set(12, entry.meanings().join("\n"))?
        .set(13, tenses.join("\n"))?
        .set(14, persons.join("\n"))?;
    slide.note(entry.word.as_str());
    Ok(())
}

/// 分詞形スライド
fn render_participle(
    deck: &mut Deck,
    template: &TemplatePackage,
    entry: &VocabEntry,
    variations: &VerbVariations,
    format: &str,
) -> Result<(), CsvToPptxError> {
    let mut slide = deck.add_slide(template, "Verb participle")?;
    slide
        .set(10, variations.origin.as_str())?
        .set(11, entry.word.as_str())?
        .set(12, entry.meanings().join("\n"))?
        .set(13, tense_display(format))?;
    slide.note(entry.word.as_str());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Extension, Variations};

    fn entry(dict_pos: &str) -> VocabEntry {
        VocabEntry {
            row: 1,
            word: "w".to_string(),
            meaning: "m".to_string(),
            dict_pos: dict_pos.to_string(),
            extension: Extension::Absent,
            variations: Variations::Absent,
            examples: Vec::new(),
        }
    }

    #[test]
    fn test_partition_keeps_encounter_order() {
        let entries = vec![
            entry("adv."),
            entry("n."),
            entry("adv."),
            entry("v."),
            entry("n."),
        ];
        let distribution = partition(&entries, Language::English);
        let order: Vec<PartOfSpeech> = distribution.iter().map(|(p, _)| *p).collect();
        assert_eq!(
            order,
            vec![PartOfSpeech::Adv, PartOfSpeech::Noun, PartOfSpeech::Verb]
        );
        assert_eq!(distribution[0].1, vec![0, 2]);
        assert_eq!(distribution[1].1, vec![1, 4]);
    }

    #[test]
    fn test_partition_unknown_tags_collect_in_other() {
        let entries = vec![entry("???"), entry("xx."), entry("n.")];
        let distribution = partition(&entries, Language::English);
        assert_eq!(distribution[0].0, PartOfSpeech::Other);
        assert_eq!(distribution[0].1.len(), 2);
    }

    #[test]
    fn test_content_keys_differ_per_language() {
        assert!(content_keys(Language::English).contains(&"examples"));
        assert!(!content_keys(Language::Spanish).contains(&"examples"));
    }
}
