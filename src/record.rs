//! Record Types Module
//!
//! 検証済みの生レコードを型付きレコードへ変換するモジュール。
//! JSONエンコードされたオプションフィールドはここで一度だけ復号され、
//! タグ付きバリアントとして保持されます。レンダリング時に文字列の形を
//! 再判定することはありません。復号に失敗した行は変換全体を失敗させます。

use std::collections::HashMap;

use serde::Deserialize;

use crate::api::Language;
use crate::error::CsvToPptxError;
use crate::reader::RawRecord;

/// 例文ペア（原文と訳文）
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub(crate) struct ExamplePair {
    pub original: String,
    pub translated: String,
}

/// 動詞の変化形シグネチャ
///
/// `variations.formats`の1要素。`tense`を持つ要素は人称変化、
/// `format`を持つ要素は分詞形を表します。
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub(crate) struct VerbFormat {
    #[serde(default)]
    pub tense: Option<String>,
    #[serde(default)]
    pub person: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

/// `extension`フィールドのタグ付き表現
///
/// 読み込み時に一度だけ形を判定します。
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Extension {
    /// フィールドが空文字列
    Absent,
    /// 語形の平坦な対応（名詞の複数形、形容詞の比較級など）
    Forms(HashMap<String, String>),
    /// 時制 → 人称 → 活用形 の二段の対応（動詞）
    Conjugation(HashMap<String, HashMap<String, String>>),
}

impl Extension {
    /// 平坦な語形を引く
    pub fn form(&self, key: &str) -> Option<&str> {
        match self {
            Extension::Forms(map) => map.get(key).map(String::as_str),
            _ => None,
        }
    }

    /// 指定時制の人称→活用形の対応を引く
    pub fn conjugation(&self, tense: &str) -> Option<&HashMap<String, String>> {
        match self {
            Extension::Conjugation(map) => map.get(tense),
            _ => None,
        }
    }

    /// フィールドが存在するかどうか
    pub fn is_present(&self) -> bool {
        !matches!(self, Extension::Absent)
    }
}

/// 動詞レコードの`variations`本体
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub(crate) struct VerbVariations {
    /// 原形（不定詞）
    #[serde(default)]
    pub origin: String,
    /// 変化形シグネチャのリスト
    pub formats: Vec<VerbFormat>,
}

/// `variations`フィールドのタグ付き表現
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Variations {
    /// フィールドが空文字列
    Absent,
    /// `formats`リストを持つ動詞変化情報
    Verb(VerbVariations),
    /// JSONとしては正しいが`formats`リストを持たない
    Other,
}

/// 語彙レコード（1行分、型付き）
#[derive(Debug, Clone)]
pub(crate) struct VocabEntry {
    /// 1始まりのデータ行番号
    pub row: usize,
    pub word: String,
    pub meaning: String,
    pub dict_pos: String,
    pub extension: Extension,
    pub variations: Variations,
    pub examples: Vec<ExamplePair>,
}

impl VocabEntry {
    /// 検証済み生レコードから型付きレコードを構築する
    ///
    /// スペイン語スキーマに`examples`列はないため、その場合は常に空です。
    pub fn from_raw(record: &RawRecord, language: Language) -> Result<Self, CsvToPptxError> {
        let extension = parse_extension(record)?;
        let variations = parse_variations(record)?;
        let examples = match language {
            Language::English => parse_examples(record)?,
            Language::Spanish => Vec::new(),
        };

        Ok(VocabEntry {
            row: record.row,
            word: record.get("word").to_string(),
            meaning: record.get("meaning").to_string(),
            dict_pos: record.get("dict_pos").to_string(),
            extension,
            variations,
            examples,
        })
    }

    /// 意味の訳語リストを返す（カンマ区切り、最大4件）
    pub fn meanings(&self) -> Vec<&str> {
        truncate_meanings(&self.meaning)
    }
}

/// 句レコードの文・句セグメント（テキストと訳）
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub(crate) struct PhraseSegment {
    pub text: String,
    #[serde(default)]
    pub meaning: String,
}

/// 句レコード内の動詞の出現
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub(crate) struct VerbUse {
    pub text: String,
    #[serde(default)]
    pub lemma: String,
    #[serde(default)]
    pub form: String,
}

/// 句レコード（1行分、型付き）
#[derive(Debug, Clone)]
pub(crate) struct PhraseEntry {
    /// 1始まりのデータ行番号
    #[allow(dead_code)]
    pub row: usize,
    pub sentence: PhraseSegment,
    pub noun_phrases: Vec<PhraseSegment>,
    /// スペイン語スキーマのみ。英語では常に空
    pub prep_phrases: Vec<PhraseSegment>,
    pub verbs: Vec<VerbUse>,
}

impl PhraseEntry {
    /// 検証済み生レコードから型付きレコードを構築する
    ///
    /// `verb_phrases`列は形式検証のみ行い、保持しません（描画に使用されない）。
    pub fn from_raw(record: &RawRecord, language: Language) -> Result<Self, CsvToPptxError> {
        let sentence: PhraseSegment = parse_json_field(record, "sentence")?;
        let noun_phrases: Vec<PhraseSegment> = parse_json_field(record, "noun_phrases")?;
        let prep_phrases: Vec<PhraseSegment> = match language {
            Language::Spanish => parse_json_field(record, "prep_phrases")?,
            Language::English => Vec::new(),
        };
        let _: Vec<PhraseSegment> = parse_json_field(record, "verb_phrases")?;
        let verbs: Vec<VerbUse> = parse_json_field(record, "verbs")?;

        Ok(PhraseEntry {
            row: record.row,
            sentence,
            noun_phrases,
            prep_phrases,
            verbs,
        })
    }
}

/// 意味文字列をカンマで分割し、最大4件に切り詰める
///
/// スライドでは改行区切りで表示されます。
pub(crate) fn truncate_meanings(meaning: &str) -> Vec<&str> {
    meaning.split(',').take(4).collect()
}

/// 上流ツールが出力する単一引用符のJSON風文字列を正規化する
///
/// `extension` / `variations`フィールドは`{'s': 'words'}`の形で届くことが
/// あります。値の中に単一引用符が現れないことが前提です。
fn normalize_quotes(raw: &str) -> String {
    raw.replace('\'', "\"")
}

/// JSONエンコードされた必須フィールドを復号する
fn parse_json_field<'a, T: Deserialize<'a>>(
    record: &'a RawRecord,
    field: &str,
) -> Result<T, CsvToPptxError> {
    serde_json::from_str(record.get(field)).map_err(|source| CsvToPptxError::Field {
        row: record.row,
        field: field.to_string(),
        source,
    })
}

/// `extension`フィールドを復号し、形を一度だけ判定する
fn parse_extension(record: &RawRecord) -> Result<Extension, CsvToPptxError> {
    let raw = record.get("extension");
    if raw.is_empty() {
        return Ok(Extension::Absent);
    }

    let normalized = normalize_quotes(raw);
    let value: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&normalized)
        .map_err(|source| CsvToPptxError::Field {
            row: record.row,
            field: "extension".to_string(),
            source,
        })?;

    // 値にオブジェクトが1つでもあれば活用表、そうでなければ平坦な語形表
    let is_conjugation = value.values().any(|v| v.is_object());
    if is_conjugation {
        let mut tenses = HashMap::new();
        for (tense, persons) in value {
            if let serde_json::Value::Object(persons) = persons {
                let forms = persons
                    .into_iter()
                    .filter_map(|(person, form)| match form {
                        serde_json::Value::String(s) => Some((person, s)),
                        _ => None,
                    })
                    .collect();
                tenses.insert(tense, forms);
            }
        }
        Ok(Extension::Conjugation(tenses))
    } else {
        let forms = value
            .into_iter()
            .filter_map(|(key, v)| match v {
                serde_json::Value::String(s) => Some((key, s)),
                _ => None,
            })
            .collect();
        Ok(Extension::Forms(forms))
    }
}

/// `variations`フィールドを復号し、形を一度だけ判定する
fn parse_variations(record: &RawRecord) -> Result<Variations, CsvToPptxError> {
    let raw = record.get("variations");
    if raw.is_empty() {
        return Ok(Variations::Absent);
    }

    let normalized = normalize_quotes(raw);
    let value: serde_json::Value =
        serde_json::from_str(&normalized).map_err(|source| CsvToPptxError::Field {
            row: record.row,
            field: "variations".to_string(),
            source,
        })?;

    if value.get("formats").map(|f| f.is_array()).unwrap_or(false) {
        let parsed: VerbVariations =
            serde_json::from_value(value).map_err(|source| CsvToPptxError::Field {
                row: record.row,
                field: "variations".to_string(),
                source,
            })?;
        Ok(Variations::Verb(parsed))
    } else {
        Ok(Variations::Other)
    }
}

/// `examples`フィールドを復号する（空文字列は例文なし）
fn parse_examples(record: &RawRecord) -> Result<Vec<ExamplePair>, CsvToPptxError> {
    let raw = record.get("examples");
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).map_err(|source| CsvToPptxError::Field {
        row: record.row,
        field: "examples".to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_records;

    const VOCAB_KEYS: &[&str] = &[
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

    fn vocab_record(
        word: &str,
        meaning: &str,
        dict_pos: &str,
        extension: &str,
        variations: &str,
        examples: &str,
    ) -> RawRecord {
        let source = format!(
            "num\tword\tpos\tmeaning\tdict_pos\tfrom\textension\tvariations\texamples\n\
             1\t{}\tX\t{}\t{}\ttest\t{}\t{}\t{}\n",
            word, meaning, dict_pos, extension, variations, examples
        );
        read_records(source.as_bytes(), VOCAB_KEYS)
            .unwrap()
            .remove(0)
    }

    #[test]
    fn test_absent_optional_fields() {
        let record = vocab_record("cat", "猫", "n.", "", "", "");
        let entry = VocabEntry::from_raw(&record, Language::English).unwrap();
        assert_eq!(entry.extension, Extension::Absent);
        assert_eq!(entry.variations, Variations::Absent);
        assert!(entry.examples.is_empty());
    }

    #[test]
    fn test_flat_extension_forms() {
        let record = vocab_record("cat", "猫", "n.", r#"{"s": "cats"}"#, "", "[]");
        let entry = VocabEntry::from_raw(&record, Language::English).unwrap();
        assert!(entry.extension.is_present());
        assert_eq!(entry.extension.form("s"), Some("cats"));
        assert_eq!(entry.extension.form("missing"), None);
    }

    #[test]
    fn test_single_quoted_extension_is_normalized() {
        let record = vocab_record("gato", "猫", "m.", "{'mpl': 'gatos'}", "", "");
        let entry = VocabEntry::from_raw(&record, Language::Spanish).unwrap();
        assert_eq!(entry.extension.form("mpl"), Some("gatos"));
    }

    #[test]
    fn test_conjugation_extension() {
        let record = vocab_record(
            "habla",
            "说话",
            "verb.",
            r#"{"indicativo-presente": {"yo": "hablo", "tú": "hablas"}}"#,
            "",
            "",
        );
        let entry = VocabEntry::from_raw(&record, Language::Spanish).unwrap();
        let tense = entry.extension.conjugation("indicativo-presente").unwrap();
        assert_eq!(tense.get("yo").unwrap(), "hablo");
        assert!(entry.extension.conjugation("participio").is_none());
    }

    #[test]
    fn test_verb_variations_shape() {
        let record = vocab_record(
            "habla",
            "说话",
            "verb.",
            "",
            r#"{"origin": "hablar", "formats": [{"tense": "indicativo-presente", "person": "él"}]}"#,
            "",
        );
        let entry = VocabEntry::from_raw(&record, Language::Spanish).unwrap();
        match entry.variations {
            Variations::Verb(ref v) => {
                assert_eq!(v.origin, "hablar");
                assert_eq!(v.formats.len(), 1);
                assert_eq!(v.formats[0].tense.as_deref(), Some("indicativo-presente"));
                assert_eq!(v.formats[0].format, None);
            }
            ref other => panic!("Expected Verb variations, got {:?}", other),
        }
    }

    #[test]
    fn test_variations_without_formats_is_other() {
        let record = vocab_record("ser", "是", "verb.", "", r#"{"origin": "ser"}"#, "");
        let entry = VocabEntry::from_raw(&record, Language::Spanish).unwrap();
        assert_eq!(entry.variations, Variations::Other);
    }

    #[test]
    fn test_malformed_json_fails_whole_row() {
        let record = vocab_record("cat", "猫", "n.", "{broken", "", "[]");
        let err = VocabEntry::from_raw(&record, Language::English).unwrap_err();
        match err {
            CsvToPptxError::Field { row, field, .. } => {
                assert_eq!(row, 1);
                assert_eq!(field, "extension");
            }
            other => panic!("Expected Field error, got {:?}", other),
        }
    }

    #[test]
    fn test_examples_parsing() {
        let record = vocab_record(
            "cat",
            "猫",
            "n.",
            "",
            "",
            r#"[{"original": "A cat.", "translated": "一只猫。"}]"#,
        );
        let entry = VocabEntry::from_raw(&record, Language::English).unwrap();
        assert_eq!(entry.examples.len(), 1);
        assert_eq!(entry.examples[0].original, "A cat.");
    }

    #[test]
    fn test_spanish_schema_has_no_examples() {
        // スペイン語ではexamples列自体が存在しない
        let source = "num\tword\tpos\tmeaning\tdict_pos\tfrom\textension\tvariations\n\
                      1\tgato\tX\t猫\tm.\ttest\t\t\n";
        let keys: &[&str] = &[
            "num",
            "word",
            "pos",
            "meaning",
            "dict_pos",
            "from",
            "extension",
            "variations",
        ];
        let record = read_records(source.as_bytes(), keys).unwrap().remove(0);
        let entry = VocabEntry::from_raw(&record, Language::Spanish).unwrap();
        assert!(entry.examples.is_empty());
    }

    #[test]
    fn test_truncate_meanings_caps_at_four() {
        assert_eq!(truncate_meanings("a,b,c,d,e,f"), vec!["a", "b", "c", "d"]);
        assert_eq!(truncate_meanings("a,b"), vec!["a", "b"]);
        assert_eq!(truncate_meanings("single"), vec!["single"]);
    }

    #[test]
    fn test_phrase_entry_from_raw() {
        let keys: &[&str] = &["sentence", "noun_phrases", "verb_phrases", "verbs"];
        let source = concat!(
            "sentence\tnoun_phrases\tverb_phrases\tverbs\n",
            r#"{"text": "I like cats.", "meaning": "我喜欢猫。"}"#,
            "\t",
            r#"[{"text": "cats", "meaning": "猫"}]"#,
            "\t",
            r#"[]"#,
            "\t",
            r#"[{"text": "like", "lemma": "like", "form": "VBP,present"}]"#,
            "\n"
        );
        let record = read_records(source.as_bytes(), keys).unwrap().remove(0);
        let entry = PhraseEntry::from_raw(&record, Language::English).unwrap();
        assert_eq!(entry.sentence.text, "I like cats.");
        assert_eq!(entry.noun_phrases.len(), 1);
        assert!(entry.prep_phrases.is_empty());
        assert_eq!(entry.verbs[0].form, "VBP,present");
    }

    #[test]
    fn test_phrase_entry_malformed_sentence_fails() {
        let keys: &[&str] = &["sentence", "noun_phrases", "verb_phrases", "verbs"];
        let source = "sentence\tnoun_phrases\tverb_phrases\tverbs\nnot json\t[]\t[]\t[]\n";
        let record = read_records(source.as_bytes(), keys).unwrap().remove(0);
        let err = PhraseEntry::from_raw(&record, Language::English).unwrap_err();
        assert!(matches!(
            err,
            CsvToPptxError::Field { field, .. } if field == "sentence"
        ));
    }
}
