//! Record Loader Module
//!
//! タブ区切りテキストからレコード列を読み込むモジュール。
//! ヘッダ行がフィールド名を定義し、各行のフィールド集合はコンテンツ種別の
//! 宣言スキーマと完全一致しなければなりません。不一致は読み込み全体を
//! 中断します（部分的な成功モードはありません）。

use std::collections::HashMap;
use std::io::Read;

use crate::error::CsvToPptxError;

/// 読み込んだ1行分のレコード
///
/// フィールド名から文字列値への対応と、エラー報告用の行番号を保持します。
#[derive(Debug, Clone)]
pub(crate) struct RawRecord {
    /// 1始まりのデータ行番号（ヘッダ行を除く）
    pub row: usize,
    fields: HashMap<String, String>,
}

impl RawRecord {
    /// フィールド値を取得する
    ///
    /// スキーマ検証済みのレコードに対してのみ呼ばれるため、
    /// 存在しないキーは空文字列を返します。
    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }
}

/// タブ区切りソースからレコード列を読み込む
///
/// # 引数
///
/// * `reader` - ソーステーブルのリーダー
/// * `expected_keys` - コンテンツ種別が宣言するフィールド名の集合
///
/// # 戻り値
///
/// * `Ok(Vec<RawRecord>)` - 入力の行数と同数のレコード（入力順）
/// * `Err(CsvToPptxError::Schema)` - ヘッダまたはいずれかの行がスキーマと
///   一致しない場合
///
/// # 注意
///
/// 区切り文字直後の空白は無視されます（上流ツールの出力互換）。
pub(crate) fn read_records<R: Read>(
    reader: R,
    expected_keys: &[&str],
) -> Result<Vec<RawRecord>, CsvToPptxError> {
    let mut table = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // 1. ヘッダ検証: フィールド名の集合が宣言スキーマと完全一致すること
    let headers: Vec<String> = table
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.len() != expected_keys.len() {
        return Err(CsvToPptxError::Schema {
            row: 0,
            message: format!(
                "header has {} fields, schema declares {}",
                headers.len(),
                expected_keys.len()
            ),
        });
    }
    for header in &headers {
        if !expected_keys.contains(&header.as_str()) {
            return Err(CsvToPptxError::Schema {
                row: 0,
                message: format!("unknown field '{}'", header),
            });
        }
    }
    for key in expected_keys {
        if !headers.iter().any(|h| h == key) {
            return Err(CsvToPptxError::Schema {
                row: 0,
                message: format!("missing field '{}'", key),
            });
        }
    }

    // 2. 各行をヘッダと突き合わせて読み込む
    let mut records = Vec::new();
    for (index, result) in table.records().enumerate() {
        let row = index + 1;
        let record = result?;

        if record.len() != headers.len() {
            return Err(CsvToPptxError::Schema {
                row,
                message: format!(
                    "row has {} fields, header declares {}",
                    record.len(),
                    headers.len()
                ),
            });
        }

        let fields = headers
            .iter()
            .cloned()
            .zip(record.iter().map(|v| v.to_string()))
            .collect();
        records.push(RawRecord { row, fields });
    }

    tracing::debug!(records = records.len(), "source table loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: &[&str] = &["word", "meaning", "dict_pos"];

    #[test]
    fn test_read_valid_rows() {
        let source = "word\tmeaning\tdict_pos\nhola\t你好\tother.\nadios\t再见\tother.\n";
        let records = read_records(source.as_bytes(), KEYS).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("word"), "hola");
        assert_eq!(records[0].get("meaning"), "你好");
        assert_eq!(records[1].row, 2);
    }

    #[test]
    fn test_record_count_equals_row_count() {
        let mut source = String::from("word\tmeaning\tdict_pos\n");
        for i in 0..50 {
            source.push_str(&format!("w{}\tm{}\tn.\n", i, i));
        }
        let records = read_records(source.as_bytes(), KEYS).unwrap();
        assert_eq!(records.len(), 50);
    }

    #[test]
    fn test_header_with_unknown_field_fails() {
        let source = "word\tmeaning\tbogus\nhola\t你好\tx\n";
        let err = read_records(source.as_bytes(), KEYS).unwrap_err();
        match err {
            CsvToPptxError::Schema { row, message } => {
                assert_eq!(row, 0);
                assert!(message.contains("bogus"));
            }
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_header_with_missing_field_fails() {
        let source = "word\tmeaning\nhola\t你好\n";
        let err = read_records(source.as_bytes(), KEYS).unwrap_err();
        assert!(matches!(err, CsvToPptxError::Schema { row: 0, .. }));
    }

    #[test]
    fn test_header_with_extra_field_fails() {
        let source = "word\tmeaning\tdict_pos\textra\nhola\t你好\tn.\tx\n";
        let err = read_records(source.as_bytes(), KEYS).unwrap_err();
        assert!(matches!(err, CsvToPptxError::Schema { row: 0, .. }));
    }

    #[test]
    fn test_short_row_fails_with_row_number() {
        let source = "word\tmeaning\tdict_pos\nhola\t你好\tn.\nadios\t再见\n";
        let err = read_records(source.as_bytes(), KEYS).unwrap_err();
        match err {
            CsvToPptxError::Schema { row, .. } => assert_eq!(row, 2),
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_whitespace_after_delimiter_is_trimmed() {
        let source = "word\tmeaning\tdict_pos\nhola\t 你好\t n.\n";
        let records = read_records(source.as_bytes(), KEYS).unwrap();
        assert_eq!(records[0].get("meaning"), "你好");
        assert_eq!(records[0].get("dict_pos"), "n.");
    }

    #[test]
    fn test_empty_source_yields_no_records() {
        let source = "word\tmeaning\tdict_pos\n";
        let records = read_records(source.as_bytes(), KEYS).unwrap();
        assert!(records.is_empty());
    }
}
