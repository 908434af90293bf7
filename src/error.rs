//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// pptxzeroクレート全体で使用するエラー型
///
/// このエラー型は、ソーステーブルの読み込み、テンプレートの解析、
/// スライド生成、外部コンバータ呼び出し中に発生するすべてのエラーを
/// 統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（ファイル読み込み失敗など）
/// - `Table`: ソーステーブル（TSV）の読み込みに失敗したエラー（csv由来）
/// - `Schema`: 行のフィールド集合がスキーマと一致しないエラー — 変換全体を中断する
/// - `Field`: オプションフィールドのJSONが存在するのに不正なエラー
/// - `Zip` / `Xml`: テンプレートPPTX（OPCパッケージ）の解析・書き出しエラー
/// - `LayoutNotFound` / `PlaceholderNotFound`: テンプレートとコードの
///   スロット契約が崩れた場合のエラー
/// - `Convert`: 外部プロセス（soffice / poppler）の失敗
///
/// # 使用例
///
/// ```rust,no_run
/// use pptxzero::CsvToPptxError;
/// use std::fs::File;
///
/// fn open_source(path: &str) -> Result<(), CsvToPptxError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     // ... 処理 ...
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum CsvToPptxError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ソーステーブルの読み込みに失敗したエラー
    ///
    /// csvクレートがタブ区切りファイルを解析する際に発生したエラーです。
    #[error("Failed to read source table: {0}")]
    Table(#[from] csv::Error),

    /// 行のフィールド集合が宣言されたスキーマと一致しないエラー
    ///
    /// フィールドの過不足・未知のヘッダを検出した時点で読み込み全体を
    /// 中断します。部分的な成功モードはありません。
    #[error("Schema violation at row {row}: {message}")]
    Schema {
        /// 1始まりのデータ行番号（ヘッダ行を除く）
        row: usize,
        /// 検出内容
        message: String,
    },

    /// オプションフィールドに存在するJSONが不正なエラー
    ///
    /// `extension` / `variations` / `examples` などのJSONエンコード
    /// フィールドが空文字列ではないのに復号できない場合、変換全体を
    /// 失敗させます。
    #[error("Malformed JSON in field '{field}' at row {row}: {source}")]
    Field {
        /// 1始まりのデータ行番号
        row: usize,
        /// フィールド名
        field: String,
        /// 復号エラー
        source: serde_json::Error,
    },

    /// ZIPアーカイブ（OPCパッケージ）の解析・書き出しエラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// テンプレートXMLの解析・書き換えエラー
    #[error("XML error: {0}")]
    Xml(String),

    /// 指定された名前のスライドレイアウトがテンプレートに存在しないエラー
    ///
    /// レイアウト名はコードとテンプレートファイルの間の私的契約であり、
    /// 解決はスライド追加時に行われます。
    #[error("Layout '{0}' not found in template")]
    LayoutNotFound(String),

    /// レイアウトに存在しないプレースホルダスロットへの書き込みエラー
    #[error("Placeholder {idx} not found in layout '{layout}'")]
    PlaceholderNotFound {
        /// レイアウト名
        layout: String,
        /// スロット番号
        idx: u32,
    },

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時の検証、またはテンプレートパスの
    /// 解決に失敗した場合に発生します。
    #[error("Configuration error: {0}")]
    Config(String),

    /// 外部コンバータ（soffice / pdfinfo / pdftocairo）の失敗
    ///
    /// プロセスの起動失敗、非ゼロ終了、タイムアウトを含みます。
    /// リトライは行いません。
    #[error("External converter error: {0}")]
    Convert(String),
}
