//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use crate::api::{ContentKind, Genre, Language, StatisticsDisplay};
use crate::error::CsvToPptxError;
use crate::phrase::PhraseDeck;
use crate::template::TemplatePackage;
use crate::vocab::VocabDeck;
use crate::writer::save_deck;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// 変換対象の言語
    pub language: Language,

    /// コンテンツ種別
    pub content: ContentKind,

    /// 表紙に表示するタイトル
    pub title: String,

    /// テンプレートのジャンル
    pub genre: Genre,

    /// 統計スライドの表示カテゴリ数
    pub statistics: StatisticsDisplay,

    /// テンプレート探索ディレクトリ
    pub template_dir: PathBuf,

    /// 明示的なテンプレートファイル（指定時は探索より優先）
    pub template_file: Option<PathBuf>,
}

/// Fluent Builder APIを提供する構造体
///
/// `Converter`インスタンスを段階的に構築するためのビルダーです。
/// 言語とコンテンツ種別以外の設定項目にはデフォルト値が設定されており、
/// 必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use pptxzero::{ContentKind, ConverterBuilder, Genre, Language};
///
/// # fn main() -> Result<(), pptxzero::CsvToPptxError> {
/// let converter = ConverterBuilder::new(Language::Spanish, ContentKind::Vocab)
///     .with_title("第一课")
///     .with_genre(Genre::Watermark)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - タイトル: 空文字列
    /// - ジャンル: `Classic`
    /// - 統計表示: 先頭3カテゴリ
    /// - テンプレートディレクトリ: `./templates`
    pub fn new(language: Language, content: ContentKind) -> Self {
        Self {
            config: ConversionConfig {
                language,
                content,
                title: String::new(),
                genre: Genre::Classic,
                statistics: StatisticsDisplay::FirstThree,
                template_dir: PathBuf::from("templates"),
                template_file: None,
            },
        }
    }

    /// 表紙に表示するタイトルを設定する
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// テンプレートのジャンルを設定する
    pub fn with_genre(mut self, genre: Genre) -> Self {
        self.config.genre = genre;
        self
    }

    /// 統計スライドの表示カテゴリ数を設定する
    pub fn with_statistics_display(mut self, statistics: StatisticsDisplay) -> Self {
        self.config.statistics = statistics;
        self
    }

    /// テンプレート探索ディレクトリを設定する
    ///
    /// ファイル名は`{kind}_{language}_{genre}.pptx`の規約で解決されます
    /// （例: `vocab_spanish_watermark.pptx`）。
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.template_dir = dir.into();
        self
    }

    /// テンプレートファイルを明示的に指定する（探索規約より優先）
    pub fn with_template_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.template_file = Some(path.into());
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Converter)` - 設定が有効な場合
    /// * `Err(CsvToPptxError::Config)` - 明示的なテンプレートパスが
    ///   `.pptx`でない場合
    pub fn build(self) -> Result<Converter, CsvToPptxError> {
        if let Some(path) = &self.config.template_file {
            let is_pptx = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("pptx"))
                .unwrap_or(false);
            if !is_pptx {
                return Err(CsvToPptxError::Config(format!(
                    "template file must be a .pptx: '{}'",
                    path.display()
                )));
            }
        }
        Ok(Converter {
            config: self.config,
        })
    }
}

/// 変換結果の要約
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckSummary {
    /// 読み込んだレコード数
    pub records: usize,

    /// 出力デッキに追加されたスライド枚数
    pub slides: usize,
}

/// テーブル→デッキ変換器
///
/// 1回の`convert`呼び出しが独自のデッキを所有し、呼び出し間で状態を
/// 共有しません。並行する変換は互いに干渉しない独立した構築です。
#[derive(Debug)]
pub struct Converter {
    config: ConversionConfig,
}

impl Converter {
    /// 設定から解決されるテンプレートファイルのパス
    ///
    /// 明示的な指定があればそれを、なければ規約
    /// `{kind}_{language}_{genre}.pptx`で探索ディレクトリから解決します。
    pub fn template_path(&self) -> PathBuf {
        if let Some(path) = &self.config.template_file {
            return path.clone();
        }
        self.config.template_dir.join(format!(
            "{}_{}_{}.pptx",
            self.config.content.template_segment(),
            self.config.language.template_segment(),
            self.config.genre.template_segment(),
        ))
    }

    /// リーダー/ライター間で変換する
    ///
    /// # 引数
    ///
    /// * `source` - タブ区切りソーステーブル
    /// * `template` - テンプレートPPTX
    /// * `output` - 出力PPTXの書き込み先
    ///
    /// # 戻り値
    ///
    /// * `Ok(DeckSummary)` - レコード数とスライド枚数
    /// * `Err(CsvToPptxError)` - 読み込み・検証・書き出しのいずれかが
    ///   失敗した場合（部分的な出力は生成されません）
    pub fn convert<R, T, W>(
        &self,
        source: R,
        template: T,
        output: W,
    ) -> Result<DeckSummary, CsvToPptxError>
    where
        R: Read,
        T: Read + Seek,
        W: Write + Seek,
    {
        let template = TemplatePackage::from_reader(template)?;

        let (records, deck) = match self.config.content {
            ContentKind::Vocab => {
                let vocab = VocabDeck::load(
                    source,
                    &template,
                    self.config.language,
                    &self.config.title,
                    self.config.statistics,
                )?;
                (vocab.record_count(), vocab.build()?)
            }
            ContentKind::Phrase => {
                let phrase = PhraseDeck::load(
                    source,
                    &template,
                    self.config.language,
                    &self.config.title,
                )?;
                (phrase.record_count(), phrase.build()?)
            }
        };

        let slides = deck.len();
        save_deck(&template, &deck, output)?;

        tracing::info!(records, slides, "deck conversion finished");
        Ok(DeckSummary { records, slides })
    }

    /// ファイルパス間で変換する
    ///
    /// テンプレートは`template_path()`で解決され、出力ファイルは
    /// デッキの組み立てが終わってから作成されます。
    pub fn convert_file(
        &self,
        source: &Path,
        dest: &Path,
    ) -> Result<DeckSummary, CsvToPptxError> {
        let template_path = self.template_path();
        if !template_path.is_file() {
            return Err(CsvToPptxError::Config(format!(
                "template not found: '{}'",
                template_path.display()
            )));
        }

        tracing::info!(
            source = %source.display(),
            template = %template_path.display(),
            dest = %dest.display(),
            "starting deck conversion"
        );

        let source = File::open(source)?;
        let template = File::open(&template_path)?;
        let output = File::create(dest)?;
        self.convert(source, template, output)
    }
}
