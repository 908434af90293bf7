//! pptxzero CLI
//!
//! テーブル→デッキ→PDF→プレビュー画像のパイプラインを提供する
//! コマンドラインツール。各フェーズの進捗を1行のJSONとして標準出力に
//! 書き出します（診断ログは標準エラーに分離）。

use std::fs;
use std::io::Write as _;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use pptxzero::media::{pdf_to_images, pptx_to_pdf};
use pptxzero::{ContentKind, ConverterBuilder, CsvToPptxError, Genre, Language};

#[derive(Parser)]
#[command(
    name = "pptxzero",
    version,
    about = "Convert vocabulary and phrase tables into PPTX decks, PDFs and preview images"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// 言語の指定
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LangArg {
    /// 英語
    En,
    /// スペイン語
    Es,
}

impl From<LangArg> for Language {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Language::English,
            LangArg::Es => Language::Spanish,
        }
    }
}

/// コンテンツ種別の指定
#[derive(Clone, Copy, Debug, ValueEnum)]
enum PtypeArg {
    /// 語彙テーブル
    Vocab,
    /// 句・例文テーブル
    Phrase,
}

impl From<PtypeArg> for ContentKind {
    fn from(value: PtypeArg) -> Self {
        match value {
            PtypeArg::Vocab => ContentKind::Vocab,
            PtypeArg::Phrase => ContentKind::Phrase,
        }
    }
}

/// テンプレートジャンルの指定
#[derive(Clone, Copy, Debug, ValueEnum)]
enum GenreArg {
    Classic,
    Watermark,
}

impl From<GenreArg> for Genre {
    fn from(value: GenreArg) -> Self {
        match value {
            GenreArg::Classic => Genre::Classic,
            GenreArg::Watermark => Genre::Watermark,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a source table into a slide deck
    Deck {
        /// Parser type
        #[arg(long, value_enum)]
        ptype: PtypeArg,

        /// Source csv file path (tab-delimited)
        #[arg(long)]
        source_csv: PathBuf,

        /// Language of the source table
        #[arg(long, value_enum)]
        lang: LangArg,

        /// Title shown on the opening slide
        #[arg(long, default_value = "")]
        title: String,

        /// Destination pptx file name
        #[arg(long, default_value = "test.pptx")]
        dest_pptx: PathBuf,

        /// Template genre
        #[arg(long, value_enum, default_value = "classic")]
        genre: GenreArg,

        /// Directory holding the deck templates
        #[arg(long, default_value = "templates")]
        template_dir: PathBuf,
    },

    /// Render an existing deck to a PDF and preview images
    Rasterize {
        /// Source pptx file path
        #[arg(long)]
        source_pptx: PathBuf,

        /// Destination directory for the pdf and the images
        #[arg(long)]
        dest_dir: PathBuf,

        /// First page of the preview range (0-based)
        #[arg(long, default_value_t = 0)]
        first: usize,

        /// End of the preview range, exclusive (defaults to the last page)
        #[arg(long)]
        last: Option<usize>,
    },

    /// Full pipeline: pro and watermarked decks, PDFs, preview images
    Media {
        /// Parser type
        #[arg(long, value_enum)]
        ptype: PtypeArg,

        /// Source csv file path (tab-delimited)
        #[arg(long)]
        source_csv: PathBuf,

        /// Language of the source table
        #[arg(long, value_enum)]
        lang: LangArg,

        /// Output file name (without extension)
        #[arg(long, default_value = "test")]
        name: String,

        /// Title shown on the opening slide
        #[arg(long, default_value = "歧舌AI备课助教")]
        title: String,

        /// Directory holding the deck templates
        #[arg(long, default_value = "templates")]
        template_dir: PathBuf,

        /// Destination pptx directory
        #[arg(long)]
        pptx_dir: PathBuf,

        /// Destination pdf directory
        #[arg(long)]
        pdf_dir: PathBuf,

        /// Destination preview image directory
        #[arg(long)]
        img_dir: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("Error: {}", error);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CsvToPptxError> {
    match cli.command {
        Commands::Deck {
            ptype,
            source_csv,
            lang,
            title,
            dest_pptx,
            genre,
            template_dir,
        } => {
            phase(1, "Start ppt generation");

            let converter = ConverterBuilder::new(lang.into(), ptype.into())
                .with_title(title)
                .with_genre(genre.into())
                .with_template_dir(template_dir)
                .build()?;
            converter.convert_file(&source_csv, &dest_pptx)?;

            phase(2, "Finish ppt generation");
            Ok(())
        }

        Commands::Rasterize {
            source_pptx,
            dest_dir,
            first,
            last,
        } => {
            phase(1, "Start pdf generation");
            let pdf = pptx_to_pdf(&source_pptx, &dest_dir)?;

            phase(2, "Finish pdf generation");
            phase(3, "Start images generation");
            let images_len = pdf_to_images(&pdf, &dest_dir, first, last)?;

            phase_with_images(4, "Finish images generation", images_len);
            Ok(())
        }

        Commands::Media {
            ptype,
            source_csv,
            lang,
            name,
            title,
            template_dir,
            pptx_dir,
            pdf_dir,
            img_dir,
        } => {
            let language: Language = lang.into();
            let content: ContentKind = ptype.into();

            phase(1, "Start ppt generation");

            let pptx_pro_dir = pptx_dir.join("pro");
            let pptx_water_dir = pptx_dir.join("water");
            fs::create_dir_all(&pptx_pro_dir)?;
            fs::create_dir_all(&pptx_water_dir)?;

            let pro = ConverterBuilder::new(language, content)
                .with_title(title.as_str())
                .with_template_dir(template_dir.as_path())
                .build()?;
            let pptx = pptx_pro_dir.join(format!("{}.pptx", name));
            pro.convert_file(&source_csv, &pptx)?;

            let watermark = ConverterBuilder::new(language, content)
                .with_title(title.as_str())
                .with_genre(Genre::Watermark)
                .with_template_dir(template_dir.as_path())
                .build()?;
            let watermark_pptx = pptx_water_dir.join(format!("{}.pptx", name));
            watermark.convert_file(&source_csv, &watermark_pptx)?;

            phase(2, "Finish ppt generation, start pdf generation");

            let pdf = pptx_to_pdf(&pptx, pdf_dir.join("pro"))?;
            let _watermark_pdf = pptx_to_pdf(&watermark_pptx, pdf_dir.join("water"))?;

            phase(3, "Finish pdf generation, start images generation");

            // プレビューはproの先頭6ページのみ
            let images_len = pdf_to_images(&pdf, &img_dir, 0, Some(6))?;

            phase_with_images(4, "Finish images generation", images_len);
            Ok(())
        }
    }
}

/// 進捗を1行のJSONとして標準出力に書き出す
fn phase(step: u32, msg: &str) {
    println!("{}", serde_json::json!({ "step": step, "msg": msg }));
    let _ = std::io::stdout().flush();
}

/// 画像枚数つきの最終フェーズ
fn phase_with_images(step: u32, msg: &str, images_len: usize) {
    println!(
        "{}",
        serde_json::json!({ "step": step, "msg": msg, "images_len": images_len })
    );
    let _ = std::io::stdout().flush();
}
