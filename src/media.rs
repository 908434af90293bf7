//! Media Pipeline Module
//!
//! 外部ツールへの薄いラッパー。デッキのPDF化はLibreOffice
//! （`soffice --headless`）、PDFのページ数取得は`pdfinfo`、ページの
//! ラスタライズは`pdftocairo`のサブプロセス呼び出しで行います。
//! ページのデコードのみ2ワーカーのスレッドプールで並列化し、
//! デッキ構築自体は並列化しません。キャンセルはなく、開始した変換は
//! 完走するか失敗するかのどちらかです。リトライはありません。

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::error::CsvToPptxError;

/// プレビュー画像の固定幅（ピクセル、高さはアスペクト比に従う）
const RASTER_WIDTH: u32 = 800;

/// 1ページのラスタライズに許す時間
const PAGE_TIMEOUT: Duration = Duration::from_secs(240);

/// ドキュメント変換（soffice）に許す時間
const CONVERT_TIMEOUT: Duration = Duration::from_secs(600);

/// ページデコード用ワーカー数
const RASTER_WORKERS: usize = 2;

/// PPTXをPDFへ変換する
///
/// # 引数
///
/// * `pptx` - 変換元PPTXのパス
/// * `pdf_dir` - 出力ディレクトリ（なければ作成される）
///
/// # 戻り値
///
/// * `Ok(PathBuf)` - 生成されたPDFのパス
///   （`<pdf_dir>/<元ファイル名の最初のドットまで>.pdf`）
/// * `Err(CsvToPptxError::Convert)` - sofficeの起動失敗・非ゼロ終了・
///   タイムアウト、または出力PDFが見つからない場合
pub fn pptx_to_pdf(
    pptx: impl AsRef<Path>,
    pdf_dir: impl AsRef<Path>,
) -> Result<PathBuf, CsvToPptxError> {
    let pptx = pptx.as_ref();
    let pdf_dir = pdf_dir.as_ref();
    fs::create_dir_all(pdf_dir)?;

    tracing::debug!(pptx = %pptx.display(), outdir = %pdf_dir.display(), "invoking soffice");

    let mut child = Command::new("soffice")
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(pdf_dir)
        .arg(pptx)
        .stdout(Stdio::null())
        .spawn()
        .map_err(|e| CsvToPptxError::Convert(format!("failed to launch soffice: {}", e)))?;
    let status = wait_with_timeout(&mut child, CONVERT_TIMEOUT, "soffice")?;
    if !status.success() {
        return Err(CsvToPptxError::Convert(format!(
            "soffice exited with {}",
            status
        )));
    }

    let stem = document_stem(pptx).ok_or_else(|| {
        CsvToPptxError::Convert(format!("invalid source file name: '{}'", pptx.display()))
    })?;
    let pdf = pdf_dir.join(format!("{}.pdf", stem));
    if !pdf.is_file() {
        return Err(CsvToPptxError::Convert(format!(
            "soffice did not produce '{}'",
            pdf.display()
        )));
    }
    Ok(pdf)
}

/// PDFのページ範囲をJPEG画像にラスタライズする
///
/// 範囲内のページを`0.jpg`、`1.jpg`、…の連番で`img_dir`に書き出します。
/// デコードは2ワーカーのプールでページ単位に並列化され、各ページは
/// `pdftocairo`の1回の呼び出しです。
///
/// # 引数
///
/// * `pdf` - 入力PDFのパス
/// * `img_dir` - 出力ディレクトリ（なければ作成される）
/// * `first` - 範囲の先頭ページ（0始まり）
/// * `last` - 範囲の終端ページ（排他、`None`で最終ページまで）
///
/// # 戻り値
///
/// * `Ok(usize)` - 生成された画像の枚数
pub fn pdf_to_images(
    pdf: impl AsRef<Path>,
    img_dir: impl AsRef<Path>,
    first: usize,
    last: Option<usize>,
) -> Result<usize, CsvToPptxError> {
    let pdf = pdf.as_ref();
    let img_dir = img_dir.as_ref();
    fs::create_dir_all(img_dir)?;

    let pages = pdf_page_count(pdf)?;
    let start = first.min(pages);
    let end = last.unwrap_or(pages).min(pages);
    if start >= end {
        return Ok(0);
    }

    tracing::debug!(
        pdf = %pdf.display(),
        pages,
        start,
        end,
        "rasterizing page range"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(RASTER_WORKERS)
        .build()
        .map_err(|e| CsvToPptxError::Convert(format!("failed to build raster pool: {}", e)))?;

    let range: Vec<usize> = (start..end).collect();
    pool.install(|| {
        range
            .par_iter()
            .enumerate()
            .map(|(index, &page)| raster_page(pdf, img_dir, page + 1, index))
            .collect::<Result<Vec<_>, _>>()
    })?;

    Ok(end - start)
}

/// 1ページをJPEGにラスタライズする
///
/// `-singlefile`指定により出力名は`<img_dir>/<index>.jpg`に確定します。
fn raster_page(
    pdf: &Path,
    img_dir: &Path,
    page: usize,
    index: usize,
) -> Result<(), CsvToPptxError> {
    let page_arg = page.to_string();
    let prefix = img_dir.join(index.to_string());

    let mut child = Command::new("pdftocairo")
        .arg("-jpeg")
        .arg("-singlefile")
        .arg("-f")
        .arg(&page_arg)
        .arg("-l")
        .arg(&page_arg)
        .arg("-scale-to-x")
        .arg(RASTER_WIDTH.to_string())
        .arg("-scale-to-y")
        .arg("-1")
        .arg(pdf)
        .arg(&prefix)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| CsvToPptxError::Convert(format!("failed to launch pdftocairo: {}", e)))?;

    let status = wait_with_timeout(&mut child, PAGE_TIMEOUT, "pdftocairo")?;
    if !status.success() {
        return Err(CsvToPptxError::Convert(format!(
            "pdftocairo exited with {} on page {}",
            status, page
        )));
    }
    Ok(())
}

/// PDFのページ数を`pdfinfo`で取得する
fn pdf_page_count(pdf: &Path) -> Result<usize, CsvToPptxError> {
    let output = Command::new("pdfinfo")
        .arg(pdf)
        .stderr(Stdio::null())
        .output()
        .map_err(|e| CsvToPptxError::Convert(format!("failed to launch pdfinfo: {}", e)))?;
    if !output.status.success() {
        return Err(CsvToPptxError::Convert(format!(
            "pdfinfo exited with {}",
            output.status
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_page_count(&stdout).ok_or_else(|| {
        CsvToPptxError::Convert("pdfinfo output did not contain a page count".to_string())
    })
}

/// `pdfinfo`の出力から`Pages:`行を読み取る
fn parse_page_count(pdfinfo_output: &str) -> Option<usize> {
    pdfinfo_output
        .lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .and_then(|rest| rest.trim().parse().ok())
}

/// 出力ファイル名の語幹（最初のドットまで）
///
/// `lesson.v2.pptx`は`lesson`になります（変換ツール側の命名と一致）。
fn document_stem(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    let stem = name.split('.').next()?;
    if stem.is_empty() {
        None
    } else {
        Some(stem)
    }
}

/// 子プロセスの完了をタイムアウトつきで待つ
fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
    what: &str,
) -> Result<ExitStatus, CsvToPptxError> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if started.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Err(CsvToPptxError::Convert(format!(
                "{} timed out after {}s",
                what,
                timeout.as_secs()
            )));
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}
