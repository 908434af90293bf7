//! Template Package Module
//!
//! テンプレートPPTX（OPC ZIPパッケージ）を読み込み、名前付きスライド
//! レイアウトとそのプレースホルダスロットの索引を構築するモジュール。
//! パッケージ全エントリのバイト列は保存時の土台としてそのまま保持します。

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::CsvToPptxError;

/// ZIPアーカイブ内の最大エントリ数
///
/// テンプレートは信頼できない入力として扱い、異常なアーカイブを弾きます。
const MAX_ENTRY_COUNT: usize = 10_000;

/// レイアウト内のプレースホルダスロット
#[derive(Debug, Clone)]
pub(crate) struct Placeholder {
    /// スロット番号（`<p:ph idx="…">`、省略時は0）
    pub idx: u32,
    /// プレースホルダ種別（`type`属性、省略されることがある）
    pub kind: Option<String>,
}

/// 名前付きスライドレイアウト
///
/// レイアウト名（`<p:cSld name="…">`）とスロット一覧、パッケージ内の
/// パスを保持します。スロット番号はコードとテンプレートの私的契約です。
#[derive(Debug, Clone)]
pub(crate) struct SlideLayout {
    pub name: String,
    /// パッケージ内パス（例: `ppt/slideLayouts/slideLayout3.xml`）
    pub path: String,
    pub placeholders: Vec<Placeholder>,
}

impl SlideLayout {
    /// スロット番号からプレースホルダを引く
    pub fn placeholder(&self, idx: u32) -> Option<&Placeholder> {
        self.placeholders.iter().find(|p| p.idx == idx)
    }
}

/// テンプレートパッケージ
///
/// 全エントリのバイト列（ZIP順）、レイアウト索引、既存スライド数、
/// ノーツマスターの有無を保持します。
pub(crate) struct TemplatePackage {
    /// 全エントリ（ZIP内の順序を維持）
    entries: Vec<(String, Vec<u8>)>,
    /// エントリ名 → entriesの添字
    entry_index: HashMap<String, usize>,
    layouts: Vec<SlideLayout>,
    /// レイアウト名 → layoutsの添字
    layout_index: HashMap<String, usize>,
    /// テンプレートに元々含まれるスライドの最大番号（なければ0）
    pub max_slide_number: usize,
    /// `ppt/notesMasters/`にノーツマスターを持つかどうか
    pub has_notes_master: bool,
}

impl TemplatePackage {
    /// テンプレートファイルを開く
    pub fn open(path: &Path) -> Result<Self, CsvToPptxError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// リーダーからテンプレートパッケージを読み込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(TemplatePackage)` - 読み込みと索引構築に成功した場合
    /// * `Err(CsvToPptxError::Zip)` - アーカイブが不正な場合
    /// * `Err(CsvToPptxError::Xml)` - レイアウトXMLが解析できない場合
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self, CsvToPptxError> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| CsvToPptxError::Zip(format!("{}", e)))?;

        if archive.len() > MAX_ENTRY_COUNT {
            return Err(CsvToPptxError::Zip(format!(
                "template contains too many entries: {} (max: {})",
                archive.len(),
                MAX_ENTRY_COUNT
            )));
        }

        // 1. 全エントリを読み込む（パストラバーサル対策込み）
        let mut entries = Vec::with_capacity(archive.len());
        let mut entry_index = HashMap::new();
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| CsvToPptxError::Zip(format!("{}", e)))?;
            let name = file.name().to_string();
            validate_entry_path(&name)?;

            let mut content = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut content)?;
            entry_index.insert(name.clone(), entries.len());
            entries.push((name, content));
        }

        // 2. スライドレイアウトを解析して名前で索引する
        let mut layouts = Vec::new();
        let mut layout_index = HashMap::new();
        for (name, content) in &entries {
            if name.starts_with("ppt/slideLayouts/slideLayout") && name.ends_with(".xml") {
                let layout = parse_layout(name, content)?;
                layout_index.insert(layout.name.clone(), layouts.len());
                layouts.push(layout);
            }
        }

        // 3. 既存スライドの最大番号とノーツマスターの有無
        let max_slide_number = entries
            .iter()
            .filter_map(|(name, _)| slide_number(name))
            .max()
            .unwrap_or(0);
        let has_notes_master = entries
            .iter()
            .any(|(name, _)| name.starts_with("ppt/notesMasters/notesMaster") && name.ends_with(".xml"));

        tracing::debug!(
            layouts = layouts.len(),
            existing_slides = max_slide_number,
            has_notes_master,
            "template package loaded"
        );

        Ok(TemplatePackage {
            entries,
            entry_index,
            layouts,
            layout_index,
            max_slide_number,
            has_notes_master,
        })
    }

    /// レイアウトを名前で解決する
    ///
    /// スライド追加時に呼ばれます。テンプレートに存在しない名前は
    /// `LayoutNotFound`エラーです。
    pub fn layout(&self, name: &str) -> Result<&SlideLayout, CsvToPptxError> {
        self.layout_index
            .get(name)
            .map(|&i| &self.layouts[i])
            .ok_or_else(|| CsvToPptxError::LayoutNotFound(name.to_string()))
    }

    /// 全エントリをZIP順で返す
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c.as_slice()))
    }

    /// エントリ内容を名前で引く
    pub fn entry(&self, name: &str) -> Option<&[u8]> {
        self.entry_index.get(name).map(|&i| self.entries[i].1.as_slice())
    }

    /// 索引済みレイアウト数（テスト用）
    #[allow(dead_code)]
    pub fn layout_count(&self) -> usize {
        self.layouts.len()
    }
}

/// エントリパスの検証（パストラバーサル対策）
fn validate_entry_path(path: &str) -> Result<(), CsvToPptxError> {
    if path.is_empty() {
        return Err(CsvToPptxError::Zip("empty entry path".to_string()));
    }
    if path.starts_with('/') || path.contains("..") {
        return Err(CsvToPptxError::Zip(format!(
            "unsafe entry path: '{}'",
            path
        )));
    }
    Ok(())
}

/// `ppt/slides/slideN.xml`からNを取り出す
fn slide_number(entry_name: &str) -> Option<usize> {
    entry_name
        .strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// レイアウトXMLからレイアウト名とプレースホルダ一覧を抽出する
///
/// 名前は`<p:cSld name="…">`、スロットは`<p:ph type="…" idx="…">`から
/// 取得します。接頭辞には依存せずローカル名で照合します。
fn parse_layout(path: &str, content: &[u8]) -> Result<SlideLayout, CsvToPptxError> {
    let mut reader = Reader::from_reader(content);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut name = String::new();
    let mut placeholders = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                match e.local_name().as_ref() {
                    b"cSld" => {
                        // <p:cSld name="Noun vocab">
                        for attr in e.attributes() {
                            let attr = attr.map_err(|e| {
                                CsvToPptxError::Xml(format!("XML attribute error: {}", e))
                            })?;
                            if attr.key.local_name().as_ref() == b"name" {
                                name = attr
                                    .unescape_value()
                                    .map_err(|e| {
                                        CsvToPptxError::Xml(format!("XML attribute error: {}", e))
                                    })?
                                    .to_string();
                            }
                        }
                    }
                    b"ph" => {
                        // <p:ph type="body" idx="10"/>
                        let mut idx = 0u32;
                        let mut kind = None;
                        for attr in e.attributes() {
                            let attr = attr.map_err(|e| {
                                CsvToPptxError::Xml(format!("XML attribute error: {}", e))
                            })?;
                            match attr.key.local_name().as_ref() {
                                b"idx" => {
                                    let raw = std::str::from_utf8(&attr.value)
                                        .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
                                    idx = raw.parse().map_err(|e| {
                                        CsvToPptxError::Xml(format!(
                                            "invalid ph idx '{}' in {}: {}",
                                            raw, path, e
                                        ))
                                    })?;
                                }
                                b"type" => {
                                    kind = Some(
                                        std::str::from_utf8(&attr.value)
                                            .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?
                                            .to_string(),
                                    );
                                }
                                _ => {}
                            }
                        }
                        placeholders.push(Placeholder { idx, kind });
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(CsvToPptxError::Xml(format!(
                    "failed to parse layout {}: {}",
                    path, e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if name.is_empty() {
        // 無名レイアウトは索引できないが、パッケージ自体は有効
        name = path.to_string();
    }

    Ok(SlideLayout {
        name,
        path: path.to_string(),
        placeholders,
    })
}
