//! Package Writer Module
//!
//! 組み立て済みデッキをテンプレートパッケージの上に重ねて、出力PPTXを
//! 書き出すモジュール。テンプレートの全エントリはそのままコピーし、
//! `[Content_Types].xml` / `ppt/presentation.xml` / そのリレーション /
//! `docProps/core.xml`の4つだけをイベントストリームで書き換えます。
//! 保存は変換の最後に一度だけ行われ、途中で失敗した場合に部分的な
//! 出力ファイルは残りません。

use std::io::{Seek, Write};

use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::deck::{Deck, Slide};
use crate::error::CsvToPptxError;
use crate::template::TemplatePackage;

const SLIDE_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const NOTES_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_NOTES_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
const REL_NOTES_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster";

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n";

/// 新規スライド1枚分の出力パート群
struct SlideParts {
    /// スライド番号（テンプレートの既存スライドの続き）
    number: usize,
    slide_xml: String,
    rels_xml: String,
    /// ノーツスライド（番号とXML2種）。ノーツマスターがない場合はNone
    notes: Option<(usize, String, String)>,
}

/// デッキをテンプレートの上に重ねて出力に書き出す
///
/// # 引数
///
/// * `template` - 読み込み済みテンプレートパッケージ
/// * `deck` - 組み立て済みデッキ
/// * `writer` - 出力先（`Write + Seek`）
///
/// # 注意
///
/// スライドIDは256以降、リレーションIDは既存の最大値の続きから
/// 割り当てます。テンプレートに元々含まれるスライドは保持されます。
pub(crate) fn save_deck<W: Write + Seek>(
    template: &TemplatePackage,
    deck: &Deck,
    writer: W,
) -> Result<(), CsvToPptxError> {
    let stamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    save_deck_with_timestamp(template, deck, writer, &stamp)
}

/// タイムスタンプを指定して書き出す（決定的な出力が必要なテスト用）
pub(crate) fn save_deck_with_timestamp<W: Write + Seek>(
    template: &TemplatePackage,
    deck: &Deck,
    writer: W,
    stamp: &str,
) -> Result<(), CsvToPptxError> {
    // 1. 新規パートを組み立てる
    let notes_master_target = template
        .entries()
        .map(|(name, _)| name)
        .find(|name| name.starts_with("ppt/notesMasters/notesMaster") && name.ends_with(".xml"))
        .map(|name| format!("../{}", name.trim_start_matches("ppt/")));
    let mut next_notes_number = max_notes_slide_number(template) + 1;

    let mut parts = Vec::with_capacity(deck.len());
    for (offset, slide) in deck.slides().iter().enumerate() {
        let number = template.max_slide_number + 1 + offset;
        let layout = template.layout(&slide.layout)?;
        let layout_target = format!("../{}", layout.path.trim_start_matches("ppt/"));

        let notes = match (&slide.note, &notes_master_target) {
            (Some(note), Some(master_target)) => {
                let notes_number = next_notes_number;
                next_notes_number += 1;
                let notes_xml = notes_xml(note);
                let notes_rels =
                    notes_rels_xml(master_target, &format!("../slides/slide{}.xml", number));
                Some((notes_number, notes_xml, notes_rels))
            }
            _ => None,
        };

        let notes_target = notes
            .as_ref()
            .map(|(n, _, _)| format!("../notesSlides/notesSlide{}.xml", n));
        parts.push(SlideParts {
            number,
            slide_xml: slide_xml(slide, layout),
            rels_xml: slide_rels_xml(&layout_target, notes_target.as_deref()),
            notes,
        });
    }

    // 2. presentation.xml.relsへ新規スライドのリレーションを追加し、
    //    採番されたrIdを受け取る
    let rels_content = template
        .entry("ppt/_rels/presentation.xml.rels")
        .ok_or_else(|| CsvToPptxError::Zip("missing ppt/_rels/presentation.xml.rels".to_string()))?;
    let slide_targets: Vec<String> = parts
        .iter()
        .map(|p| format!("slides/slide{}.xml", p.number))
        .collect();
    let (rels_rewritten, rids) = rewrite_presentation_rels(rels_content, &slide_targets)?;

    // 3. presentation.xmlのsldIdLstへ追記する
    let presentation_content = template
        .entry("ppt/presentation.xml")
        .ok_or_else(|| CsvToPptxError::Zip("missing ppt/presentation.xml".to_string()))?;
    let presentation_rewritten = rewrite_presentation(presentation_content, &rids)?;

    // 4. [Content_Types].xmlへ新規パートのOverrideを追記する
    let mut overrides: Vec<(String, &str)> = Vec::new();
    for part in &parts {
        overrides.push((format!("/ppt/slides/slide{}.xml", part.number), SLIDE_CONTENT_TYPE));
        if let Some((notes_number, _, _)) = &part.notes {
            overrides.push((
                format!("/ppt/notesSlides/notesSlide{}.xml", notes_number),
                NOTES_CONTENT_TYPE,
            ));
        }
    }
    let content_types = template
        .entry("[Content_Types].xml")
        .ok_or_else(|| CsvToPptxError::Zip("missing [Content_Types].xml".to_string()))?;
    let content_types_rewritten = rewrite_content_types(content_types, &overrides)?;

    // 5. ZIPを書き出す
    let mut zip = ZipWriter::new(writer);
    let options: FileOptions =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, content) in template.entries() {
        let rewritten: Option<Vec<u8>> = match name {
            "[Content_Types].xml" => Some(content_types_rewritten.clone()),
            "ppt/presentation.xml" => Some(presentation_rewritten.clone()),
            "ppt/_rels/presentation.xml.rels" => Some(rels_rewritten.clone()),
            "docProps/core.xml" => Some(rewrite_core(content, stamp)?),
            _ => None,
        };
        zip.start_file(name, options)
            .map_err(|e| CsvToPptxError::Zip(format!("{}", e)))?;
        match rewritten {
            Some(bytes) => zip.write_all(&bytes)?,
            None => zip.write_all(content)?,
        }
    }

    for part in &parts {
        zip.start_file(format!("ppt/slides/slide{}.xml", part.number), options)
            .map_err(|e| CsvToPptxError::Zip(format!("{}", e)))?;
        zip.write_all(part.slide_xml.as_bytes())?;

        zip.start_file(
            format!("ppt/slides/_rels/slide{}.xml.rels", part.number),
            options,
        )
        .map_err(|e| CsvToPptxError::Zip(format!("{}", e)))?;
        zip.write_all(part.rels_xml.as_bytes())?;

        if let Some((notes_number, notes_xml, notes_rels)) = &part.notes {
            zip.start_file(
                format!("ppt/notesSlides/notesSlide{}.xml", notes_number),
                options,
            )
            .map_err(|e| CsvToPptxError::Zip(format!("{}", e)))?;
            zip.write_all(notes_xml.as_bytes())?;

            zip.start_file(
                format!("ppt/notesSlides/_rels/notesSlide{}.xml.rels", notes_number),
                options,
            )
            .map_err(|e| CsvToPptxError::Zip(format!("{}", e)))?;
            zip.write_all(notes_rels.as_bytes())?;
        }
    }

    zip.finish().map_err(|e| CsvToPptxError::Zip(format!("{}", e)))?;
    tracing::debug!(slides = deck.len(), "deck serialized");
    Ok(())
}

/// テンプレートに既にあるノーツスライドの最大番号
fn max_notes_slide_number(template: &TemplatePackage) -> usize {
    template
        .entries()
        .filter_map(|(name, _)| {
            name.strip_prefix("ppt/notesSlides/notesSlide")?
                .strip_suffix(".xml")?
                .parse()
                .ok()
        })
        .max()
        .unwrap_or(0)
}

/// スライド本体XMLを生成する
///
/// レイアウトのプレースホルダと同じ`type`/`idx`を持つ図形を書き込み分
/// だけ出力します。位置・書式はレイアウトから継承されます。
fn slide_xml(slide: &Slide, layout: &crate::template::SlideLayout) -> String {
    let mut shapes = String::new();
    for (i, fill) in slide.fills.iter().enumerate() {
        let placeholder = layout
            .placeholder(fill.idx)
            .expect("fills are validated against the layout at append time");

        let mut ph_attrs = String::new();
        if let Some(kind) = &placeholder.kind {
            ph_attrs.push_str(&format!(" type=\"{}\"", kind));
        }
        if placeholder.idx != 0 {
            ph_attrs.push_str(&format!(" idx=\"{}\"", placeholder.idx));
        }

        let mut paragraphs = String::new();
        for line in fill.text.split('\n') {
            if line.is_empty() {
                paragraphs.push_str("<a:p/>");
            } else {
                paragraphs.push_str(&format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", escape(line)));
            }
        }

        shapes.push_str(&format!(
            "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"Placeholder {idx}\"/>\
             <p:cNvSpPr><a:spLocks noGrp=\"1\"/></p:cNvSpPr>\
             <p:nvPr><p:ph{ph}/></p:nvPr></p:nvSpPr>\
             <p:spPr/>\
             <p:txBody><a:bodyPr/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>",
            id = i + 2,
            idx = fill.idx,
            ph = ph_attrs,
            paragraphs = paragraphs,
        ));
    }

    format!(
        "{decl}<p:sld xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
         xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">\
         <p:cSld><p:spTree>\
         <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
         <p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/>\
         <a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>\
         {shapes}\
         </p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>",
        decl = XML_DECL,
        shapes = shapes,
    )
}

/// ノーツスライドXMLを生成する
fn notes_xml(note: &str) -> String {
    let mut paragraphs = String::new();
    for line in note.split('\n') {
        if line.is_empty() {
            paragraphs.push_str("<a:p/>");
        } else {
            paragraphs.push_str(&format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", escape(line)));
        }
    }

    format!(
        "{decl}<p:notes xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
         xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">\
         <p:cSld><p:spTree>\
         <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
         <p:grpSpPr/>\
         <p:sp><p:nvSpPr><p:cNvPr id=\"2\" name=\"Notes Placeholder\"/>\
         <p:cNvSpPr><a:spLocks noGrp=\"1\"/></p:cNvSpPr>\
         <p:nvPr><p:ph type=\"body\" idx=\"1\"/></p:nvPr></p:nvSpPr>\
         <p:spPr/>\
         <p:txBody><a:bodyPr/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>\
         </p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>",
        decl = XML_DECL,
        paragraphs = paragraphs,
    )
}

/// スライドのリレーションXMLを生成する
fn slide_rels_xml(layout_target: &str, notes_target: Option<&str>) -> String {
    let mut relationships = format!(
        "<Relationship Id=\"rId1\" Type=\"{}\" Target=\"{}\"/>",
        REL_SLIDE_LAYOUT, layout_target
    );
    if let Some(target) = notes_target {
        relationships.push_str(&format!(
            "<Relationship Id=\"rId2\" Type=\"{}\" Target=\"{}\"/>",
            REL_NOTES_SLIDE, target
        ));
    }
    format!(
        "{}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">{}</Relationships>",
        XML_DECL, relationships
    )
}

/// ノーツスライドのリレーションXMLを生成する
fn notes_rels_xml(master_target: &str, slide_target: &str) -> String {
    format!(
        "{}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{}\" Target=\"{}\"/>\
         <Relationship Id=\"rId2\" Type=\"{}\" Target=\"{}\"/>\
         </Relationships>",
        XML_DECL, REL_NOTES_MASTER, master_target, REL_SLIDE, slide_target
    )
}

/// presentation.xml.relsへ新規スライドのリレーションを追記する
///
/// 既存の最大rId番号の続きから採番し、追加したrIdのリストを返します。
fn rewrite_presentation_rels(
    content: &[u8],
    slide_targets: &[String],
) -> Result<(Vec<u8>, Vec<String>), CsvToPptxError> {
    // 既存の最大rId番号を調べる
    let mut max_rid = 0u32;
    scan_attributes(content, b"Relationship", b"Id", |value| {
        if let Some(n) = value.strip_prefix("rId").and_then(|n| n.parse::<u32>().ok()) {
            max_rid = max_rid.max(n);
        }
    })?;

    let rids: Vec<String> = (0..slide_targets.len())
        .map(|i| format!("rId{}", max_rid + 1 + i as u32))
        .collect();

    let mut reader = Reader::from_reader(content);
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::End(e)) if e.local_name().as_ref() == b"Relationships" => {
                for (rid, target) in rids.iter().zip(slide_targets) {
                    let mut elem = BytesStart::new("Relationship");
                    elem.push_attribute(Attribute::from(("Id", rid.as_str())));
                    elem.push_attribute(Attribute::from(("Type", REL_SLIDE)));
                    elem.push_attribute(Attribute::from(("Target", target.as_str())));
                    writer
                        .write_event(Event::Empty(elem))
                        .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
                }
                writer
                    .write_event(Event::End(e))
                    .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
            }
            Ok(Event::Eof) => break,
            Ok(event) => {
                writer
                    .write_event(event)
                    .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
            }
            Err(e) => {
                return Err(CsvToPptxError::Xml(format!(
                    "failed to parse presentation rels: {}",
                    e
                )))
            }
        }
        buf.clear();
    }

    Ok((writer.into_inner(), rids))
}

/// presentation.xmlのスライド一覧へ新規スライドを追記する
///
/// `p:sldIdLst`が存在しないテンプレートでは`p:sldSz`の直前に
/// 一覧ごと挿入します。スライドIDは慣例どおり256以降を使います。
fn rewrite_presentation(content: &[u8], rids: &[String]) -> Result<Vec<u8>, CsvToPptxError> {
    // 既存の最大スライドIDを調べる
    let mut max_slide_id = 255u32;
    scan_attributes(content, b"sldId", b"id", |value| {
        if let Ok(n) = value.parse::<u32>() {
            max_slide_id = max_slide_id.max(n);
        }
    })?;

    let new_ids = |writer: &mut Writer<Vec<u8>>| -> Result<(), CsvToPptxError> {
        for (i, rid) in rids.iter().enumerate() {
            let mut elem = BytesStart::new("p:sldId");
            elem.push_attribute(Attribute::from((
                "id",
                format!("{}", max_slide_id + 1 + i as u32).as_str(),
            )));
            elem.push_attribute(Attribute::from(("r:id", rid.as_str())));
            writer
                .write_event(Event::Empty(elem))
                .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
        }
        Ok(())
    };

    let has_list = {
        let mut found = false;
        scan_elements(content, b"sldIdLst", || found = true)?;
        found
    };

    let mut reader = Reader::from_reader(content);
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::End(e)) if e.local_name().as_ref() == b"sldIdLst" => {
                new_ids(&mut writer)?;
                writer
                    .write_event(Event::End(e))
                    .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sldIdLst" => {
                // 空の一覧は開始・終了タグに展開して追記する
                let start = BytesStart::new("p:sldIdLst");
                writer
                    .write_event(Event::Start(start))
                    .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
                new_ids(&mut writer)?;
                writer
                    .write_event(Event::End(quick_xml::events::BytesEnd::new("p:sldIdLst")))
                    .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
            }
            Ok(event @ (Event::Start(_) | Event::Empty(_)))
                if !has_list && element_local_name(&event) == Some(b"sldSz".as_slice()) =>
            {
                let start = BytesStart::new("p:sldIdLst");
                writer
                    .write_event(Event::Start(start))
                    .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
                new_ids(&mut writer)?;
                writer
                    .write_event(Event::End(quick_xml::events::BytesEnd::new("p:sldIdLst")))
                    .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
                writer
                    .write_event(event)
                    .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
            }
            Ok(Event::Eof) => break,
            Ok(event) => {
                writer
                    .write_event(event)
                    .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
            }
            Err(e) => {
                return Err(CsvToPptxError::Xml(format!(
                    "failed to parse presentation.xml: {}",
                    e
                )))
            }
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

/// [Content_Types].xmlへ新規パートのOverrideを追記する
fn rewrite_content_types(
    content: &[u8],
    overrides: &[(String, &str)],
) -> Result<Vec<u8>, CsvToPptxError> {
    let mut reader = Reader::from_reader(content);
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::End(e)) if e.local_name().as_ref() == b"Types" => {
                for (part_name, content_type) in overrides {
                    let mut elem = BytesStart::new("Override");
                    elem.push_attribute(Attribute::from(("PartName", part_name.as_str())));
                    elem.push_attribute(Attribute::from(("ContentType", *content_type)));
                    writer
                        .write_event(Event::Empty(elem))
                        .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
                }
                writer
                    .write_event(Event::End(e))
                    .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
            }
            Ok(Event::Eof) => break,
            Ok(event) => {
                writer
                    .write_event(event)
                    .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
            }
            Err(e) => {
                return Err(CsvToPptxError::Xml(format!(
                    "failed to parse [Content_Types].xml: {}",
                    e
                )))
            }
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

/// docProps/core.xmlの更新日時を差し替える
///
/// `dcterms:modified`要素のテキストのみを書き換えます。要素が存在しない
/// 場合は何も追加しません。
fn rewrite_core(content: &[u8], stamp: &str) -> Result<Vec<u8>, CsvToPptxError> {
    let mut reader = Reader::from_reader(content);
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();
    let mut in_modified = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"modified" => {
                in_modified = true;
                writer
                    .write_event(Event::Start(e))
                    .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"modified" => {
                in_modified = false;
                writer
                    .write_event(Event::End(e))
                    .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
            }
            Ok(Event::Text(_)) if in_modified => {
                writer
                    .write_event(Event::Text(quick_xml::events::BytesText::new(stamp)))
                    .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
            }
            Ok(Event::Eof) => break,
            Ok(event) => {
                writer
                    .write_event(event)
                    .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
            }
            Err(e) => {
                return Err(CsvToPptxError::Xml(format!(
                    "failed to parse docProps/core.xml: {}",
                    e
                )))
            }
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

/// 指定要素の属性値を走査するユーティリティ
fn scan_attributes(
    content: &[u8],
    element: &[u8],
    attribute: &[u8],
    mut visit: impl FnMut(&str),
) -> Result<(), CsvToPptxError> {
    let mut reader = Reader::from_reader(content);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == element {
                    for attr in e.attributes() {
                        let attr =
                            attr.map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
                        if attr.key.local_name().as_ref() == attribute {
                            let value = std::str::from_utf8(&attr.value)
                                .map_err(|e| CsvToPptxError::Xml(format!("{}", e)))?;
                            visit(value);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(CsvToPptxError::Xml(format!("{}", e))),
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}

/// 指定要素の出現を走査するユーティリティ
fn scan_elements(
    content: &[u8],
    element: &[u8],
    mut visit: impl FnMut(),
) -> Result<(), CsvToPptxError> {
    let mut reader = Reader::from_reader(content);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == element {
                    visit();
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(CsvToPptxError::Xml(format!("{}", e))),
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}

/// イベントの要素ローカル名を取り出す
fn element_local_name<'e>(event: &'e Event<'_>) -> Option<&'e [u8]> {
    match event {
        Event::Start(e) => Some(e.local_name().into_inner()),
        Event::Empty(e) => Some(e.local_name().into_inner()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_presentation_rels_appends_after_max_rid() {
        let content = br#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="t" Target="slideMasters/slideMaster1.xml"/>
<Relationship Id="rId7" Type="t" Target="theme/theme1.xml"/>
</Relationships>"#;
        let targets = vec!["slides/slide1.xml".to_string(), "slides/slide2.xml".to_string()];
        let (rewritten, rids) = rewrite_presentation_rels(content, &targets).unwrap();
        assert_eq!(rids, vec!["rId8", "rId9"]);

        let output = String::from_utf8(rewritten).unwrap();
        assert!(output.contains("Id=\"rId8\""));
        assert!(output.contains("Target=\"slides/slide2.xml\""));
    }

    #[test]
    fn test_rewrite_presentation_appends_slide_ids() {
        let content = br#"<p:presentation xmlns:p="p" xmlns:r="r"><p:sldMasterIdLst/><p:sldIdLst><p:sldId id="256" r:id="rId2"/></p:sldIdLst><p:sldSz cx="1" cy="1"/></p:presentation>"#;
        let rids = vec!["rId8".to_string()];
        let rewritten = rewrite_presentation(content, &rids).unwrap();
        let output = String::from_utf8(rewritten).unwrap();
        assert!(output.contains("id=\"257\""));
        assert!(output.contains("r:id=\"rId8\""));
        // 既存エントリは保持される
        assert!(output.contains("id=\"256\""));
    }

    #[test]
    fn test_rewrite_presentation_creates_missing_list() {
        let content =
            br#"<p:presentation xmlns:p="p" xmlns:r="r"><p:sldMasterIdLst/><p:sldSz cx="1" cy="1"/></p:presentation>"#;
        let rids = vec!["rId3".to_string()];
        let rewritten = rewrite_presentation(content, &rids).unwrap();
        let output = String::from_utf8(rewritten).unwrap();
        let list_pos = output.find("<p:sldIdLst>").unwrap();
        let size_pos = output.find("<p:sldSz").unwrap();
        assert!(list_pos < size_pos);
        assert!(output.contains("id=\"256\""));
    }

    #[test]
    fn test_rewrite_content_types_appends_overrides() {
        let content = br#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;
        let overrides = vec![(
            "/ppt/slides/slide1.xml".to_string(),
            SLIDE_CONTENT_TYPE,
        )];
        let rewritten = rewrite_content_types(content, &overrides).unwrap();
        let output = String::from_utf8(rewritten).unwrap();
        assert!(output.contains("PartName=\"/ppt/slides/slide1.xml\""));
        assert!(output.contains("presentationml.slide+xml"));
    }

    #[test]
    fn test_rewrite_core_replaces_modified_only() {
        let content = br#"<cp:coreProperties xmlns:cp="c" xmlns:dcterms="d" xmlns:xsi="x"><dcterms:created xsi:type="dcterms:W3CDTF">2020-01-01T00:00:00Z</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">2020-01-01T00:00:00Z</dcterms:modified></cp:coreProperties>"#;
        let rewritten = rewrite_core(content, "2026-08-07T00:00:00Z").unwrap();
        let output = String::from_utf8(rewritten).unwrap();
        assert!(output.contains("<dcterms:modified xsi:type=\"dcterms:W3CDTF\">2026-08-07T00:00:00Z"));
        assert!(output.contains("<dcterms:created xsi:type=\"dcterms:W3CDTF\">2020-01-01T00:00:00Z"));
    }

    #[test]
    fn test_slide_xml_escapes_text() {
        use crate::template::{Placeholder, SlideLayout};
        let layout = SlideLayout {
            name: "Default vocab".to_string(),
            path: "ppt/slideLayouts/slideLayout1.xml".to_string(),
            placeholders: vec![Placeholder {
                idx: 10,
                kind: Some("body".to_string()),
            }],
        };
        let slide = crate::deck::Slide {
            layout: "Default vocab".to_string(),
            fills: vec![crate::deck::SlotFill {
                idx: 10,
                text: "R&D <test>\nsecond".to_string(),
            }],
            note: None,
        };

        let xml = slide_xml(&slide, &layout);
        assert!(xml.contains("R&amp;D &lt;test&gt;"));
        // 改行は段落区切り
        assert!(xml.contains("<a:t>second</a:t>"));
        assert!(xml.contains("idx=\"10\""));
        assert!(xml.contains("type=\"body\""));
    }

    #[test]
    fn test_rels_xml_shapes() {
        let rels = slide_rels_xml("../slideLayouts/slideLayout3.xml", None);
        assert!(rels.contains("slideLayout3.xml"));
        assert!(!rels.contains("notesSlide"));

        let rels = slide_rels_xml(
            "../slideLayouts/slideLayout3.xml",
            Some("../notesSlides/notesSlide1.xml"),
        );
        assert!(rels.contains("notesSlide1.xml"));
        assert!(rels.contains("rId2"));
    }
}
