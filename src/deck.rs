//! Deck Model Module
//!
//! 組み立て中のデッキを表す追記専用のインメモリモデル。
//! スライドは名前付きレイアウトから生成され、末尾に追加されるのみで、
//! 並び替え・削除はありません。レイアウト名とスロット番号は追加時に
//! テンプレートと突き合わせて検証されます。

use crate::error::CsvToPptxError;
use crate::template::{SlideLayout, TemplatePackage};

/// スロットへの書き込み1件
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SlotFill {
    /// スロット番号
    pub idx: u32,
    /// 書き込むテキスト。`\n`は段落区切りとして扱われる
    pub text: String,
}

/// 組み立て済みスライド1枚
#[derive(Debug, Clone)]
pub(crate) struct Slide {
    /// 使用するレイアウト名（検証済み）
    pub layout: String,
    /// スロットへの書き込み（追加順）
    pub fills: Vec<SlotFill>,
    /// 発表者ノート
    pub note: Option<String>,
}

/// 組み立て中のデッキ
///
/// 1回の変換が1つの`Deck`を所有し、変換間で共有されることはありません。
#[derive(Debug, Default)]
pub(crate) struct Deck {
    slides: Vec<Slide>,
}

impl Deck {
    /// 空のデッキを生成する
    pub fn new() -> Self {
        Self::default()
    }

    /// レイアウトからスライドを1枚追加する
    ///
    /// レイアウト名はこの時点で解決されます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(SlideDraft)` - スロットへの書き込み用ドラフト
    /// * `Err(CsvToPptxError::LayoutNotFound)` - テンプレートに
    ///   レイアウトが存在しない場合
    pub fn add_slide<'d, 't>(
        &'d mut self,
        template: &'t TemplatePackage,
        layout_name: &str,
    ) -> Result<SlideDraft<'d, 't>, CsvToPptxError> {
        let layout = template.layout(layout_name)?;
        self.slides.push(Slide {
            layout: layout.name.clone(),
            fills: Vec::new(),
            note: None,
        });
        let slide = self.slides.last_mut().expect("slide just pushed");
        Ok(SlideDraft { slide, layout })
    }

    /// 組み立て済みスライドの一覧
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// スライド枚数
    pub fn len(&self) -> usize {
        self.slides.len()
    }
}

/// 追加直後のスライドへの書き込みハンドル
///
/// スロット番号はレイアウトのプレースホルダと突き合わせて検証されます。
#[derive(Debug)]
pub(crate) struct SlideDraft<'d, 't> {
    slide: &'d mut Slide,
    layout: &'t SlideLayout,
}

impl SlideDraft<'_, '_> {
    /// スロットにテキストを書き込む
    ///
    /// # 戻り値
    ///
    /// * `Err(CsvToPptxError::PlaceholderNotFound)` - レイアウトに
    ///   存在しないスロット番号の場合
    pub fn set(
        &mut self,
        idx: u32,
        text: impl Into<String>,
    ) -> Result<&mut Self, CsvToPptxError> {
        if self.layout.placeholder(idx).is_none() {
            return Err(CsvToPptxError::PlaceholderNotFound {
                layout: self.layout.name.clone(),
                idx,
            });
        }
        self.slide.fills.push(SlotFill {
            idx,
            text: text.into(),
        });
        Ok(self)
    }

    /// 発表者ノートを設定する
    pub fn note(&mut self, text: impl Into<String>) -> &mut Self {
        self.slide.note = Some(text.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplatePackage;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    /// 最小のテンプレートパッケージを組み立てる（レイアウト1枚）
    fn template_with_layout(name: &str, slots: &[u32]) -> TemplatePackage {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = ZipWriter::new(&mut buffer);
            let options = FileOptions::default();
            let mut placeholders = String::new();
            for idx in slots {
                placeholders.push_str(&format!(
                    r#"<p:sp><p:nvSpPr><p:nvPr><p:ph type="body" idx="{}"/></p:nvPr></p:nvSpPr></p:sp>"#,
                    idx
                ));
            }
            let layout = format!(
                r#"<p:sldLayout xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld name="{}"><p:spTree>{}</p:spTree></p:cSld></p:sldLayout>"#,
                name, placeholders
            );
            writer
                .start_file("ppt/slideLayouts/slideLayout1.xml", options)
                .unwrap();
            writer.write_all(layout.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buffer.set_position(0);
        TemplatePackage::from_reader(buffer).unwrap()
    }

    #[test]
    fn test_add_slide_and_fill() {
        let template = template_with_layout("Default vocab", &[10, 11]);
        let mut deck = Deck::new();

        let mut slide = deck.add_slide(&template, "Default vocab").unwrap();
        slide.set(10, "gato").unwrap().set(11, "猫").unwrap();
        slide.note("gato");

        assert_eq!(deck.len(), 1);
        let slide = &deck.slides()[0];
        assert_eq!(slide.layout, "Default vocab");
        assert_eq!(slide.fills[0], SlotFill { idx: 10, text: "gato".to_string() });
        assert_eq!(slide.note.as_deref(), Some("gato"));
    }

    #[test]
    fn test_unknown_layout_is_rejected() {
        let template = template_with_layout("Default vocab", &[10]);
        let mut deck = Deck::new();

        let err = deck.add_slide(&template, "Verb multi tiempo").unwrap_err();
        assert!(matches!(err, CsvToPptxError::LayoutNotFound(name) if name == "Verb multi tiempo"));
    }

    #[test]
    fn test_unknown_slot_is_rejected() {
        let template = template_with_layout("Default vocab", &[10, 11]);
        let mut deck = Deck::new();

        let mut slide = deck.add_slide(&template, "Default vocab").unwrap();
        let err = slide.set(17, "x").unwrap_err();
        match err {
            CsvToPptxError::PlaceholderNotFound { layout, idx } => {
                assert_eq!(layout, "Default vocab");
                assert_eq!(idx, 17);
            }
            other => panic!("Expected PlaceholderNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_slides_keep_append_order() {
        let template = template_with_layout("Default vocab", &[10]);
        let mut deck = Deck::new();
        for word in ["uno", "dos", "tres"] {
            deck.add_slide(&template, "Default vocab")
                .unwrap()
                .set(10, word)
                .unwrap();
        }
        let words: Vec<&str> = deck
            .slides()
            .iter()
            .map(|s| s.fills[0].text.as_str())
            .collect();
        assert_eq!(words, vec!["uno", "dos", "tres"]);
    }
}
