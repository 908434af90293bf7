//! Part-of-Speech Module
//!
//! 品詞分類と表示名テーブルを定義するモジュール。
//! 辞書タグ（`n.`、`adj.`など）から品詞カテゴリへの対応は言語ごとの
//! 静的テーブルで、分類は文字列全体に対する全域関数です。

use crate::api::Language;

/// 品詞カテゴリ
///
/// レンダリングルールの選択に使用する固定の列挙です。
/// どの言語のタグ表にも現れないタグは`Other`に分類されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    /// 名詞
    Noun,
    /// 形容詞
    Adj,
    /// 動詞
    Verb,
    /// 副詞
    Adv,
    /// 代名詞
    Pron,
    /// 前置詞
    Prep,
    /// その他（未知タグの受け皿）
    Other,
}

/// カテゴリごとの表示名と辞書タグの対応
struct PosInfo {
    pos: PartOfSpeech,
    /// 中国語表示名（セクションタイトルの副題に使用）
    chinese: &'static str,
    /// 対象言語での表示名（統計・タイトルに使用、大文字化される）
    local: &'static str,
    /// このカテゴリに対応する辞書タグ
    tags: &'static [&'static str],
}

/// 英語のタグ表
const ENGLISH_POS_INFO: &[PosInfo] = &[
    PosInfo {
        pos: PartOfSpeech::Noun,
        chinese: "名词",
        local: "noun",
        tags: &["n."],
    },
    PosInfo {
        pos: PartOfSpeech::Adj,
        chinese: "形容词",
        local: "adjective",
        tags: &["adj.", "a."],
    },
    PosInfo {
        pos: PartOfSpeech::Verb,
        chinese: "动词",
        local: "verb",
        tags: &["v.", "vt.vi.", "vi.", "vt.", "aux.", "vi.vt."],
    },
    PosInfo {
        pos: PartOfSpeech::Adv,
        chinese: "副词",
        local: "adverb",
        tags: &["adv."],
    },
    PosInfo {
        pos: PartOfSpeech::Pron,
        chinese: "代词",
        local: "pronoun",
        tags: &["pron."],
    },
    PosInfo {
        pos: PartOfSpeech::Prep,
        chinese: "前置词",
        local: "",
        tags: &["prep."],
    },
    PosInfo {
        pos: PartOfSpeech::Other,
        chinese: "其他",
        local: "others",
        tags: &[],
    },
];

/// スペイン語のタグ表
///
/// `propn,`の末尾カンマは上流の辞書データがそのまま出力するタグです。
const SPANISH_POS_INFO: &[PosInfo] = &[
    PosInfo {
        pos: PartOfSpeech::Noun,
        chinese: "名词",
        local: "el nombre",
        tags: &["noun.", "f.", "m.", "f.m.", "propn,", "f.pl.", "m.pl."],
    },
    PosInfo {
        pos: PartOfSpeech::Adj,
        chinese: "形容词",
        local: "el adjectivo",
        tags: &["adj."],
    },
    PosInfo {
        pos: PartOfSpeech::Verb,
        chinese: "动词",
        local: "el verbo",
        tags: &["verb.", "vr.", "vi.", "vt.", "aux."],
    },
    PosInfo {
        pos: PartOfSpeech::Adv,
        chinese: "副词",
        local: "el adverbio",
        tags: &["adv."],
    },
    PosInfo {
        pos: PartOfSpeech::Pron,
        chinese: "代词",
        local: "los pronombres",
        tags: &["pron."],
    },
    PosInfo {
        pos: PartOfSpeech::Prep,
        chinese: "前置词",
        local: "",
        tags: &["prep.", "adp."],
    },
    PosInfo {
        pos: PartOfSpeech::Other,
        chinese: "其他",
        local: "los otros",
        tags: &[],
    },
];

fn table_for(language: Language) -> &'static [PosInfo] {
    match language {
        Language::English => ENGLISH_POS_INFO,
        Language::Spanish => SPANISH_POS_INFO,
    }
}

impl PartOfSpeech {
    /// 辞書タグを品詞カテゴリに分類する
    ///
    /// テーブル順の先頭一致で決定し、どのカテゴリにも一致しないタグは
    /// `Other`を返します。失敗モードはありません。
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use pptxzero::{Language, PartOfSpeech};
    ///
    /// assert_eq!(
    ///     PartOfSpeech::classify(Language::English, "n."),
    ///     PartOfSpeech::Noun
    /// );
    /// assert_eq!(
    ///     PartOfSpeech::classify(Language::Spanish, "??"),
    ///     PartOfSpeech::Other
    /// );
    /// ```
    pub fn classify(language: Language, dict_pos: &str) -> PartOfSpeech {
        for info in table_for(language) {
            if info.tags.contains(&dict_pos) {
                return info.pos;
            }
        }
        PartOfSpeech::Other
    }

    /// 中国語表示名を返す（セクションタイトルの副題）
    pub fn chinese_name(&self) -> &'static str {
        // 中国語名は両言語で共通
        ENGLISH_POS_INFO
            .iter()
            .find(|info| info.pos == *self)
            .map(|info| info.chinese)
            .unwrap_or("其他")
    }

    /// 対象言語での表示名を返す（統計スライド・タイトルに使用）
    ///
    /// 前置詞カテゴリは原典どおり空文字列です。
    pub fn local_name(&self, language: Language) -> &'static str {
        table_for(language)
            .iter()
            .find(|info| info.pos == *self)
            .map(|info| info.local)
            .unwrap_or("")
    }
}

/// 時制キーの中国語表示名
///
/// 動詞スライドが`variations`の`tense` / `format`キーを表示文字列に
/// 変換するためのテーブルです。表にないキーはそのまま返します。
pub(crate) fn tense_display(key: &str) -> &str {
    match key {
        "imperativo_afirmativo" => "命令式-肯定",
        "imperativo_negativo" => "命令式-否定",
        "indicativo-pretérito" => "陈述式-过去时",
        "indicativo-presente" => "陈述式-现在时",
        "subjuntivo-presente" => "虚拟式-现在时",
        "indicativo-futuro" => "陈述式-将来时",
        "subjuntivo-futuro" => "虚拟式-将来时",
        "indicativo-imperfecto" => "陈述式-未完成时",
        "subjuntivo-imperfecto" => "虚拟式-未完成时",
        "indicativo-condicional" => "条件式",
        "participio" => "过去分词",
        "gerundio" => "现在分词",
        other => other,
    }
}

/// スペイン語名詞の冠詞セット
///
/// 性・数タグごとに、単数側スロット（12-15）と複数側スロット（16-19）に
/// 入れる冠詞、および語形変化`extension`から引くキーを定義します。
#[derive(Debug, Clone, Copy)]
pub(crate) struct NounArticles {
    /// 単数側: 定冠詞（スロット12）
    pub singular_definite: &'static str,
    /// 単数側: 不定冠詞（スロット14）
    pub singular_indefinite: &'static str,
    /// 複数側: 定冠詞（スロット16）
    pub plural_definite: &'static str,
    /// 複数側: 不定冠詞（スロット18）
    pub plural_indefinite: &'static str,
    /// 複数側の語形を引く`extension`キー
    pub extension_key: &'static str,
    /// 使用するレイアウト名（男性形/女性形）
    pub layout: &'static str,
}

/// 性・数タグから冠詞セットを引く
///
/// `m.pl.` / `f.pl.`は見出し語自体が複数形のため、「複数側」スロットに
/// 単数冠詞と`extension`の単数形が入ります。
pub(crate) fn spanish_noun_articles(dict_pos: &str) -> Option<&'static NounArticles> {
    const M: NounArticles = NounArticles {
        singular_definite: "el",
        singular_indefinite: "un",
        plural_definite: "los",
        plural_indefinite: "unos",
        extension_key: "mpl",
        layout: "Noun m vocab",
    };
    const F: NounArticles = NounArticles {
        singular_definite: "la",
        singular_indefinite: "una",
        plural_definite: "las",
        plural_indefinite: "unas",
        extension_key: "fpl",
        layout: "Noun f vocab",
    };
    const MPL: NounArticles = NounArticles {
        singular_definite: "los",
        singular_indefinite: "unos",
        plural_definite: "el",
        plural_indefinite: "uno",
        extension_key: "m",
        layout: "Noun m vocab",
    };
    const FPL: NounArticles = NounArticles {
        singular_definite: "las",
        singular_indefinite: "unas",
        plural_definite: "la",
        plural_indefinite: "una",
        extension_key: "f",
        layout: "Noun f vocab",
    };

    match dict_pos {
        "m." => Some(&M),
        "f." => Some(&F),
        "m.pl." => Some(&MPL),
        "f.pl." => Some(&FPL),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_english() {
        assert_eq!(
            PartOfSpeech::classify(Language::English, "n."),
            PartOfSpeech::Noun
        );
        assert_eq!(
            PartOfSpeech::classify(Language::English, "a."),
            PartOfSpeech::Adj
        );
        assert_eq!(
            PartOfSpeech::classify(Language::English, "vt.vi."),
            PartOfSpeech::Verb
        );
        assert_eq!(
            PartOfSpeech::classify(Language::English, "prep."),
            PartOfSpeech::Prep
        );
    }

    #[test]
    fn test_classify_spanish() {
        assert_eq!(
            PartOfSpeech::classify(Language::Spanish, "f.pl."),
            PartOfSpeech::Noun
        );
        assert_eq!(
            PartOfSpeech::classify(Language::Spanish, "propn,"),
            PartOfSpeech::Noun
        );
        assert_eq!(
            PartOfSpeech::classify(Language::Spanish, "vr."),
            PartOfSpeech::Verb
        );
        assert_eq!(
            PartOfSpeech::classify(Language::Spanish, "adp."),
            PartOfSpeech::Prep
        );
    }

    #[test]
    fn test_classify_unknown_is_other() {
        assert_eq!(
            PartOfSpeech::classify(Language::English, ""),
            PartOfSpeech::Other
        );
        assert_eq!(
            PartOfSpeech::classify(Language::English, "интердж."),
            PartOfSpeech::Other
        );
        // 言語をまたぐタグは各言語の表でのみ有効
        assert_eq!(
            PartOfSpeech::classify(Language::English, "noun."),
            PartOfSpeech::Other
        );
    }

    #[test]
    fn test_classify_is_deterministic() {
        for tag in ["n.", "adj.", "v.", "xyz", ""] {
            let first = PartOfSpeech::classify(Language::English, tag);
            for _ in 0..10 {
                assert_eq!(PartOfSpeech::classify(Language::English, tag), first);
            }
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(PartOfSpeech::Noun.chinese_name(), "名词");
        assert_eq!(PartOfSpeech::Noun.local_name(Language::English), "noun");
        assert_eq!(PartOfSpeech::Noun.local_name(Language::Spanish), "el nombre");
        // 前置詞の対象言語名は原典どおり空
        assert_eq!(PartOfSpeech::Prep.local_name(Language::English), "");
        assert_eq!(PartOfSpeech::Other.local_name(Language::Spanish), "los otros");
    }

    #[test]
    fn test_tense_display() {
        assert_eq!(tense_display("indicativo-presente"), "陈述式-现在时");
        assert_eq!(tense_display("participio"), "过去分词");
        assert_eq!(tense_display("gerundio"), "现在分词");
        // 未知キーはそのまま
        assert_eq!(tense_display("futuro-perfecto"), "futuro-perfecto");
    }

    #[test]
    fn test_spanish_noun_articles() {
        let m = spanish_noun_articles("m.").unwrap();
        assert_eq!(m.singular_definite, "el");
        assert_eq!(m.plural_indefinite, "unos");
        assert_eq!(m.extension_key, "mpl");
        assert_eq!(m.layout, "Noun m vocab");

        // 複数形見出し語は冠詞が反転する
        let mpl = spanish_noun_articles("m.pl.").unwrap();
        assert_eq!(mpl.singular_definite, "los");
        assert_eq!(mpl.plural_definite, "el");
        assert_eq!(mpl.extension_key, "m");

        assert!(spanish_noun_articles("noun.").is_none());
    }
}
