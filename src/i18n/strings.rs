/// Page-level strings swapped alongside the `data-<code>` element variants.
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    /// Document title
    pub page_title: &'static str,

    /// Content of `<meta name="description">`
    pub meta_description: &'static str,
}

// ==================== English Strings ====================

pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    page_title: "i's Japanese Hair Salon | Vancouver's Premier Japanese Hair Artistry",
    meta_description: "Experience authentic Japanese hair artistry in Vancouver. \
Specializing in Japanese hair straightening, precision cuts, and Asian hair expertise. \
Located in Richmond, BC.",
};

// ==================== Japanese Strings ====================

pub const JAPANESE_STRINGS: LanguageStrings = LanguageStrings {
    page_title: "i's Japanese Hair Salon | バンクーバー最高級日系美容室",
    meta_description: "バンクーバーで本格的な日本のヘアアートを体験。縮毛矯正、精密カット、アジア人髪質専門。リッチモンド、BC州に位置。",
};
