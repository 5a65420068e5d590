//! Codes accepted by the translation endpoint, their model locale tags and
//! display names.

use crate::detect::names::lookup;

/// Application code -> locale tag understood by the translation backend.
pub const LOCALE_TAGS: &[(&str, &str)] = &[
    ("en", "en_XX"),
    ("es", "es_XX"),
    ("fr", "fr_XX"),
    ("de", "de_DE"),
    ("it", "it_IT"),
    ("pt", "pt_XX"),
    ("nl", "nl_XX"),
    ("ru", "ru_RU"),
    ("zh", "zh_CN"),
    ("ja", "ja_XX"),
    ("ko", "ko_KR"),
    ("ar", "ar_AR"),
    ("hi", "hi_IN"),
    ("tr", "tr_TR"),
    ("pl", "pl_PL"),
    ("uk", "uk_UA"),
    ("ro", "ro_RO"),
    ("hu", "hu_HU"),
    ("cs", "cs_CZ"),
    ("sv", "sv_SE"),
    ("da", "da_DK"),
    ("fi", "fi_FI"),
    ("el", "el_GR"),
    ("he", "he_IL"),
    ("th", "th_TH"),
    ("vi", "vi_VN"),
    ("id", "id_ID"),
    ("ms", "ms_MY"),
    ("tl", "tl_XX"),
    ("bn", "bn_IN"),
    ("ta", "ta_IN"),
    ("te", "te_IN"),
    ("mr", "mr_IN"),
    ("gu", "gu_IN"),
    ("kn", "kn_IN"),
    ("ml", "ml_IN"),
    ("af", "af_ZA"),
    ("bg", "bg_BG"),
    ("et", "et_EE"),
    ("fa", "fa_IR"),
    ("hr", "hr_HR"),
    ("lt", "lt_LT"),
    ("lv", "lv_LV"),
    ("mk", "mk_MK"),
    ("ne", "ne_NP"),
    ("pa", "pa_IN"),
    ("sk", "sk_SK"),
    ("sl", "sl_SI"),
    ("so", "so_SO"),
    ("sq", "sq_AL"),
    ("sr", "sr_RS"),
    ("sw", "sw_KE"),
    ("ur", "ur_PK"),
];

pub const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("ar", "Arabic"),
    ("bg", "Bulgarian"),
    ("bn", "Bengali"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("gu", "Gujarati"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("mk", "Macedonian"),
    ("ml", "Malayalam"),
    ("mr", "Marathi"),
    ("ms", "Malay"),
    ("ne", "Nepali"),
    ("nl", "Dutch"),
    ("pa", "Punjabi"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("so", "Somali"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("th", "Thai"),
    ("tl", "Tagalog"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese"),
];

pub fn locale_tag(code: &str) -> Option<&'static str> {
    LOCALE_TAGS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, tag)| *tag)
}

pub fn is_supported(code: &str) -> bool {
    locale_tag(code).is_some()
}

pub fn language_name(code: &str) -> String {
    lookup(LANGUAGE_NAMES, code)
}
