//! M2M-100 translation through the rust-bert pipeline (libtorch).

use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use rust_bert::m2m_100::{
    M2M100ConfigResources, M2M100MergesResources, M2M100ModelResources, M2M100SourceLanguages,
    M2M100TargetLanguages, M2M100VocabResources,
};
use rust_bert::pipelines::common::{ModelResource, ModelType};
use rust_bert::pipelines::translation::{Language, TranslationConfig, TranslationModel};
use rust_bert::resources::{LocalResource, RemoteResource, ResourceProvider};
use tch::Device;
use tracing::{info, warn};

use super::interface::{BackendError, GenerationOptions, TranslationBackend};
use super::languages::LOCALE_TAGS;
use crate::config::ModelConfig;

/// Locale tag -> rust-bert language. rust-bert's own ISO-639-1 codes do not
/// cover every tag (`zh` has none, Malay reports `zsm_Latn`).
const LOCALE_LANGUAGES: &[(&str, Language)] = &[
    ("en_XX", Language::English),
    ("es_XX", Language::Spanish),
    ("fr_XX", Language::French),
    ("de_DE", Language::German),
    ("it_IT", Language::Italian),
    ("pt_XX", Language::Portuguese),
    ("nl_XX", Language::Dutch),
    ("ru_RU", Language::Russian),
    ("zh_CN", Language::ChineseMandarin),
    ("ja_XX", Language::Japanese),
    ("ko_KR", Language::Korean),
    ("ar_AR", Language::Arabic),
    ("hi_IN", Language::Hindi),
    ("tr_TR", Language::Turkish),
    ("pl_PL", Language::Polish),
    ("uk_UA", Language::Ukrainian),
    ("ro_RO", Language::Romanian),
    ("hu_HU", Language::Hungarian),
    ("cs_CZ", Language::Czech),
    ("sv_SE", Language::Swedish),
    ("da_DK", Language::Danish),
    ("fi_FI", Language::Finnish),
    ("el_GR", Language::Greek),
    ("he_IL", Language::Hebrew),
    ("th_TH", Language::Thai),
    ("vi_VN", Language::Vietnamese),
    ("id_ID", Language::Indonesian),
    ("ms_MY", Language::Malay),
    ("tl_XX", Language::Tagalog),
    ("bn_IN", Language::Bengali),
    ("ta_IN", Language::Tamil),
    ("te_IN", Language::Telugu),
    ("mr_IN", Language::Marathi),
    ("gu_IN", Language::Gujarati),
    ("kn_IN", Language::Kannada),
    ("ml_IN", Language::Malayalam),
    ("af_ZA", Language::Afrikaans),
    ("bg_BG", Language::Bulgarian),
    ("et_EE", Language::Estonian),
    ("fa_IR", Language::Farsi),
    ("hr_HR", Language::Croatian),
    ("lt_LT", Language::Lithuanian),
    ("lv_LV", Language::Latvian),
    ("mk_MK", Language::Macedonian),
    ("ne_NP", Language::Nepali),
    ("pa_IN", Language::Panjabi),
    ("sk_SK", Language::Slovak),
    ("sl_SI", Language::Slovenian),
    ("so_SO", Language::Somali),
    ("sq_AL", Language::Albanian),
    ("sr_RS", Language::Serbian),
    ("sw_KE", Language::Swahili),
    ("ur_PK", Language::Urdu),
];

/// The model language for `locale`, if the loaded checkpoint serves it.
fn resolve_locale(locale: &str, languages: &[Language]) -> Option<Language> {
    LOCALE_LANGUAGES
        .iter()
        .find(|(tag, _)| *tag == locale)
        .map(|(_, language)| *language)
        .filter(|language| languages.contains(language))
}

/// Advertised locale tags the checkpoint cannot translate.
fn unserved_locales(languages: &[Language]) -> Vec<&'static str> {
    LOCALE_TAGS
        .iter()
        .map(|(_, tag)| *tag)
        .filter(|tag| resolve_locale(tag, languages).is_none())
        .collect()
}

type Resource = Box<dyn ResourceProvider + Send>;

struct Resources {
    model: Resource,
    config: Resource,
    vocab: Resource,
    merges: Resource,
}

pub struct M2M100Backend {
    // The tch module is not safe to share between threads, calls are serialised.
    model: Mutex<TranslationModel>,
    languages: Vec<Language>,
    name: String,
}

impl M2M100Backend {
    pub fn load(config: &ModelConfig, options: GenerationOptions) -> Result<Self> {
        let (resources, languages) = match config.model_dir.as_deref() {
            Some(dir) => {
                info!("Loading translation model from {}", dir.display());
                (local_resources(dir), source_languages(&config.translation_model)?)
            }
            None => {
                info!("Loading translation model: facebook/{}", config.translation_model);
                remote_resources(&config.translation_model)?
            }
        };

        let unserved = unserved_locales(&languages);
        if !unserved.is_empty() {
            warn!(
                "{} cannot translate locales {:?}; requests for them will fail",
                config.translation_model, unserved
            );
        }

        let device = Device::cuda_if_available();
        info!("Using device: {:?}", device);

        let mut translation_config = TranslationConfig::new(
            ModelType::M2M100,
            ModelResource::Torch(resources.model),
            resources.config,
            resources.vocab,
            Some(resources.merges),
            languages.clone(),
            languages.clone(),
            device,
        );
        translation_config.num_beams = options.num_beams as i64;
        translation_config.early_stopping = options.early_stopping;
        translation_config.max_length = Some(options.max_length as i64);
        translation_config.do_sample = false;

        let model = TranslationModel::new(translation_config)
            .map_err(|e| anyhow!("Failed to load model: {}", e))?;

        info!("Translation model loaded successfully");
        Ok(Self {
            model: Mutex::new(model),
            languages,
            name: format!("facebook/{}", config.translation_model),
        })
    }

    fn resolve(&self, locale: &str) -> Result<Language, BackendError> {
        resolve_locale(locale, &self.languages)
            .ok_or_else(|| BackendError::UnsupportedLocale(locale.to_string()))
    }
}

impl TranslationBackend for M2M100Backend {
    fn generate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> Result<String, BackendError> {
        let source = self.resolve(source_locale)?;
        let target = self.resolve(target_locale)?;

        let model = self
            .model
            .lock()
            .map_err(|_| BackendError::Inference("translation model lock poisoned".into()))?;
        let output = tch::no_grad(|| model.translate(&[text], Some(source), Some(target)))
            .map_err(|e| BackendError::Inference(e.to_string()))?;

        output
            .into_iter()
            .next()
            .map(|sentence| sentence.trim().to_string())
            .ok_or(BackendError::EmptyOutput)
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

fn source_languages(variant: &str) -> Result<Vec<Language>> {
    match variant {
        "m2m100_418M" => Ok(M2M100SourceLanguages::M2M100_418M.to_vec()),
        "m2m100_1_2B" => Ok(M2M100SourceLanguages::M2M100_1_2B.to_vec()),
        other => Err(anyhow!("Unknown translation model: {}", other)),
    }
}

fn remote_resources(variant: &str) -> Result<(Resources, Vec<Language>)> {
    let resources = match variant {
        "m2m100_418M" => Resources {
            model: Box::new(RemoteResource::from_pretrained(M2M100ModelResources::M2M100_418M)),
            config: Box::new(RemoteResource::from_pretrained(M2M100ConfigResources::M2M100_418M)),
            vocab: Box::new(RemoteResource::from_pretrained(M2M100VocabResources::M2M100_418M)),
            merges: Box::new(RemoteResource::from_pretrained(M2M100MergesResources::M2M100_418M)),
        },
        "m2m100_1_2B" => Resources {
            model: Box::new(RemoteResource::from_pretrained(M2M100ModelResources::M2M100_1_2B)),
            config: Box::new(RemoteResource::from_pretrained(M2M100ConfigResources::M2M100_1_2B)),
            vocab: Box::new(RemoteResource::from_pretrained(M2M100VocabResources::M2M100_1_2B)),
            merges: Box::new(RemoteResource::from_pretrained(M2M100MergesResources::M2M100_1_2B)),
        },
        other => return Err(anyhow!("Unknown translation model: {}", other)),
    };
    // Source and target sets are identical for both checkpoints.
    let languages = match variant {
        "m2m100_1_2B" => M2M100TargetLanguages::M2M100_1_2B.to_vec(),
        _ => M2M100TargetLanguages::M2M100_418M.to_vec(),
    };
    Ok((resources, languages))
}

fn local_resources(dir: &Path) -> Resources {
    Resources {
        model: Box::new(LocalResource::from(dir.join("rust_model.ot"))),
        config: Box::new(LocalResource::from(dir.join("config.json"))),
        vocab: Box::new(LocalResource::from(dir.join("vocab.json"))),
        merges: Box::new(LocalResource::from(dir.join("sentencepiece.bpe.model"))),
    }
}
