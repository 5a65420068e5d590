use std::any::Any;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, Response, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};
use tower_http::cors::{self, AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{internal_error_response, ApiError, ServiceError};
use crate::state::AppState;
use crate::translate::TranslationService;
use crate::types::{
    DetectLanguageRequest, DetectLanguageResponse, HealthResponse, LanguageInfo, ServiceInfo,
    SupportedLanguagesResponse, TranslateRequest, TranslateResponse,
};

const SERVICE_NAME: &str = "Universal Language Translator";
const DETECTION_FAILED: &str = "Language detection failed";
const TRANSLATION_FAILED: &str = "Translation failed";

/// Full application: routes plus CORS, request tracing and the panic handler.
pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();
    Router::new()
        .merge(create_routes())
        .layer(panic_layer(config.debug))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .with_state(state)
}

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        // Health check
        .route("/api/health", get(health_check))
        .route("/api/detect-language", post(detect_language))
        .route("/api/translate", post(translate))
        .route("/api/supported-languages", get(supported_languages))
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(cors::Any)
            .allow_methods(cors::Any)
            .allow_headers(cors::Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    info!("CORS allowed origins: {:?}", config.cors_origins);

    // Credentials forbid wildcards, so methods and headers are mirrored back.
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Turns a handler panic into the uniform 500 body.
#[derive(Clone, Copy)]
pub struct PanicResponder {
    debug: bool,
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let message = if let Some(s) = err.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "unknown panic".to_string()
        };
        error!("Global exception: {}", message);
        internal_error_response(self.debug.then_some(message))
    }
}

pub fn panic_layer(debug: bool) -> CatchPanicLayer<PanicResponder> {
    CatchPanicLayer::custom(PanicResponder { debug })
}

/// Run a blocking model call on the blocking pool.
async fn run_blocking<T, F>(call: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))?
}

fn bad_json(rejection: JsonRejection) -> ApiError {
    warn!("Rejected request body: {}", rejection.body_text());
    ApiError {
        status: StatusCode::BAD_REQUEST,
        detail: rejection.body_text(),
    }
}

async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "online".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    })
}

async fn detect_language(
    State(state): State<AppState>,
    payload: Result<Json<DetectLanguageRequest>, JsonRejection>,
) -> Result<Json<DetectLanguageResponse>, ApiError> {
    let Json(request) = payload.map_err(bad_json)?;
    let debug = state.debug();

    let detector = state.models.detector().cloned().ok_or_else(|| {
        ApiError::from_service(
            ServiceError::Unavailable("Language detection model not loaded".to_string()),
            DETECTION_FAILED,
            debug,
        )
    })?;
    let detection = run_blocking(move || detector.detect(&request.text))
        .await
        .map_err(|e| ApiError::from_service(e, DETECTION_FAILED, debug))?;

    Ok(Json(DetectLanguageResponse {
        detected_language: detection.code,
        language_name: detection.name,
        confidence: detection.confidence,
    }))
}

async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let Json(request) = payload.map_err(bad_json)?;

    let result: Result<TranslateResponse, ServiceError> = async {
        let translator = state.models.translator().cloned().ok_or_else(|| {
            ServiceError::Unavailable("Translation model not loaded".to_string())
        })?;

        let requested_source = request
            .source_language
            .clone()
            .filter(|code| !code.trim().is_empty());
        let (source_language, source_language_name) = match requested_source {
            Some(code) => {
                let name = TranslationService::language_name(&code);
                (code, name)
            }
            None => {
                let detector = state.models.detector().cloned().ok_or_else(|| {
                    ServiceError::Unavailable("Language detection model not loaded".to_string())
                })?;
                let text = request.text.clone();
                let detection = run_blocking(move || detector.detect(&text)).await?;
                (detection.code, detection.name)
            }
        };

        let target_language_name = TranslationService::language_name(&request.target_language);

        let text = request.text.clone();
        let source = source_language.clone();
        let target = request.target_language.clone();
        let translation =
            run_blocking(move || translator.translate(&text, &source, &target)).await?;

        info!(
            "Translation successful: {} -> {}",
            source_language, request.target_language
        );

        Ok::<_, ServiceError>(TranslateResponse {
            original_text: request.text.clone(),
            translated_text: translation.text,
            source_language,
            source_language_name,
            target_language: request.target_language.clone(),
            target_language_name,
            confidence: translation.confidence,
        })
    }
    .await;

    result
        .map(Json)
        .map_err(|e| ApiError::from_service(e, TRANSLATION_FAILED, state.debug()))
}

async fn supported_languages() -> Json<SupportedLanguagesResponse> {
    let mut languages: Vec<LanguageInfo> = TranslationService::supported_languages()
        .into_iter()
        .map(|code| LanguageInfo {
            code: code.to_string(),
            name: TranslationService::language_name(code),
        })
        .collect();
    languages.sort_by(|a, b| a.code.cmp(&b.code));

    Json(SupportedLanguagesResponse {
        count: languages.len(),
        languages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{IdentifierError, LanguageDetector, LanguageGuess, LanguageIdentifier};
    use crate::registry::ModelRegistry;
    use crate::translate::{BackendError, TranslationBackend};
    use axum::http::{header, Method, Request};
    use serde_json::{json, Value};
    use std::collections::HashSet;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FixedIdentifier(&'static str);

    impl LanguageIdentifier for FixedIdentifier {
        fn rank(&self, _text: &str) -> Result<Vec<LanguageGuess>, IdentifierError> {
            Ok(vec![LanguageGuess {
                code: self.0.to_string(),
                probability: 0.97,
            }])
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// Upper-cases the input, or fails with a fixed message.
    struct UppercaseBackend {
        fail_with: Option<&'static str>,
    }

    impl TranslationBackend for UppercaseBackend {
        fn generate(
            &self,
            text: &str,
            _source_locale: &str,
            _target_locale: &str,
        ) -> Result<String, BackendError> {
            match self.fail_with {
                Some(message) => Err(BackendError::Inference(message.to_string())),
                None => Ok(text.to_uppercase()),
            }
        }

        fn model_name(&self) -> &str {
            "uppercase"
        }
    }

    fn detector(code: &'static str) -> LanguageDetector {
        LanguageDetector::new(Arc::new(FixedIdentifier(code)))
    }

    fn translator(fail_with: Option<&'static str>) -> TranslationService {
        TranslationService::new(Arc::new(UppercaseBackend { fail_with }))
    }

    fn app_with(models: ModelRegistry, debug: bool) -> Router {
        let config = Config {
            debug,
            ..Config::default()
        };
        create_app(AppState::new(config, models))
    }

    fn loaded_app() -> Router {
        app_with(
            ModelRegistry::new(Some(detector("fr")), Some(translator(None))),
            false,
        )
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn root_reports_service() {
        let (status, body) = send(loaded_app(), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "online");
        assert_eq!(body["service"], "Universal Language Translator");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn health_has_utc_timestamp() {
        let (status, body) = send(app_with(ModelRegistry::default(), false), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        let timestamp = chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap())
            .unwrap();
        assert_eq!(timestamp.offset().local_minus_utc(), 0);
    }

    #[tokio::test]
    async fn supported_languages_sorted_and_unique() {
        let (status, body) = send(loaded_app(), get("/api/supported-languages")).await;
        assert_eq!(status, StatusCode::OK);
        let languages = body["languages"].as_array().unwrap();
        assert_eq!(body["count"].as_u64().unwrap() as usize, languages.len());

        let codes: Vec<&str> = languages
            .iter()
            .map(|entry| entry["code"].as_str().unwrap())
            .collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
        assert_eq!(codes.iter().collect::<HashSet<_>>().len(), codes.len());
        assert!(languages.contains(&json!({"code": "de", "name": "German"})));
    }

    #[tokio::test]
    async fn missing_models_give_503() {
        let (status, body) = send(
            app_with(ModelRegistry::default(), false),
            post_json("/api/detect-language", json!({"text": "Hello world"})),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["detail"], "Language detection model not loaded");

        let (status, _) = send(
            app_with(ModelRegistry::default(), false),
            post_json(
                "/api/translate",
                json!({"text": "Hello world", "source_language": "en", "target_language": "fr"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn auto_detect_needs_detector() {
        let app = app_with(ModelRegistry::new(None, Some(translator(None))), false);
        let (status, _) = send(
            app,
            post_json("/api/translate", json!({"text": "Bonjour", "target_language": "en"})),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let app = app_with(ModelRegistry::new(None, Some(translator(None))), false);
        let (status, _) = send(
            app,
            post_json(
                "/api/translate",
                json!({"text": "Bonjour", "source_language": "fr", "target_language": "en"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn detect_language_success_and_validation() {
        let (status, body) = send(
            loaded_app(),
            post_json("/api/detect-language", json!({"text": "Bonjour tout le monde"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["detected_language"], "fr");
        assert_eq!(body["language_name"], "French");
        let confidence = body["confidence"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&confidence));

        let (status, body) = send(
            loaded_app(),
            post_json("/api/detect-language", json!({"text": "ab"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Text must be at least 3 characters long");
    }

    #[tokio::test]
    async fn translate_with_explicit_source() {
        let (status, body) = send(
            loaded_app(),
            post_json(
                "/api/translate",
                json!({"text": "hello", "source_language": "en", "target_language": "de"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["original_text"], "hello");
        assert_eq!(body["translated_text"], "HELLO");
        assert_eq!(body["source_language"], "en");
        assert_eq!(body["source_language_name"], "English");
        assert_eq!(body["target_language"], "de");
        assert_eq!(body["target_language_name"], "German");
        assert!((body["confidence"].as_f64().unwrap() - 0.95).abs() < 1e-9);
    }

    #[tokio::test]
    async fn translate_detects_missing_source() {
        let (status, body) = send(
            loaded_app(),
            post_json(
                "/api/translate",
                json!({"text": "Bonjour", "source_language": "", "target_language": "en"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source_language"], "fr");
        assert_eq!(body["source_language_name"], "French");
    }

    #[tokio::test]
    async fn translate_same_language_returns_input() {
        let (status, body) = send(
            loaded_app(),
            post_json(
                "/api/translate",
                json!({"text": "hello", "source_language": "en", "target_language": "en"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["translated_text"], "hello");
        assert_eq!(body["confidence"].as_f64().unwrap(), 1.0);
    }

    #[tokio::test]
    async fn translate_validation_errors() {
        let (status, body) = send(
            loaded_app(),
            post_json(
                "/api/translate",
                json!({"text": "hello", "source_language": "en", "target_language": "xx"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Unsupported target language: xx");

        let (status, _) = send(
            loaded_app(),
            post_json(
                "/api/translate",
                json!({"text": "a".repeat(5001), "source_language": "en", "target_language": "fr"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            loaded_app(),
            post_json("/api/translate", json!({"text": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn backend_failure_detail_depends_on_debug() {
        let registry = ModelRegistry::new(Some(detector("en")), Some(translator(Some("device lost"))));
        let request = json!({"text": "hello", "source_language": "en", "target_language": "fr"});

        let (status, body) = send(
            app_with(registry.clone(), false),
            post_json("/api/translate", request.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Translation failed");

        let (status, body) = send(app_with(registry, true), post_json("/api/translate", request)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("device lost"));
    }

    async fn panicking_handler() -> &'static str {
        panic!("boom")
    }

    #[tokio::test]
    async fn panics_become_uniform_500() {
        for (debug, expected_detail) in [(false, "An error occurred"), (true, "boom")] {
            let app = Router::new()
                .route("/boom", axum::routing::get(panicking_handler))
                .layer(panic_layer(debug));
            let (status, body) = send(app, get("/boom")).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["error"], "Internal server error");
            assert_eq!(body["detail"], expected_detail);
        }
    }

    #[tokio::test]
    async fn cors_allows_configured_origin() {
        let request = Request::builder()
            .uri("/api/health")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = loaded_app().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }
}
