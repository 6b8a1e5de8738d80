pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::localization::handlers as localization;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Localization API
        .route("/api/v1/languages", get(localization::handle_list_languages))
        .route("/api/v1/languages/detect", post(localization::handle_detect))
        .route("/api/v1/translate", post(localization::handle_translate))
        // Stored resumes
        .route("/api/v1/resumes/:id", get(resumes::handle_get_resume))
        .route(
            "/api/v1/resumes/:id/translate",
            post(resumes::handle_translate_resume),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::localization::detect::LanguageDetector;
    use crate::localization::field_translator::FieldTranslator;
    use crate::localization::resume_translator::{ResumeTranslator, TranslatorSettings};
    use crate::test_utils::{FakeGenerator, FakeMode, FixedDetector};

    fn test_app(detector: impl LanguageDetector + 'static) -> Router {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let translator = ResumeTranslator::new(
            Arc::new(detector),
            FieldTranslator::new(FakeGenerator::new(FakeMode::Translate)),
            TranslatorSettings::default(),
        );
        build_router(AppState {
            db,
            translator: Arc::new(translator),
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(test_app(FixedDetector(None)), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_lists_supported_languages() {
        let request = Request::get("/api/v1/languages").body(Body::empty()).unwrap();
        let (status, body) = send(test_app(FixedDetector(None)), request).await;
        assert_eq!(status, StatusCode::OK);
        let languages = body["languages"].as_array().unwrap();
        assert_eq!(languages.len(), 6);
        assert_eq!(languages[0]["code"], "en");
    }

    #[tokio::test]
    async fn test_detect_short_text_is_undetermined() {
        let request = post_json("/api/v1/languages/detect", json!({ "text": "hi" }));
        let (status, body) = send(test_app(FixedDetector(Some("fr"))), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "und");
        assert!(body["normalized"].is_null());
    }

    #[tokio::test]
    async fn test_detect_reports_normalized_code() {
        let request = post_json(
            "/api/v1/languages/detect",
            json!({ "text": "Entwickler mit zehn Jahren Erfahrung" }),
        );
        let (_, body) = send(test_app(FixedDetector(Some("de"))), request).await;
        assert_eq!(body["code"], "de");
        assert_eq!(body["normalized"], "de");
        assert_eq!(body["guesses"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_translate_inline_resume() {
        let request = post_json(
            "/api/v1/translate",
            json!({
                "resume": {
                    "fullName": "Grace Hopper",
                    "email": "grace@example.com",
                    "summary": "Backend engineer focused on compilers.",
                    "workExperience": [{
                        "jobTitle": "Engineer",
                        "company": "Acme Corp",
                        "endDate": null
                    }]
                },
                "targetLanguage": "Français"
            }),
        );
        let (status, body) = send(test_app(FixedDetector(Some("en"))), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["translated"], true);
        assert_eq!(body["sourceLanguage"], "en");
        assert_eq!(body["targetLanguage"], "fr");
        assert_eq!(body["resume"]["language"], "fr");
        assert_eq!(
            body["resume"]["summary"],
            "backend engineer focused on compilers. (tr)"
        );
        assert_eq!(body["resume"]["workExperience"][0]["company"], "Acme Corp");
        assert_eq!(body["resume"]["workExperience"][0]["endDate"], "Present");
    }

    #[tokio::test]
    async fn test_translate_rejects_invalid_resume() {
        let request = post_json(
            "/api/v1/translate",
            json!({
                "resume": { "fullName": "Grace Hopper", "email": "not-an-email" },
                "targetLanguage": "fr"
            }),
        );
        let (status, body) = send(test_app(FixedDetector(Some("en"))), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_translate_rejects_blank_target() {
        let request = post_json(
            "/api/v1/translate",
            json!({
                "resume": { "fullName": "Grace Hopper", "email": "grace@example.com" },
                "targetLanguage": "  "
            }),
        );
        let (status, body) = send(test_app(FixedDetector(Some("en"))), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "targetLanguage cannot be empty");
    }

    #[tokio::test]
    async fn test_stored_resume_rejects_malformed_id() {
        let request = Request::get("/api/v1/resumes/not-a-uuid")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(test_app(FixedDetector(None)), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
