use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    routing::get,
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use engine::BacktestOutcome;
use strategy::{presets::random_request, BacktestRequest, StrategyConfig};

use crate::{ApiError, AppState};

/// `?view=random` draws a fresh random request instead of a named preset.
pub const RANDOM_VIEW: &str = "random";

pub fn backtest_router() -> Router<AppState> {
    Router::new()
        .route("/api/backtest", get(get_backtest).post(post_backtest))
        .route("/api/presets", get(get_presets))
}

// ─── Presets ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ViewQuery {
    view: Option<String>,
}

async fn get_backtest(
    State(state): State<AppState>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Json<BacktestOutcome>, ApiError> {
    let Query(q) = query?;
    let view = q
        .view
        .ok_or_else(|| ApiError::BadRequest("missing 'view' query parameter".into()))?;

    let request = if view == RANDOM_VIEW {
        random_request(&mut fastrand::Rng::new())
    } else {
        state
            .presets
            .get(&view)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("unknown preset '{view}'")))?
    };

    Ok(Json(state.backtester.run(request).await?))
}

async fn get_presets(State(state): State<AppState>) -> Json<Value> {
    let names: Vec<&str> = state.presets.names().collect();
    Json(json!({ "presets": names, "random": RANDOM_VIEW }))
}

// ─── Custom run ───────────────────────────────────────────────────────────────

/// Field names match the HTML form: `ma` is the SMA window, `sl`/`tp` are percents.
#[derive(Debug, Deserialize)]
struct BacktestForm {
    pair: String,
    timeframe: String,
    candles: u32,
    ma: usize,
    sl: f64,
    tp: f64,
}

impl From<BacktestForm> for BacktestRequest {
    fn from(form: BacktestForm) -> Self {
        BacktestRequest {
            pair: form.pair,
            timeframe: form.timeframe,
            candles: form.candles,
            params: StrategyConfig {
                window: form.ma,
                take_profit_pct: form.tp,
                stop_loss_pct: form.sl,
            },
        }
    }
}

async fn post_backtest(
    State(state): State<AppState>,
    form: Result<Form<BacktestForm>, FormRejection>,
) -> Result<Json<BacktestOutcome>, ApiError> {
    let Form(form) = form?;
    Ok(Json(state.backtester.run(form.into()).await?))
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use common::{Candle, MarketDataSource, Result};
    use engine::Backtester;
    use strategy::PresetBook;

    use crate::{router, AppState};

    /// Records the last request and serves a series that opens and takes profit.
    #[derive(Default)]
    struct ScriptedSource {
        last: Mutex<Option<(String, String, u32)>>,
    }

    #[async_trait]
    impl MarketDataSource for ScriptedSource {
        async fn historic_candles(&self, pair: &str, tf: &str, limit: u32) -> Result<Vec<Candle>> {
            *self.last.lock().unwrap() = Some((pair.to_string(), tf.to_string(), limit));
            Ok(vec![
                Candle::new(0, 100.0, 101.0, 99.0, 100.0),
                Candle::new(60, 100.0, 101.0, 99.0, 100.0),
                Candle::new(120, 100.0, 130.0, 100.0, 125.0),
            ])
        }
    }

    fn app(source: Arc<ScriptedSource>) -> axum::Router {
        router(AppState {
            backtester: Backtester::new(source),
            presets: Arc::new(PresetBook::builtin()),
        })
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn example_view_runs_example_preset() {
        let source = Arc::new(ScriptedSource::default());
        let resp = app(source.clone())
            .oneshot(Request::get("/api/backtest?view=example").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            *source.last.lock().unwrap(),
            Some(("YFIUSDT".to_string(), "1d".to_string(), 1000))
        );
        let body = json_body(resp).await;
        // Window 50 over 3 candles: no SMA, no trades
        assert_eq!(body["report"]["trades_count"], 0);
        assert_eq!(body["report"]["result_text"], "earned 0%");
    }

    #[tokio::test]
    async fn form_post_runs_custom_request() {
        let source = Arc::new(ScriptedSource::default());
        let resp = app(source.clone())
            .oneshot(
                Request::post("/api/backtest")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("pair=btcusdt&timeframe=15m&candles=3&ma=2&sl=3&tp=10"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["request"]["pair"], "BTCUSDT");
        assert_eq!(body["report"]["trades_count"], 2);
        assert_eq!(body["report"]["trades"][0]["action"], "open");
        assert_eq!(body["report"]["trades"][1]["outcome"], "profit");
        assert_eq!(body["report"]["trades"][1]["close_price"], 110.0);
        assert_eq!(body["report"]["result_text"], "earned 10%");
        assert_eq!(body["chart"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn invalid_window_is_unprocessable() {
        let source = Arc::new(ScriptedSource::default());
        let resp = app(source.clone())
            .oneshot(
                Request::post("/api/backtest")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("pair=BTCUSDT&timeframe=15m&candles=3&ma=1&sl=3&tp=10"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(source.last.lock().unwrap().is_none());
        let body = json_body(resp).await;
        assert!(body["error"].as_str().unwrap().contains("window"));
    }

    #[tokio::test]
    async fn unparseable_form_field_is_a_json_bad_request() {
        let source = Arc::new(ScriptedSource::default());
        let resp = app(source.clone())
            .oneshot(
                Request::post("/api/backtest")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("pair=BTCUSDT&timeframe=15m&candles=3&ma=abc&sl=3&tp=10"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(source.last.lock().unwrap().is_none());
        let body = json_body(resp).await;
        assert!(body["error"].is_string(), "got {body}");
    }

    #[tokio::test]
    async fn missing_form_field_is_a_json_bad_request() {
        let resp = app(Arc::new(ScriptedSource::default()))
            .oneshot(
                Request::post("/api/backtest")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("pair=BTCUSDT&timeframe=15m"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(resp).await["error"].is_string());
    }

    #[tokio::test]
    async fn missing_and_unknown_views() {
        let source = Arc::new(ScriptedSource::default());
        let missing = app(source.clone())
            .oneshot(Request::get("/api/backtest").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(missing).await["error"].is_string());

        let unknown = app(source)
            .oneshot(Request::get("/api/backtest?view=nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn random_view_fetches_something() {
        let source = Arc::new(ScriptedSource::default());
        let resp = app(source.clone())
            .oneshot(Request::get("/api/backtest?view=random").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(source.last.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn presets_lists_example() {
        let resp = app(Arc::new(ScriptedSource::default()))
            .oneshot(Request::get("/api/presets").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(resp).await;
        assert_eq!(body["presets"][0], "example");
        assert_eq!(body["random"], "random");
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        let resp = app(Arc::new(ScriptedSource::default()))
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn root_serves_frontend() {
        let resp = app(Arc::new(ScriptedSource::default()))
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"), "got {content_type}");
    }
}
