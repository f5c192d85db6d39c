use crate::engine::{Engine, MockRequest, RequestPayload};
use crate::problem::Problem;
use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::Response;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Every method on every path lands in the same handler; the engine does
/// the routing against the loaded document.
pub fn build_router(engine: Engine) -> Router {
    Router::new()
        .fallback(handle)
        .with_state(engine)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn start_server(addr: SocketAddr, engine: Engine) -> crate::Result<()> {
    let app = build_router(engine);

    tracing::info!("Mock server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn handle(State(engine): State<Engine>, request: Request) -> Response {
    let mock_request = match into_mock_request(request).await {
        Ok(mock_request) => mock_request,
        Err(detail) => return problem_http_response(Problem::unexpected(detail)),
    };

    let mock_response = engine.process(&mock_request);

    // A sloppy document can carry a response key outside the valid HTTP
    // status range; refuse it here instead of panicking in the builder.
    let Ok(status) = StatusCode::from_u16(mock_response.status) else {
        return problem_http_response(Problem::unexpected(format!(
            "synthesized status code {} is not a valid HTTP status",
            mock_response.status
        )));
    };

    let body = if mock_response.body.is_null() {
        Vec::new()
    } else {
        serde_json::to_vec(&mock_response.body).unwrap_or_default()
    };

    Response::builder()
        .status(status)
        .header("Content-Type", mock_response.content_type)
        .body(Body::from(body))
        .unwrap()
}

fn problem_http_response(problem: Problem) -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header("Content-Type", crate::engine::PROBLEM_CONTENT_TYPE)
        .body(Body::from(serde_json::to_vec(&problem).unwrap_or_default()))
        .unwrap()
}

async fn into_mock_request(request: Request) -> Result<MockRequest, String> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let mut mock_request = MockRequest::new(&method, &path);

    if let Some(query) = request.uri().query() {
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            mock_request = mock_request.with_query(name, value);
        }
    }

    for (name, value) in request.headers() {
        if let Ok(value) = value.to_str() {
            mock_request = mock_request.with_header(name.as_str(), value);
        }
    }

    let bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .map_err(|err| format!("failed to read request body: {}", err))?;

    if !bytes.is_empty() {
        let payload = match serde_json::from_slice(&bytes) {
            Ok(value) => RequestPayload::Json(value),
            Err(err) => RequestPayload::Malformed(err.to_string()),
        };
        mock_request = mock_request.with_payload(payload);
    }

    Ok(mock_request)
}
