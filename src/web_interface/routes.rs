use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use log::{debug, error};
use serde::Serialize;
use uuid::Uuid;
use warp::http::header::{HeaderValue, CONTENT_TYPE, SET_COOKIE};
use warp::http::{StatusCode, Uri};
use warp::reply::Response;
use warp::{reply, Filter, Rejection, Reply};

use super::assets::{render_index, static_asset};
use super::form::silence_request_from_form;
use super::types::ApiResponse;
use crate::error_handling::types::SchedulerError;
use crate::session_management::flash_store::{FlashStore, SESSION_COOKIE};
use crate::session_management::FlashStatus;
use crate::silence::orchestrator::SilenceOrchestrator;
use crate::silence::types::SilenceRequest;
use crate::silence::validator::validate;

/// Largest request body accepted by the silence routes.
pub const MAX_BODY_BYTES: u64 = 16 * 1024;

fn json_reply<T: Serialize>(body: &T, status: StatusCode) -> Response {
    reply::with_status(reply::json(body), status).into_response()
}

fn error_reply<S: Into<String>>(message: S) -> Response {
    let message = message.into();
    error!("{}", message);
    json_reply(&ApiResponse::error(message), StatusCode::INTERNAL_SERVER_ERROR)
}

fn with_session_cookie(mut response: Response, session: Uuid, fresh: bool) -> Response {
    if fresh {
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, session);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().insert(SET_COOKIE, value);
        }
    }
    response
}

fn with_orchestrator(
    orchestrator: SilenceOrchestrator,
) -> impl Filter<Extract = (SilenceOrchestrator,), Error = Infallible> + Clone {
    warp::any().map(move || orchestrator.clone())
}

fn with_flashes(
    flashes: Arc<FlashStore>,
) -> impl Filter<Extract = (Arc<FlashStore>,), Error = Infallible> + Clone {
    warp::any().map(move || flashes.clone())
}

/// Every route of the service, API and dashboard, with JSON rejections.
pub fn routes(
    orchestrator: SilenceOrchestrator,
    flashes: Arc<FlashStore>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    dashboard_route(flashes.clone())
        .or(static_route())
        .or(list_alerts_route(orchestrator.clone()))
        .or(create_silence_route(orchestrator.clone()))
        .or(create_silence_form_route(orchestrator.clone(), flashes))
        .or(list_silences_route(orchestrator.clone()))
        .or(list_silences_filtered_route(orchestrator.clone()))
        .or(get_silence_route(orchestrator.clone()))
        .or(update_silence_route(orchestrator.clone()))
        .or(expire_silence_route(orchestrator))
        .recover(handle_rejection)
}

/// GET /
pub fn dashboard_route(
    flashes: Arc<FlashStore>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path::end()
        .and(warp::get())
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and(with_flashes(flashes))
        .and_then(|cookie: Option<String>, flashes: Arc<FlashStore>| async move {
            let (session, fresh) = FlashStore::resolve_session(cookie.as_deref());
            let pending = flashes.take(session);
            let response = match render_index(&pending) {
                Ok(html) => reply::html(html).into_response(),
                Err(e) => error_reply(e.to_string()),
            };
            Ok::<_, Rejection>(with_session_cookie(response, session, fresh))
        })
}

/// GET /static/<file>
pub fn static_route() -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("static")
        .and(warp::path::tail())
        .and(warp::get())
        .and_then(|tail: warp::path::Tail| async move {
            match static_asset(tail.as_str()) {
                Some((bytes, mime)) => {
                    let mut response = bytes.into_response();
                    if let Ok(value) = HeaderValue::from_str(&mime) {
                        response.headers_mut().insert(CONTENT_TYPE, value);
                    }
                    Ok::<_, Rejection>(response)
                }
                None => Err(warp::reject::not_found()),
            }
        })
}

/// GET /api/v1/alerts
pub fn list_alerts_route(
    orchestrator: SilenceOrchestrator,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "v1" / "alerts")
        .and(warp::get())
        .and(with_orchestrator(orchestrator))
        .and_then(|orchestrator: SilenceOrchestrator| async move {
            let response = match orchestrator.list_alerts().await {
                Ok(alerts) => json_reply(&alerts, StatusCode::OK),
                Err(e) => error_reply(format!("unable to retrieve alerts: {}", e)),
            };
            Ok::<_, Rejection>(response)
        })
}

/// POST /api/v1/silence with a JSON request
pub fn create_silence_route(
    orchestrator: SilenceOrchestrator,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "v1" / "silence")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_orchestrator(orchestrator))
        .and_then(|request: SilenceRequest, orchestrator: SilenceOrchestrator| async move {
            let response = match orchestrator.run(&request).await {
                Err(e) => error_reply(SchedulerError::from(e).to_string()),
                Ok(result) if result.is_success() => json_reply(
                    &ApiResponse::success(result.summary()).with_ids(result.created_ids),
                    StatusCode::OK,
                ),
                Ok(result) => {
                    error!(
                        "Windows {:?} of '{}' could not be created",
                        result.failed_indices, request.comment
                    );
                    json_reply(
                        &ApiResponse::error(result.summary()).with_ids(result.created_ids),
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                }
            };
            Ok::<_, Rejection>(response)
        })
}

/// POST /api/v1/silence with the dashboard form
pub fn create_silence_form_route(
    orchestrator: SilenceOrchestrator,
    flashes: Arc<FlashStore>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "v1" / "silence")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::form())
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and(with_orchestrator(orchestrator))
        .and(with_flashes(flashes))
        .and_then(
            |fields: HashMap<String, String>,
             cookie: Option<String>,
             orchestrator: SilenceOrchestrator,
             flashes: Arc<FlashStore>| async move {
                let (session, fresh) = FlashStore::resolve_session(cookie.as_deref());

                let request = match silence_request_from_form(&fields) {
                    Ok(request) => request,
                    Err(e) => {
                        flashes.add(session, FlashStatus::Danger, e.to_string());
                        return Ok::<_, Rejection>(with_session_cookie(
                            error_reply(e.to_string()),
                            session,
                            fresh,
                        ));
                    }
                };

                let response = match orchestrator.run(&request).await {
                    Err(e) => {
                        let message = SchedulerError::from(e).to_string();
                        flashes.add(session, FlashStatus::Danger, message.clone());
                        error_reply(message)
                    }
                    Ok(result) => {
                        if result.is_success() {
                            flashes.add(session, FlashStatus::Success, result.summary());
                        } else {
                            flashes.add(
                                session,
                                FlashStatus::Danger,
                                format!(
                                    "'{}' request(s) could not be completed",
                                    result.failed_indices.len()
                                ),
                            );
                        }
                        warp::redirect::see_other(Uri::from_static("/")).into_response()
                    }
                };
                Ok::<_, Rejection>(with_session_cookie(response, session, fresh))
            },
        )
}

/// GET /api/v1/silences
pub fn list_silences_route(
    orchestrator: SilenceOrchestrator,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "v1" / "silences")
        .and(warp::get())
        .and(with_orchestrator(orchestrator))
        .and_then(|orchestrator: SilenceOrchestrator| list_silences(orchestrator, false))
}

/// GET /api/v1/silences_filtered
pub fn list_silences_filtered_route(
    orchestrator: SilenceOrchestrator,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "v1" / "silences_filtered")
        .and(warp::get())
        .and(with_orchestrator(orchestrator))
        .and_then(|orchestrator: SilenceOrchestrator| list_silences(orchestrator, true))
}

async fn list_silences(
    orchestrator: SilenceOrchestrator,
    filtered: bool,
) -> Result<Response, Rejection> {
    Ok(match orchestrator.list_silences(filtered).await {
        Ok(silences) => json_reply(&silences, StatusCode::OK),
        Err(e) => error_reply(format!("unable to retrieve silences: {}", e)),
    })
}

/// GET /api/v1/silence/:id
pub fn get_silence_route(
    orchestrator: SilenceOrchestrator,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "v1" / "silence" / String)
        .and(warp::get())
        .and(with_orchestrator(orchestrator))
        .and_then(|id: String, orchestrator: SilenceOrchestrator| async move {
            let response = match orchestrator.get_silence(&id).await {
                Ok(silence) => json_reply(&silence, StatusCode::OK),
                Err(e) => error_reply(format!(
                    "unable to retrieve silence from Alertmanager: {}",
                    e
                )),
            };
            Ok::<_, Rejection>(response)
        })
}

/// POST /api/v1/silence/:id
pub fn update_silence_route(
    orchestrator: SilenceOrchestrator,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "v1" / "silence" / String)
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_orchestrator(orchestrator))
        .and_then(
            |id: String, request: SilenceRequest, orchestrator: SilenceOrchestrator| async move {
                if let Err(e) = validate(&request) {
                    return Ok::<_, Rejection>(error_reply(SchedulerError::from(e).to_string()));
                }

                let schedule = &request.schedule;
                let response = match orchestrator
                    .update(&id, &schedule.start_time, &schedule.end_time, &request)
                    .await
                {
                    Ok(new_id) => json_reply(
                        &ApiResponse::success(format!("silence {} replaced by {}", id, new_id))
                            .with_ids(vec![new_id]),
                        StatusCode::OK,
                    ),
                    Err(e) => error_reply(format!("unable to update silence '{}': {}", id, e)),
                };
                Ok::<_, Rejection>(response)
            },
        )
}

/// DELETE /api/v1/silence/:id
pub fn expire_silence_route(
    orchestrator: SilenceOrchestrator,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "v1" / "silence" / String)
        .and(warp::delete())
        .and(with_orchestrator(orchestrator))
        .and_then(|id: String, orchestrator: SilenceOrchestrator| async move {
            let response = match orchestrator.expire_silence(&id).await {
                Ok(()) => json_reply(
                    &ApiResponse::success(format!("expired silence with ID: {}", id)),
                    StatusCode::OK,
                ),
                Err(e) => error_reply(format!("unable to expire silence '{}': {}", id, e)),
            };
            Ok::<_, Rejection>(response)
        })
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    if err.is_not_found() {
        return Ok(json_reply(&ApiResponse::error("not found"), StatusCode::NOT_FOUND));
    }
    if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        return Ok(json_reply(
            &ApiResponse::error(format!("request body exceeds {} bytes", MAX_BODY_BYTES)),
            StatusCode::PAYLOAD_TOO_LARGE,
        ));
    }
    if err.find::<warp::reject::LengthRequired>().is_some() {
        return Ok(json_reply(
            &ApiResponse::error("content-length header required"),
            StatusCode::LENGTH_REQUIRED,
        ));
    }
    if let Some(e) = err.find::<warp::body::BodyDeserializeError>() {
        return Ok(json_reply(
            &ApiResponse::error(format!("unable to read silence request: {}", e)),
            StatusCode::BAD_REQUEST,
        ));
    }
    if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        return Ok(json_reply(
            &ApiResponse::error("unsupported content type"),
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ));
    }
    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(json_reply(
            &ApiResponse::error("method not allowed"),
            StatusCode::METHOD_NOT_ALLOWED,
        ));
    }

    debug!("Unhandled rejection: {:?}", err);
    Ok(json_reply(
        &ApiResponse::error("internal error"),
        StatusCode::INTERNAL_SERVER_ERROR,
    ))
}
