use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::dto::public_dto::{
    AnswerResponse, CurrentQuestion, NextQuestionResponse, PublicQuestion, QuizResult,
    SelectOptionRequest, StartQuizResponse, StatusResponse,
};
use crate::models::session::QuizSession;
use crate::AppState;

fn expired_response() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "attempt_expired",
            "message": "This quiz attempt has expired"
        })),
    )
        .into_response()
}

fn current_question_dto(session: &QuizSession) -> Option<CurrentQuestion> {
    session.current_question().map(|question| CurrentQuestion {
        index: session.current_index(),
        total: session.total_questions(),
        question: PublicQuestion::from(question),
    })
}

#[axum::debug_handler]
pub async fn start_quiz(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> crate::error::Result<Response> {
    let section = state.content_service.get(&slug)?;
    let session = state.session_service.start_session(section).await;
    tracing::info!(
        section = %slug,
        attempt_id = %session.id,
        questions = session.total_questions(),
        "Quiz attempt started"
    );

    let question = current_question_dto(&session).ok_or_else(|| {
        crate::error::Error::Internal("Started attempt has no first question".to_string())
    })?;
    let response = StartQuizResponse {
        attempt_id: session.id,
        access_token: session.access_token.clone(),
        section_slug: session.section_slug.clone(),
        title: session.quiz_title.clone(),
        total_questions: session.total_questions(),
        passing_score: session.passing_score(),
        expires_at: session.expires_at,
        question,
    };
    Ok(Json(response).into_response())
}

#[axum::debug_handler]
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(req): Json<SelectOptionRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let session = state.session_service.get_session(&token).await?;
    if session.is_expired(Utc::now()) {
        return Ok(expired_response());
    }
    if session.is_completed() {
        return Ok((
            StatusCode::CONFLICT,
            Json(json!({
                "error": "already_completed",
                "message": "This quiz attempt has already been completed"
            })),
        )
            .into_response());
    }

    let (session, feedback) = state.session_service.answer(&token, req.selected).await?;

    let result = session
        .outcome()
        .map(|outcome| QuizResult::from_outcome(&session, outcome));
    if let Some(ref result) = result {
        tracing::info!(
            attempt_id = %session.id,
            score = result.score,
            passed = result.passed,
            "Quiz attempt completed"
        );
    }

    Ok(Json(AnswerResponse {
        question_index: feedback.question_index,
        correct: feedback.correct,
        correct_answer: feedback.correct_answer,
        explanation: feedback.explanation,
        completed: session.is_completed(),
        result,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn advance_question(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> crate::error::Result<Response> {
    let session = state.session_service.get_session(&token).await?;
    if session.is_expired(Utc::now()) {
        return Ok(expired_response());
    }

    let session = state.session_service.advance(&token).await?;
    let question = current_question_dto(&session).ok_or_else(|| {
        crate::error::Error::Internal("Advanced past the last question".to_string())
    })?;
    Ok(Json(NextQuestionResponse { question }).into_response())
}

#[axum::debug_handler]
pub async fn get_status(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> crate::error::Result<Response> {
    let session = state.session_service.get_session(&token).await?;
    let now = Utc::now();

    let status = if session.is_completed() {
        "completed"
    } else if session.is_expired(now) {
        "expired"
    } else {
        "in_progress"
    };
    let time_remaining = if session.is_completed() {
        None
    } else {
        Some((session.expires_at - now).num_seconds().max(0))
    };

    Ok(Json(StatusResponse {
        status: status.to_string(),
        current_index: session.current_index(),
        questions_answered: session.answers().len(),
        total_questions: session.total_questions(),
        time_remaining_seconds: time_remaining,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn get_result(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> crate::error::Result<Response> {
    let session = state.session_service.get_session(&token).await?;

    match session.outcome() {
        Some(outcome) => {
            Ok(Json(QuizResult::from_outcome(&session, outcome)).into_response())
        }
        None if session.is_expired(Utc::now()) => Ok(expired_response()),
        None => Ok((
            StatusCode::CONFLICT,
            Json(json!({
                "error": "not_completed",
                "message": "The quiz attempt has unanswered questions"
            })),
        )
            .into_response()),
    }
}
