use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};
use validator::Validate;

use crate::dto::public_dto::{CheckAnswerResponse, SelectOptionRequest};
use crate::services::grading_service::GradingService;
use crate::AppState;

/// Evaluate one inline knowledge check. Stateless: the verdict, the
/// actually-correct option and the explanation are revealed on every
/// selection, right or wrong.
#[axum::debug_handler]
pub async fn answer_check(
    State(state): State<AppState>,
    Path((slug, check_id)): Path<(String, String)>,
    Json(req): Json<SelectOptionRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let question = state.content_service.get_check(&slug, &check_id)?;
    let correct = GradingService::evaluate_check(question, req.selected)?;

    Ok(Json(CheckAnswerResponse {
        check_id: question.id.clone(),
        correct,
        correct_answer: question.correct_answer,
        explanation: question.explanation.clone(),
    })
    .into_response())
}
