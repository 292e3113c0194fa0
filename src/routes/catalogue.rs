use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};

use crate::dto::public_dto::{
    CatalogueResponse, PublicQuestion, PublicQuizSummary, SectionDetailResponse, SectionSummary,
};
use crate::AppState;

#[axum::debug_handler]
pub async fn list_sections(State(state): State<AppState>) -> crate::error::Result<Response> {
    let sections: Vec<SectionSummary> = state
        .content_service
        .list()
        .into_iter()
        .map(SectionSummary::from)
        .collect();
    let total = sections.len();
    Ok(Json(CatalogueResponse { sections, total }).into_response())
}

#[axum::debug_handler]
pub async fn get_section(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> crate::error::Result<Response> {
    let section = state.content_service.get(&slug)?;
    let response = SectionDetailResponse {
        slug: section.slug.clone(),
        title: section.title.clone(),
        description: section.description.clone(),
        inline_checks: section
            .inline_checks
            .iter()
            .map(PublicQuestion::from)
            .collect(),
        quiz: PublicQuizSummary {
            title: section.quiz.title.clone(),
            total_questions: section.quiz.questions_per_session(),
            passing_score: section.quiz.passing_score,
            duration_minutes: section.quiz.duration_minutes,
        },
    };
    Ok(Json(response).into_response())
}
