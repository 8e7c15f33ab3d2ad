use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::tarefa::{
    DATA_VAZIA, StatusTarefa, Tarefa, TarefaService, TarefaServiceError, TarefaState,
};

/// JSON representation of a tarefa for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TarefaJson {
    /// Unique identifier assigned by the store on creation
    id: i32,
    /// Free-form title
    titulo: String,
    /// Free-form description, may be null
    descricao: Option<String>,
    /// Due date, ISO-8601 without offset
    data: NaiveDateTime,
    /// 0 = Pendente, 1 = Finalizado
    status: StatusTarefa,
}

impl From<Tarefa> for TarefaJson {
    fn from(tarefa: Tarefa) -> Self {
        Self {
            id: tarefa.id(),
            titulo: tarefa.titulo().to_string(),
            descricao: tarefa.descricao().map(str::to_string),
            data: tarefa.data(),
            status: tarefa.status(),
        }
    }
}

/// JSON request body for creating or updating a tarefa.
///
/// Every field is optional on the wire; a missing `data` binds as the
/// "no date provided" sentinel and is rejected by the service.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TarefaRequest {
    #[serde(default)]
    titulo: String,
    #[serde(default)]
    descricao: Option<String>,
    #[serde(default = "data_vazia")]
    data: NaiveDateTime,
    #[serde(default)]
    status: StatusTarefa,
}

fn data_vazia() -> NaiveDateTime {
    DATA_VAZIA
}

/// Error body shape shared by all tarefa endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErroResponse {
    #[serde(rename = "Erro")]
    erro: String,
}

impl ErroResponse {
    pub fn new(erro: String) -> Self {
        Self { erro }
    }
}

/// Error type for tarefa API handlers.
#[derive(Debug, thiserror::Error)]
pub enum TarefaApiError {
    /// The referenced ID has no matching record.
    #[error("Tarefa not found")]
    NotFound,
    /// Create/update submitted the sentinel "empty" date.
    #[error("A data da tarefa não pode ser vazia")]
    DataVazia,
    /// Title search invoked without a usable query string.
    #[error("Informe um título para pesquisa.")]
    TituloVazio,
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(sea_orm::DbErr),
}

impl From<TarefaServiceError> for TarefaApiError {
    fn from(err: TarefaServiceError) -> Self {
        match err {
            TarefaServiceError::TarefaNotFound(_) => TarefaApiError::NotFound,
            TarefaServiceError::DataVazia => TarefaApiError::DataVazia,
            TarefaServiceError::Database(err) => TarefaApiError::Database(err),
        }
    }
}

impl IntoResponse for TarefaApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            TarefaApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            TarefaApiError::DataVazia | TarefaApiError::TituloVazio => (
                StatusCode::BAD_REQUEST,
                Json(ErroResponse::new(self.to_string())),
            )
                .into_response(),
            TarefaApiError::Database(err) => {
                tracing::error!("Failed to reach the tarefa store: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErroResponse::new(
                        "Erro interno ao processar a requisição".to_string(),
                    )),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ObterPorTituloQuery {
    #[serde(default)]
    titulo: String,
}

#[derive(Debug, Deserialize)]
pub struct ObterPorDataQuery {
    #[serde(deserialize_with = "deserialize_data_consulta")]
    data: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct ObterPorStatusQuery {
    status: StatusTarefa,
}

/// Accepts a full date-time or a bare calendar date; only the calendar-date
/// component is kept.
fn deserialize_data_consulta<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(data_hora) = raw.parse::<NaiveDateTime>() {
        return Ok(data_hora.date());
    }
    if let Ok(data_hora) = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(data_hora.date());
    }
    raw.parse::<NaiveDate>().map_err(serde::de::Error::custom)
}

/// Handler for GET /tarefa/{id} - Returns a single tarefa.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tarefa/{id}",
    params(
        ("id" = i32, Path, description = "Identifier of the tarefa")
    ),
    responses(
        (status = 200, description = "Tarefa found", body = TarefaJson),
        (status = 404, description = "No tarefa with the given id")
    ),
    tag = "Tarefa"
)]
pub async fn get_tarefa_by_id_handler(
    State(state): State<TarefaState>,
    Path(id): Path<i32>,
) -> Result<Json<TarefaJson>, TarefaApiError> {
    let service = TarefaService::new(&state.db);
    let tarefa = service.get_tarefa_by_id(id).await?;
    Ok(Json(TarefaJson::from(tarefa)))
}

/// Handler for GET /tarefa/ObterTodos - Returns every tarefa.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tarefa/ObterTodos",
    responses(
        (status = 200, description = "Every stored tarefa", body = Vec<TarefaJson>),
        (status = 500, description = "Store unavailable", body = ErroResponse)
    ),
    tag = "Tarefa"
)]
pub async fn get_all_tarefas_handler(
    State(state): State<TarefaState>,
) -> Result<Json<Vec<TarefaJson>>, TarefaApiError> {
    let service = TarefaService::new(&state.db);
    let tarefas = service.get_all_tarefas().await?;
    Ok(Json(tarefas.into_iter().map(TarefaJson::from).collect()))
}

/// Handler for GET /tarefa/ObterPorTitulo - Substring search on the title.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tarefa/ObterPorTitulo",
    params(
        ("titulo" = String, Query, description = "Fragment the title must contain")
    ),
    responses(
        (status = 200, description = "Tarefas whose title contains the fragment", body = Vec<TarefaJson>),
        (status = 400, description = "Missing or blank search term", body = ErroResponse)
    ),
    tag = "Tarefa"
)]
pub async fn get_tarefas_by_titulo_handler(
    State(state): State<TarefaState>,
    Query(query): Query<ObterPorTituloQuery>,
) -> Result<Json<Vec<TarefaJson>>, TarefaApiError> {
    if query.titulo.trim().is_empty() {
        return Err(TarefaApiError::TituloVazio);
    }

    let service = TarefaService::new(&state.db);
    let tarefas = service.get_tarefas_by_titulo(&query.titulo).await?;
    Ok(Json(tarefas.into_iter().map(TarefaJson::from).collect()))
}

/// Handler for GET /tarefa/ObterPorData - Matches on the calendar date only.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tarefa/ObterPorData",
    params(
        ("data" = String, Query, description = "Date or date-time; time of day is ignored")
    ),
    responses(
        (status = 200, description = "Tarefas due on that calendar date", body = Vec<TarefaJson>),
        (status = 400, description = "Unparsable date")
    ),
    tag = "Tarefa"
)]
pub async fn get_tarefas_by_data_handler(
    State(state): State<TarefaState>,
    Query(query): Query<ObterPorDataQuery>,
) -> Result<Json<Vec<TarefaJson>>, TarefaApiError> {
    let service = TarefaService::new(&state.db);
    let tarefas = service.get_tarefas_by_data(query.data).await?;
    Ok(Json(tarefas.into_iter().map(TarefaJson::from).collect()))
}

/// Handler for GET /tarefa/ObterPorStatus - Exact status match.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tarefa/ObterPorStatus",
    params(
        ("status" = String, Query, description = "Status value (0, 1, Pendente or Finalizado)")
    ),
    responses(
        (status = 200, description = "Tarefas with the given status", body = Vec<TarefaJson>),
        (status = 400, description = "Unknown status value")
    ),
    tag = "Tarefa"
)]
pub async fn get_tarefas_by_status_handler(
    State(state): State<TarefaState>,
    Query(query): Query<ObterPorStatusQuery>,
) -> Result<Json<Vec<TarefaJson>>, TarefaApiError> {
    let service = TarefaService::new(&state.db);
    let tarefas = service.get_tarefas_by_status(query.status).await?;
    Ok(Json(tarefas.into_iter().map(TarefaJson::from).collect()))
}

/// Handler for POST /tarefa - Creates a tarefa and points at its canonical URL.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/tarefa",
    request_body = TarefaRequest,
    responses(
        (status = 201, description = "Tarefa created", body = TarefaJson,
            headers(("Location" = String, description = "URL of the created tarefa"))),
        (status = 400, description = "Missing body or empty date", body = ErroResponse)
    ),
    tag = "Tarefa"
)]
pub async fn create_tarefa_handler(
    State(state): State<TarefaState>,
    Json(payload): Json<TarefaRequest>,
) -> Result<impl IntoResponse, TarefaApiError> {
    let service = TarefaService::new(&state.db);
    let tarefa = service
        .create_tarefa(
            payload.titulo,
            payload.descricao,
            payload.data,
            payload.status,
        )
        .await?;

    let location = format!("/tarefa/{}", tarefa.id());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(TarefaJson::from(tarefa)),
    ))
}

/// Handler for PUT /tarefa/{id} - Overwrites all mutable fields of a tarefa.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    put,
    path = "/tarefa/{id}",
    params(
        ("id" = i32, Path, description = "Identifier of the tarefa")
    ),
    request_body = TarefaRequest,
    responses(
        (status = 200, description = "Tarefa updated", body = TarefaJson),
        (status = 400, description = "Empty date", body = ErroResponse),
        (status = 404, description = "No tarefa with the given id")
    ),
    tag = "Tarefa"
)]
pub async fn update_tarefa_handler(
    State(state): State<TarefaState>,
    Path(id): Path<i32>,
    Json(payload): Json<TarefaRequest>,
) -> Result<Json<TarefaJson>, TarefaApiError> {
    let service = TarefaService::new(&state.db);
    let tarefa = service
        .update_tarefa(
            id,
            payload.titulo,
            payload.descricao,
            payload.data,
            payload.status,
        )
        .await?;
    Ok(Json(TarefaJson::from(tarefa)))
}

/// Handler for DELETE /tarefa/{id} - Permanently removes a tarefa.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/tarefa/{id}",
    params(
        ("id" = i32, Path, description = "Identifier of the tarefa")
    ),
    responses(
        (status = 204, description = "Tarefa removed"),
        (status = 404, description = "No tarefa with the given id")
    ),
    tag = "Tarefa"
)]
pub async fn delete_tarefa_handler(
    State(state): State<TarefaState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, TarefaApiError> {
    let service = TarefaService::new(&state.db);
    service.delete_tarefa(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates the tarefa API router.
pub fn create_api_router(state: TarefaState) -> Router {
    Router::new()
        .route("/tarefa", post(create_tarefa_handler))
        .route("/tarefa/ObterTodos", get(get_all_tarefas_handler))
        .route("/tarefa/ObterPorTitulo", get(get_tarefas_by_titulo_handler))
        .route("/tarefa/ObterPorData", get(get_tarefas_by_data_handler))
        .route("/tarefa/ObterPorStatus", get(get_tarefas_by_status_handler))
        .route(
            "/tarefa/{id}",
            get(get_tarefa_by_id_handler)
                .put(update_tarefa_handler)
                .delete(delete_tarefa_handler),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erro_response_uses_capitalized_key() {
        let body = serde_json::to_value(ErroResponse::new("mensagem".to_string())).unwrap();
        assert_eq!(body, serde_json::json!({"Erro": "mensagem"}));
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = TarefaApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn empty_date_maps_to_400() {
        let response = TarefaApiError::DataVazia.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn blank_title_maps_to_400() {
        let response = TarefaApiError::TituloVazio.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn data_query_accepts_date_time() {
        let query: ObterPorDataQuery =
            serde_json::from_value(serde_json::json!({"data": "2024-05-01T08:30:00"})).unwrap();
        assert_eq!(query.data, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn data_query_accepts_bare_date() {
        let query: ObterPorDataQuery =
            serde_json::from_value(serde_json::json!({"data": "2024-05-01"})).unwrap();
        assert_eq!(query.data, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn data_query_rejects_garbage() {
        let result: Result<ObterPorDataQuery, _> =
            serde_json::from_value(serde_json::json!({"data": "amanhã"}));
        assert!(result.is_err());
    }

    #[test]
    fn request_without_data_binds_the_sentinel() {
        let payload: TarefaRequest =
            serde_json::from_value(serde_json::json!({"titulo": "Sem data", "status": 0})).unwrap();
        assert_eq!(payload.data, DATA_VAZIA);
    }
}
