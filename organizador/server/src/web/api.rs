use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::tarefa::api::{ErroResponse, TarefaJson, TarefaRequest};
use crate::tarefa::{self, TarefaState};

/// OpenAPI document covering the tarefa endpoints.
#[derive(OpenApi)]
#[openapi(
    paths(
        tarefa::api::get_tarefa_by_id_handler,
        tarefa::api::get_all_tarefas_handler,
        tarefa::api::get_tarefas_by_titulo_handler,
        tarefa::api::get_tarefas_by_data_handler,
        tarefa::api::get_tarefas_by_status_handler,
        tarefa::api::create_tarefa_handler,
        tarefa::api::update_tarefa_handler,
        tarefa::api::delete_tarefa_handler,
    ),
    components(schemas(TarefaJson, TarefaRequest, ErroResponse, tarefa::StatusTarefa)),
    tags(
        (name = "Tarefa", description = "Task management endpoints")
    )
)]
pub struct ApiDoc;

/// Creates the HTTP API surface: the tarefa routes plus the Swagger UI.
pub fn create_api_router(state: TarefaState) -> Router {
    Router::new()
        .merge(tarefa::api::create_api_router(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
