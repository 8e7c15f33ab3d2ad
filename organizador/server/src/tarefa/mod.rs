use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sea_orm::*;

use crate::entities::*;

pub mod api;

pub use crate::entities::tarefa::StatusTarefa;

/// Date-time value the API treats as "no date provided".
///
/// Inherited convention: a tarefa whose date genuinely is the minimum
/// representable date-time cannot be told apart from one with no date.
pub const DATA_VAZIA: NaiveDateTime = NaiveDateTime::MIN;

#[derive(Debug, PartialEq, Clone)]
pub struct Tarefa {
    id: i32,
    titulo: String,
    descricao: Option<String>,
    data: NaiveDateTime,
    status: StatusTarefa,
}

impl Tarefa {
    pub fn new(
        id: i32,
        titulo: String,
        descricao: Option<String>,
        data: NaiveDateTime,
        status: StatusTarefa,
    ) -> Self {
        Self {
            id,
            titulo,
            descricao,
            data,
            status,
        }
    }

    /// Returns the ID of the tarefa.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Returns the title.
    pub fn titulo(&self) -> &str {
        &self.titulo
    }

    /// Returns the description, if one was provided.
    pub fn descricao(&self) -> Option<&str> {
        self.descricao.as_deref()
    }

    /// Returns the due date.
    pub fn data(&self) -> NaiveDateTime {
        self.data
    }

    /// Returns the status.
    pub fn status(&self) -> StatusTarefa {
        self.status
    }
}

impl From<tarefa::Model> for Tarefa {
    fn from(model: tarefa::Model) -> Self {
        Tarefa::new(
            model.id,
            model.titulo,
            model.descricao,
            model.data,
            model.status,
        )
    }
}

/// Error type for TarefaService operations.
#[derive(Debug, thiserror::Error)]
pub enum TarefaServiceError {
    /// Represents a tarefa not found error.
    #[error("Tarefa with ID {0} not found")]
    TarefaNotFound(i32),
    /// The submitted date equals the "no date provided" sentinel.
    #[error("A data da tarefa não pode ser vazia")]
    DataVazia,
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Shared state handed to the tarefa routers.
#[derive(Clone)]
pub struct TarefaState {
    pub db: Arc<DatabaseConnection>,
}

pub struct TarefaService<'a> {
    db: &'a DatabaseConnection,
}

impl TarefaService<'_> {
    pub fn new(db: &DatabaseConnection) -> TarefaService {
        TarefaService { db }
    }

    /// Retrieves a tarefa by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the tarefa to retrieve.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Tarefa` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn get_tarefa_by_id(&self, id: i32) -> Result<Tarefa, TarefaServiceError> {
        let tarefa_model = tarefa::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TarefaServiceError::TarefaNotFound(id))?;
        Ok(Tarefa::from(tarefa_model))
    }

    /// Retrieves all tarefas, in store-default order.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_tarefas(&self) -> Result<Vec<Tarefa>, TarefaServiceError> {
        let tarefas = tarefa::Entity::find()
            .all(self.db)
            .await?
            .into_iter()
            .map(Tarefa::from)
            .collect();
        Ok(tarefas)
    }

    /// Retrieves every tarefa whose title contains the given fragment.
    ///
    /// Case-sensitivity follows the store collation.
    #[tracing::instrument(skip(self))]
    pub async fn get_tarefas_by_titulo(
        &self,
        titulo: &str,
    ) -> Result<Vec<Tarefa>, TarefaServiceError> {
        let tarefas = tarefa::Entity::find()
            .filter(tarefa::Column::Titulo.contains(titulo))
            .all(self.db)
            .await?
            .into_iter()
            .map(Tarefa::from)
            .collect();
        Ok(tarefas)
    }

    /// Retrieves every tarefa whose due date falls on the given calendar day,
    /// regardless of time of day.
    #[tracing::instrument(skip(self))]
    pub async fn get_tarefas_by_data(
        &self,
        data: NaiveDate,
    ) -> Result<Vec<Tarefa>, TarefaServiceError> {
        let inicio = data.and_time(NaiveTime::MIN);
        let mut query = tarefa::Entity::find().filter(tarefa::Column::Data.gte(inicio));
        if let Some(dia_seguinte) = data.succ_opt() {
            query = query.filter(tarefa::Column::Data.lt(dia_seguinte.and_time(NaiveTime::MIN)));
        }
        let tarefas = query
            .all(self.db)
            .await?
            .into_iter()
            .map(Tarefa::from)
            .collect();
        Ok(tarefas)
    }

    /// Retrieves every tarefa with the given status.
    #[tracing::instrument(skip(self))]
    pub async fn get_tarefas_by_status(
        &self,
        status: StatusTarefa,
    ) -> Result<Vec<Tarefa>, TarefaServiceError> {
        let tarefas = tarefa::Entity::find()
            .filter(tarefa::Column::Status.eq(status))
            .all(self.db)
            .await?
            .into_iter()
            .map(Tarefa::from)
            .collect();
        Ok(tarefas)
    }

    /// Creates a new tarefa in the database.
    ///
    /// # Arguments
    ///
    /// * `titulo` - The title of the tarefa.
    /// * `descricao` - An optional free-form description.
    /// * `data` - The due date; must not be the [`DATA_VAZIA`] sentinel.
    /// * `status` - The initial status.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `Tarefa` (with its store-assigned ID)
    /// if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn create_tarefa(
        &self,
        titulo: String,
        descricao: Option<String>,
        data: NaiveDateTime,
        status: StatusTarefa,
    ) -> Result<Tarefa, TarefaServiceError> {
        if data == DATA_VAZIA {
            return Err(TarefaServiceError::DataVazia);
        }

        let active_model = tarefa::ActiveModel {
            titulo: ActiveValue::Set(titulo),
            descricao: ActiveValue::Set(descricao),
            data: ActiveValue::Set(data),
            status: ActiveValue::Set(status),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(Tarefa::from(created_model))
    }

    /// Overwrites all four mutable fields of an existing tarefa.
    ///
    /// The lookup happens first, so an unknown ID wins over an invalid date.
    /// The ID itself never changes.
    #[tracing::instrument(skip(self))]
    pub async fn update_tarefa(
        &self,
        id: i32,
        titulo: String,
        descricao: Option<String>,
        data: NaiveDateTime,
        status: StatusTarefa,
    ) -> Result<Tarefa, TarefaServiceError> {
        let tarefa_to_update = tarefa::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TarefaServiceError::TarefaNotFound(id))?;

        if data == DATA_VAZIA {
            return Err(TarefaServiceError::DataVazia);
        }

        let mut active_model: tarefa::ActiveModel = tarefa_to_update.into();
        active_model.titulo = ActiveValue::Set(titulo);
        active_model.descricao = ActiveValue::Set(descricao);
        active_model.data = ActiveValue::Set(data);
        active_model.status = ActiveValue::Set(status);
        let updated_model = active_model.update(self.db).await?;

        Ok(Tarefa::from(updated_model))
    }

    /// Deletes a tarefa by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the tarefa to delete.
    ///
    /// # Returns
    ///
    /// A `Result` containing the removed `Tarefa` if successful, or an error
    /// otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn delete_tarefa(&self, id: i32) -> Result<Tarefa, TarefaServiceError> {
        let tarefa_to_delete = tarefa::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TarefaServiceError::TarefaNotFound(id))?;

        let removed = Tarefa::from(tarefa_to_delete);
        tarefa::Entity::delete_by_id(id).exec(self.db).await?;
        Ok(removed)
    }
}
