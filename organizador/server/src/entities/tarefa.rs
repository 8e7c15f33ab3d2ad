use sea_orm::ActiveEnum;
use sea_orm::entity::prelude::*;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tarefa")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub titulo: String,
    pub descricao: Option<String>,
    pub data: DateTime,
    pub status: StatusTarefa,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Status of a tarefa, stored as its numeric value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, ToSchema)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum StatusTarefa {
    #[default]
    #[sea_orm(num_value = 0)]
    Pendente,
    #[sea_orm(num_value = 1)]
    Finalizado,
}

impl StatusTarefa {
    fn from_num(value: i64) -> Option<Self> {
        match value {
            0 => Some(StatusTarefa::Pendente),
            1 => Some(StatusTarefa::Finalizado),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("Pendente") {
            Some(StatusTarefa::Pendente)
        } else if name.eq_ignore_ascii_case("Finalizado") {
            Some(StatusTarefa::Finalizado)
        } else {
            None
        }
    }
}

impl Serialize for StatusTarefa {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(self.to_value())
    }
}

/// Accepts the numeric value, the numeric value as a string (query strings
/// deliver numbers that way), or the member name.
impl<'de> Deserialize<'de> for StatusTarefa {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StatusVisitor;

        impl Visitor<'_> for StatusVisitor {
            type Value = StatusTarefa;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("0, 1, \"Pendente\" or \"Finalizado\"")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                StatusTarefa::from_num(value)
                    .ok_or_else(|| E::custom(format!("invalid tarefa status: {value}")))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let value = i64::try_from(value).map_err(E::custom)?;
                self.visit_i64(value)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if let Some(status) = StatusTarefa::from_name(value) {
                    return Ok(status);
                }
                let value: i64 = value
                    .parse()
                    .map_err(|_| E::custom(format!("invalid tarefa status: {value:?}")))?;
                self.visit_i64(value)
            }
        }

        deserializer.deserialize_any(StatusVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_numeric_value() {
        assert_eq!(
            serde_json::to_value(StatusTarefa::Pendente).unwrap(),
            serde_json::json!(0)
        );
        assert_eq!(
            serde_json::to_value(StatusTarefa::Finalizado).unwrap(),
            serde_json::json!(1)
        );
    }

    #[test]
    fn status_deserializes_from_number() {
        let status: StatusTarefa = serde_json::from_value(serde_json::json!(1)).unwrap();
        assert_eq!(status, StatusTarefa::Finalizado);
    }

    #[test]
    fn status_deserializes_from_member_name() {
        let status: StatusTarefa = serde_json::from_value(serde_json::json!("Pendente")).unwrap();
        assert_eq!(status, StatusTarefa::Pendente);

        let status: StatusTarefa = serde_json::from_value(serde_json::json!("finalizado")).unwrap();
        assert_eq!(status, StatusTarefa::Finalizado);
    }

    #[test]
    fn status_deserializes_from_numeric_string() {
        let status: StatusTarefa = serde_json::from_value(serde_json::json!("1")).unwrap();
        assert_eq!(status, StatusTarefa::Finalizado);
    }

    #[test]
    fn status_rejects_unknown_values() {
        assert!(serde_json::from_value::<StatusTarefa>(serde_json::json!(7)).is_err());
        assert!(serde_json::from_value::<StatusTarefa>(serde_json::json!("Cancelado")).is_err());
    }
}
