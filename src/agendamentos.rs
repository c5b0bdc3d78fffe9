//! # Agendamentos
//!
//! Maintenance and other visits scheduled for a motorcycle.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::motos::Moto;
use crate::page::{Page, PageRequest, Sort};
use crate::provider::Provider;
use crate::query::{Criterion, FieldPath, Fields, Filter, Value};
use crate::service::{ensure, find, resolve, search};
use crate::store::{Entity, Reference};
use crate::{Range, Result, bad_request};

/// A scheduled visit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Agendamento {
    /// Identifier assigned by the store.
    pub id: Option<i64>,

    /// Motorcycle the visit is for.
    pub moto_id: i64,

    /// When the visit is scheduled.
    pub data_agendada: Option<NaiveDateTime>,

    /// What the visit is for.
    pub descricao: String,
}

impl Fields for Agendamento {
    fn value(&self, field: &FieldPath) -> Option<Value> {
        match field {
            FieldPath::Field("id") => self.id.map(Value::Int),
            FieldPath::Field("data_agendada") => self.data_agendada.map(Value::Timestamp),
            FieldPath::Field("descricao") => Some(Value::from(self.descricao.as_str())),
            FieldPath::Relation {
                relation: "moto",
                field: "id",
            } => Some(Value::Int(self.moto_id)),
            _ => None,
        }
    }
}

impl Entity for Agendamento {
    type Filter = AgendamentoFilter;

    const COLLECTION: &'static str = "agendamentos";
    const NAME: &'static str = "Agendamento";
    const SORTABLE: &'static [(&'static str, &'static str)] =
        &[("id", "id"), ("dataAgendada", "data_agendada"), ("descricao", "descricao")];

    fn default_sort() -> Sort {
        Sort::asc("id")
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn references(&self) -> Vec<Reference> {
        vec![Reference {
            collection: Moto::COLLECTION,
            id: self.moto_id,
        }]
    }
}

/// Criteria for listing scheduled visits.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgendamentoFilter {
    /// Exact id.
    pub id: Option<i64>,

    /// Motorcycle the visit is for.
    #[serde(alias = "idMoto")]
    pub moto_id: Option<i64>,

    /// Substring of the description, ignoring case.
    pub descricao: Option<String>,

    /// Earliest scheduled time, inclusive.
    pub data_inicial: Option<NaiveDateTime>,

    /// Latest scheduled time, inclusive.
    pub data_final: Option<NaiveDateTime>,
}

impl Filter for AgendamentoFilter {
    const CRITERIA: &'static [Criterion<Self>] = &[
        Criterion::Equals("id", |f: &Self| f.id.map(Value::Int)),
        Criterion::RelationEquals("moto", "id", |f: &Self| f.moto_id.map(Value::Int)),
        Criterion::ContainsIgnoreCase("descricao", |f: &Self| f.descricao.as_deref()),
        Criterion::Range("data_agendada", |f: &Self| {
            Range::between(f.data_inicial.map(Value::Timestamp), f.data_final.map(Value::Timestamp))
        }),
    ];
}

/// Fields accepted when scheduling or rescheduling a visit.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct AgendamentoRequest {
    pub moto_id: i64,

    /// When the visit is scheduled. Must not be in the past.
    pub data_agendada: Option<NaiveDateTime>,
    pub descricao: String,
}

impl AgendamentoRequest {
    fn check(&self, now: NaiveDateTime) -> Result<()> {
        match self.data_agendada {
            Some(data_agendada) if data_agendada < now => {
                Err(bad_request!("scheduled time {data_agendada} is in the past"))
            }
            _ => Ok(()),
        }
    }
}

impl From<AgendamentoRequest> for Agendamento {
    fn from(request: AgendamentoRequest) -> Self {
        Self {
            id: None,
            moto_id: request.moto_id,
            data_agendada: request.data_agendada,
            descricao: request.descricao,
        }
    }
}

/// A scheduled visit as returned to callers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct AgendamentoResponse {
    pub id: i64,
    pub moto_id: i64,
    pub data_agendada: Option<NaiveDateTime>,
    pub descricao: String,
}

impl From<Agendamento> for AgendamentoResponse {
    fn from(agendamento: Agendamento) -> Self {
        Self {
            id: agendamento.id.unwrap_or_default(),
            moto_id: agendamento.moto_id,
            data_agendada: agendamento.data_agendada,
            descricao: agendamento.descricao,
        }
    }
}

/// Schedule a visit.
///
/// # Errors
///
/// Returns `BadRequest` when the scheduled time is in the past,
/// `RelatedNotFound` when the motorcycle does not exist, or an error when
/// the store refuses the write.
pub async fn create(
    request: AgendamentoRequest, provider: &impl Provider,
) -> Result<AgendamentoResponse> {
    request.check(Local::now().naive_local())?;
    resolve::<Moto>(request.moto_id, provider).await?;

    let agendamento = provider.put(Agendamento::from(request)).await?;
    tracing::info!(id = ?agendamento.id, moto_id = agendamento.moto_id, "Agendamento created");
    Ok(agendamento.into())
}

/// Reschedule or otherwise replace a visit's details.
///
/// # Errors
///
/// Returns `NotFound` when no visit has the id, `BadRequest` when the
/// scheduled time is in the past, `RelatedNotFound` when the motorcycle does
/// not exist, or an error when the store refuses the write.
pub async fn update(
    id: i64, request: AgendamentoRequest, provider: &impl Provider,
) -> Result<AgendamentoResponse> {
    find::<Agendamento>(id, provider).await?;
    request.check(Local::now().naive_local())?;
    resolve::<Moto>(request.moto_id, provider).await?;

    let mut agendamento = Agendamento::from(request);
    agendamento.set_id(id);
    let agendamento = provider.put(agendamento).await?;
    tracing::info!(id, "Agendamento updated");
    Ok(agendamento.into())
}

/// Fetch a scheduled visit.
///
/// # Errors
///
/// Returns `NotFound` when no visit has the id.
pub async fn get(id: i64, provider: &impl Provider) -> Result<AgendamentoResponse> {
    Ok(find::<Agendamento>(id, provider).await?.into())
}

/// Cancel a scheduled visit.
///
/// # Errors
///
/// Returns `NotFound` when no visit has the id, or an error when the store
/// refuses the delete.
pub async fn delete(id: i64, provider: &impl Provider) -> Result<()> {
    ensure::<Agendamento>(id, provider).await?;
    provider.delete::<Agendamento>(id).await?;
    tracing::info!(id, "Agendamento deleted");
    Ok(())
}

/// List one page of scheduled visits matching a filter.
///
/// # Errors
///
/// Returns an error when the page's sort field is not sortable or the store
/// fails.
pub async fn query(
    filter: Option<&AgendamentoFilter>, request: &PageRequest, provider: &impl Provider,
) -> Result<Page<AgendamentoResponse>> {
    let page = search::<Agendamento>(filter, request, provider).await?;
    Ok(page.map(AgendamentoResponse::from))
}
