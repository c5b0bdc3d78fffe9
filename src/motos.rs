//! # Motos
//!
//! Motorcycles registered in the fleet. A motorcycle may belong to a branch
//! ([`Filial`]); the branch is checked on every write.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::filiais::Filial;
use crate::page::{Page, PageRequest, Sort};
use crate::provider::Provider;
use crate::query::{Criterion, FieldPath, Fields, Filter, Value};
use crate::service::{ensure, find, resolve, search};
use crate::store::{Entity, Reference};
use crate::{Range, Result};

/// A motorcycle.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Moto {
    /// Identifier assigned by the store.
    pub id: Option<i64>,

    /// Licence plate, unique across the fleet.
    pub placa: String,

    /// Model, such as `CG 160`.
    pub modelo: String,

    /// Manufacturer.
    pub marca: String,

    /// Model year.
    pub ano: i32,

    /// Operational status, such as `ATIVA` or `MANUTENCAO`.
    pub status: String,

    /// Branch the motorcycle belongs to.
    pub filial_id: Option<i64>,

    /// Last known latitude.
    pub latitude: Option<f64>,

    /// Last known longitude.
    pub longitude: Option<f64>,

    /// When the motorcycle was registered. Set once, on creation.
    pub data_criacao: Option<NaiveDateTime>,
}

impl Fields for Moto {
    fn value(&self, field: &FieldPath) -> Option<Value> {
        match field {
            FieldPath::Field("id") => self.id.map(Value::Int),
            FieldPath::Field("placa") => Some(Value::from(self.placa.as_str())),
            FieldPath::Field("modelo") => Some(Value::from(self.modelo.as_str())),
            FieldPath::Field("marca") => Some(Value::from(self.marca.as_str())),
            FieldPath::Field("ano") => Some(Value::from(self.ano)),
            FieldPath::Field("status") => Some(Value::from(self.status.as_str())),
            FieldPath::Field("data_criacao") => self.data_criacao.map(Value::Timestamp),
            FieldPath::Relation {
                relation: "filial",
                field: "id",
            } => self.filial_id.map(Value::Int),
            _ => None,
        }
    }
}

impl Entity for Moto {
    type Filter = MotoFilter;

    const COLLECTION: &'static str = "motos";
    const NAME: &'static str = "Moto";
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("placa", "placa"),
        ("modelo", "modelo"),
        ("marca", "marca"),
        ("ano", "ano"),
        ("status", "status"),
        ("dataCriacao", "data_criacao"),
    ];

    fn default_sort() -> Sort {
        Sort::asc("placa")
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn unique_keys(&self) -> Vec<(&'static str, Value)> {
        vec![("placa", Value::from(self.placa.as_str()))]
    }

    fn references(&self) -> Vec<Reference> {
        self.filial_id
            .map(|id| Reference {
                collection: Filial::COLLECTION,
                id,
            })
            .into_iter()
            .collect()
    }
}

/// Criteria for listing motorcycles.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MotoFilter {
    /// Exact id.
    pub id: Option<i64>,

    /// Substring of the plate, ignoring case.
    pub placa: Option<String>,

    /// Substring of the model, ignoring case.
    pub modelo: Option<String>,

    /// Substring of the manufacturer, ignoring case.
    pub marca: Option<String>,

    /// Status, ignoring case.
    pub status: Option<String>,

    /// Earliest model year, inclusive.
    pub ano_min: Option<i32>,

    /// Latest model year, inclusive.
    pub ano_max: Option<i32>,

    /// Earliest registration time, inclusive.
    pub data_criacao_inicio: Option<NaiveDateTime>,

    /// Latest registration time, inclusive.
    pub data_criacao_fim: Option<NaiveDateTime>,

    /// Branch the motorcycle belongs to.
    pub filial_id: Option<i64>,
}

impl Filter for MotoFilter {
    const CRITERIA: &'static [Criterion<Self>] = &[
        Criterion::Equals("id", |f: &Self| f.id.map(Value::Int)),
        Criterion::ContainsIgnoreCase("placa", |f: &Self| f.placa.as_deref()),
        Criterion::ContainsIgnoreCase("modelo", |f: &Self| f.modelo.as_deref()),
        Criterion::ContainsIgnoreCase("marca", |f: &Self| f.marca.as_deref()),
        Criterion::EqualsIgnoreCase("status", |f: &Self| f.status.as_deref()),
        Criterion::Range("ano", |f: &Self| {
            Range::between(f.ano_min.map(Value::from), f.ano_max.map(Value::from))
        }),
        Criterion::Range("data_criacao", |f: &Self| {
            Range::between(
                f.data_criacao_inicio.map(Value::Timestamp),
                f.data_criacao_fim.map(Value::Timestamp),
            )
        }),
        Criterion::RelationEquals("filial", "id", |f: &Self| f.filial_id.map(Value::Int)),
    ];
}

/// Fields accepted when registering or updating a motorcycle.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct MotoRequest {
    pub placa: String,
    pub modelo: String,
    pub marca: String,
    pub ano: i32,
    pub status: String,

    /// Branch to link the motorcycle to. Absent on update unlinks it.
    pub filial_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<MotoRequest> for Moto {
    fn from(request: MotoRequest) -> Self {
        Self {
            id: None,
            placa: request.placa,
            modelo: request.modelo,
            marca: request.marca,
            ano: request.ano,
            status: request.status,
            filial_id: request.filial_id,
            latitude: request.latitude,
            longitude: request.longitude,
            data_criacao: None,
        }
    }
}

/// A motorcycle as returned to callers.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct MotoResponse {
    pub id: i64,
    pub placa: String,
    pub modelo: String,
    pub marca: String,
    pub ano: i32,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filial_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_criacao: Option<NaiveDateTime>,
}

impl From<Moto> for MotoResponse {
    fn from(moto: Moto) -> Self {
        Self {
            id: moto.id.unwrap_or_default(),
            placa: moto.placa,
            modelo: moto.modelo,
            marca: moto.marca,
            ano: moto.ano,
            status: moto.status,
            filial_id: moto.filial_id,
            latitude: moto.latitude,
            longitude: moto.longitude,
            data_criacao: moto.data_criacao,
        }
    }
}

/// Register a motorcycle.
///
/// # Errors
///
/// Returns `RelatedNotFound` when the requested branch does not exist, or an
/// error when the store refuses the write (for example, a duplicate plate).
pub async fn create(request: MotoRequest, provider: &impl Provider) -> Result<MotoResponse> {
    if let Some(filial_id) = request.filial_id {
        resolve::<Filial>(filial_id, provider).await?;
    }

    let mut moto = Moto::from(request);
    moto.data_criacao = Some(Local::now().naive_local());
    let moto = provider.put(moto).await?;

    tracing::info!(id = ?moto.id, placa = %moto.placa, "Moto created");
    Ok(moto.into())
}

/// Replace a motorcycle's details.
///
/// The branch link follows the request: a request without a branch unlinks
/// the motorcycle. The registration time is kept.
///
/// # Errors
///
/// Returns `NotFound` when no motorcycle has the id, `RelatedNotFound` when
/// the requested branch does not exist, or an error when the store refuses
/// the write.
pub async fn update(id: i64, request: MotoRequest, provider: &impl Provider) -> Result<MotoResponse> {
    let existing = find::<Moto>(id, provider).await?;
    if let Some(filial_id) = request.filial_id {
        resolve::<Filial>(filial_id, provider).await?;
    }

    let mut moto = Moto::from(request);
    moto.set_id(id);
    moto.data_criacao = existing.data_criacao;
    let moto = provider.put(moto).await?;

    tracing::info!(id, filial_id = ?moto.filial_id, "Moto updated");
    Ok(moto.into())
}

/// Fetch a motorcycle.
///
/// # Errors
///
/// Returns `NotFound` when no motorcycle has the id.
pub async fn get(id: i64, provider: &impl Provider) -> Result<MotoResponse> {
    Ok(find::<Moto>(id, provider).await?.into())
}

/// Remove a motorcycle.
///
/// # Errors
///
/// Returns `NotFound` when no motorcycle has the id, or an error when the
/// store refuses the delete, for example because events still refer to it.
pub async fn delete(id: i64, provider: &impl Provider) -> Result<()> {
    ensure::<Moto>(id, provider).await?;
    provider.delete::<Moto>(id).await?;
    tracing::info!(id, "Moto deleted");
    Ok(())
}

/// List one page of motorcycles matching a filter.
///
/// # Errors
///
/// Returns an error when the page's sort field is not sortable or the store
/// fails.
pub async fn query(
    filter: Option<&MotoFilter>, request: &PageRequest, provider: &impl Provider,
) -> Result<Page<MotoResponse>> {
    let page = search::<Moto>(filter, request, provider).await?;
    Ok(page.map(MotoResponse::from))
}
