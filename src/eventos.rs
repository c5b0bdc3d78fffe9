//! # Eventos
//!
//! Movement events recorded against a motorcycle: departures, arrivals,
//! maintenance and the like.
//!
//! Events are listed by calendar day. A filter's `dataInicio` and `dataFim`
//! are dates, expanded to cover the whole of each day before they are
//! compared with an event's timestamp.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::motos::Moto;
use crate::page::{Page, PageRequest, Sort};
use crate::provider::{EntityStore, Provider};
use crate::query::{Criterion, FieldPath, Fields, Filter, Value, day_range};
use crate::service::{ensure, find, resolve, search};
use crate::store::{Entity, Reference};
use crate::Result;

/// A movement event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Evento {
    /// Identifier assigned by the store.
    pub id: Option<i64>,

    /// Motorcycle the event happened to.
    pub moto_id: i64,

    /// Kind of event, such as `Saída` or `Entrada`.
    pub tipo: String,

    /// Reason for the event.
    pub motivo: String,

    /// When the event happened.
    pub data_hora: Option<NaiveDateTime>,

    /// Where the event happened, such as a yard name or address.
    pub localizacao: Option<String>,
}

impl Fields for Evento {
    fn value(&self, field: &FieldPath) -> Option<Value> {
        match field {
            FieldPath::Field("id") => self.id.map(Value::Int),
            FieldPath::Field("tipo") => Some(Value::from(self.tipo.as_str())),
            FieldPath::Field("motivo") => Some(Value::from(self.motivo.as_str())),
            FieldPath::Field("data_hora") => self.data_hora.map(Value::Timestamp),
            FieldPath::Field("localizacao") => self.localizacao.as_deref().map(Value::from),
            FieldPath::Relation {
                relation: "moto",
                field: "id",
            } => Some(Value::Int(self.moto_id)),
            _ => None,
        }
    }
}

impl Entity for Evento {
    type Filter = EventoFilter;

    const COLLECTION: &'static str = "eventos";
    const NAME: &'static str = "Evento";
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("tipo", "tipo"),
        ("motivo", "motivo"),
        ("dataHora", "data_hora"),
        ("localizacao", "localizacao"),
    ];

    fn default_sort() -> Sort {
        Sort::desc("dataHora")
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

/// Criteria for listing events.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventoFilter {
    /// Exact id.
    pub id: Option<i64>,

    /// Motorcycle the event happened to.
    pub moto_id: Option<i64>,

    /// Kind of event, ignoring case.
    pub tipo: Option<String>,

    /// Substring of the reason, ignoring case.
    pub motivo: Option<String>,

    /// Substring of the location, ignoring case.
    pub localizacao: Option<String>,

    /// First day of the period, inclusive.
    pub data_inicio: Option<NaiveDate>,

    /// Last day of the period, inclusive.
    pub data_fim: Option<NaiveDate>,
}

impl Filter for EventoFilter {
    const CRITERIA: &'static [Criterion<Self>] = &[
        Criterion::Equals("id", |f: &Self| f.id.map(Value::Int)),
        Criterion::RelationEquals("moto", "id", |f: &Self| f.moto_id.map(Value::Int)),
        Criterion::EqualsIgnoreCase("tipo", |f: &Self| f.tipo.as_deref()),
        Criterion::ContainsIgnoreCase("motivo", |f: &Self| f.motivo.as_deref()),
        Criterion::ContainsIgnoreCase("localizacao", |f: &Self| f.localizacao.as_deref()),
        Criterion::Range("data_hora", |f: &Self| day_range(f.data_inicio, f.data_fim)),
    ];
}

/// Fields accepted when recording or updating an event.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct EventoRequest {
    pub moto_id: i64,
    pub tipo: String,
    pub motivo: String,

    /// When the event happened, as `dd/MM/yyyy HH:mm`.
    #[serde(default, with = "crate::serde::form_datetime")]
    pub data_hora: Option<NaiveDateTime>,
    pub localizacao: Option<String>,
}

impl From<EventoRequest> for Evento {
    fn from(request: EventoRequest) -> Self {
        Self {
            id: None,
            moto_id: request.moto_id,
            tipo: request.tipo,
            motivo: request.motivo,
            data_hora: request.data_hora,
            localizacao: request.localizacao,
        }
    }
}

/// An event as returned to callers, carrying the motorcycle's plate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct EventoResponse {
    pub id: i64,
    pub moto_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moto_placa: Option<String>,
    pub tipo: String,
    pub motivo: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::serde::form_datetime"
    )]
    pub data_hora: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localizacao: Option<String>,
}

impl From<Evento> for EventoResponse {
    fn from(evento: Evento) -> Self {
        Self {
            id: evento.id.unwrap_or_default(),
            moto_id: evento.moto_id,
            moto_placa: None,
            tipo: evento.tipo,
            motivo: evento.motivo,
            data_hora: evento.data_hora,
            localizacao: evento.localizacao,
        }
    }
}

impl EventoResponse {
    fn with_placa(evento: Evento, moto: &Moto) -> Self {
        Self {
            moto_placa: Some(moto.placa.clone()),
            ..Self::from(evento)
        }
    }
}

/// Record an event.
///
/// # Errors
///
/// Returns `RelatedNotFound` when the motorcycle does not exist, or an error
/// when the store refuses the write.
pub async fn create(request: EventoRequest, provider: &impl Provider) -> Result<EventoResponse> {
    let moto = resolve::<Moto>(request.moto_id, provider).await?;
    let evento = provider.put(Evento::from(request)).await?;
    tracing::info!(id = ?evento.id, moto_id = evento.moto_id, tipo = %evento.tipo, "Evento created");
    Ok(EventoResponse::with_placa(evento, &moto))
}

/// Replace an event's details.
///
/// # Errors
///
/// Returns `NotFound` when no event has the id, `RelatedNotFound` when the
/// motorcycle does not exist, or an error when the store refuses the write.
pub async fn update(
    id: i64, request: EventoRequest, provider: &impl Provider,
) -> Result<EventoResponse> {
    find::<Evento>(id, provider).await?;
    let moto = resolve::<Moto>(request.moto_id, provider).await?;

    let mut evento = Evento::from(request);
    evento.set_id(id);
    let evento = provider.put(evento).await?;
    tracing::info!(id, "Evento updated");
    Ok(EventoResponse::with_placa(evento, &moto))
}

/// Fetch an event.
///
/// # Errors
///
/// Returns `NotFound` when no event has the id.
pub async fn get(id: i64, provider: &impl Provider) -> Result<EventoResponse> {
    let evento = find::<Evento>(id, provider).await?;
    Ok(Placas::default().response(evento, provider).await?)
}

/// Remove an event.
///
/// # Errors
///
/// Returns `NotFound` when no event has the id, or an error when the store
/// refuses the delete.
pub async fn delete(id: i64, provider: &impl Provider) -> Result<()> {
    ensure::<Evento>(id, provider).await?;
    provider.delete::<Evento>(id).await?;
    tracing::info!(id, "Evento deleted");
    Ok(())
}

/// List one page of events matching a filter.
///
/// # Errors
///
/// Returns an error when the page's sort field is not sortable or the store
/// fails.
pub async fn query(
    filter: Option<&EventoFilter>, request: &PageRequest, provider: &impl Provider,
) -> Result<Page<EventoResponse>> {
    let page = search::<Evento>(filter, request, provider).await?;

    let mut placas = Placas::default();
    let mut items = Vec::with_capacity(page.items.len());
    for evento in page.items {
        items.push(placas.response(evento, provider).await?);
    }

    Ok(Page {
        items,
        total: page.total,
        page: page.page,
        size: page.size,
    })
}

// Plates looked up while building responses, by motorcycle id.
#[derive(Default)]
struct Placas(BTreeMap<i64, Option<String>>);

impl Placas {
    async fn response(
        &mut self, evento: Evento, store: &impl EntityStore,
    ) -> anyhow::Result<EventoResponse> {
        let placa = if let Some(placa) = self.0.get(&evento.moto_id) {
            placa.clone()
        } else {
            let placa = store.get::<Moto>(evento.moto_id).await?.map(|moto| moto.placa);
            self.0.insert(evento.moto_id, placa.clone());
            placa
        };
        Ok(EventoResponse {
            moto_placa: placa,
            ..EventoResponse::from(evento)
        })
    }
}
