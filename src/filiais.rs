//! # Filiais
//!
//! Branches (filiais) operating fleets of motorcycles, each with an optional
//! geofence.

use serde::{Deserialize, Serialize};

use crate::page::{Page, PageRequest, Sort};
use crate::provider::Provider;
use crate::query::{Criterion, Fields, FieldPath, Filter, Value};
use crate::service::{ensure, find, search};
use crate::store::Entity;
use crate::Result;

/// A branch.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Filial {
    /// Identifier assigned by the store.
    pub id: Option<i64>,

    /// Branch name.
    pub nome: String,

    /// Street address.
    pub endereco: Option<String>,

    /// Neighbourhood.
    pub bairro: Option<String>,

    /// City.
    pub cidade: Option<String>,

    /// State.
    pub estado: Option<String>,

    /// Postal code.
    pub cep: Option<String>,

    /// Latitude of the geofence centre.
    pub latitude: Option<f64>,

    /// Longitude of the geofence centre.
    pub longitude: Option<f64>,

    /// Geofence radius, in metres.
    pub raio_geofence_metros: Option<f64>,
}

impl Fields for Filial {
    fn value(&self, field: &FieldPath) -> Option<Value> {
        match field {
            FieldPath::Field("id") => self.id.map(Value::Int),
            FieldPath::Field("nome") => Some(Value::from(self.nome.as_str())),
            FieldPath::Field("cidade") => self.cidade.as_deref().map(Value::from),
            FieldPath::Field("estado") => self.estado.as_deref().map(Value::from),
            _ => None,
        }
    }
}

impl Entity for Filial {
    type Filter = FilialFilter;

    const COLLECTION: &'static str = "filiais";
    const NAME: &'static str = "Filial";
    const SORTABLE: &'static [(&'static str, &'static str)] =
        &[("id", "id"), ("nome", "nome"), ("cidade", "cidade"), ("estado", "estado")];

    fn default_sort() -> Sort {
        Sort::asc("nome")
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

/// Criteria for listing branches.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FilialFilter {
    /// Exact id.
    pub id: Option<i64>,

    /// Substring of the name, ignoring case.
    pub nome: Option<String>,

    /// Substring of the city, ignoring case.
    pub cidade: Option<String>,

    /// Substring of the state, ignoring case.
    pub estado: Option<String>,
}

impl Filter for FilialFilter {
    const CRITERIA: &'static [Criterion<Self>] = &[
        Criterion::Equals("id", |f: &Self| f.id.map(Value::Int)),
        Criterion::ContainsIgnoreCase("nome", |f: &Self| f.nome.as_deref()),
        Criterion::ContainsIgnoreCase("cidade", |f: &Self| f.cidade.as_deref()),
        Criterion::ContainsIgnoreCase("estado", |f: &Self| f.estado.as_deref()),
    ];
}

/// Fields accepted when creating or updating a branch.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct FilialRequest {
    pub nome: String,
    pub endereco: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub raio_geofence_metros: Option<f64>,
}

impl From<FilialRequest> for Filial {
    fn from(request: FilialRequest) -> Self {
        Self {
            id: None,
            nome: request.nome,
            endereco: request.endereco,
            bairro: request.bairro,
            cidade: request.cidade,
            estado: request.estado,
            cep: request.cep,
            latitude: request.latitude,
            longitude: request.longitude,
            raio_geofence_metros: request.raio_geofence_metros,
        }
    }
}

/// A branch as returned to callers.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct FilialResponse {
    pub id: i64,
    pub nome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endereco: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bairro: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raio_geofence_metros: Option<f64>,
}

impl From<Filial> for FilialResponse {
    fn from(filial: Filial) -> Self {
        Self {
            id: filial.id.unwrap_or_default(),
            nome: filial.nome,
            endereco: filial.endereco,
            bairro: filial.bairro,
            cidade: filial.cidade,
            estado: filial.estado,
            cep: filial.cep,
            latitude: filial.latitude,
            longitude: filial.longitude,
            raio_geofence_metros: filial.raio_geofence_metros,
        }
    }
}

/// Register a branch.
///
/// # Errors
///
/// Returns an error when the store refuses the write.
pub async fn create(request: FilialRequest, provider: &impl Provider) -> Result<FilialResponse> {
    let filial = provider.put(Filial::from(request)).await?;
    tracing::info!(id = ?filial.id, "Filial created");
    Ok(filial.into())
}

/// Replace a branch's details.
///
/// # Errors
///
/// Returns `NotFound` when no branch has the id, or an error when the store
/// refuses the write.
pub async fn update(
    id: i64, request: FilialRequest, provider: &impl Provider,
) -> Result<FilialResponse> {
    find::<Filial>(id, provider).await?;

    let mut filial = Filial::from(request);
    filial.set_id(id);
    let filial = provider.put(filial).await?;
    tracing::info!(id, "Filial updated");
    Ok(filial.into())
}

/// Fetch a branch.
///
/// # Errors
///
/// Returns `NotFound` when no branch has the id.
pub async fn get(id: i64, provider: &impl Provider) -> Result<FilialResponse> {
    Ok(find::<Filial>(id, provider).await?.into())
}

/// Remove a branch.
///
/// # Errors
///
/// Returns `NotFound` when no branch has the id, or an error when the store
/// refuses the delete, for example because motorcycles still belong to the
/// branch.
pub async fn delete(id: i64, provider: &impl Provider) -> Result<()> {
    ensure::<Filial>(id, provider).await?;
    provider.delete::<Filial>(id).await?;
    tracing::info!(id, "Filial deleted");
    Ok(())
}

/// List one page of branches matching a filter.
///
/// # Errors
///
/// Returns an error when the page's sort field is not sortable or the store
/// fails.
pub async fn query(
    filter: Option<&FilialFilter>, request: &PageRequest, provider: &impl Provider,
) -> Result<Page<FilialResponse>> {
    let page = search::<Filial>(filter, request, provider).await?;
    Ok(page.map(FilialResponse::from))
}
