//! # Usuarios
//!
//! Users of the application and the profile (`perfil`) granting their
//! access. Credentials are stored but never returned to callers.

use serde::{Deserialize, Serialize};

use crate::page::{Page, PageRequest, Sort};
use crate::provider::Provider;
use crate::query::{Criterion, FieldPath, Fields, Filter, Value};
use crate::service::{collect_all, ensure, find, search};
use crate::store::Entity;
use crate::Result;

/// A user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Usuario {
    /// Identifier assigned by the store.
    pub id: Option<i64>,

    /// Display name.
    pub nome: String,

    /// Email address, unique across users.
    pub email: String,

    /// Credential, as supplied by the caller.
    pub senha: String,

    /// Profile: `OPERADOR`, `GESTOR` or `ADMINISTRADOR`.
    pub perfil: String,
}

impl Fields for Usuario {
    fn value(&self, field: &FieldPath) -> Option<Value> {
        match field {
            FieldPath::Field("id") => self.id.map(Value::Int),
            FieldPath::Field("nome") => Some(Value::from(self.nome.as_str())),
            FieldPath::Field("email") => Some(Value::from(self.email.as_str())),
            FieldPath::Field("perfil") => Some(Value::from(self.perfil.as_str())),
            _ => None,
        }
    }
}

impl Entity for Usuario {
    type Filter = UsuarioFilter;

    const COLLECTION: &'static str = "usuarios";
    const NAME: &'static str = "Usuario";
    const SORTABLE: &'static [(&'static str, &'static str)] =
        &[("id", "id"), ("nome", "nome"), ("email", "email"), ("perfil", "perfil")];

    fn default_sort() -> Sort {
        Sort::asc("nome")
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn unique_keys(&self) -> Vec<(&'static str, Value)> {
        vec![("email", Value::from(self.email.as_str()))]
    }
}

/// Criteria for listing users.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UsuarioFilter {
    /// Exact id.
    pub id: Option<i64>,

    /// Substring of the name, ignoring case.
    pub nome: Option<String>,

    /// Substring of the email address, ignoring case.
    pub email: Option<String>,

    /// Profile, ignoring case.
    pub perfil: Option<String>,
}

impl Filter for UsuarioFilter {
    const CRITERIA: &'static [Criterion<Self>] = &[
        Criterion::Equals("id", |f: &Self| f.id.map(Value::Int)),
        Criterion::ContainsIgnoreCase("nome", |f: &Self| f.nome.as_deref()),
        Criterion::ContainsIgnoreCase("email", |f: &Self| f.email.as_deref()),
        Criterion::EqualsIgnoreCase("perfil", |f: &Self| f.perfil.as_deref()),
    ];
}

/// Fields accepted when registering or updating a user.
#[derive(Clone, Default, Deserialize, Serialize)]
#[allow(missing_docs)]
pub struct UsuarioRequest {
    pub nome: String,
    pub email: String,
    pub senha: String,
    pub perfil: String,
}

// keep credentials out of logs
impl std::fmt::Debug for UsuarioRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsuarioRequest")
            .field("nome", &self.nome)
            .field("email", &self.email)
            .field("perfil", &self.perfil)
            .finish_non_exhaustive()
    }
}

impl From<UsuarioRequest> for Usuario {
    fn from(request: UsuarioRequest) -> Self {
        Self {
            id: None,
            nome: request.nome,
            email: request.email,
            senha: request.senha,
            perfil: request.perfil,
        }
    }
}

/// A user as returned to callers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[allow(missing_docs)]
pub struct UsuarioResponse {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub perfil: String,
}

impl From<Usuario> for UsuarioResponse {
    fn from(usuario: Usuario) -> Self {
        Self {
            id: usuario.id.unwrap_or_default(),
            nome: usuario.nome,
            email: usuario.email,
            perfil: usuario.perfil,
        }
    }
}

/// Register a user.
///
/// # Errors
///
/// Returns an error when the store refuses the write (for example, a
/// duplicate email address).
pub async fn create(request: UsuarioRequest, provider: &impl Provider) -> Result<UsuarioResponse> {
    let usuario = provider.put(Usuario::from(request)).await?;
    tracing::info!(id = ?usuario.id, perfil = %usuario.perfil, "Usuario created");
    Ok(usuario.into())
}

/// Replace a user's details, credential included.
///
/// # Errors
///
/// Returns `NotFound` when no user has the id, or an error when the store
/// refuses the write.
pub async fn update(
    id: i64, request: UsuarioRequest, provider: &impl Provider,
) -> Result<UsuarioResponse> {
    find::<Usuario>(id, provider).await?;

    let mut usuario = Usuario::from(request);
    usuario.set_id(id);
    let usuario = provider.put(usuario).await?;
    tracing::info!(id, "Usuario updated");
    Ok(usuario.into())
}

/// Fetch a user.
///
/// # Errors
///
/// Returns `NotFound` when no user has the id.
pub async fn get(id: i64, provider: &impl Provider) -> Result<UsuarioResponse> {
    Ok(find::<Usuario>(id, provider).await?.into())
}

/// Remove a user.
///
/// # Errors
///
/// Returns `NotFound` when no user has the id, or an error when the store
/// refuses the delete.
pub async fn delete(id: i64, provider: &impl Provider) -> Result<()> {
    ensure::<Usuario>(id, provider).await?;
    provider.delete::<Usuario>(id).await?;
    tracing::info!(id, "Usuario deleted");
    Ok(())
}

/// List every user, ordered by name.
///
/// # Errors
///
/// Returns an error when the store fails.
pub async fn list(provider: &impl Provider) -> Result<Vec<UsuarioResponse>> {
    let usuarios = collect_all::<Usuario>(None, provider).await?;
    Ok(usuarios.into_iter().map(UsuarioResponse::from).collect())
}

/// List one page of users matching a filter.
///
/// # Errors
///
/// Returns an error when the page's sort field is not sortable or the store
/// fails.
pub async fn query(
    filter: Option<&UsuarioFilter>, request: &PageRequest, provider: &impl Provider,
) -> Result<Page<UsuarioResponse>> {
    let page = search::<Usuario>(filter, request, provider).await?;
    Ok(page.map(UsuarioResponse::from))
}
