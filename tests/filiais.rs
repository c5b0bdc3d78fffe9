//! Filiais

use mototrack::filiais::{self, Filial, FilialFilter, FilialRequest};
use mototrack::motos::{self, MotoRequest};
use mototrack::{Error, PageParams};
use test_utils::Provider;

fn filial(nome: &str, cidade: &str, estado: &str) -> FilialRequest {
    FilialRequest {
        nome: nome.to_string(),
        cidade: Some(cidade.to_string()),
        estado: Some(estado.to_string()),
        ..FilialRequest::default()
    }
}

// Should filter branches by city and state, ignoring case.
#[tokio::test]
async fn by_location() {
    let provider = Provider::new();
    for (nome, cidade, estado) in [
        ("Lapa", "São Paulo", "SP"),
        ("Moema", "São Paulo", "SP"),
        ("Centro", "Rio de Janeiro", "RJ"),
    ] {
        filiais::create(filial(nome, cidade, estado), &provider).await.expect("should create");
    }

    let request = PageParams::default().resolve::<Filial>().expect("should resolve");
    let filter = FilialFilter {
        cidade: Some("SÃO".to_string()),
        ..FilialFilter::default()
    };
    let page = filiais::query(Some(&filter), &request, &provider).await.expect("should query");
    let nomes: Vec<_> = page.items.iter().map(|f| f.nome.as_str()).collect();
    assert_eq!(nomes, ["Lapa", "Moema"]);

    let filter = FilialFilter {
        estado: Some("rj".to_string()),
        ..FilialFilter::default()
    };
    let page = filiais::query(Some(&filter), &request, &provider).await.expect("should query");
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].nome, "Centro");
}

// Should treat an absent filter, an empty filter and a filter of blank
// strings alike.
#[tokio::test]
async fn unconstrained_filters() {
    let provider = Provider::new();
    for (nome, cidade, estado) in [("Lapa", "São Paulo", "SP"), ("Centro", "Rio de Janeiro", "RJ")] {
        filiais::create(filial(nome, cidade, estado), &provider).await.expect("should create");
    }

    let request = PageParams::default().resolve::<Filial>().expect("should resolve");
    let blank = FilialFilter {
        nome: Some("  ".to_string()),
        cidade: Some(String::new()),
        estado: Some("\t".to_string()),
        ..FilialFilter::default()
    };
    for filter in [None, Some(&FilialFilter::default()), Some(&blank)] {
        let page = filiais::query(filter, &request, &provider).await.expect("should query");
        assert_eq!(page.total, 2);
    }
}

// Should replace a branch's details and keep its id.
#[tokio::test]
async fn update() {
    let provider = Provider::new();
    let created =
        filiais::create(filial("Lapa", "São Paulo", "SP"), &provider).await.expect("should create");

    let request = FilialRequest {
        latitude: Some(-23.527),
        longitude: Some(-46.703),
        raio_geofence_metros: Some(250.0),
        ..filial("Lapa Norte", "São Paulo", "SP")
    };
    let updated = filiais::update(created.id, request, &provider).await.expect("should update");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.raio_geofence_metros, Some(250.0));

    let fetched = filiais::get(created.id, &provider).await.expect("should get");
    assert_eq!(fetched, updated);
}

// Should refuse to remove a branch while motorcycles belong to it.
#[tokio::test]
async fn referenced() {
    let provider = Provider::new();
    let created =
        filiais::create(filial("Lapa", "São Paulo", "SP"), &provider).await.expect("should create");

    let request = MotoRequest {
        placa: "ABC1D23".to_string(),
        modelo: "CG 160".to_string(),
        marca: "Honda".to_string(),
        ano: 2022,
        status: "ATIVA".to_string(),
        filial_id: Some(created.id),
        ..MotoRequest::default()
    };
    let moto = motos::create(request, &provider).await.expect("should create");

    let Err(Error::Operation(detail)) = filiais::delete(created.id, &provider).await else {
        panic!("should be Operation");
    };
    assert!(detail.contains("motos"));
    filiais::get(created.id, &provider).await.expect("should still exist");

    motos::delete(moto.id, &provider).await.expect("should delete");
    filiais::delete(created.id, &provider).await.expect("should delete");

    let Err(Error::NotFound(_)) = filiais::get(created.id, &provider).await else {
        panic!("should be NotFound");
    };
}
